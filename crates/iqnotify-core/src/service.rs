//! Notification service

use chrono::{DateTime, Utc};
use iqnotify_api::{CallOverrides, LookbackWindow, ModeRequest, NotifyRequest, Pair, Payload, WindowOverride};
use iqnotify_config::NotifyConfig;
use iqnotify_dispatch::Dispatcher;
use iqnotify_store::{read_facts, PresenceStore};
use iqnotify_util::EvaluationId;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{evaluate_request, FailedDelivery, NotifyPlan, NotifyReport};

/// Presence-aware notification service.
///
/// Holds the configured pairs and default window; every call reads a fresh
/// presence snapshot, so calls share no mutable state.
pub struct NotifyService {
    pairs: Vec<Pair>,
    default_window: LookbackWindow,
    store: Arc<dyn PresenceStore>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl NotifyService {
    /// Create a new notification service
    pub fn new(
        config: NotifyConfig,
        store: Arc<dyn PresenceStore>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        info!(
            pair_count = config.pairs.len(),
            default_window = %config.service.default_window,
            "Notification service initialized"
        );

        Self {
            pairs: config.pairs,
            default_window: config.service.default_window,
            store,
            dispatcher,
        }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn default_window(&self) -> LookbackWindow {
        self.default_window
    }

    /// Read presence and decide who gets the message, without delivering
    pub fn plan(&self, request: NotifyRequest, now: DateTime<Utc>) -> NotifyPlan {
        let evaluation_id = EvaluationId::new();
        let overrides = CallOverrides::extract(request.data);

        if let ModeRequest::Unrecognized(raw) = &overrides.mode {
            warn!(
                evaluation_id = %evaluation_id,
                mode = %raw,
                "Unrecognized notification mode, nobody will be notified"
            );
        }
        if let WindowOverride::Invalid(raw) = &overrides.window {
            warn!(
                evaluation_id = %evaluation_id,
                time = %raw,
                default_window = %self.default_window,
                "Invalid lookback override, using configured window"
            );
        }

        let window = overrides.window.resolve(self.default_window);
        debug!(
            evaluation_id = %evaluation_id,
            mode = %overrides.mode,
            window = %window,
            body = %request.message,
            "Evaluating notification"
        );

        let facts = read_facts(self.store.as_ref(), &self.pairs);
        let decisions = evaluate_request(&facts, &overrides.mode, window, now);

        NotifyPlan {
            evaluation_id,
            mode: overrides.mode,
            window,
            decisions,
            payload: Payload {
                message: request.message,
                title: request.title,
                data: overrides.data,
            },
        }
    }

    /// Send a message to every pair the requested mode selects
    pub async fn send_message(&self, request: NotifyRequest) -> NotifyReport {
        self.send_message_at(request, iqnotify_util::now()).await
    }

    /// Like [`send_message`](Self::send_message) with an explicit clock
    pub async fn send_message_at(&self, request: NotifyRequest, now: DateTime<Utc>) -> NotifyReport {
        let plan = self.plan(request, now);
        let mut delivered = Vec::new();
        let mut failed = Vec::new();

        // Sequential, in pair order. One failure never stops the rest.
        for channel in plan.targets() {
            match self.dispatcher.deliver(channel, &plan.payload).await {
                Ok(()) => {
                    info!(
                        evaluation_id = %plan.evaluation_id,
                        channel = %channel,
                        mode = %plan.mode,
                        "Notifying notify.{}", channel
                    );
                    delivered.push(channel.clone());
                }
                Err(e) => {
                    warn!(
                        evaluation_id = %plan.evaluation_id,
                        channel = %channel,
                        error = %e,
                        "Delivery failed"
                    );
                    failed.push(FailedDelivery {
                        channel: channel.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if plan.decisions.len() < self.pairs.len() {
            debug!(
                evaluation_id = %plan.evaluation_id,
                skipped = self.pairs.len() - plan.decisions.len(),
                "Pairs skipped for unknown presence"
            );
        }

        NotifyReport {
            plan,
            delivered,
            failed,
        }
    }
}
