//! Mock dispatcher for testing

use async_trait::async_trait;
use iqnotify_api::Payload;
use iqnotify_util::ChannelId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{DeliveryError, DeliveryResult, Dispatcher};

/// A delivery recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDelivery {
    pub channel: ChannelId,
    pub payload: Payload,
}

/// Mock dispatcher for unit/integration testing
#[derive(Default)]
pub struct MockDispatcher {
    deliveries: Arc<Mutex<Vec<RecordedDelivery>>>,

    /// Channels whose deliveries fail
    failing: Arc<Mutex<HashSet<ChannelId>>>,

    /// Simulated transport latency
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to `channel` fail
    pub fn fail_channel(&self, channel: impl Into<ChannelId>) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(channel.into());
        }
    }

    /// Delay every delivery
    pub fn set_delay(&self, delay: Option<Duration>) {
        if let Ok(mut current) = self.delay.lock() {
            *current = delay;
        }
    }

    /// Successful deliveries, in order
    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Channels delivered to, in order
    pub fn channels(&self) -> Vec<ChannelId> {
        self.deliveries()
            .into_iter()
            .map(|d| d.channel)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.clear();
        }
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn deliver(&self, channel: &ChannelId, payload: &Payload) -> DeliveryResult<()> {
        let delay = *self
            .delay
            .lock()
            .map_err(|_| DeliveryError::Internal("mock lock poisoned".into()))?;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failing
            .lock()
            .map_err(|_| DeliveryError::Internal("mock lock poisoned".into()))?
            .contains(channel);
        if should_fail {
            return Err(DeliveryError::Rejected {
                channel: channel.clone(),
                message: "Mock delivery failure".into(),
            });
        }

        self.deliveries
            .lock()
            .map_err(|_| DeliveryError::Internal("mock lock poisoned".into()))?
            .push(RecordedDelivery {
                channel: channel.clone(),
                payload: payload.clone(),
            });
        Ok(())
    }
}
