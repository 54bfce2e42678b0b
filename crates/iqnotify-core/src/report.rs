//! Outcome of one notification call

use iqnotify_api::{Decision, LookbackWindow, ModeRequest, Payload};
use iqnotify_util::{ChannelId, EvaluationId};
use serde::Serialize;

/// What the service decided for one call, before anything is delivered
#[derive(Debug, Clone, Serialize)]
pub struct NotifyPlan {
    pub evaluation_id: EvaluationId,
    pub mode: ModeRequest,
    pub window: LookbackWindow,
    /// One per pair with a known presence state, in configured order
    pub decisions: Vec<Decision>,
    pub payload: Payload,
}

impl NotifyPlan {
    /// Channels that should receive the payload, in pair order
    pub fn targets(&self) -> impl Iterator<Item = &ChannelId> {
        self.decisions
            .iter()
            .filter(|d| d.notify)
            .map(|d| &d.pair.channel)
    }
}

/// A delivery the dispatcher could not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDelivery {
    pub channel: ChannelId,
    pub error: String,
}

/// Full outcome of `send_message`
#[derive(Debug, Clone, Serialize)]
pub struct NotifyReport {
    #[serde(flatten)]
    pub plan: NotifyPlan,
    pub delivered: Vec<ChannelId>,
    pub failed: Vec<FailedDelivery>,
}

impl NotifyReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
