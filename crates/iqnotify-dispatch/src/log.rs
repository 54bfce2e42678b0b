//! NDJSON log dispatcher

use async_trait::async_trait;
use iqnotify_api::Payload;
use iqnotify_util::ChannelId;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::info;

use crate::{DeliveryError, DeliveryResult, Dispatcher};

#[derive(Serialize)]
struct DeliveryLine<'a> {
    service: String,
    #[serde(flatten)]
    payload: &'a Payload,
}

/// Writes one JSON object per delivery to a writer, one per line.
///
/// Used by the CLI host so that an outer process can pick deliveries up
/// and forward them to the real channels.
pub struct LogDispatcher {
    out: Mutex<Box<dyn Write + Send>>,
}

impl LogDispatcher {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

#[async_trait]
impl Dispatcher for LogDispatcher {
    async fn deliver(&self, channel: &ChannelId, payload: &Payload) -> DeliveryResult<()> {
        let line = serde_json::to_string(&DeliveryLine {
            service: format!("notify.{}", channel),
            payload,
        })?;

        let mut out = self
            .out
            .lock()
            .map_err(|_| DeliveryError::Internal("output lock poisoned".into()))?;
        writeln!(out, "{}", line)?;
        out.flush()?;

        info!(channel = %channel, "Delivery written");
        Ok(())
    }
}
