//! Log sinks for informational and warning messages.
//!
//! Responsibilities:
//! - Define the `LogSink` trait used for assignment lines, lenient-mode
//!   warnings and summary dumps.
//! - Provide `TracingSink`, the default sink, which forwards to `tracing`.
//!
//! Does NOT handle:
//! - Installing a tracing subscriber. Embedding applications own that.

use std::fmt;

/// Destination for yaml2env diagnostic messages.
pub trait LogSink: Send + Sync + fmt::Debug {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);
}

/// Sink that emits every message as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "yaml2env", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "yaml2env", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::capture_messages;

    #[test]
    fn test_tracing_sink_emits_info_and_warn() {
        let messages = capture_messages(|| {
            TracingSink.info(":: ENV[\"API_KEY\"] = \"x\"");
            TracingSink.warn("something went wrong");
        });

        assert_eq!(
            messages,
            vec![
                ":: ENV[\"API_KEY\"] = \"x\"".to_string(),
                "something went wrong".to_string()
            ]
        );
    }
}
