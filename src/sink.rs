//! Submit sink abstraction for delivering serialized form payloads

use async_trait::async_trait;

use crate::engine::SubmittedForm;
use crate::error::FormError;

/// Destination for submitted forms, enabling mocking in tests.
///
/// Submission never depends on form validity; sinks receive whatever the
/// form currently holds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitSink: Send + Sync {
    /// Deliver one serialized submission
    async fn deliver(&mut self, payload: &SubmittedForm) -> Result<(), FormError>;
}

/// Default sink: writes the serialized payload through tracing
#[derive(Debug, Default)]
pub struct LoggingSink;

#[async_trait]
impl SubmitSink for LoggingSink {
    async fn deliver(&mut self, payload: &SubmittedForm) -> Result<(), FormError> {
        let body = serde_json::to_string(payload)?;
        tracing::info!(session = %payload.session_id, "Saved: {body}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio_test::assert_ok;
    use uuid::Uuid;

    fn payload() -> SubmittedForm {
        SubmittedForm {
            session_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            values: serde_json::json!({ "firstName": "Ada" }),
        }
    }

    #[tokio::test]
    async fn test_logging_sink_accepts_payload() {
        let mut sink = LoggingSink;
        assert_ok!(sink.deliver(&payload()).await);
    }

    #[tokio::test]
    async fn test_mock_sink_observes_payload() {
        let mut sink = MockSubmitSink::new();
        sink.expect_deliver()
            .times(1)
            .withf(|p| p.values["firstName"] == "Ada")
            .returning(|_| Ok(()));
        sink.deliver(&payload()).await.unwrap();
    }
}
