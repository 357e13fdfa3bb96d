use std::sync::Arc;

use calculator_sdk::{CalcOutcome, CalculatorClient, CalculatorError, WireCommand};
use tracing::{debug, error, instrument};

/// Gateway-side service: forwards batches to whichever calculator backs it.
#[derive(Clone)]
pub struct Service {
    client: Arc<dyn CalculatorClient>,
}

impl Service {
    #[must_use]
    pub fn new(client: Arc<dyn CalculatorClient>) -> Self {
        Self { client }
    }

    /// Evaluate one batch.
    ///
    /// # Errors
    /// Propagates the backing client's [`CalculatorError`].
    #[instrument(skip_all, fields(commands = commands.len()))]
    pub async fn calc(&self, commands: Vec<WireCommand>) -> Result<CalcOutcome, CalculatorError> {
        match self.client.calc(commands).await {
            Ok(outcome) => {
                debug!(
                    items = outcome.items.len(),
                    duration_us = outcome.duration.as_micros(),
                    "batch evaluated"
                );
                Ok(outcome)
            }
            Err(err @ CalculatorError::Rejected { .. }) => {
                debug!(error = %err, "batch rejected");
                Err(err)
            }
            Err(err) => {
                error!(error = %err, "calculator call failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calculator_sdk::{CalcErrorCode, VariableValue};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingClient {
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl CalculatorClient for RecordingClient {
        async fn calc(&self, commands: Vec<WireCommand>) -> Result<CalcOutcome, CalculatorError> {
            self.seen.lock().unwrap().push(commands.len());
            if commands.is_empty() {
                return Err(CalculatorError::rejected(
                    CalcErrorCode::MalformedPayload,
                    "empty",
                ));
            }
            Ok(CalcOutcome {
                items: vec![VariableValue::new("x", 1.0)],
                duration: Duration::from_micros(3),
            })
        }
    }

    #[tokio::test]
    async fn forwards_to_client() {
        let client = Arc::new(RecordingClient::default());
        let svc = Service::new(client.clone());

        let outcome = svc.calc(vec![WireCommand::print("x")]).await.unwrap();
        assert_eq!(outcome.items.len(), 1);

        let err = svc.calc(Vec::new()).await.unwrap_err();
        assert!(matches!(err, CalculatorError::Rejected { .. }));

        assert_eq!(*client.seen.lock().unwrap(), vec![1, 0]);
    }
}
