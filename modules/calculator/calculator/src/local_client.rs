//! In-process `CalculatorClient` implementation

use std::sync::Arc;

use async_trait::async_trait;

use calculator_sdk::{CalcOutcome, CalculatorClient, CalculatorError, WireCommand};

use crate::domain::Service;

/// `CalculatorClient` that evaluates batches in the calling process,
/// without a network hop.
#[derive(Clone)]
pub struct LocalCalculatorClient {
    service: Arc<Service>,
}

impl LocalCalculatorClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CalculatorClient for LocalCalculatorClient {
    async fn calc(&self, commands: Vec<WireCommand>) -> Result<CalcOutcome, CalculatorError> {
        self.service.calc(commands).map_err(Into::into)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use calculator_sdk::{CalcErrorCode, VariableValue};
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn evaluates_in_process() {
        let client = LocalCalculatorClient::new(Arc::new(Service::default()));
        let outcome = client
            .calc(vec![
                WireCommand::calc_expr("x", "1"),
                WireCommand::calc_expr("x", "x + 1"),
                WireCommand::print("x"),
            ])
            .await
            .unwrap();

        assert_eq!(outcome.items, vec![VariableValue::new("x", 2.0)]);
    }

    #[tokio::test]
    async fn domain_errors_become_rejections() {
        let client = LocalCalculatorClient::new(Arc::new(Service::default()));
        let err = client
            .calc(vec![WireCommand::calc_binary("x", "/", 10.0, 0.0)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CalculatorError::Rejected {
                code: CalcErrorCode::DivisionByZero,
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_batches_do_not_share_variables() {
        let client = LocalCalculatorClient::new(Arc::new(Service::default()));
        let mut tasks = JoinSet::new();

        for i in 0..64_u32 {
            let client = client.clone();
            tasks.spawn(async move {
                let own = f64::from(i);
                for _ in 0..50 {
                    let outcome = client
                        .calc(vec![
                            WireCommand::calc_binary("x", "+", own, 0.0),
                            WireCommand::calc_expr("x", "x * 2 / 2"),
                            WireCommand::print("x"),
                        ])
                        .await
                        .unwrap();
                    assert_eq!(outcome.items, vec![VariableValue::new("x", own)]);
                    tokio::task::yield_now().await;
                }
            });
        }

        for _ in 0..16 {
            let client = client.clone();
            tasks.spawn(async move {
                for _ in 0..50 {
                    let err = client.calc(vec![WireCommand::print("x")]).await.unwrap_err();
                    assert!(matches!(
                        err,
                        CalculatorError::Rejected {
                            code: CalcErrorCode::UndefinedVariable,
                            ..
                        }
                    ));
                    tokio::task::yield_now().await;
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }
    }
}
