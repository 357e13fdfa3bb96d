//! Domain service for calculator
//!
//! Decodes a batch of wire commands into an execution plan and runs it.

use std::time::Instant;

use calculator_sdk::{CalcOutcome, VariableValue, WireCommand};
use tracing::{debug, trace};

use crate::config::CalculatorConfig;
use crate::domain::assembler::assemble;
use crate::domain::decode::CommandDecoder;
use crate::domain::error::CalcError;
use crate::domain::model::Command;
use crate::domain::plan::{ExecutionPlan, Strategy};

/// Stateless entry point shared by all transports.
///
/// Every call builds its own plan and variable table, so one instance can
/// serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Service {
    max_commands: usize,
    decoder: CommandDecoder,
}

impl Default for Service {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl Service {
    #[must_use]
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            max_commands: config.max_commands,
            decoder: CommandDecoder::new(config.max_expression_depth),
        }
    }

    /// Decode every command, then execute the whole batch.
    ///
    /// Nothing is evaluated unless all commands decode.
    ///
    /// # Errors
    /// Any [`CalcError`]; no partial result is ever returned.
    pub fn evaluate(&self, commands: Vec<WireCommand>) -> Result<Vec<VariableValue>, CalcError> {
        let count = commands.len();
        if count > self.max_commands {
            return Err(CalcError::RequestTooLarge {
                count,
                max: self.max_commands,
            });
        }

        let mut plan = ExecutionPlan::with_capacity(count);
        for (index, wire) in commands.into_iter().enumerate() {
            let command = self.decoder.decode(index, wire)?;
            if let Command::Calc(calc) = &command {
                trace!(
                    index,
                    target = %calc.target,
                    expression = %calc.expression,
                    "calc decoded"
                );
            }
            plan.add(command);
        }

        let result = plan.execute()?;
        debug!(commands = count, printed = result.len(), "batch evaluated");
        Ok(assemble(result))
    }

    /// [`Service::evaluate`] plus the time it took.
    ///
    /// # Errors
    /// Same as [`Service::evaluate`].
    pub fn calc(&self, commands: Vec<WireCommand>) -> Result<CalcOutcome, CalcError> {
        let started = Instant::now();
        let items = self.evaluate(commands)?;
        Ok(CalcOutcome {
            items,
            duration: started.elapsed(),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn service() -> Service {
        Service::default()
    }

    #[test]
    fn evaluates_mixed_forms() {
        let items = service()
            .evaluate(vec![
                WireCommand::calc_binary("x", "+", 2.0, 3.0),
                WireCommand::calc_expr("y", "x * (x - 1)"),
                WireCommand::print("y"),
                WireCommand::print("x"),
            ])
            .unwrap();

        assert_eq!(
            items,
            vec![VariableValue::new("y", 20.0), VariableValue::new("x", 5.0)]
        );
    }

    #[test]
    fn malformed_later_command_rejects_before_evaluation() {
        // The division by zero at index 0 would fail at run time; the decode
        // error at index 1 must win because nothing runs before decoding ends.
        let err = service()
            .evaluate(vec![
                WireCommand::calc_expr("x", "1 / 0"),
                WireCommand::calc_expr("y", "(("),
            ])
            .unwrap_err();

        assert!(matches!(err, CalcError::MalformedPayload { index: 1, .. }));
    }

    #[test]
    fn unknown_kind_reports_its_index() {
        let err = service()
            .evaluate(vec![
                WireCommand::print("x"),
                WireCommand {
                    kind: "delete".to_owned(),
                    ..WireCommand::default()
                },
            ])
            .unwrap_err();

        assert_eq!(err, CalcError::unknown_kind(1, "delete"));
    }

    #[test]
    fn enforces_command_limit() {
        let svc = Service::new(&CalculatorConfig {
            max_commands: 2,
            ..CalculatorConfig::default()
        });
        let batch = vec![WireCommand::calc_expr("x", "1"); 3];

        assert_eq!(
            svc.evaluate(batch),
            Err(CalcError::RequestTooLarge { count: 3, max: 2 })
        );
        assert!(svc.evaluate(vec![WireCommand::calc_expr("x", "1"); 2]).is_ok());
    }

    #[test]
    fn identical_batches_give_identical_results() {
        let batch = vec![
            WireCommand::calc_expr("a", "1.5"),
            WireCommand::calc_expr("a", "a * 4"),
            WireCommand::print("a"),
        ];
        let svc = service();
        assert_eq!(svc.evaluate(batch.clone()), svc.evaluate(batch));
    }

    #[test]
    fn assignment_makes_a_variable_visible() {
        let svc = service();
        assert_eq!(
            svc.evaluate(vec![WireCommand::print("v")]),
            Err(CalcError::undefined("v"))
        );
        assert!(
            svc.evaluate(vec![WireCommand::calc_expr("v", "0"), WireCommand::print("v")])
                .is_ok()
        );
    }

    #[test]
    fn empty_batch_yields_empty_outcome() {
        let outcome = service().calc(Vec::new()).unwrap();
        assert!(outcome.items.is_empty());
    }
}
