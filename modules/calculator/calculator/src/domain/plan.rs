//! Execution plan: commands accumulated for a single run.

use crate::domain::error::CalcError;
use crate::domain::evaluator::{self, ExecutionResult};
use crate::domain::model::{CalcCommand, Command, PrintCommand};

/// Incrementally built, single-use command plan.
pub trait Strategy {
    /// Queue a `calc` command. Nothing is evaluated yet.
    fn add_task_calc(&mut self, cmd: CalcCommand);

    /// Queue a `print` command.
    fn add_task_print(&mut self, cmd: PrintCommand);

    /// Run the queued commands in order against a fresh variable table.
    ///
    /// # Errors
    /// The first evaluation failure, or [`CalcError::AlreadyExecuted`] when
    /// called on a plan that has already run.
    fn execute(&mut self) -> Result<ExecutionResult, CalcError>;
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    commands: Vec<Command>,
    executed: bool,
}

impl ExecutionPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            executed: false,
        }
    }

    /// Queue a decoded command through the matching `add_task_*` call.
    pub fn add(&mut self, command: Command) {
        match command {
            Command::Calc(cmd) => self.add_task_calc(cmd),
            Command::Print(cmd) => self.add_task_print(cmd),
        }
    }

    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.executed
    }
}

impl Strategy for ExecutionPlan {
    fn add_task_calc(&mut self, cmd: CalcCommand) {
        self.commands.push(Command::Calc(cmd));
    }

    fn add_task_print(&mut self, cmd: PrintCommand) {
        self.commands.push(Command::Print(cmd));
    }

    fn execute(&mut self) -> Result<ExecutionResult, CalcError> {
        if self.executed {
            return Err(CalcError::AlreadyExecuted);
        }
        self.executed = true;
        evaluator::run(&self.commands)
    }
}
