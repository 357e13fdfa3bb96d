use std::collections::HashMap;

use crate::domain::error::CalcError;

/// Per-execution mapping from variable name to its current value.
///
/// Created empty at the start of an execution and dropped with it.
#[derive(Debug, Default)]
pub struct VariableTable {
    values: HashMap<String, f64>,
}

impl VariableTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, overwriting any previous binding.
    pub fn set(&mut self, name: &str, value: f64) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_owned(), value);
            }
        }
    }

    /// # Errors
    /// [`CalcError::UndefinedVariable`] if `name` has not been assigned.
    pub fn get(&self, name: &str) -> Result<f64, CalcError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| CalcError::undefined(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
