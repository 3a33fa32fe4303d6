//! Operator confirmation gate

use crate::error::Result;

/// Asks the operator a yes/no question
pub trait Confirmer: Send + Sync {
    /// Ask `prompt`; `true` means yes
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Confirmer that always gives the same answer
///
/// Used for non-interactive runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
