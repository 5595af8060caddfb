use tracing::debug;

use crate::Position;

use super::errors::{Error, ErrorImpl};

/// Collects semantic errors. Reporting never aborts the caller; the passes
/// keep walking and the pipeline checks `error_count` between stages.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn report(&mut self, error: ErrorImpl, position: Position) {
        debug!(line = position.line, "semantic error: {}", error);
        self.errors.push(Error::new(error, position));
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }
}
