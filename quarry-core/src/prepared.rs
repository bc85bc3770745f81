use crate::{Result, Value};
use std::fmt::Display;

/// A parameterized, backend-prepared statement handle.
///
/// Indexes start at 0, the driver maps them to its own placeholder numbering
/// (`$1`, `?1`...). Statements built by quarry bind their arguments in order
/// through [`crate::Query::bind_all`].
pub trait Prepared: Send + Sync + Display {
    /// Bind `value` to the parameter at `index`.
    fn bind_value(&mut self, value: Value, index: u64) -> Result<&mut Self>;
    /// Number of parameters bound so far, the next free index.
    fn bound(&self) -> u64;
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
}
