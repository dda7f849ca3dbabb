//! Structured error types for the paragraph line-breaking core.
//!
//! Two variants cover the real error sources: a shaper that can't shape a
//! substring, and a programmer error at item construction. `thiserror` was
//! already declared (and unused) in the teacher's `Cargo.toml`; this crate
//! puts it to work instead of hand-rolling `Display`/`std::error::Error`.

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum Error {
    /// The font couldn't shape a substring. Propagated from the `Font`
    /// implementation; not recoverable inside the core.
    #[error("shaping failed: {0}")]
    ShapingFailure(String),

    /// Negative or non-finite width/stretch/shrink passed to an item
    /// constructor. A programmer error, caught at construction.
    #[error("invalid item: {0}")]
    InvalidItem(String),
}
