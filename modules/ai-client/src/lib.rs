//! Thin client for the Anthropic Messages API.
//!
//! [`claude::Claude::extract`] forces a single tool call whose input schema is
//! derived from the target type.

pub mod claude;
pub mod error;
pub mod schema;
pub mod util;

pub use claude::Claude;
pub use error::{AiError, Result};
pub use schema::StructuredOutput;
