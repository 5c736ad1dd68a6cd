//! Convenience re-exports.

pub use crate::config::RekonConfig;
pub use crate::db::SalesDb;
pub use crate::error::{RekonError, Result};
pub use crate::provider::{ChatProvider, GeminiProvider};
pub use crate::session::{Session, Transcript};
pub use crate::tools::{ToolName, ToolRegistry};
pub use crate::types::{GenerationSettings, ModelMessage, Role, TurnResult};
