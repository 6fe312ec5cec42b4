//! Move history and the feedback text built from it.

pub mod formatter;
pub mod prompt;
pub mod store;

pub use self::formatter::{ContextFormatter, EMPTY_HISTORY, HEADER};
pub use self::prompt::PromptBuilder;
pub use self::store::{ContextConfig, ContextEntry, ContextStore};
