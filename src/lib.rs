pub mod config;
pub mod error;
pub mod program;
pub mod refactorings;
pub mod search;

pub use config::SearchConfig;
pub use error::{LitterboxError, Result};
