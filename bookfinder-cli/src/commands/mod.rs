//! CLI command implementations

mod favorites;
mod search;

pub use favorites::{clear, favorites, save, unsave};
pub use search::search;
