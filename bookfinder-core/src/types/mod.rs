//! Core types shared by search results and favorites

mod book;
mod fields;

pub use book::BookRecord;
pub use fields::{CoverId, PublishYear, UNKNOWN_YEAR};
