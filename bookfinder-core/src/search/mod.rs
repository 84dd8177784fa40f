//! Title search against the remote bibliographic API

mod client;
mod response;
mod session;

pub use client::{OpenLibraryClient, SearchApi};
pub use response::{parse_search_page, SearchPage};
pub use session::{PendingSearch, SearchOutcome, SearchSession, SearchStatus, GENERIC_ERROR};
