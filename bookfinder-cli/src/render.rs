//! Terminal rendering of search results and favorites

use bookfinder_core::{BookRecord, Config, CoverSize, SearchSession, SearchStatus};
use serde::Serialize;

/// A book with its display links resolved
#[derive(Debug, Serialize)]
pub struct BookView<'a> {
    #[serde(flatten)]
    pub book: &'a BookRecord,
    /// `None` means show a placeholder
    pub cover_url: Option<String>,
    pub detail_url: String,
}

impl<'a> BookView<'a> {
    pub fn new(book: &'a BookRecord, config: &Config) -> Self {
        Self {
            book,
            cover_url: book.cover_url(&config.covers_url, CoverSize::Medium),
            detail_url: book.detail_url(&config.api_url),
        }
    }
}

pub fn book_views<'a>(
    books: impl Iterator<Item = &'a BookRecord>,
    config: &Config,
) -> Vec<BookView<'a>> {
    books.map(|book| BookView::new(book, config)).collect()
}

/// Snapshot of a settled search session
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub query: &'a str,
    pub page: u32,
    pub status: SearchStatus,
    pub num_found: u64,
    pub author_filter: &'a str,
    pub visible: usize,
    pub error: Option<&'a str>,
    pub results: Vec<BookView<'a>>,
}

impl<'a> SearchReport<'a> {
    pub fn new(session: &'a SearchSession, config: &Config) -> Self {
        let results = book_views(session.filtered_results().into_iter(), config);
        Self {
            query: session.query(),
            page: session.page(),
            status: session.status(),
            num_found: session.num_found(),
            author_filter: session.author_filter(),
            visible: results.len(),
            error: session.error(),
            results,
        }
    }
}

pub fn print_search(report: &SearchReport<'_>) {
    // Failures are reported by the caller
    if report.error.is_some() {
        return;
    }

    println!(
        "Found {} results for \"{}\" (page {})",
        report.num_found, report.query, report.page
    );
    if !report.author_filter.is_empty() {
        println!(
            "Showing {} matching author \"{}\"",
            report.visible, report.author_filter
        );
    }
    if report.results.is_empty() {
        println!("No books to show");
        return;
    }
    print_books(&report.results);
}

pub fn print_books(views: &[BookView<'_>]) {
    for (index, view) in views.iter().enumerate() {
        let book = view.book;
        println!(
            "{:>3}. {} ({}) - {}",
            index + 1,
            book.title,
            book.first_publish_year,
            book.author_name
        );
        println!("     key:   {}", book.key);
        println!(
            "     cover: {}",
            view.cover_url.as_deref().unwrap_or("(no cover)")
        );
        println!("     link:  {}", view.detail_url);
    }
}
