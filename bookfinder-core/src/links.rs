//! URLs for cover images and book detail pages

use crate::types::{BookRecord, CoverId};

/// Cover image size accepted by the covers service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Image URL for a cover, `None` when there is no cover and a placeholder should be shown
pub fn cover_url(covers_base: &str, cover: Option<&CoverId>, size: CoverSize) -> Option<String> {
    let cover = cover?;
    Some(format!(
        "{}/b/id/{}-{}.jpg",
        covers_base.trim_end_matches('/'),
        urlencoding::encode(&cover.to_string()),
        size.suffix()
    ))
}

/// Detail page URL for a book key, with or without its leading slash
pub fn detail_url(site_base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        site_base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

impl BookRecord {
    pub fn cover_url(&self, covers_base: &str, size: CoverSize) -> Option<String> {
        cover_url(covers_base, self.cover_i.as_ref(), size)
    }

    pub fn detail_url(&self, site_base: &str) -> String {
        detail_url(site_base, &self.key)
    }
}
