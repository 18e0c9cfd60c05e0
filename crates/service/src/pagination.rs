//! Pagination rules for question listing.
//!
//! Turns the raw `page` / `page_size` query values into the
//! `(page_size, offset)` pair consumed by the question store.

use crate::errors::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 50;
/// Page size used when the client explicitly asks for `page_size=0`.
pub const ZERO_PAGE_SIZE: u64 = 10;
/// Largest row offset the SQL layer can bind (a signed 64-bit OFFSET).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Normalized pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page, never above [`MAX_PAGE_SIZE`]
    pub page_size: u64,
}

impl Pagination {
    /// Apply the clamping rules: page 0 is page 1, size 0 falls back to
    /// [`ZERO_PAGE_SIZE`], sizes above [`MAX_PAGE_SIZE`] are capped.
    pub fn new(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = match page_size {
            0 => ZERO_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        Self { page, page_size }
    }

    /// Parse raw query values.
    ///
    /// When both are absent (or empty) the defaults apply. Once either is
    /// given, both must be non-negative integers.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Result<Self, ServiceError> {
        let page = page.map(str::trim).filter(|s| !s.is_empty());
        let page_size = page_size.map(str::trim).filter(|s| !s.is_empty());
        if page.is_none() && page_size.is_none() {
            return Ok(Self::default());
        }
        let page = parse_param("page", page)?;
        let page_size = parse_param("page_size", page_size)?;
        let p = Self::new(page, page_size);
        match (p.page - 1).checked_mul(p.page_size) {
            Some(offset) if offset <= MAX_OFFSET => Ok(p),
            _ => Err(ServiceError::Validation(format!("page {} is out of range", p.page))),
        }
    }

    pub fn limit(&self) -> u64 { self.page_size }

    pub fn offset(&self) -> u64 { (self.page - 1).saturating_mul(self.page_size) }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, page_size: DEFAULT_PAGE_SIZE } }
}

fn parse_param(name: &str, raw: Option<&str>) -> Result<u64, ServiceError> {
    let raw = raw.unwrap_or_default();
    raw.parse::<u64>()
        .map_err(|e| ServiceError::Validation(format!("error converting {name} query param to number: {e}")))
}
