//! Listing engine: enumerate, describe, filter, sort and paginate the object set.

pub mod paginate;
mod scan;

pub use paginate::{paginate, paginate_all, total_pages, PageInfo};
pub use scan::Mask;

use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};
use crate::cache::MetadataCache;
use crate::common::record::ObjectRecord;
use crate::registry::CapabilityTokenRegistry;
use crate::store::config::TenantConfig;
use crate::utils::path::normalize_extension;
use crate::utils::random::random_page;
use crate::utils::time::start_of_day;
use scan::{enumerate, ScanFilter};

/// Defines errors that can occur during a listing.
//
// // 定义在列表查询期间可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// An I/O error occurred while walking or reading the storage root.
    /// Listings have no partial results; the whole query fails.
    //
    // // 遍历或读取存储根目录时发生 I/O 错误。列表没有部分结果，整个查询失败。
    #[error("Storage I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The glob mask could not be compiled.
    //
    // // glob 掩码无法编译。
    #[error("Invalid glob mask: {0}")]
    InvalidGlob(#[from] glob::PatternError),

    /// The regex mask could not be compiled.
    //
    // // 正则掩码无法编译。
    #[error("Invalid regex mask: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A page selector string was neither a number, `all` nor `random`.
    //
    // // 页码选择器既不是数字，也不是 `all` 或 `random`。
    #[error("Invalid page selector: {0}")]
    InvalidPageSelector(String),
}

/// Which page of the sorted results to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    /// A 1-based page number, clamped into range.
    Number(usize),
    /// Everything on one page.
    All,
    /// A uniformly random page.
    Random,
}

impl Default for PageSelector {
    fn default() -> Self {
        PageSelector::Number(1)
    }
}

impl FromStr for PageSelector {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(PageSelector::All),
            "random" => Ok(PageSelector::Random),
            other => other
                .parse::<usize>()
                .map(PageSelector::Number)
                .map_err(|_| QueryError::InvalidPageSelector(s.to_string())),
        }
    }
}

/// A half-open range of UTC days, `[start, end)`.
///
/// Both bounds are day-aligned: `start` admits everything from midnight of
/// that day, and `end` excludes everything from midnight of that day on.
/// Use [`DateRange::through`] to make the last day inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    /// A range whose last included day is `last_day`, in its entirety.
    pub fn through(start: Option<NaiveDate>, last_day: Option<NaiveDate>) -> Self {
        DateRange {
            start,
            end: last_day.and_then(|day| day.succ_opt()),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant >= start_of_day(end) {
                return false;
            }
        }
        true
    }
}

/// Everything that scopes and shapes a listing.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Directory to enumerate (normally the tenant's storage root).
    pub scope: PathBuf,
    pub mask: Mask,
    /// Extension allow-list; `None` admits every extension.
    pub extensions: Option<Vec<String>>,
    pub dates: DateRange,
    /// Largest admitted size in bytes, inclusive.
    pub max_size: Option<u64>,
    pub page: PageSelector,
}

impl QueryRequest {
    /// A request for the first page of every visible file under `scope`.
    pub fn new(scope: impl Into<PathBuf>) -> Self {
        QueryRequest {
            scope: scope.into(),
            mask: Mask::any(),
            extensions: None,
            dates: DateRange::default(),
            max_size: None,
            page: PageSelector::default(),
        }
    }

    /// A gallery request: the tenant's image extensions only.
    pub fn images(config: &TenantConfig) -> Self {
        QueryRequest::new(&config.image_path).with_extensions(config.image_files.iter().map(String::as_str))
    }

    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_extensions<'a>(mut self, extensions: impl IntoIterator<Item = &'a str>) -> Self {
        self.extensions = Some(extensions.into_iter().map(normalize_extension).collect());
        self
    }

    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = dates;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_page(mut self, page: PageSelector) -> Self {
        self.page = page;
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub records: Vec<ObjectRecord>,
    pub page: PageInfo,
}

/// Runs listings against the live filesystem, using the metadata cache for
/// everything but existence and size.
pub struct QueryEngine<'a> {
    config: &'a TenantConfig,
    cache: &'a mut MetadataCache,
    tokens: &'a CapabilityTokenRegistry,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        config: &'a TenantConfig,
        cache: &'a mut MetadataCache,
        tokens: &'a CapabilityTokenRegistry,
    ) -> Self {
        QueryEngine { config, cache, tokens }
    }

    /// Lists one page of objects, most recently modified first.
    ///
    /// Ties on modification time are broken by name so the order is stable.
    pub fn list(&mut self, request: &QueryRequest) -> Result<QueryPage, QueryError> {
        let extensions: Option<Vec<String>> = request
            .extensions
            .as_ref()
            .map(|list| list.iter().map(|e| normalize_extension(e)).collect());
        let found = enumerate(
            &request.scope,
            ScanFilter {
                mask: &request.mask,
                extensions: extensions.as_deref(),
                max_size: request.max_size,
            },
        )?;

        let mut misses = 0usize;
        let mut records = Vec::with_capacity(found.len());
        for file in found {
            let record = match self.cache.get(&file.path) {
                Some(record) => record,
                None => {
                    let record = match ObjectRecord::from_file(&file.path, self.config) {
                        Ok(record) => record,
                        Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                        Err(e) => return Err(e.into()),
                    };
                    self.cache.populate(&file.path, &record);
                    misses += 1;
                    record
                }
            };
            if request.dates.contains(record.modified_at) {
                records.push(record);
            }
        }

        if misses > 0 {
            debug!(misses, "metadata cache populated during listing");
            if let Err(e) = self.cache.flush() {
                warn!(error = %e, "failed to persist metadata cache");
            }
        }

        records.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total = records.len();
        let per_page = self.config.page_size;
        let links = self.config.page_links;
        let page = match request.page {
            PageSelector::Number(n) => paginate(total, per_page, links, n),
            PageSelector::Random => paginate(total, per_page, links, random_page(total_pages(total, per_page))),
            PageSelector::All => paginate_all(total, per_page),
        };

        let range = page.result_range();
        let mut records: Vec<ObjectRecord> = records
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect();
        for record in records.iter_mut() {
            record.token = self.tokens.token_for(&record.path).map(str::to_string);
        }

        Ok(QueryPage { records, page })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        day(y, m, d).and_hms_opt(h, min, 0).unwrap().and_utc()
    }

    #[test]
    fn test_page_selector_parsing() {
        assert_eq!("all".parse::<PageSelector>().unwrap(), PageSelector::All);
        assert_eq!("random".parse::<PageSelector>().unwrap(), PageSelector::Random);
        assert_eq!(" 3 ".parse::<PageSelector>().unwrap(), PageSelector::Number(3));
        assert!(matches!("last".parse::<PageSelector>(), Err(QueryError::InvalidPageSelector(_))));
    }

    #[test]
    fn test_date_range_boundaries() {
        let range = DateRange::new(Some(day(2024, 3, 1)), Some(day(2024, 3, 5)));
        assert!(range.contains(at(2024, 3, 1, 0, 0)));
        assert!(range.contains(at(2024, 3, 4, 23, 59)));
        assert!(!range.contains(at(2024, 3, 5, 0, 0)));
        assert!(!range.contains(at(2024, 2, 29, 23, 59)));
    }

    #[test]
    fn test_date_range_through_includes_last_day() {
        let range = DateRange::through(None, Some(day(2024, 3, 5)));
        assert!(range.contains(at(2024, 3, 5, 23, 59)));
        assert!(!range.contains(at(2024, 3, 6, 0, 0)));
        assert!(DateRange::default().contains(at(1999, 1, 1, 0, 0)));
    }

    #[test]
    fn test_request_builders_normalize_extensions() {
        let request = QueryRequest::new("/srv/drop")
            .with_extensions([".PNG", "jpg"])
            .with_max_size(10)
            .with_page(PageSelector::All);
        assert_eq!(request.extensions, Some(vec!["png".to_string(), "jpg".to_string()]));
        assert_eq!(request.max_size, Some(10));
        assert_eq!(request.page, PageSelector::All);
    }
}
