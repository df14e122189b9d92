//! Page requests.

use dbmap_core::{Error, Result, UnsupportedKind};
use serde::{Deserialize, Serialize};

/// A 1-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_no: u64,
    pub page_size: u64,
}

impl Page {
    /// Validated page: `page_no >= 1` and `page_size > 0`.
    pub fn new(page_no: u64, page_size: u64) -> Result<Self> {
        let page = Self { page_no, page_size };
        page.validate()?;
        Ok(page)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_no < 1 {
            return Err(Error::unsupported(
                "page",
                UnsupportedKind::Page,
                "page number starts at 1",
            ));
        }
        if self.page_size == 0 {
            return Err(Error::unsupported(
                "page",
                UnsupportedKind::Page,
                "page size must be positive",
            ));
        }
        self.offset().map(|_| ())
    }

    /// Rows skipped before this page. Fails when the offset does not fit
    /// in a `u64`.
    pub fn offset(&self) -> Result<u64> {
        self.page_size
            .checked_mul(self.page_no.saturating_sub(1))
            .ok_or_else(|| {
                Error::unsupported(
                    "page",
                    UnsupportedKind::Page,
                    format!(
                        "offset of page {} with size {} overflows",
                        self.page_no, self.page_size
                    ),
                )
            })
    }

    /// Number of pages needed for `total_rows`.
    pub fn page_count(&self, total_rows: u64) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        total_rows.div_ceil(self.page_size)
    }
}
