//! Pagination utilities for Dependency-Track API responses.
//!
//! Dependency-Track returns the items of a listing as the JSON body and the
//! size of the full result set out-of-band, in the `X-Total-Count` header.

use serde::{Deserialize, Serialize};

/// A page of results from the Dependency-Track API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages, as reported by the server.
    pub total_count: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> Page<T> {
    /// Create a new page from items and the server-reported total.
    ///
    /// The total is taken as-is; it usually exceeds `items.len()`.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// Whether items remain beyond this page, given the options it was
    /// fetched with.
    #[must_use]
    pub fn has_more(&self, options: &PageOptions) -> bool {
        let seen = match (options.offset, options.page_number, options.page_size) {
            (Some(offset), _, _) if offset > 0 => u64::from(offset),
            (_, Some(number), Some(size)) if number > 0 => {
                u64::from(number - 1) * u64::from(size)
            }
            _ => 0,
        };
        seen + (self.items.len() as u64) < self.total_count
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Query parameters for paginated requests.
///
/// Zero values are treated like unset ones and are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    /// Number of items to skip.
    #[serde(skip_serializing_if = "is_unset")]
    pub offset: Option<u32>,
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "is_unset")]
    pub page_number: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "is_unset")]
    pub page_size: Option<u32>,
}

fn is_unset(value: &Option<u32>) -> bool {
    matches!(value, None | Some(0))
}

impl PageOptions {
    /// Pagination options for a specific page.
    #[must_use]
    pub fn for_page(page_number: u32, page_size: u32) -> Self {
        Self {
            offset: None,
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    /// Pagination options for an offset/limit window.
    #[must_use]
    pub fn with_offset(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            page_number: None,
            page_size: Some(limit),
        }
    }
}
