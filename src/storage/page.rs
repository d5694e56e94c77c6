// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Paging and sorting for list queries.

use serde::Serialize;

use super::{Entity, StorageError, StorageResult};

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SORT_BY: &str = "id";
pub const DEFAULT_SORT_DIRECTION: &str = "asc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `asc` in any case is ascending; every other value is descending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

/// Zero-based page request with a single sort property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_no: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_no: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT_BY.to_string(),
            direction: SortDirection::Ascending,
        }
    }
}

impl PageRequest {
    pub fn new(page_no: u32, page_size: u32, sort_by: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            page_no,
            page_size,
            sort_by: sort_by.into(),
            direction,
        }
    }

    /// Sort `records` and cut out the requested page.
    pub fn apply<T: Entity>(&self, mut records: Vec<T>) -> StorageResult<Page<T>> {
        if self.page_size == 0 {
            return Err(StorageError::InvalidPage(
                "Page size must not be less than one".to_string(),
            ));
        }
        if !T::SORTABLE.contains(&self.sort_by.as_str()) {
            return Err(StorageError::InvalidSortField(self.sort_by.clone()));
        }

        records.sort_by(|a, b| {
            let ordering = a
                .compare_by(b, &self.sort_by)
                .unwrap_or(std::cmp::Ordering::Equal);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let total_elements = records.len() as u64;
        let page_size = u64::from(self.page_size);
        let total_pages = total_elements.div_ceil(page_size);
        let start = u64::from(self.page_no).saturating_mul(page_size);

        let content: Vec<T> = records
            .into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(self.page_size as usize)
            .collect();

        Ok(Page {
            content,
            page_no: self.page_no,
            page_size: self.page_size,
            total_elements,
            total_pages,
            last: u64::from(self.page_no) + 1 >= total_pages,
        })
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_no: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_no: self.page_no,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last: self.last,
        }
    }
}
