//! Stateless pagination over row slices.

use serde::Serialize;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// One page of a larger slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub number: usize,
    pub total_pages: usize,
    /// Index of the first item in the full slice.
    pub start: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Items paired with their index in the full slice.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(move |(offset, item)| (self.start + offset, item))
    }
}

/// `ceil(count / page_size)`; a page size of zero counts as one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamps a 1-based page number to `[1, max(total_pages, 1)]`.
pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.clamp(1, total_pages.max(1))
}

/// Slice out page `page_number` of `items`.
pub fn page<T>(items: &[T], page_size: usize, page_number: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = total_pages(items.len(), page_size);
    let number = clamp_page(page_number, total);
    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start..end],
        number,
        total_pages: total,
        start,
        total_items: items.len(),
    }
}
