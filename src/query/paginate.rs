//! Page slicing

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Effective 1-based page number after clamping
    pub page: usize,
    /// Always at least 1, even with no items
    pub total_pages: usize,
}

/// Slice out the requested page
///
/// The requested page is clamped into `1..=total_pages`, so asking past the
/// end yields the last page instead of an empty one.
#[must_use]
pub fn apply<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
    }
}
