use crate::models::Page;

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Resolve a requested page size and zero-based page index into a row
/// window. A page size of 0 falls back to `default_size`.
pub fn resolve(page_size: u32, page_index: u32, default_size: u32) -> Page {
    let limit = if page_size > 0 {
        page_size
    } else {
        default_size
    };
    let limit = i64::from(limit);

    Page {
        limit,
        offset: limit.saturating_mul(i64::from(page_index)),
    }
}
