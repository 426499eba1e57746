use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page parameters as they arrive from the client. Either field may be
/// omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }
}

/// Validated, 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSelection {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as usize,
            page_size: DEFAULT_PAGE_SIZE as usize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub offset: usize,
    pub total_pages: usize,
}

/// One page of results plus the number of pages available.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub num_max_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("invalid page number: {0}")]
    InvalidPage(i64),
    #[error("invalid page size: {0}")]
    InvalidPageSize(i64),
}

pub fn parse_page_request(request: Option<&PageRequest>) -> Result<PageSelection, PaginationError> {
    let Some(request) = request else {
        return Ok(PageSelection::default());
    };

    let page = request.page.unwrap_or(DEFAULT_PAGE);
    let page_size = request.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page <= 0 {
        return Err(PaginationError::InvalidPage(page));
    }
    if page_size <= 0 {
        return Err(PaginationError::InvalidPageSize(page_size));
    }

    Ok(PageSelection {
        page: usize::try_from(page).map_err(|_| PaginationError::InvalidPage(page))?,
        page_size: usize::try_from(page_size)
            .map_err(|_| PaginationError::InvalidPageSize(page_size))?,
    })
}

/// The offset is not clamped: a page past the end yields an empty window.
pub fn offset_and_total_pages(page: usize, page_size: usize, total_records: usize) -> PageBounds {
    PageBounds {
        offset: page.saturating_sub(1).saturating_mul(page_size),
        total_pages: total_records.div_ceil(page_size),
    }
}

/// Pages an already materialised sequence.
pub fn paginate<T>(items: Vec<T>, selection: PageSelection) -> Page<T> {
    let bounds = offset_and_total_pages(selection.page, selection.page_size, items.len());
    let items = items
        .into_iter()
        .skip(bounds.offset)
        .take(selection.page_size)
        .collect();

    Page {
        items,
        num_max_pages: bounds.total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_request_uses_defaults() {
        assert_eq!(
            parse_page_request(None),
            Ok(PageSelection {
                page: 1,
                page_size: 10
            })
        );
    }

    #[test]
    fn unset_fields_fall_back_independently() {
        let empty = PageRequest::default();
        assert_eq!(parse_page_request(Some(&empty)), Ok(PageSelection::default()));

        let page_only = PageRequest {
            page: Some(3),
            page_size: None,
        };
        assert_eq!(
            parse_page_request(Some(&page_only)),
            Ok(PageSelection {
                page: 3,
                page_size: 10
            })
        );

        let size_only = PageRequest {
            page: None,
            page_size: Some(20),
        };
        assert_eq!(
            parse_page_request(Some(&size_only)),
            Ok(PageSelection {
                page: 1,
                page_size: 20
            })
        );
    }

    #[test]
    fn rejects_non_positive_values() {
        let negative_page = PageRequest {
            page: Some(-1),
            page_size: None,
        };
        assert_eq!(
            parse_page_request(Some(&negative_page)),
            Err(PaginationError::InvalidPage(-1))
        );

        assert_eq!(
            parse_page_request(Some(&PageRequest::new(1, 0))),
            Err(PaginationError::InvalidPageSize(0))
        );
    }

    #[test]
    fn offsets_and_page_counts() {
        let cases = [
            // (page, size, total, offset, pages)
            (3, 20, 100, 40, 5),
            (6, 20, 100, 100, 5),
            (5, 20, 100, 80, 5),
            (3, 50, 100, 100, 2),
            (2, 50, 100, 50, 2),
            (1, 50, 100, 0, 2),
            (1, 10, 11, 0, 2),
            (2, 10, 11, 10, 2),
            (1, 10, 0, 0, 0),
        ];

        for (page, size, total, offset, pages) in cases {
            let bounds = offset_and_total_pages(page, size, total);
            assert_eq!(
                bounds,
                PageBounds {
                    offset,
                    total_pages: pages
                },
                "page={page} size={size} total={total}"
            );
        }
    }

    #[test]
    fn paginate_slices_and_tolerates_overshoot() {
        let items: Vec<u32> = (1..=11).collect();

        let second = paginate(items.clone(), PageSelection { page: 2, page_size: 10 });
        assert_eq!(second.items, vec![11]);
        assert_eq!(second.num_max_pages, 2);

        let beyond = paginate(items, PageSelection { page: 9, page_size: 10 });
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.num_max_pages, 2);
    }
}
