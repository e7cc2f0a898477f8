/*
 * Responsibility
 * - Offset paging shared by the libros / comidas repositories
 */

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Missing values fall back to page 0 / size 10; size is clamped to 1..=100.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub request: PageRequest,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.request.limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_clamped() {
        assert_eq!(PageRequest::new(None, Some(0)).size, 1);
        assert_eq!(PageRequest::new(None, Some(500)).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::default().size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn offset_uses_page_and_size() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 60);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<()> = Page {
            content: vec![],
            request: PageRequest::new(Some(0), Some(10)),
            total_elements: 21,
        };
        assert_eq!(page.total_pages(), 3);

        let empty: Page<()> = Page {
            content: vec![],
            request: PageRequest::default(),
            total_elements: 0,
        };
        assert_eq!(empty.total_pages(), 0);
    }
}
