/*
 * Responsibility
 * - ?page=&size= の query と Page<T> の wire 形式
 */
use serde::{Deserialize, Serialize};

use crate::repos::page::{Page, PageRequest};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(q: PageQuery) -> Self {
        PageRequest::new(q.page, q.size)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        U: Into<T>,
    {
        let total_pages = page.total_pages();
        Self {
            content: page.content.into_iter().map(Into::into).collect(),
            number: page.request.page,
            size: page.request.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let page = Page {
            content: vec![1_u8, 2],
            request: PageRequest::new(Some(1), Some(2)),
            total_elements: 5,
        };
        let json = serde_json::to_value(PageResponse::<u8>::from_page(page)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": [1, 2],
                "number": 1,
                "size": 2,
                "totalElements": 5,
                "totalPages": 3
            })
        );
    }
}
