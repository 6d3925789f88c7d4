use crate::ApiError;

/// One page of records as applied by a table controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total_count: u64,
    page_size: u32,
    page_number: u32,
}

impl<T> Page<T> {
    /// Builds a page, rejecting shapes a well-behaved server never sends.
    pub fn new(
        items: Vec<T>,
        total_count: u64,
        page_size: u32,
        page_number: u32,
    ) -> Result<Self, ApiError> {
        if page_size == 0 {
            return Err(ApiError::decode("page size must be at least 1"));
        }
        if page_number == 0 {
            return Err(ApiError::decode("page number must be at least 1"));
        }
        if items.len() > page_size as usize {
            return Err(ApiError::decode(format!(
                "page holds {} items but page size is {page_size}",
                items.len()
            )));
        }
        Ok(Self {
            items,
            total_count,
            page_size,
            page_number,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// `ceil(total_count / page_size)`, never less than 1 so an empty table has a page.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// 1-based index range of the items on this page, `None` when empty.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.items.is_empty() {
            return None;
        }
        let start = u64::from(self.page_number - 1) * u64::from(self.page_size) + 1;
        Some((start, start + self.items.len() as u64 - 1))
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_count.div_ceil(u64::from(page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_page() {
        let err = Page::new(vec![1, 2, 3], 3, 2, 1).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn rejects_page_zero() {
        assert!(Page::<u8>::new(Vec::new(), 0, 20, 0).is_err());
        assert!(Page::<u8>::new(Vec::new(), 0, 0, 1).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(41, 20), 3);
    }

    #[test]
    fn navigation_flags() {
        let page = Page::new(vec!["a"; 20], 45, 20, 2).unwrap();
        assert!(page.has_next());
        assert!(page.has_previous());
        assert!(page.contains_page(3));
        assert!(!page.contains_page(4));
        assert!(!page.contains_page(0));
        assert_eq!(page.item_range(), Some((21, 40)));
    }

    #[test]
    fn empty_page_has_no_range() {
        let page = Page::<u8>::new(Vec::new(), 0, 20, 1).unwrap();
        assert_eq!(page.item_range(), None);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
    }
}
