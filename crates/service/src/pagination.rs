//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults; returns the 0-based page index and page size.
    pub fn normalize(self) -> (usize, usize) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as usize, per_page as usize)
    }

    /// Cut one page out of an already ordered list.
    pub fn paginate<T>(self, items: Vec<T>) -> Vec<T> {
        let (page_idx, per_page) = self.normalize();
        items
            .into_iter()
            .skip(page_idx.saturating_mul(per_page))
            .take(per_page)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn paginate_slices_in_order() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(Pagination { page: 1, per_page: 3 }.paginate(items.clone()), vec![1, 2, 3]);
        assert_eq!(Pagination { page: 3, per_page: 3 }.paginate(items.clone()), vec![7]);
        assert!(Pagination { page: 4, per_page: 3 }.paginate(items).is_empty());
    }
}
