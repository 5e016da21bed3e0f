use crate::data::post_repository::PageSlice;

/// Fixed-size paging over a counted collection. Page numbers are 1-based
/// and requests outside the valid range are clamped to the nearest edge,
/// so "page 999 of 3" answers with the last page rather than an error.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paginator {
    total_items: i64,
    page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageMeta {
    pub(crate) page: u32,
    pub(crate) total_pages: u32,
    pub(crate) has_previous: bool,
    pub(crate) has_next: bool,
    pub(crate) total_items: i64,
}

impl Paginator {
    pub(crate) fn new(total_items: i64, page_size: u32) -> Self {
        Self {
            total_items: total_items.max(0),
            page_size: page_size.max(1),
        }
    }

    /// An empty collection still has one (empty) page.
    pub(crate) fn total_pages(&self) -> u32 {
        let pages = (self.total_items + i64::from(self.page_size) - 1) / i64::from(self.page_size);
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub(crate) fn clamp_page(&self, requested: u32) -> u32 {
        requested.clamp(1, self.total_pages())
    }

    /// LIMIT/OFFSET for a page number that has already been clamped.
    pub(crate) fn slice(&self, page: u32) -> PageSlice {
        PageSlice {
            limit: i64::from(self.page_size),
            offset: i64::from(page.saturating_sub(1)) * i64::from(self.page_size),
        }
    }

    pub(crate) fn meta(&self, page: u32) -> PageMeta {
        let total_pages = self.total_pages();
        PageMeta {
            page,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Paginator;

    #[test]
    fn total_pages_rounds_up_and_never_hits_zero() {
        assert_eq!(Paginator::new(0, 10).total_pages(), 1);
        assert_eq!(Paginator::new(10, 10).total_pages(), 1);
        assert_eq!(Paginator::new(11, 10).total_pages(), 2);
        assert_eq!(Paginator::new(25, 10).total_pages(), 3);
    }

    #[test]
    fn out_of_range_pages_are_clamped_to_edges() {
        let pager = Paginator::new(25, 10);
        assert_eq!(pager.clamp_page(0), 1);
        assert_eq!(pager.clamp_page(2), 2);
        assert_eq!(pager.clamp_page(999), 3);
    }

    #[test]
    fn last_page_slice_covers_the_remainder() {
        let pager = Paginator::new(25, 10);
        let slice = pager.slice(pager.clamp_page(3));
        assert_eq!(slice.limit, 10);
        assert_eq!(slice.offset, 20);
    }

    #[test]
    fn meta_reports_neighbour_pages() {
        let pager = Paginator::new(25, 10);

        let first = pager.meta(1);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let middle = pager.meta(2);
        assert!(middle.has_previous);
        assert!(middle.has_next);

        let last = pager.meta(3);
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.total_items, 25);
    }

    #[test]
    fn empty_collection_yields_a_single_empty_page() {
        let pager = Paginator::new(0, 10);
        let meta = pager.meta(pager.clamp_page(5));
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn zero_page_size_is_lifted_to_one() {
        let pager = Paginator::new(3, 0);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.slice(2).limit, 1);
    }
}
