//! Pager control model and paged slicing of table data.
//!
//! The pager shows every page number when there are few pages. With more, it
//! keeps a cluster of page numbers around the current page, with ellipses
//! standing in for the skipped ranges (`[x]` marks the current page):
//!
//! ```text
//! <  1   2   3   4   5   6  [7]  >
//! <  1  [2]  3   4   5   .   20  >
//! <  1   .   6  [7]  8   .   20  >
//! <  1   .   16  17  18  19 [20] >
//! ```
//!
//! Near either end the cluster widens to five pages. Every slot has the same
//! width, set by the digit count of the last page, so page numbers don't
//! shift as the current page changes digits.

use serde::Serialize;

use crate::error::{GridError, Result};

/// Page counts up to this show every page number without ellipses
pub const MAX_UNCLUSTERED_PAGES: u32 = 7;

/// Default number of items per page for a paged data grid
pub const DEFAULT_MAX_ITEMS_PER_PAGE: usize = 20;

/// Which side of the cluster an ellipsis sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EllipsisSide {
    Before,
    After,
}

/// One slot of the pager between the previous and next buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageSlot {
    #[serde(rename_all = "camelCase")]
    Page { number: u32, is_current: bool },
    Ellipsis { side: EllipsisSide },
}

impl PageSlot {
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, PageSlot::Ellipsis { .. })
    }

    pub fn page_number(&self) -> Option<u32> {
        match self {
            PageSlot::Page { number, .. } => Some(*number),
            PageSlot::Ellipsis { .. } => None,
        }
    }
}

/// User interaction with the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Previous,
    Next,
    Page(u32),
}

/// Current and total page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    current_page: u32,
    total_pages: u32,
}

impl PagerState {
    /// Fails unless `1 <= current_page <= total_pages`.
    pub fn new(current_page: u32, total_pages: u32) -> Result<Self> {
        if current_page == 0 || current_page > total_pages {
            return Err(GridError::PageOutOfRange {
                current: current_page,
                total: total_pages,
            });
        }
        Ok(Self {
            current_page,
            total_pages,
        })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn slots(&self) -> Vec<PageSlot> {
        page_slots(self.current_page, self.total_pages)
    }

    /// Pixel width of every page-number and ellipsis slot.
    pub fn slot_width(&self) -> u32 {
        slot_width(self.total_pages)
    }

    /// Page to switch to for `action`, or `None` when the action does nothing.
    pub fn click(&self, action: PagerAction) -> Option<u32> {
        match action {
            PagerAction::Previous if self.has_previous() => Some(self.current_page - 1),
            PagerAction::Next if self.has_next() => Some(self.current_page + 1),
            PagerAction::Page(page)
                if page != self.current_page && (1..=self.total_pages).contains(&page) =>
            {
                Some(page)
            }
            _ => None,
        }
    }

    /// Serializable snapshot for the rendering layer.
    pub fn model(&self) -> PagerModel {
        PagerModel {
            current_page: self.current_page,
            total_pages: self.total_pages,
            slots: self.slots(),
            slot_width: self.slot_width(),
            previous_enabled: self.has_previous(),
            next_enabled: self.has_next(),
        }
    }
}

/// Everything needed to draw a pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerModel {
    pub current_page: u32,
    pub total_pages: u32,
    pub slots: Vec<PageSlot>,
    pub slot_width: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

/// Page-number and ellipsis slots for a pager.
///
/// `current_page` is expected within `1..=total_pages`.
pub fn page_slots(current_page: u32, total_pages: u32) -> Vec<PageSlot> {
    let page = |number: u32| PageSlot::Page {
        number,
        is_current: number == current_page,
    };

    if total_pages <= MAX_UNCLUSTERED_PAGES {
        return (1..=total_pages).map(page).collect();
    }

    let cluster_min = current_page.saturating_sub(1).max(1).min(total_pages - 4);
    let cluster_max = current_page.saturating_add(1).min(total_pages).max(5);

    let mut slots = Vec::with_capacity(9);
    if cluster_min < 4 {
        slots.extend((1..cluster_min).map(page));
    } else {
        slots.push(page(1));
        slots.push(PageSlot::Ellipsis {
            side: EllipsisSide::Before,
        });
    }

    slots.extend((cluster_min..=cluster_max).map(page));

    if cluster_max > total_pages - 3 {
        slots.extend((cluster_max..total_pages).map(|n| page(n + 1)));
    } else {
        slots.push(PageSlot::Ellipsis {
            side: EllipsisSide::After,
        });
        slots.push(page(total_pages));
    }
    slots
}

/// Slot width in pixels, based on the digit count of the largest page number.
pub fn slot_width(total_pages: u32) -> u32 {
    10 + total_pages.max(1).ilog10().saturating_add(1) * 10
}

/// Number of pages needed for `item_count` items.
pub fn total_pages(item_count: usize, items_per_page: usize) -> u32 {
    u32::try_from(item_count.div_ceil(items_per_page.max(1))).unwrap_or(u32::MAX)
}

/// Callback receiving a new 0-based page index
pub type PageChangeHandler = Box<dyn FnMut(usize)>;

/// Who tracks the current page
pub enum PagingMode {
    /// The paged grid tracks the page and slices the data itself
    SelfManaged { current_index: usize },
    /// The caller tracks the page and slices the data; changes are reported back
    ParentManaged {
        current_index: usize,
        on_change: PageChangeHandler,
    },
}

impl std::fmt::Debug for PagingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PagingMode::SelfManaged { current_index } => f
                .debug_struct("SelfManaged")
                .field("current_index", current_index)
                .finish(),
            PagingMode::ParentManaged { current_index, .. } => f
                .debug_struct("ParentManaged")
                .field("current_index", current_index)
                .finish_non_exhaustive(),
        }
    }
}

/// A page of data plus what the table chrome needs around it
#[derive(Debug)]
pub struct PagedView<'a, T> {
    /// Count of all items, not just this page's
    pub total_count: usize,
    /// Present only when there is more than one page
    pub pager: Option<PagerState>,
    pub items: &'a [T],
}

/// Pages a list of items for a table, showing a pager only when needed
#[derive(Debug)]
pub struct PagedData {
    max_items_per_page: usize,
    mode: PagingMode,
}

impl Default for PagedData {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedData {
    pub fn new() -> Self {
        Self {
            max_items_per_page: DEFAULT_MAX_ITEMS_PER_PAGE,
            mode: PagingMode::SelfManaged { current_index: 0 },
        }
    }

    /// Paging where the caller owns the page index and slices the data.
    pub fn parent_managed(current_index: usize, on_change: impl FnMut(usize) + 'static) -> Self {
        Self {
            max_items_per_page: DEFAULT_MAX_ITEMS_PER_PAGE,
            mode: PagingMode::ParentManaged {
                current_index,
                on_change: Box::new(on_change),
            },
        }
    }

    #[must_use]
    pub fn with_max_items_per_page(mut self, max_items_per_page: usize) -> Self {
        self.max_items_per_page = max_items_per_page.max(1);
        self
    }

    pub fn max_items_per_page(&self) -> usize {
        self.max_items_per_page
    }

    pub fn current_index(&self) -> usize {
        match &self.mode {
            PagingMode::SelfManaged { current_index }
            | PagingMode::ParentManaged { current_index, .. } => *current_index,
        }
    }

    /// Update the page index the parent is showing.
    pub fn set_current_index(&mut self, index: usize) {
        match &mut self.mode {
            PagingMode::SelfManaged { current_index }
            | PagingMode::ParentManaged { current_index, .. } => *current_index = index,
        }
    }

    /// Current page index clamped to the pages `item_count` items fill, so
    /// shrinking data lands on its last page rather than past it.
    fn clamped_index(&self, item_count: usize) -> usize {
        let last = item_count
            .div_ceil(self.max_items_per_page)
            .saturating_sub(1);
        self.current_index().min(last)
    }

    /// Pager state for `item_count` items; `None` with one page or fewer.
    pub fn pager(&self, item_count: usize) -> Option<PagerState> {
        let total = total_pages(item_count, self.max_items_per_page);
        if total <= 1 {
            return None;
        }
        let current = u32::try_from(self.clamped_index(item_count).saturating_add(1))
            .unwrap_or(u32::MAX)
            .min(total);
        PagerState::new(current, total).ok()
    }

    /// Items of the current page. Parent-managed paging hands back `data` untouched.
    pub fn page_data<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        match self.mode {
            PagingMode::ParentManaged { .. } => data,
            PagingMode::SelfManaged { .. } => {
                let start = self
                    .clamped_index(data.len())
                    .saturating_mul(self.max_items_per_page);
                let end = start.saturating_add(self.max_items_per_page).min(data.len());
                data.get(start..end).unwrap_or(&[])
            }
        }
    }

    pub fn view<'a, T>(&self, data: &'a [T]) -> PagedView<'a, T> {
        PagedView {
            total_count: data.len(),
            pager: self.pager(data.len()),
            items: self.page_data(data),
        }
    }

    /// Apply a 1-based page number chosen in the pager.
    pub fn select_page(&mut self, page_number: u32) {
        let Some(index) = usize::try_from(page_number).ok().and_then(|p| p.checked_sub(1)) else {
            return;
        };
        match &mut self.mode {
            PagingMode::SelfManaged { current_index } => *current_index = index,
            PagingMode::ParentManaged { on_change, .. } => on_change(index),
        }
    }

    /// Route a pager interaction for `item_count` items.
    pub fn handle(&mut self, item_count: usize, action: PagerAction) {
        if let Some(page) = self.pager(item_count).and_then(|pager| pager.click(action)) {
            self.select_page(page);
        }
    }
}
