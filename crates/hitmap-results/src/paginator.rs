//! Page views over a mapped collection.
//!
//! The view only carries data (items, totals, urls); turning it into HTML
//! or links in a template is left to the caller.

use serde::{Serialize, Serializer};

use hitmap_core::types::JsonMap;
use hitmap_core::{Error, HitsMeta, Result};

use crate::collection::MappedCollection;

const DEFAULT_PAGE_NAME: &str = "page";

/// One page of results plus what is needed to link to the others.
#[derive(Debug, Clone)]
pub struct PageView<'a, R> {
    items: &'a [R],
    aggregations: &'a JsonMap,
    hits: &'a HitsMeta,
    total: u64,
    per_page: usize,
    current_page: usize,
    path: String,
    page_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub url: String,
    pub active: bool,
}

impl<'a, R> PageView<'a, R> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        items: &'a [R],
        aggregations: &'a JsonMap,
        hits: &'a HitsMeta,
        total: u64,
        per_page: usize,
        current_page: usize,
        path: &str,
    ) -> Self {
        Self {
            items,
            aggregations,
            hits,
            total,
            per_page,
            current_page,
            path: path.to_string(),
            page_name: DEFAULT_PAGE_NAME.to_string(),
        }
    }

    /// Query parameter used when building page urls.
    pub fn with_page_name(mut self, page_name: impl Into<String>) -> Self {
        self.page_name = page_name.into();
        self
    }

    pub fn items(&self) -> &'a [R] {
        self.items
    }

    pub fn aggregations(&self) -> &'a JsonMap {
        self.aggregations
    }

    pub fn hits(&self) -> &'a HitsMeta {
        self.hits
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn last_page(&self) -> usize {
        let pages = self.total.div_ceil(self.per_page.max(1) as u64).max(1);
        usize::try_from(pages).unwrap_or(usize::MAX)
    }

    /// 1-based position of the first item on this page; `None` when the
    /// page is empty or its position does not fit in `usize`.
    pub fn first_item(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.current_page.saturating_sub(1).checked_mul(self.per_page)?.checked_add(1)
    }

    /// 1-based position of the last item on this page, never past the end
    /// of the page even when more than `per_page` items were passed in.
    pub fn last_item(&self) -> Option<usize> {
        let first = self.first_item()?;
        let last = first.saturating_add(self.items.len() - 1);
        let page_end = self.current_page.saturating_mul(self.per_page);
        Some(last.min(page_end))
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn url(&self, page: usize) -> String {
        let page = page.max(1);
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.path, separator, self.page_name, page)
    }

    pub fn previous_page_url(&self) -> Option<String> {
        (self.current_page > 1).then(|| self.url(self.current_page - 1))
    }

    pub fn next_page_url(&self) -> Option<String> {
        self.has_more_pages().then(|| self.url(self.current_page + 1))
    }

    /// Links for the pages within `on_each_side` of the current one.
    pub fn links(&self, on_each_side: usize) -> Vec<PageLink> {
        let last = self.last_page();
        let current = self.current_page.min(last);
        let start = current.saturating_sub(on_each_side).max(1);
        let end = current.saturating_add(on_each_side).min(last);
        (start..=end)
            .map(|page| PageLink { page, url: self.url(page), active: page == self.current_page })
            .collect()
    }
}

#[derive(Serialize)]
struct PageArray<'v, R> {
    current_page: usize,
    data: &'v [R],
    aggregations: &'v JsonMap,
    hits: &'v HitsMeta,
    first_page_url: String,
    from: Option<usize>,
    last_page: usize,
    last_page_url: String,
    next_page_url: Option<String>,
    path: &'v str,
    per_page: usize,
    prev_page_url: Option<String>,
    to: Option<usize>,
    total: u64,
}

impl<R: Serialize> Serialize for PageView<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        PageArray {
            current_page: self.current_page,
            data: self.items,
            aggregations: self.aggregations,
            hits: self.hits,
            first_page_url: self.url(1),
            from: self.first_item(),
            last_page: self.last_page(),
            last_page_url: self.url(self.last_page()),
            next_page_url: self.next_page_url(),
            path: &self.path,
            per_page: self.per_page,
            prev_page_url: self.previous_page_url(),
            to: self.last_item(),
            total: self.total,
        }
        .serialize(serializer)
    }
}

impl<R> MappedCollection<R> {
    /// Page view over every mapped item.
    ///
    /// The items are passed through as-is: the search request is expected to
    /// have fetched just this page (`from`/`size`), and `total_hits()` is the
    /// size of the whole result set. A missing page resolves to 1.
    pub fn paginate(&self, per_page: usize, current_page: Option<usize>, base_path: &str) -> Result<PageView<'_, R>> {
        let page = resolve_page(per_page, current_page)?;
        tracing::debug!(per_page, page, total = self.total_hits(), "paginating mapped collection");
        Ok(PageView::new(self.as_slice(), self.aggregations(), self.hits_meta(), self.total_hits(), per_page, page, base_path))
    }

    /// Page view that slices this collection locally, for when it holds
    /// the whole result set. The total is the collection length.
    pub fn paginate_local(&self, per_page: usize, current_page: Option<usize>, base_path: &str) -> Result<PageView<'_, R>> {
        let page = resolve_page(per_page, current_page)?;
        let len = self.len();
        let start = ((page - 1) * per_page).min(len);
        let end = start.saturating_add(per_page).min(len);
        tracing::debug!(per_page, page, start, end, "slicing mapped collection for page");
        Ok(PageView::new(&self.as_slice()[start..end], self.aggregations(), self.hits_meta(), len as u64, per_page, page, base_path))
    }
}

fn resolve_page(per_page: usize, current_page: Option<usize>) -> Result<usize> {
    if per_page == 0 {
        return Err(Error::InvalidArgument("page size must be greater than zero".into()));
    }
    let page = match current_page {
        Some(0) => return Err(Error::InvalidArgument("current page must be 1 or greater".into())),
        Some(page) => page,
        None => 1,
    };
    if page.checked_mul(per_page).is_none() {
        return Err(Error::InvalidArgument(format!("page {page} of size {per_page} is out of range")));
    }
    Ok(page)
}
