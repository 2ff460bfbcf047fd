//! Page window and page-bar arithmetic for the search page.
//!
//! A search fetches enough rows to fill the whole page bar around the
//! current page in one query: `(bar_length - 1)` full pages plus one row,
//! starting at the first page of the bar. The bar then ends at the last
//! page that actually has rows.

use std::ops::Range;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationStats {
    page_length: usize,
    page_bar_length: usize,
    current_page: usize,
    query_string: Option<String>,
}

/// One entry of the rendered page bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Everything a view needs to draw the page bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageBar {
    pub current_page: usize,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
    pub pages: Vec<PageLink>,
}

impl PaginationStats {
    pub fn new(page_length: usize, page_bar_length: usize) -> Self {
        Self {
            page_length: page_length.max(1),
            page_bar_length: page_bar_length.max(2),
            current_page: 1,
            query_string: None,
        }
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    pub fn page_bar_length(&self) -> usize {
        self.page_bar_length
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Query string preserved by page links, without the `page` parameter.
    pub fn set_query_string(&mut self, query_string: Option<String>) {
        self.query_string = query_string;
    }

    pub fn bar_start_index(&self) -> usize {
        self.current_page
            .saturating_sub(self.page_bar_length / 2)
            .max(1)
    }

    /// Row offset of the first page in the bar.
    pub fn fetch_offset(&self) -> usize {
        (self.bar_start_index() - 1).saturating_mul(self.page_length)
    }

    /// Rows needed to know how far the bar extends.
    pub fn fetch_limit(&self) -> usize {
        (self.page_bar_length - 1) * self.page_length + 1
    }

    /// Last page of the bar given the number of rows fetched.
    pub fn bar_end_index(&self, fetched: usize) -> usize {
        self.bar_start_index()
            .saturating_add(fetched.saturating_sub(1) / self.page_length)
    }

    /// Rows of the fetched batch that belong to the current page, or `None`
    /// when the current page is past the available results.
    pub fn page_window(&self, fetched: usize) -> Option<Range<usize>> {
        if fetched == 0 || self.current_page > self.bar_end_index(fetched) {
            return None;
        }
        let first = (self.current_page - self.bar_start_index()).saturating_mul(self.page_length);
        Some(first..fetched.min(first.saturating_add(self.page_length)))
    }

    pub fn page_bar(&self, fetched: usize) -> PageBar {
        let end = self.bar_end_index(fetched);
        let pages = (self.bar_start_index()..=end)
            .map(|number| self.link(number))
            .collect();
        PageBar {
            current_page: self.current_page,
            previous: (self.current_page > 1).then(|| self.link(self.current_page - 1)),
            next: (self.current_page < end).then(|| self.link(self.current_page + 1)),
            pages,
        }
    }

    fn link(&self, number: usize) -> PageLink {
        let href = match &self.query_string {
            Some(query) => format!("?{query}&page={number}"),
            None => format!("?page={number}"),
        };
        PageLink {
            number,
            href,
            current: number == self.current_page,
        }
    }
}
