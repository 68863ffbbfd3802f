use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 500;

/// `?page=1&pageSize=10&name=...` as sent by the admin UI tables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub name: Option<String>,
}

impl PageQuery {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 1-based page number
    pub fn current(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        (self.current() - 1).saturating_mul(self.size())
    }

    /// Trimmed name filter; blank means no filter
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One page of records plus enough to render a pager
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub size: u64,
    pub current: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total: u64, query: &PageQuery) -> Self {
        let size = query.size();
        Self {
            records,
            total,
            size,
            current: query.current(),
            pages: total.div_ceil(size),
        }
    }

    /// Cut one page out of an already filtered and ordered list.
    pub fn slice(all: Vec<T>, query: &PageQuery) -> Self {
        let total = all.len() as u64;
        let records = all
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.size() as usize)
            .collect();
        Self::new(records, total, query)
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally by `LIKE`.
pub fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        let query = PageQuery::default();
        assert_eq!((query.current(), query.size(), query.offset()), (1, 10, 0));

        let query = PageQuery::new(0, 100_000);
        assert_eq!((query.current(), query.size()), (1, MAX_PAGE_SIZE));

        assert_eq!(PageQuery::new(3, 20).offset(), 40);
    }

    #[test]
    fn blank_name_is_no_filter() {
        assert_eq!(PageQuery::default().with_name("   ").name_filter(), None);
        assert_eq!(PageQuery::default().with_name(" Tom ").name_filter(), Some("Tom"));
    }

    #[test]
    fn slicing_reports_totals() {
        let page = Page::slice((1..=23).collect::<Vec<_>>(), &PageQuery::new(3, 10));
        assert_eq!(page.records, vec![21, 22, 23]);
        assert_eq!((page.total, page.pages, page.current, page.size), (23, 3, 3, 10));

        let past_end = Page::slice(vec![1, 2], &PageQuery::new(5, 10));
        assert!(past_end.records.is_empty());
        assert_eq!(past_end.total, 2);
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_contains("Tom"), "%Tom%");
        assert_eq!(like_contains("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
