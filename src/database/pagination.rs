use serde::Deserialize;

/// Raw `?page=` query string. Kept as text so a non-integer page can be
/// reported as a bad request instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page must be a positive integer")]
pub struct InvalidPage;

/// A 1-based page of a table ordered by primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn new(number: i64, size: i64) -> Result<Self, InvalidPage> {
        if number < 1 {
            return Err(InvalidPage);
        }
        Ok(Self { number, size })
    }

    pub fn first(size: i64) -> Self {
        Self { number: 1, size }
    }

    pub fn from_query(query: &PageQuery, size: i64) -> Result<Self, InvalidPage> {
        match query.page.as_deref().map(str::trim) {
            None | Some("") => Ok(Self::first(size)),
            Some(raw) => {
                let number = raw.parse::<i64>().map_err(|_| InvalidPage)?;
                Self::new(number, size)
            }
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>) -> PageQuery {
        PageQuery { page: page.map(str::to_string) }
    }

    #[test]
    fn missing_page_defaults_to_first() {
        let page = Page::from_query(&query(None), 10).unwrap();
        assert_eq!(page, Page { number: 1, size: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = Page::from_query(&query(Some("3")), 5).unwrap();
        assert_eq!(page.offset(), 10);
        assert_eq!(page.limit(), 5);
    }

    #[test]
    fn non_integer_and_non_positive_pages_are_rejected() {
        assert_eq!(Page::from_query(&query(Some("two")), 10), Err(InvalidPage));
        assert_eq!(Page::from_query(&query(Some("1.5")), 10), Err(InvalidPage));
        assert_eq!(Page::from_query(&query(Some("0")), 10), Err(InvalidPage));
        assert_eq!(Page::from_query(&query(Some("-2")), 10), Err(InvalidPage));
    }
}
