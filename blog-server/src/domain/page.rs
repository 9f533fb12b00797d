use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Desc
    }
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Closed vocabulary of sortable fields. Request input is parsed into this
/// enum and only `column()` output ever reaches SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreationDate,
    Rating,
    Author,
    Id,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "creationDate" => Some(SortField::CreationDate),
            "rating" => Some(SortField::Rating),
            "author" => Some(SortField::Author),
            "id" => Some(SortField::Id),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::CreationDate => "creation_date",
            SortField::Rating => "rating",
            SortField::Author => "author",
            SortField::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Zero-based page request at the storage boundary.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page: i64,
    pub size: i64,
    pub sort: Sort,
}

impl PageQuery {
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, size: i64) -> Self {
        let total_pages = if size > 0 {
            (total_elements + size - 1) / size
        } else {
            0
        };
        Self {
            content,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Page::<i32>::new(vec![], 0, 10).total_pages, 0);
        assert_eq!(Page::<i32>::new(vec![], 10, 10).total_pages, 1);
        assert_eq!(Page::<i32>::new(vec![], 11, 10).total_pages, 2);
        assert_eq!(Page::<i32>::new(vec![], 9, 10).total_pages, 1);
    }

    #[test]
    fn offset_is_page_times_size() {
        let query = PageQuery {
            page: 3,
            size: 20,
            sort: Sort {
                field: SortField::CreationDate,
                direction: SortDirection::Desc,
            },
        };
        assert_eq!(query.offset(), 60);
    }

    #[test]
    fn sort_field_parses_known_names_only() {
        assert_eq!(SortField::parse("creationDate"), Some(SortField::CreationDate));
        assert_eq!(SortField::parse("rating"), Some(SortField::Rating));
        assert_eq!(SortField::parse("author"), Some(SortField::Author));
        assert_eq!(SortField::parse("id"), Some(SortField::Id));
        assert_eq!(SortField::parse("content"), None);
        assert_eq!(SortField::parse(""), None);
    }
}
