//! List and lookup parameters for the catalog.
//!
//! Raw request strings are classified here once, so the SQLite store and the
//! live-API service apply exactly the same search, sort and paging rules.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Page size used when the caller gives none (or a non-positive one).
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

static EXACT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(\d+)$").expect("exact number pattern is valid"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("digits pattern is valid"));

/// How a search term filters the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// No filtering.
    All,
    /// `#004`: exact number match, leading zeros stripped.
    ExactNumber(u32),
    /// `25`: the decimal number contains the digits anywhere.
    NumberContains(String),
    /// Anything else: case-insensitive substring of the name.
    NameContains(String),
    /// A `#` term whose digits cannot be a catalog number.
    NoMatch,
}

impl SearchFilter {
    /// Classify a raw search term (trimmed and lowercased first).
    pub fn parse(search: Option<&str>) -> Self {
        let term = match search {
            Some(s) => s.trim().to_lowercase(),
            None => return SearchFilter::All,
        };

        if term.is_empty() {
            return SearchFilter::All;
        }

        if let Some(caps) = EXACT_NUMBER.captures(&term) {
            return match caps[1].parse::<u32>() {
                Ok(number) => SearchFilter::ExactNumber(number),
                Err(_) => SearchFilter::NoMatch,
            };
        }

        if DIGITS.is_match(&term) {
            SearchFilter::NumberContains(term)
        } else {
            SearchFilter::NameContains(term)
        }
    }

    /// Whether an entry passes this filter.
    pub fn matches(&self, number: u32, name: &str) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::ExactNumber(n) => number == *n,
            SearchFilter::NumberContains(digits) => number.to_string().contains(digits.as_str()),
            SearchFilter::NameContains(term) => name.to_lowercase().contains(term.as_str()),
            SearchFilter::NoMatch => false,
        }
    }
}

/// Sort key. Only the exact value `name` selects `Name`; anything else
/// falls back to `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Number,
    Name,
}

impl SortField {
    pub fn parse(sort: Option<&str>) -> Self {
        match sort {
            Some("name") => SortField::Name,
            _ => SortField::Number,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Number => "number",
            SortField::Name => "name",
        }
    }
}

/// Sort direction, case-insensitive. Unrecognized values fall back to `Asc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(order: Option<&str>) -> Self {
        match order {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Clamped paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Clamp integer values: limit <= 0 becomes the default, limit is capped
    /// at [`MAX_LIMIT`], negative offsets become 0.
    pub fn from_values(limit: i64, offset: i64) -> Self {
        let limit = if limit <= 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT as i64) as u32
        };
        let offset = offset.clamp(0, u32::MAX as i64) as u32;
        Self { limit, offset }
    }

    /// Clamp raw query-string values. Unparseable input reads as 0.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self::from_values(
            limit.map(lenient_int).unwrap_or(0),
            offset.map(lenient_int).unwrap_or(0),
        )
    }
}

/// Read a leading signed integer ("12abc" -> 12, "abc" -> 0), saturating.
fn lenient_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as i64)
        });

    if negative {
        -value
    } else {
        value
    }
}

/// A fully-resolved list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: SearchFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: SearchFilter::All,
            sort: SortField::Number,
            order: SortOrder::Asc,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn new(
        search: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
        pagination: Pagination,
    ) -> Self {
        Self {
            filter: SearchFilter::parse(search),
            sort: SortField::parse(sort),
            order: SortOrder::parse(order),
            limit: pagination.limit,
            offset: pagination.offset,
        }
    }

    /// Filter, sort and page an in-memory collection.
    ///
    /// Returns the page and the filtered count before paging.
    pub fn select<T>(
        &self,
        items: Vec<T>,
        number: impl Fn(&T) -> u32,
        name: impl Fn(&T) -> &str,
    ) -> (Vec<T>, u64) {
        let mut matched: Vec<T> = items
            .into_iter()
            .filter(|item| self.filter.matches(number(item), name(item)))
            .collect();

        match self.sort {
            SortField::Number => matched.sort_by_key(|item| number(item)),
            SortField::Name => matched.sort_by(|a, b| name(a).cmp(name(b))),
        }
        if self.order == SortOrder::Desc {
            matched.reverse();
        }

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect();

        (page, total)
    }
}

/// Detail lookup key: a decimal number or a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Number(u32),
    Name(String),
}

impl Identifier {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = trimmed.parse::<u32>() {
                return Identifier::Number(number);
            }
        }
        Identifier::Name(trimmed.to_lowercase())
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Name(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_classification() {
        assert_eq!(SearchFilter::parse(None), SearchFilter::All);
        assert_eq!(SearchFilter::parse(Some("   ")), SearchFilter::All);
        assert_eq!(SearchFilter::parse(Some("#004")), SearchFilter::ExactNumber(4));
        assert_eq!(SearchFilter::parse(Some(" #4 ")), SearchFilter::ExactNumber(4));
        assert_eq!(
            SearchFilter::parse(Some("25")),
            SearchFilter::NumberContains("25".to_string())
        );
        assert_eq!(
            SearchFilter::parse(Some("  PIKA ")),
            SearchFilter::NameContains("pika".to_string())
        );
        assert_eq!(
            SearchFilter::parse(Some("#12a")),
            SearchFilter::NameContains("#12a".to_string())
        );
    }

    #[test]
    fn test_search_filter_overflowing_number_matches_nothing() {
        let filter = SearchFilter::parse(Some("#99999999999999"));
        assert_eq!(filter, SearchFilter::NoMatch);
        assert!(!filter.matches(1, "bulbasaur"));
    }

    #[test]
    fn test_number_contains_is_substring_not_prefix() {
        let filter = SearchFilter::parse(Some("25"));
        assert!(filter.matches(25, "pikachu"));
        assert!(filter.matches(125, "electabuzz"));
        assert!(filter.matches(251, "celebi"));
        assert!(!filter.matches(52, "meowth"));
    }

    #[test]
    fn test_exact_number_ignores_substrings() {
        let filter = SearchFilter::parse(Some("#25"));
        assert!(filter.matches(25, "pikachu"));
        assert!(!filter.matches(125, "electabuzz"));
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let filter = SearchFilter::parse(Some("Saur"));
        assert!(filter.matches(1, "bulbasaur"));
        assert!(filter.matches(2, "IvySaur"));
        assert!(!filter.matches(4, "charmander"));
    }

    #[test]
    fn test_sort_and_order_fallbacks() {
        assert_eq!(SortField::parse(Some("name")), SortField::Name);
        assert_eq!(SortField::parse(Some("NAME")), SortField::Number);
        assert_eq!(SortField::parse(Some(" name")), SortField::Number);
        assert_eq!(SortField::parse(Some("bogus")), SortField::Number);
        assert_eq!(SortField::parse(None), SortField::Number);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }

    #[test]
    fn test_pagination_clamping() {
        assert_eq!(Pagination::from_raw(None, None), Pagination::default());
        assert_eq!(Pagination::from_raw(Some("0"), None).limit, DEFAULT_LIMIT);
        assert_eq!(Pagination::from_raw(Some("-5"), None).limit, DEFAULT_LIMIT);
        assert_eq!(Pagination::from_raw(Some("500"), None).limit, MAX_LIMIT);
        assert_eq!(Pagination::from_raw(Some("35"), None).limit, 35);
        assert_eq!(Pagination::from_raw(None, Some("-10")).offset, 0);
        assert_eq!(Pagination::from_raw(None, Some("40")).offset, 40);
    }

    #[test]
    fn test_pagination_lenient_parsing() {
        assert_eq!(Pagination::from_raw(Some("abc"), None).limit, DEFAULT_LIMIT);
        assert_eq!(Pagination::from_raw(Some("12abc"), None).limit, 12);
        assert_eq!(Pagination::from_raw(Some(" +7"), None).limit, 7);
        assert_eq!(
            Pagination::from_raw(Some("99999999999999999999999"), None).limit,
            MAX_LIMIT
        );
    }

    #[test]
    fn test_select_filters_sorts_and_pages() {
        let items = vec![(4, "charmander"), (1, "bulbasaur"), (25, "pikachu"), (2, "ivysaur")];
        let query = ListQuery {
            sort: SortField::Name,
            order: SortOrder::Desc,
            limit: 2,
            offset: 1,
            ..Default::default()
        };

        let (page, total) = query.select(items, |p| p.0, |p| p.1);
        assert_eq!(total, 4);
        assert_eq!(page, vec![(2, "ivysaur"), (4, "charmander")]);
    }

    #[test]
    fn test_select_offset_beyond_results() {
        let items = vec![(1, "bulbasaur"), (2, "ivysaur")];
        let query = ListQuery {
            offset: 10,
            ..Default::default()
        };

        let (page, total) = query.select(items, |p| p.0, |p| p.1);
        assert!(page.is_empty());
        assert_eq!(total, 2);
    }

    #[test]
    fn test_identifier_parse() {
        assert_eq!(Identifier::parse("25"), Identifier::Number(25));
        assert_eq!(Identifier::parse(" 007 "), Identifier::Number(7));
        assert_eq!(
            Identifier::parse("Bulbasaur"),
            Identifier::Name("bulbasaur".to_string())
        );
        assert_eq!(
            Identifier::parse("mr-mime"),
            Identifier::Name("mr-mime".to_string())
        );
        assert_eq!(Identifier::Number(25).to_string(), "25");
    }
}
