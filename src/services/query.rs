//! Search-query interpretation.
//!
//! A raw search string is classified as an exact year, a year range, or a
//! free-text term. Year-like strings win over the free-text interpretation;
//! anything that does not match the year pattern in full falls through to
//! free text.

use std::sync::OnceLock;

use regex::Regex;

/// "1 to 4 digits, optionally followed by a hyphen and 1 to 4 more digits",
/// anchored to the whole string. A longer digit run ("18834") or trailing
/// text ("1883AD") never matches, even when the string starts with a
/// plausible year.
fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,4})(?:-(\d{1,4}))?$").expect("year pattern compiles")
    })
}

/// Structured filter produced by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// `Year` equals the given value.
    ExactYear(i32),
    /// `Year` within `[from, to]`. A backwards range (`from > to`) is kept
    /// as given and matches nothing.
    YearRange { from: i32, to: i32 },
    /// Case-insensitive substring match on Name, Location, Country, or Type.
    FreeText(String),
}

/// Classify a raw, non-blank search string.
///
/// Callers short-circuit blank input to an empty result set before this.
pub fn classify(query: &str) -> SearchFilter {
    if let Some(caps) = year_pattern().captures(query) {
        if let Ok(from) = caps[1].parse::<i32>() {
            match caps.get(2) {
                Some(to) => {
                    if let Ok(to) = to.as_str().parse::<i32>() {
                        return SearchFilter::YearRange { from, to };
                    }
                }
                None => return SearchFilter::ExactYear(from),
            }
        }
    }
    SearchFilter::FreeText(query.to_string())
}

/// Escape LIKE wildcards so a free-text term matches as a literal substring.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_year_is_exact_filter() {
        assert_eq!(classify("1883"), SearchFilter::ExactYear(1883));
        assert_eq!(classify("79"), SearchFilter::ExactYear(79));
        assert_eq!(classify("5"), SearchFilter::ExactYear(5));
        assert_eq!(classify("0001"), SearchFilter::ExactYear(1));
    }

    #[test]
    fn hyphenated_years_are_range_filter() {
        assert_eq!(
            classify("1900-2000"),
            SearchFilter::YearRange {
                from: 1900,
                to: 2000
            }
        );
        assert_eq!(classify("79-100"), SearchFilter::YearRange { from: 79, to: 100 });
    }

    #[test]
    fn backwards_range_is_kept_as_given() {
        assert_eq!(
            classify("2000-1900"),
            SearchFilter::YearRange {
                from: 2000,
                to: 1900
            }
        );
    }

    #[test]
    fn five_digit_strings_fall_through_to_free_text() {
        assert_eq!(
            classify("18834"),
            SearchFilter::FreeText("18834".to_string())
        );
        assert_eq!(
            classify("12345-1900"),
            SearchFilter::FreeText("12345-1900".to_string())
        );
    }

    #[test]
    fn digits_with_trailing_text_are_free_text() {
        assert_eq!(
            classify("1883AD"),
            SearchFilter::FreeText("1883AD".to_string())
        );
        assert_eq!(
            classify("1900-2000AD"),
            SearchFilter::FreeText("1900-2000AD".to_string())
        );
    }

    #[test]
    fn plain_terms_are_free_text() {
        assert_eq!(
            classify("Krakatau"),
            SearchFilter::FreeText("Krakatau".to_string())
        );
        assert_eq!(
            classify("mount st. helens"),
            SearchFilter::FreeText("mount st. helens".to_string())
        );
    }

    #[test]
    fn incomplete_range_is_free_text() {
        assert_eq!(classify("1900-"), SearchFilter::FreeText("1900-".to_string()));
        assert_eq!(classify("-1900"), SearchFilter::FreeText("-1900".to_string()));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("st_helens"), "st\\_helens");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
