//! Identifier normalization between URL slugs and display forms
//!
//! Subcategories and tags are stored human-readable ("Ratings Systems",
//! "fine dining") and addressed by slug ("ratings-systems", "fine-dining").
//!
//! Both directions use the same collapsing rule: whitespace and `-` are
//! separators, runs of separators collapse to one, and separators at either
//! end are dropped.

/// How words are cased when a slug is turned back into a display string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCase {
    /// Upper-case the first character of every word (subcategories)
    TitleCase,
    /// Keep words as they appear in the slug (tags)
    LowerCase,
}

fn is_separator(c: char) -> bool {
    c == '-' || c.is_whitespace()
}

fn words(value: &str) -> impl Iterator<Item = &str> {
    value.split(is_separator).filter(|word| !word.is_empty())
}

/// Convert a display string to its URL slug
///
/// "Ratings Systems" becomes "ratings-systems".
pub fn to_slug(display: &str) -> String {
    words(display)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Convert a URL slug to its display string
///
/// ```rust,ignore
/// assert_eq!(to_display("ratings-systems", DisplayCase::TitleCase), "Ratings Systems");
/// assert_eq!(to_display("fine-dining", DisplayCase::LowerCase), "fine dining");
/// ```
pub fn to_display(slug: &str, case: DisplayCase) -> String {
    words(slug)
        .map(|word| match case {
            DisplayCase::TitleCase => capitalize(word),
            DisplayCase::LowerCase => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Subcategory value to query the catalog with, from a URL slug
pub fn subcategory_query(slug: &str) -> String {
    to_display(slug, DisplayCase::TitleCase)
}

/// Tag value to query the catalog with, from a URL slug
///
/// Tags are stored lowercase, so the query form is always lowercase.
pub fn tag_query(slug: &str) -> String {
    to_display(slug, DisplayCase::LowerCase).to_lowercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
