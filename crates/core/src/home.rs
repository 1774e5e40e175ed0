use serde::Serialize;

use crate::article::Article;

const SUB_FEATURED: usize = 2;
const HOME_LIMIT: usize = 12;

/// Front page arrangement of the newest articles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeLayout<'a> {
    pub featured: Option<&'a Article>,
    pub sub_featured: &'a [Article],
    pub grid: &'a [Article],
    /// More articles exist beyond what the front page shows
    pub has_more: bool,
}

/// Split the newest-first set into featured, sub-featured and grid slots
pub fn layout(set: &[Article]) -> HomeLayout<'_> {
    let shown = &set[..set.len().min(HOME_LIMIT)];
    let sub_end = shown.len().min(1 + SUB_FEATURED);

    HomeLayout {
        featured: shown.first(),
        sub_featured: shown.get(1..sub_end).unwrap_or(&[]),
        grid: shown.get(sub_end..).unwrap_or(&[]),
        has_more: set.len() > HOME_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixture;

    fn catalog(n: usize) -> Vec<Article> {
        (0..n).map(|i| fixture(&format!("a{i}"), None, &[])).collect()
    }

    #[test]
    fn test_layout_full_catalog() {
        let set = catalog(20);
        let home = layout(&set);
        assert_eq!(home.featured.map(|a| a.slug()), Some("a0"));
        assert_eq!(home.sub_featured.len(), 2);
        assert_eq!(home.sub_featured[0].slug(), "a1");
        assert_eq!(home.grid.len(), 9);
        assert_eq!(home.grid[0].slug(), "a3");
        assert!(home.has_more);
    }

    #[test]
    fn test_layout_exactly_twelve() {
        let set = catalog(12);
        let home = layout(&set);
        assert_eq!(home.grid.len(), 9);
        assert!(!home.has_more);
    }

    #[test]
    fn test_layout_small_catalog() {
        let set = catalog(2);
        let home = layout(&set);
        assert_eq!(home.sub_featured.len(), 1);
        assert!(home.grid.is_empty());
    }

    #[test]
    fn test_layout_empty() {
        let home = layout(&[]);
        assert!(home.featured.is_none());
        assert!(home.sub_featured.is_empty());
        assert!(home.grid.is_empty());
    }
}
