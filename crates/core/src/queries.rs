//! Content store queries
//!
//! Every fetch the site performs is one `ContentQuery`. A query can be
//! rendered as GROQ for the Sanity HTTP API, or evaluated locally against an
//! already-fetched set with the catalog functions; both paths return records
//! newest first.

use crate::article::Article;
use crate::catalog::{self, Scope};
use crate::related;

/// One fetch against the content store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentQuery {
    All,
    BySlug(String),
    /// Display-form subcategory, e.g. "Ratings Systems"
    BySubcategory(String),
    /// Query-form tag, e.g. "fine dining"
    ByTag(String),
    RelatedPrimary {
        subcategory: Option<String>,
        exclude_slug: String,
        limit: usize,
    },
    RelatedFallback {
        exclude_slug: String,
        limit: usize,
    },
}

/// A GROQ query with its `$name` parameter bindings
///
/// Parameter values are JSON encoded, as the Sanity query API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroqQuery {
    pub query: String,
    pub params: Vec<(String, String)>,
}

const LIST_PROJECTION: &str = r#"{
    _id,
    title,
    subtitle,
    slug,
    mainImage { asset -> { _id, url }, alt },
    subcategory,
    category,
    sites,
    tags,
    publishedAt,
    author,
    "excerpt": body[0].children[0].text
  }"#;

const ARTICLE_PROJECTION: &str = r#"{
    _id,
    title,
    subtitle,
    slug,
    mainImage { asset -> { _id, url }, alt },
    subcategory,
    category,
    sites,
    tags,
    body[] { ..., _type == "image" => { ..., asset -> { _id, url } } },
    publishedAt,
    author
  }"#;

const RELATED_PROJECTION: &str = r#"{
    _id,
    title,
    slug,
    mainImage { asset -> { url }, alt },
    subcategory,
    tags,
    publishedAt
  }"#;

const ORDER: &str = "order(publishedAt desc)";

impl ContentQuery {
    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            ContentQuery::All => "all",
            ContentQuery::BySlug(_) => "by-slug",
            ContentQuery::BySubcategory(_) => "by-subcategory",
            ContentQuery::ByTag(_) => "by-tag",
            ContentQuery::RelatedPrimary { .. } => "related-primary",
            ContentQuery::RelatedFallback { .. } => "related-fallback",
        }
    }

    /// Render the query as GROQ
    ///
    /// The scope filter is added to every plural query. Single-slug lookups
    /// are only scoped when `strict_slug` is set.
    pub fn to_groq(&self, scope: &Scope, strict_slug: bool) -> GroqQuery {
        let unscoped = Scope::none();
        let scope = match self {
            ContentQuery::BySlug(_) if !strict_slug => &unscoped,
            _ => scope,
        };

        let mut params = Vec::new();
        let scope_filter = scope_clause(scope, &mut params);

        let query = match self {
            ContentQuery::All => {
                format!(r#"*[_type == "article"{scope_filter}] | {ORDER} {LIST_PROJECTION}"#)
            }
            ContentQuery::BySlug(slug) => {
                bind(&mut params, "slug", slug);
                format!(
                    r#"*[_type == "article"{scope_filter} && slug.current == $slug] | {ORDER} [0...1] {ARTICLE_PROJECTION}"#
                )
            }
            ContentQuery::BySubcategory(subcategory) => {
                bind(&mut params, "subcategory", subcategory);
                format!(
                    r#"*[_type == "article"{scope_filter} && subcategory == $subcategory] | {ORDER} {LIST_PROJECTION}"#
                )
            }
            ContentQuery::ByTag(tag) => {
                bind(&mut params, "tag", &tag.to_lowercase());
                format!(
                    r#"*[_type == "article"{scope_filter} && count(tags[lower(@) == $tag]) > 0] | {ORDER} {LIST_PROJECTION}"#
                )
            }
            ContentQuery::RelatedPrimary {
                subcategory,
                exclude_slug,
                limit,
            } => {
                // `null == null` holds in GROQ, so a focal record without a
                // subcategory gets a predicate that matches nothing
                let subcategory_filter = match subcategory {
                    Some(subcategory) => {
                        bind(&mut params, "subcategory", subcategory);
                        "subcategory == $subcategory"
                    }
                    None => "false",
                };
                bind(&mut params, "currentSlug", exclude_slug);
                format!(
                    r#"*[_type == "article"{scope_filter} && {subcategory_filter} && slug.current != $currentSlug] | {ORDER} [0...{limit}] {RELATED_PROJECTION}"#
                )
            }
            ContentQuery::RelatedFallback {
                exclude_slug,
                limit,
            } => {
                bind(&mut params, "currentSlug", exclude_slug);
                format!(
                    r#"*[_type == "article"{scope_filter} && slug.current != $currentSlug] | {ORDER} [0...{limit}] {RELATED_PROJECTION}"#
                )
            }
        };

        GroqQuery { query, params }
    }

    /// Evaluate the query against a fetched set
    pub fn apply(&self, set: &[Article], scope: &Scope, strict_slug: bool) -> Vec<Article> {
        if let ContentQuery::BySlug(slug) = self {
            return catalog::by_slug(set, slug)
                .filter(|a| !strict_slug || scope.contains(a))
                .into_iter()
                .cloned()
                .collect();
        }

        let scoped: Vec<Article> = catalog::in_scope(set, scope).into_iter().cloned().collect();

        let matched = match self {
            ContentQuery::All | ContentQuery::BySlug(_) => catalog::all(&scoped),
            ContentQuery::BySubcategory(subcategory) => catalog::by_subcategory(&scoped, subcategory),
            ContentQuery::ByTag(tag) => catalog::by_tag(&scoped, tag),
            ContentQuery::RelatedPrimary {
                subcategory,
                exclude_slug,
                limit,
            } => related::primary(&scoped, subcategory.as_deref(), exclude_slug, *limit),
            ContentQuery::RelatedFallback {
                exclude_slug,
                limit,
            } => related::fallback(&scoped, exclude_slug, *limit),
        };

        matched.into_iter().cloned().collect()
    }
}

fn scope_clause(scope: &Scope, params: &mut Vec<(String, String)>) -> String {
    let mut clause = String::new();
    if let Some(category) = &scope.category {
        bind(params, "category", category);
        clause.push_str(" && category == $category");
    }
    if let Some(site) = &scope.site {
        bind(params, "site", site);
        clause.push_str(" && $site in sites");
    }
    clause
}

fn bind(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    params.push((
        name.to_string(),
        serde_json::Value::from(value).to_string(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixture;

    fn scope() -> Scope {
        Scope::new("hospitality", "hospitality")
    }

    fn catalog() -> Vec<Article> {
        let mut other_site = fixture("other-site", Some("Leadership"), &["wine"]);
        other_site.sites = vec!["travel".to_string()];

        vec![
            fixture("a", Some("Leadership"), &["wine"]),
            other_site,
            fixture("b", Some("Operations"), &["Wine", "service"]),
            fixture("c", Some("Leadership"), &[]),
        ]
    }

    fn slugs(records: &[Article]) -> Vec<&str> {
        records.iter().map(|a| a.slug()).collect()
    }

    // ============================================================================
    // to_groq tests
    // ============================================================================

    #[test]
    fn test_all_query_is_scoped_and_ordered() {
        let groq = ContentQuery::All.to_groq(&scope(), false);
        assert!(groq
            .query
            .starts_with(r#"*[_type == "article" && category == $category && $site in sites]"#));
        assert!(groq.query.contains("order(publishedAt desc)"));
        assert_eq!(
            groq.params,
            vec![
                ("category".to_string(), "\"hospitality\"".to_string()),
                ("site".to_string(), "\"hospitality\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_unscoped_query_has_no_scope_params() {
        let groq = ContentQuery::All.to_groq(&Scope::none(), false);
        assert!(groq.query.starts_with(r#"*[_type == "article"]"#));
        assert!(groq.params.is_empty());
    }

    #[test]
    fn test_slug_query_scoping() {
        let loose = ContentQuery::BySlug("guest-recovery".to_string()).to_groq(&scope(), false);
        assert!(!loose.query.contains("$category"));
        assert!(loose.query.contains("slug.current == $slug"));
        assert!(loose
            .params
            .contains(&("slug".to_string(), "\"guest-recovery\"".to_string())));

        let strict = ContentQuery::BySlug("guest-recovery".to_string()).to_groq(&scope(), true);
        assert!(strict.query.contains("category == $category"));
    }

    #[test]
    fn test_tag_query_folds_both_sides() {
        let groq = ContentQuery::ByTag("Fine Dining".to_string()).to_groq(&scope(), false);
        assert!(groq.query.contains("count(tags[lower(@) == $tag]) > 0"));
        assert!(!groq.query.contains("$tag in tags[]"));

        let set = vec![fixture("a", None, &["Fine Dining"])];
        let found = ContentQuery::ByTag("fine dining".to_string()).apply(&set, &scope(), false);
        assert_eq!(slugs(&found), vec!["a"]);
        assert!(groq
            .params
            .contains(&("tag".to_string(), "\"fine dining\"".to_string())));
    }

    #[test]
    fn test_related_queries_are_windowed() {
        let primary = ContentQuery::RelatedPrimary {
            subcategory: Some("Leadership".to_string()),
            exclude_slug: "a".to_string(),
            limit: 3,
        }
        .to_groq(&scope(), false);
        assert!(primary.query.contains("[0...3]"));
        assert!(primary.query.contains("slug.current != $currentSlug"));

        let fallback = ContentQuery::RelatedFallback {
            exclude_slug: "a".to_string(),
            limit: 3,
        }
        .to_groq(&scope(), false);
        assert!(!fallback.query.contains("$subcategory"));
    }

    #[test]
    fn test_related_primary_without_subcategory_matches_nothing() {
        let query = ContentQuery::RelatedPrimary {
            subcategory: None,
            exclude_slug: "f".to_string(),
            limit: 3,
        };

        let groq = query.to_groq(&Scope::none(), false);
        assert!(groq.query.contains(r#"*[_type == "article" && false && "#));
        assert!(!groq.query.contains("$subcategory"));
        assert_eq!(
            groq.params,
            vec![("currentSlug".to_string(), "\"f\"".to_string())]
        );

        let set = vec![
            fixture("f", None, &[]),
            fixture("g", None, &[]),
            fixture("h", None, &[]),
        ];
        assert!(query.apply(&set, &Scope::none(), false).is_empty());
    }

    #[test]
    fn test_quotes_are_escaped_in_params() {
        let groq = ContentQuery::BySlug(r#"a"b"#.to_string()).to_groq(&Scope::none(), false);
        assert_eq!(groq.params[0].1, r#""a\"b""#);
    }

    // ============================================================================
    // apply tests
    // ============================================================================

    #[test]
    fn test_apply_all_respects_scope() {
        let set = catalog();
        assert_eq!(
            slugs(&ContentQuery::All.apply(&set, &scope(), false)),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_apply_by_tag() {
        let set = catalog();
        let found = ContentQuery::ByTag("wine".to_string()).apply(&set, &scope(), false);
        assert_eq!(slugs(&found), vec!["a", "b"]);
    }

    #[test]
    fn test_apply_by_subcategory() {
        let set = catalog();
        let found =
            ContentQuery::BySubcategory("Leadership".to_string()).apply(&set, &scope(), false);
        assert_eq!(slugs(&found), vec!["a", "c"]);
    }

    #[test]
    fn test_apply_by_slug_scoping() {
        let set = catalog();
        let query = ContentQuery::BySlug("other-site".to_string());
        assert_eq!(query.apply(&set, &scope(), false).len(), 1);
        assert!(query.apply(&set, &scope(), true).is_empty());
    }

    #[test]
    fn test_apply_related() {
        let set = catalog();
        let primary = ContentQuery::RelatedPrimary {
            subcategory: Some("Leadership".to_string()),
            exclude_slug: "a".to_string(),
            limit: 3,
        };
        assert_eq!(slugs(&primary.apply(&set, &scope(), false)), vec!["c"]);

        let fallback = ContentQuery::RelatedFallback {
            exclude_slug: "a".to_string(),
            limit: 3,
        };
        assert_eq!(slugs(&fallback.apply(&set, &scope(), false)), vec!["b", "c"]);
    }

    #[test]
    fn test_query_names() {
        assert_eq!(ContentQuery::All.name(), "all");
        assert_eq!(ContentQuery::ByTag(String::new()).name(), "by-tag");
    }
}
