//! Cross-entity quick search.
//!
//! Looks up products, recipes, users, brands and tags by name and links each
//! hit to the listing page that shows it.

use serde::Serialize;

use crate::model::{LinkedEntity, LocalizedText, ProductRow, RecipeRow, UserRow};

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Maximum hits per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub products: usize,
    pub recipes: usize,
    pub users: usize,
    pub brands: usize,
    pub tags: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            products: 5,
            recipes: 5,
            users: 5,
            brands: 3,
            tags: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Product,
    Recipe,
    User,
    Brand,
    Tag,
}

impl ResultKind {
    pub fn label(self) -> &'static str {
        match self {
            ResultKind::Product => "Product",
            ResultKind::Recipe => "Recipe",
            ResultKind::User => "User",
            ResultKind::Brand => "Brand",
            ResultKind::Tag => "Tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub kind: ResultKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
}

/// Everything the quick search can find.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<ProductRow>,
    pub recipes: Vec<RecipeRow>,
    pub users: Vec<UserRow>,
    pub brands: Vec<LinkedEntity>,
    pub tags: Vec<LinkedEntity>,
}

/// Search with the default per-kind limits.
pub fn global_search(catalog: &Catalog, query: &str) -> Vec<SearchResult> {
    search_with_limits(catalog, query, SearchLimits::default())
}

/// Case-insensitive substring search over names (every translation) and,
/// for users, display name and email. Results are grouped by kind in the
/// order products, recipes, users, brands, tags.
pub fn search_with_limits(catalog: &Catalog, query: &str, limits: SearchLimits) -> Vec<SearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let encoded = urlencoding::encode(query);

    let mut results = Vec::new();

    results.extend(
        catalog
            .products
            .iter()
            .filter(|p| p.name.contains_ci(&needle))
            .take(limits.products)
            .map(|p| SearchResult {
                id: p.id.clone(),
                kind: ResultKind::Product,
                title: title(&p.name, ResultKind::Product),
                subtitle: Some(ResultKind::Product.label().to_string()),
                url: format!("/products?search={}", encoded),
                image_url: p.default_image().map(|i| i.url.clone()),
            }),
    );

    results.extend(
        catalog
            .recipes
            .iter()
            .filter(|r| r.name.contains_ci(&needle))
            .take(limits.recipes)
            .map(|r| SearchResult {
                id: r.id.clone(),
                kind: ResultKind::Recipe,
                title: title(&r.name, ResultKind::Recipe),
                subtitle: Some(ResultKind::Recipe.label().to_string()),
                url: format!("/recipes?search={}", encoded),
                image_url: None,
            }),
    );

    results.extend(
        catalog
            .users
            .iter()
            .filter(|u| {
                u.email.to_lowercase().contains(&needle)
                    || u
                        .display_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .take(limits.users)
            .map(|u| SearchResult {
                id: u.id.clone(),
                kind: ResultKind::User,
                title: u.display_name.clone().unwrap_or_else(|| u.email.clone()),
                subtitle: Some(match u.display_name {
                    Some(_) => u.email.clone(),
                    None => ResultKind::User.label().to_string(),
                }),
                url: format!("/users?search={}", encoded),
                image_url: None,
            }),
    );

    results.extend(
        catalog
            .brands
            .iter()
            .filter(|b| b.name.contains_ci(&needle))
            .take(limits.brands)
            .map(|b| SearchResult {
                id: b.id.clone(),
                kind: ResultKind::Brand,
                title: title(&b.name, ResultKind::Brand),
                subtitle: Some(ResultKind::Brand.label().to_string()),
                url: format!("/products?brand={}", urlencoding::encode(&b.id)),
                image_url: b.logo_url.clone(),
            }),
    );

    results.extend(
        catalog
            .tags
            .iter()
            .filter(|t| t.name.contains_ci(&needle))
            .take(limits.tags)
            .map(|t| SearchResult {
                id: t.id.clone(),
                kind: ResultKind::Tag,
                title: title(&t.name, ResultKind::Tag),
                subtitle: Some(ResultKind::Tag.label().to_string()),
                url: format!("/products?tag={}", urlencoding::encode(&t.id)),
                image_url: None,
            }),
    );

    log::debug!("quick search '{}': {} results", query.trim(), results.len());
    results
}

/// English name, else the first translation, else "Unknown <Kind>".
fn title(name: &LocalizedText, kind: ResultKind) -> String {
    match name.resolve("en") {
        "" => format!("Unknown {}", kind.label()),
        text => text.to_string(),
    }
}
