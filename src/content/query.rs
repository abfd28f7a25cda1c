//! Queries over the loaded post collection

use std::cmp::Ordering;
use std::collections::HashMap;

use super::Post;
use crate::error::BuildError;

/// Order in which a query returns posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
}

impl SortOrder {
    /// Compare two posts. Equal dates fall back to slug order so the
    /// result never depends on discovery order.
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        let by_date = match self {
            SortOrder::DateDesc => b.date.cmp(&a.date),
            SortOrder::DateAsc => a.date.cmp(&b.date),
        };
        by_date.then_with(|| a.slug.cmp(&b.slug))
    }
}

/// A sorted, optionally capped view over posts
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQuery {
    sort: SortOrder,
    limit: Option<usize>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the query
    pub fn run<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        let mut result: Vec<&Post> = posts.iter().collect();
        result.sort_by(|a, b| self.sort.compare(a, b));
        if let Some(limit) = self.limit {
            result.truncate(limit);
        }
        result
    }
}

/// Sort posts in place
pub fn sort_posts(posts: &mut [Post], order: SortOrder) {
    posts.sort_by(|a, b| order.compare(a, b));
}

/// Look a post up by its (normalized) slug
pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    let slug = slug.trim_matches('/');
    posts.iter().find(|p| p.slug == slug)
}

/// Fail if two posts share a slug
pub fn ensure_unique_slugs(posts: &[Post]) -> Result<(), BuildError> {
    let mut seen: HashMap<&str, &Post> = HashMap::with_capacity(posts.len());
    for post in posts {
        if let Some(first) = seen.insert(post.slug.as_str(), post) {
            return Err(BuildError::DuplicateSlug {
                slug: post.slug.clone(),
                first: first.full_source.clone(),
                second: post.full_source.clone(),
            });
        }
    }
    Ok(())
}
