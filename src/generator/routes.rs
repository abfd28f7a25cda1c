//! Page bindings: which template renders which post, and where it goes

use serde::Serialize;
use std::path::PathBuf;

use crate::content::query::ensure_unique_slugs;
use crate::content::{PageScript, Post};
use crate::error::BuildError;

/// First path segments the generator writes itself
const RESERVED: &[&str] = &[
    "index.html",
    "404",
    "404.html",
    "rss.xml",
    "sitemap.xml",
    "style.css",
];

/// Templates a page can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Template {
    Index,
    Post,
    NotFound,
}

impl Template {
    /// Name the template is registered under
    pub fn name(self) -> &'static str {
        match self {
            Template::Index => "index.html",
            Template::Post => "post.html",
            Template::NotFound => "404.html",
        }
    }
}

/// Context handed to the post template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub slug: String,
    pub scripts: Vec<PageScript>,
}

/// One output page for one post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageBinding {
    /// URL path, `/<slug>/`
    pub path: String,
    /// Output file relative to the public dir
    pub output: PathBuf,
    pub template: Template,
    pub context: PageContext,
}

/// Bind every post to exactly one page, in input order
pub fn bind_pages(posts: &[Post]) -> Result<Vec<PageBinding>, BuildError> {
    ensure_unique_slugs(posts)?;

    posts
        .iter()
        .map(|post| {
            let first = post.slug.split('/').next().unwrap_or_default();
            if RESERVED.contains(&first) {
                return Err(BuildError::ReservedSlug {
                    slug: post.slug.clone(),
                    path: post.full_source.clone(),
                });
            }

            Ok(PageBinding {
                path: post.path(),
                output: PathBuf::from(&post.slug).join("index.html"),
                template: Template::Post,
                context: PageContext {
                    slug: post.slug.clone(),
                    scripts: post.page_scripts.clone(),
                },
            })
        })
        .collect()
}
