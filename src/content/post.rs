//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An external script a post asks to have injected into the page head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageScript {
    pub src: String,
}

/// Where a post's hero image lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Hero {
    /// A file next to the post source, copied into the post's output dir
    Local { source: PathBuf, url: String },
    /// Site-absolute path or remote URL, used as-is
    External { url: String },
}

impl Hero {
    /// Resolve a front-matter hero reference for a post
    pub fn resolve(reference: &str, post_source: &Path, slug: &str) -> Self {
        let reference = reference.trim();
        if reference.starts_with("http://")
            || reference.starts_with("https://")
            || reference.starts_with("//")
            || reference.starts_with('/')
        {
            return Hero::External {
                url: reference.to_string(),
            };
        }

        let base = post_source.parent().unwrap_or_else(|| Path::new("."));
        let source = base.join(reference.trim_start_matches("./"));
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Hero::Local {
            url: format!("/{}/{}", slug, file_name),
            source,
        }
    }

    /// Site-relative or absolute URL of the image
    pub fn url(&self) -> &str {
        match self {
            Hero::Local { url, .. } | Hero::External { url } => url,
        }
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Unique path identifier, without surrounding slashes
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDateTime,

    /// Featured image
    pub hero: Option<Hero>,

    /// Raw markdown body (front-matter stripped)
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Plain-text summary
    pub excerpt: String,

    /// Estimated reading time in minutes
    pub reading_time: usize,

    /// Number of words in the body
    pub word_count: usize,

    /// Extra scripts for the document head
    pub page_scripts: Vec<PageScript>,

    /// Whether the post is a draft
    pub draft: bool,

    /// Source file path (relative to the content dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Custom front-matter fields
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Post {
    /// URL path of the post page (`/<slug>/`)
    pub fn path(&self) -> String {
        format!("/{}/", self.slug)
    }

    /// Get the newer neighbour in a date-descending list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the older neighbour in a date-descending list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}
