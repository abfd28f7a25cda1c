//! Content loader - loads posts from the content directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::query::{ensure_unique_slugs, sort_posts, SortOrder};
use super::{FrontMatter, Hero, MarkdownRenderer, Post};
use crate::error::{BuildError, ContentError};
use crate::helpers::{count_words, plain_text, prune, reading_time};
use crate::Site;

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.line_number,
        );
        Self { site, renderer }
    }

    /// Load every post, newest first.
    ///
    /// Any broken file aborts the load with an error naming it.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", content_dir))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let post = self.load_post(path)?;
            if post.draft && !self.site.config.render_drafts {
                tracing::debug!("Skipping draft {:?}", path);
                continue;
            }
            posts.push(post);
        }

        ensure_unique_slugs(&posts)?;
        sort_posts(&mut posts, SortOrder::DateDesc);

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)
            .map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
        let (fm, body) = FrontMatter::parse(&content, path)?;
        let meta = fm.validate(path)?;

        let hero = meta
            .hero
            .as_deref()
            .map(|h| Hero::resolve(h, path, &meta.slug));
        if let Some(Hero::Local { source, .. }) = &hero {
            if !source.is_file() {
                return Err(BuildError::MissingHero {
                    hero: meta.hero.clone().unwrap_or_default(),
                    path: path.to_path_buf(),
                }
                .into());
            }
        }

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content_html = self
            .renderer
            .render(&full_md)
            .map_err(|e| ContentError::Render(path.to_path_buf(), e.to_string()))?;

        let text = plain_text(&content_html);
        let word_count = count_words(&text);

        let excerpt_text = match (&meta.description, &excerpt_md) {
            (Some(description), _) => description.trim().to_string(),
            (None, Some(md)) => {
                let html = self
                    .renderer
                    .render(md)
                    .map_err(|e| ContentError::Render(path.to_path_buf(), e.to_string()))?;
                plain_text(&html)
            }
            (None, None) => text,
        };

        let source = path
            .strip_prefix(&self.site.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(Post {
            slug: meta.slug,
            title: meta.title,
            date: meta.date,
            hero,
            raw: body.to_string(),
            content: content_html,
            excerpt: prune(&excerpt_text, self.site.config.excerpt_length),
            reading_time: reading_time(word_count, self.site.config.words_per_minute),
            word_count,
            page_scripts: meta.page_scripts,
            draft: meta.draft,
            source,
            full_source: path.to_path_buf(),
            extra: meta.extra,
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
