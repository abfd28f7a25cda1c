//! Built-in theme templates using the Tera template engine
//!
//! All templates are embedded in the binary. Context values are
//! HTML-escaped when the view data is built, so autoescaping stays off and
//! rendered post bodies are inserted verbatim.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::build_info::BuildInfo;
use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{escape_html, full_url_for, is_external, join_root, url_for};

/// Stylesheet shipped with the built-in theme, written to `/style.css`
pub const STYLESHEET: &str = include_str!("theme/style.css");

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped when the view data is built
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("404.html", include_str!("theme/404.html")),
            // Partials
            ("partials/head.html", include_str!("theme/partials/head.html")),
            ("partials/nav.html", include_str!("theme/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("theme/partials/footer.html"),
            ),
            (
                "partials/macros.html",
                include_str!("theme/partials/macros.html"),
            ),
        ])
        .context("Failed to load built-in templates")?;

        tera.register_function("url_for", make_url_for(config.root.clone()));

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .with_context(|| format!("Failed to render {}", template_name))
    }
}

/// Tera function: `url_for(path="/x/")` prefixes the site root
fn make_url_for(root: String) -> impl tera::Function {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let path = match args.get("path") {
            Some(val) => tera::try_get_value!("url_for", "path", String, val),
            None => return Err("url_for requires a `path` argument".into()),
        };
        Ok(tera::Value::String(join_root(&root, &path)))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
}

impl ConfigData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: escape_html(&config.title),
            description: escape_html(&config.description),
            author: escape_html(&config.author),
            language: escape_html(&config.language),
            url: escape_html(&config.url),
        }
    }
}

/// Navigation entry in the page header
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub url: String,
    pub external: bool,
}

/// Home link followed by the configured social links
pub fn nav_links(config: &SiteConfig) -> Vec<NavLink> {
    let mut links = vec![NavLink {
        name: "Home".to_string(),
        url: url_for(config, "/"),
        external: false,
    }];
    links.extend(config.social.iter().map(|(name, url)| NavLink {
        name: escape_html(name),
        url: escape_html(&url_for(config, url)),
        external: is_external(url),
    }));
    links
}

/// Everything that ends up in `<head>`
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadData {
    /// Document title
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub feed_url: Option<String>,
    pub google_tag_id: Option<String>,
    /// Extra `<script src>` values
    pub scripts: Vec<String>,
}

impl HeadData {
    /// Head for a page. `page_title` of `None` means the home page.
    pub fn new(config: &SiteConfig, page_title: Option<&str>, path: &str) -> Self {
        let title = match page_title {
            Some(t) => format!("{} | {}", t, config.title),
            None => config.title.clone(),
        };
        Self {
            title: escape_html(&title),
            description: escape_html(&config.description),
            canonical: escape_html(&full_url_for(config, path)),
            feed_url: config
                .feed
                .enable
                .then(|| url_for(config, "/rss.xml")),
            google_tag_id: config
                .analytics
                .google_tag_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .map(escape_html),
            scripts: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = escape_html(description);
        self
    }

    pub fn with_scripts<'a>(mut self, scripts: impl IntoIterator<Item = &'a str>) -> Self {
        self.scripts = scripts.into_iter().map(escape_html).collect();
        self
    }
}

/// Build banner shown in the footer
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfoData {
    pub hash: String,
    pub short_hash: String,
    pub date: String,
}

impl From<&BuildInfo> for BuildInfoData {
    fn from(info: &BuildInfo) -> Self {
        Self {
            hash: info.commit_hash.clone(),
            short_hash: info.short_hash().to_string(),
            date: info.commit_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A summary card on the home page
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub path: String,
    pub date: String,
    pub date_iso: String,
    pub reading_time: usize,
    pub excerpt: String,
    pub hero: Option<String>,
}

impl PostCard {
    pub fn new(post: &Post, config: &SiteConfig) -> Self {
        Self {
            title: escape_html(&post.title),
            path: escape_html(&url_for(config, &post.path())),
            date: post.date.format(&config.date_format).to_string(),
            date_iso: post.date.format("%Y-%m-%d").to_string(),
            reading_time: post.reading_time,
            excerpt: escape_html(&post.excerpt),
            hero: post
                .hero
                .as_ref()
                .map(|h| escape_html(&url_for(config, h.url()))),
        }
    }
}

/// Full post data for the post template
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub path: String,
    pub date: String,
    pub date_iso: String,
    pub reading_time: usize,
    pub hero: Option<String>,
    /// Rendered body, inserted unescaped
    pub content: String,
}

impl PostView {
    pub fn new(post: &Post, config: &SiteConfig) -> Self {
        let card = PostCard::new(post, config);
        Self {
            title: card.title,
            path: card.path,
            date: card.date,
            date_iso: card.date_iso,
            reading_time: card.reading_time,
            hero: card.hero,
            content: post.content.clone(),
        }
    }
}

/// Link to a neighbouring post
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

impl NavPost {
    pub fn new(post: &Post, config: &SiteConfig) -> Self {
        Self {
            title: escape_html(&post.title),
            path: escape_html(&url_for(config, &post.path())),
        }
    }
}
