//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::path::{Component, Path};
use syntect::highlighting::ThemeSet;

lazy_static! {
    static ref TAG_ID: Regex = Regex::new(r"^[A-Za-z0-9-]+$").unwrap();
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Writing
    pub render_drafts: bool,
    pub excerpt_length: usize,
    pub words_per_minute: usize,
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Home page
    #[serde(default)]
    pub index: IndexConfig,

    /// Social links shown in the navigation, in file order
    #[serde(default)]
    pub social: IndexMap<String, String>,

    // Plugins
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://localhost:8000".to_string(),
            root: "/".to_string(),

            content_dir: "content/posts".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            render_drafts: false,
            excerpt_length: 140,
            words_per_minute: 265,
            date_format: "%B %d, %Y".to_string(),
            highlight: HighlightConfig::default(),

            index: IndexConfig::default(),
            social: IndexMap::new(),

            analytics: AnalyticsConfig::default(),
            feed: FeedConfig::default(),
            sitemap: SitemapConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            anyhow::bail!("words_per_minute must be greater than zero");
        }

        // Posts carry naive dates, so offset items like `%z` fail here too
        let sample = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| anyhow::anyhow!("invalid sample date"))?;
        let mut formatted = String::new();
        if write!(formatted, "{}", sample.format(&self.date_format)).is_err() {
            anyhow::bail!(
                "date_format {:?} is not a valid strftime format for post dates",
                self.date_format
            );
        }

        if self.index.max_posts == 0 {
            anyhow::bail!("index.max_posts must be greater than zero");
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!("url {:?} must start with http:// or https://", self.url);
        }

        // Stale files under the public dir are deleted on every build
        let public_dir = Path::new(&self.public_dir);
        if public_dir.as_os_str().is_empty()
            || !public_dir
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            anyhow::bail!(
                "public_dir {:?} must be a relative path below the site root",
                self.public_dir
            );
        }

        if !ThemeSet::load_defaults()
            .themes
            .contains_key(&self.highlight.theme)
        {
            anyhow::bail!("unknown highlight.theme {:?}", self.highlight.theme);
        }

        if let Some(id) = &self.analytics.google_tag_id {
            if !id.trim().is_empty() && !TAG_ID.is_match(id) {
                anyhow::bail!("analytics.google_tag_id {:?} is not a valid tag id", id);
            }
        }

        Ok(())
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Home page listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Hard cap on the number of cards on the home page
    pub max_posts: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { max_posts: 1000 }
    }
}

/// Analytics tag configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    pub google_tag_id: Option<String>,
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub enable: bool,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            limit: 20,
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    pub enable: bool,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/posts");
        assert_eq!(config.index.max_posts, 1000);
        assert_eq!(config.words_per_minute, 265);
        assert!(config.feed.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Field Notes
author: Test User
url: https://example.com
social:
  github: https://github.com/example
  mastodon: https://mastodon.social/@example
analytics:
  google_tag_id: G-TEST123
index:
  max_posts: 5
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Field Notes");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.index.max_posts, 5);
        assert_eq!(
            config.analytics.google_tag_id.as_deref(),
            Some("G-TEST123")
        );
        let names: Vec<_> = config.social.keys().cloned().collect();
        assert_eq!(names, vec!["github", "mastodon"]);
        // Untouched sections keep their defaults
        assert_eq!(config.feed.limit, 20);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let yaml = "title: x\nper_page: 10\n";
        assert!(serde_yaml::from_str::<SiteConfig>(yaml).is_err());
    }

    fn validate_yaml(yaml: &str) -> Result<()> {
        serde_yaml::from_str::<SiteConfig>(yaml).unwrap().validate()
    }

    #[test]
    fn test_defaults_validate() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_date_format_with_offset_rejected() {
        assert!(validate_yaml("date_format: '%Y %z'\n").is_err());
        assert!(validate_yaml("date_format: '%d %b %Y'\n").is_ok());
    }

    #[test]
    fn test_url_needs_scheme() {
        assert!(validate_yaml("url: example.com\n").is_err());
        assert!(validate_yaml("url: https://example.com/blog\n").is_ok());
    }

    #[test]
    fn test_public_dir_must_stay_below_root() {
        for dir in ["..", "../blog", "/tmp/out", ".", "", "public/../.."] {
            let yaml = format!("public_dir: '{}'\n", dir);
            assert!(validate_yaml(&yaml).is_err(), "{dir:?} accepted");
        }
        assert!(validate_yaml("public_dir: build/site\n").is_ok());
    }

    #[test]
    fn test_unknown_highlight_theme_rejected() {
        assert!(validate_yaml("highlight:\n  theme: no-such-theme\n").is_err());
        assert!(validate_yaml("highlight:\n  theme: InspiredGitHub\n").is_ok());
    }

    #[test]
    fn test_google_tag_id_format() {
        assert!(validate_yaml("analytics:\n  google_tag_id: G-ABC123\n").is_ok());
        assert!(validate_yaml("analytics:\n  google_tag_id: \"x');alert(1);//\"\n").is_err());
    }

    #[test]
    fn test_load_rejects_zero_wpm() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "words_per_minute: 0\n").unwrap();
        assert!(SiteConfig::load(&path).is_err());
    }
}
