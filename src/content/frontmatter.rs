//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::post::PageScript;
use crate::error::ContentError;

/// Raw front-matter as written in a post file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    /// Featured image, relative to the post file or absolute
    pub hero: Option<String>,
    /// Overrides the excerpt derived from the body
    pub description: Option<String>,
    #[serde(rename = "pageScripts")]
    pub page_scripts: Vec<PageScript>,
    pub draft: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Front-matter with every required field present and checked
#[derive(Debug, Clone)]
pub struct PostMeta {
    pub title: String,
    pub slug: String,
    pub date: NaiveDateTime,
    pub hero: Option<String>,
    pub description: Option<String>,
    pub page_scripts: Vec<PageScript>,
    pub draft: bool,
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a post file into its front-matter and body.
    ///
    /// The file must open with a `---` fence and close it with a line
    /// holding only `---`.
    pub fn parse<'a>(content: &'a str, path: &Path) -> Result<(Self, &'a str), ContentError> {
        let content = content.trim_start_matches('\u{feff}');
        let rest = content
            .strip_prefix("---")
            .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
            .ok_or_else(|| ContentError::MissingFrontMatter(path.to_path_buf()))?;

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);

                if yaml.trim().is_empty() {
                    return Ok((FrontMatter::default(), body));
                }

                let fm = serde_yaml::from_str::<FrontMatter>(yaml)
                    .map_err(|e| ContentError::Yaml(path.to_path_buf(), e))?;
                return Ok((fm, body));
            }
            offset += line.len();
        }

        Err(ContentError::UnterminatedFrontMatter(path.to_path_buf()))
    }

    /// Check required fields and normalize slug and date
    pub fn validate(self, path: &Path) -> Result<PostMeta, ContentError> {
        let missing = |field| ContentError::MissingField {
            path: path.to_path_buf(),
            field,
        };

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| missing("title"))?;
        let raw_slug = self.slug.ok_or_else(|| missing("slug"))?;
        let raw_date = self.date.ok_or_else(|| missing("date"))?;

        let slug = normalize_slug(&raw_slug).map_err(|reason| ContentError::InvalidSlug {
            path: path.to_path_buf(),
            value: raw_slug.clone(),
            reason,
        })?;
        let date = parse_date_string(&raw_date).ok_or_else(|| ContentError::InvalidDate {
            path: path.to_path_buf(),
            value: raw_date.clone(),
        })?;

        if let Some(script) = self.page_scripts.iter().find(|s| s.src.trim().is_empty()) {
            tracing::debug!("Empty page script in {:?}: {:?}", path, script);
            return Err(missing("pageScripts.src"));
        }

        Ok(PostMeta {
            title: title.trim().to_string(),
            slug,
            date,
            hero: self.hero.filter(|h| !h.trim().is_empty()),
            description: self.description,
            page_scripts: self.page_scripts,
            draft: self.draft,
            extra: self.extra,
        })
    }
}

/// Normalize a slug to its canonical form without surrounding slashes
pub fn normalize_slug(raw: &str) -> Result<String, &'static str> {
    let slug = raw.trim().trim_matches('/');

    if slug.is_empty() {
        return Err("slug is empty");
    }
    if slug
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\\' | '?' | '#'))
    {
        return Err("slug contains whitespace, `\\`, `?` or `#`");
    }
    if slug.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err("slug has an empty or relative path segment");
    }

    Ok(slug.to_string())
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, normalized to UTC
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("content/posts/test.md")
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
slug: /hello-world
date: 2024-01-15
hero: ./images/hero.png
pageScripts:
  - src: https://cdn.example.com/widget.js
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content, &path()).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.page_scripts.len(), 1);
        assert_eq!(fm.page_scripts[0].src, "https://cdn.example.com/widget.js");
        assert!(body.starts_with("This is the content."));

        let meta = fm.validate(&path()).unwrap();
        assert_eq!(meta.slug, "hello-world");
        assert_eq!(meta.hero.as_deref(), Some("./images/hero.png"));
        assert_eq!(meta.date.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_missing_fence_is_error() {
        let err = FrontMatter::parse("# Just markdown\n", &path()).unwrap_err();
        assert!(matches!(err, ContentError::MissingFrontMatter(_)));
    }

    #[test]
    fn test_unterminated_fence_is_error() {
        let err = FrontMatter::parse("---\ntitle: x\n\nbody", &path()).unwrap_err();
        assert!(matches!(err, ContentError::UnterminatedFrontMatter(_)));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let content = "---\ntitle: [unclosed\n---\nbody\n";
        let err = FrontMatter::parse(content, &path()).unwrap_err();
        assert!(matches!(err, ContentError::Yaml(..)));
    }

    #[test]
    fn test_missing_required_fields() {
        let content = "---\ntitle: Only a title\ndate: 2022-01-01\n---\nbody\n";
        let (fm, _) = FrontMatter::parse(content, &path()).unwrap();
        let err = fm.validate(&path()).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingField { field: "slug", .. }
        ));

        let (fm, _) = FrontMatter::parse("---\n---\nbody\n", &path()).unwrap();
        assert!(matches!(
            fm.validate(&path()).unwrap_err(),
            ContentError::MissingField { field: "title", .. }
        ));
    }

    #[test]
    fn test_invalid_date() {
        let content = "---\ntitle: t\nslug: t\ndate: yesterday\n---\n";
        let (fm, _) = FrontMatter::parse(content, &path()).unwrap();
        assert!(matches!(
            fm.validate(&path()).unwrap_err(),
            ContentError::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_horizontal_rule_in_body_is_kept() {
        let content = "---\ntitle: t\nslug: t\ndate: 2020-02-02\n---\nabove\n\n---\n\nbelow\n";
        let (_, body) = FrontMatter::parse(content, &path()).unwrap();
        assert!(body.contains("above"));
        assert!(body.contains("below"));
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("/a/b/").unwrap(), "a/b");
        assert_eq!(normalize_slug("hello-world").unwrap(), "hello-world");
        assert!(normalize_slug("/").is_err());
        assert!(normalize_slug("../etc").is_err());
        assert!(normalize_slug("a//b").is_err());
        assert!(normalize_slug("has space").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expect = |s: &str, want: &str| {
            let dt = parse_date_string(s).unwrap();
            assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), want);
        };
        expect("2024-01-15", "2024-01-15 00:00");
        expect("2024/01/15 10:30", "2024-01-15 10:30");
        expect("2024-01-15T10:30:00.000", "2024-01-15 10:30");
        expect("2024-01-15T10:30:00+02:00", "2024-01-15 08:30");
        assert!(parse_date_string("15 Jan 2024").is_none());
    }
}
