//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: My Blog
description: ''
author: ''
language: en

# URL
url: http://localhost:8000
root: /

# Directory
content_dir: content/posts
static_dir: static
public_dir: public

# Writing
render_drafts: false
excerpt_length: 140
words_per_minute: 265
date_format: '%B %d, %Y'
highlight:
  theme: base16-ocean.dark
  line_number: false

# Home page
index:
  max_posts: 1000

# Navigation links, in order
social: {}

analytics:
  google_tag_id:

feed:
  enable: true
  limit: 20

sitemap:
  enable: true
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
slug: hello-world
date: 2024-01-01
description: The first post on a fresh site.
---

Welcome! Edit this file or create a new post with `folio new "My New Post"`.

<!-- more -->

## Build the site

```bash
$ folio build
```

## Preview it

```bash
$ folio serve
```
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a site", target_dir);
    }

    let defaults = SiteConfig::default();
    let content_dir = target_dir.join(&defaults.content_dir);
    let static_dir = target_dir.join(&defaults.static_dir);

    fs::create_dir_all(&content_dir)
        .with_context(|| format!("Failed to create {:?}", content_dir))?;
    fs::create_dir_all(&static_dir).with_context(|| format!("Failed to create {:?}", static_dir))?;

    fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    let sample = content_dir.join("hello-world.md");
    if !sample.exists() {
        fs::write(&sample, SAMPLE_POST).with_context(|| format!("Failed to write {:?}", sample))?;
    }

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_build() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("blog");
        init_site(&root).unwrap();

        let site = Site::new(&root).unwrap();
        assert_eq!(site.config.title, "My Blog");
        assert!(site.static_dir.is_dir());

        let report = site.build().unwrap();
        assert_eq!(report.posts, 1);
        assert!(site.public_dir.join("hello-world/index.html").is_file());
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
