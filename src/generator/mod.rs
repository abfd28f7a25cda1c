//! Generator module - renders the site into the public directory

mod feed;
mod output;
pub mod routes;
mod sitemap;

pub use feed::build_feed;
pub use output::{write_if_changed, BuildReport, OutputWriter};
pub use routes::{bind_pages, PageBinding, PageContext, Template};
pub use sitemap::build_sitemap;

use anyhow::{Context as _, Result};
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::build_info::BuildInfo;
use crate::content::{find_by_slug, sort_posts, Hero, Post, PostQuery, SortOrder};
use crate::error::BuildError;
use crate::templates::{
    nav_links, BuildInfoData, ConfigData, HeadData, NavPost, PostCard, PostView,
    TemplateRenderer, STYLESHEET,
};
use crate::Site;

/// Static site generator using the built-in templates
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site) -> Result<Self> {
        let renderer = TemplateRenderer::new(&site.config)?;
        Ok(Self { site, renderer })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], build: Option<&BuildInfo>) -> Result<BuildReport> {
        let config = &self.site.config;

        let mut posts = posts.to_vec();
        sort_posts(&mut posts, SortOrder::DateDesc);
        let bindings = bind_pages(&posts)?;

        let mut out = OutputWriter::new(&self.site.public_dir);
        let build = build.map(BuildInfoData::from);

        self.copy_static_assets(&mut out)?;
        self.copy_hero_images(&posts, &mut out)?;

        out.stage(Path::new("style.css"), STYLESHEET)?;
        out.stage(Path::new("index.html"), self.render_index(&posts, &build)?)?;

        for binding in &bindings {
            let html = self.render_post(binding, &posts, &build)?;
            out.stage(&binding.output, html)?;
        }

        out.stage(Path::new("404.html"), self.render_not_found(&build)?)?;

        if config.feed.enable {
            out.stage(Path::new("rss.xml"), build_feed(config, &posts)?)?;
        }

        if config.sitemap.enable {
            out.stage(Path::new("sitemap.xml"), build_sitemap(config, &posts))?;
        }

        // Nothing touches the public dir until every output rendered
        out.commit(posts.len())
    }

    /// Create a base context with common variables
    fn create_base_context(&self, head: HeadData, build: &Option<BuildInfoData>) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert("config", &ConfigData::new(config));
        context.insert("nav", &nav_links(config));
        context.insert("head", &head);
        context.insert("build", build);
        context
    }

    /// Listing of every post, newest first, capped at `index.max_posts`
    fn render_index(&self, posts: &[Post], build: &Option<BuildInfoData>) -> Result<String> {
        let config = &self.site.config;
        let cards: Vec<PostCard> = PostQuery::new()
            .limit(config.index.max_posts)
            .run(posts)
            .into_iter()
            .map(|p| PostCard::new(p, config))
            .collect();

        let mut context = self.create_base_context(HeadData::new(config, None, "/"), build);
        context.insert("posts", &cards);
        self.renderer.render(Template::Index.name(), &context)
    }

    /// One post page. The post is looked up again by the binding's slug.
    fn render_post(
        &self,
        binding: &PageBinding,
        posts: &[Post],
        build: &Option<BuildInfoData>,
    ) -> Result<String> {
        let config = &self.site.config;
        let post = find_by_slug(posts, &binding.context.slug)
            .ok_or_else(|| BuildError::UnknownSlug(binding.context.slug.clone()))?;

        let head = HeadData::new(config, Some(post.title.as_str()), &binding.path)
            .with_description(&post.excerpt)
            .with_scripts(binding.context.scripts.iter().map(|s| s.src.as_str()));

        let mut context = self.create_base_context(head, build);
        context.insert("post", &PostView::new(post, config));
        context.insert("prev_post", &post.prev(posts).map(|p| NavPost::new(p, config)));
        context.insert("next_post", &post.next(posts).map(|p| NavPost::new(p, config)));

        self.renderer
            .render(binding.template.name(), &context)
            .with_context(|| format!("Failed to render post {:?}", post.full_source))
    }

    fn render_not_found(&self, build: &Option<BuildInfoData>) -> Result<String> {
        let config = &self.site.config;
        let head = HeadData::new(config, Some("Not Found"), "/404.html");
        let context = self.create_base_context(head, build);
        self.renderer.render(Template::NotFound.name(), &context)
    }

    /// Copy every non-Markdown file under the static dir
    fn copy_static_assets(&self, out: &mut OutputWriter) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", static_dir))?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("md") | Some("markdown")
            ) {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            out.stage_copy(path, relative)?;
        }

        Ok(())
    }

    /// Copy local hero images next to their post page
    fn copy_hero_images(&self, posts: &[Post], out: &mut OutputWriter) -> Result<()> {
        for post in posts {
            if let Some(Hero::Local { source, url }) = &post.hero {
                if !source.is_file() {
                    return Err(BuildError::MissingHero {
                        hero: url.clone(),
                        path: post.full_source.clone(),
                    }
                    .into());
                }
                out.stage_copy(source, Path::new(url.trim_start_matches('/')))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::query::tests::post;
    use crate::content::PageScript;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    fn read(site: &Site, relative: &str) -> String {
        fs::read_to_string(site.public_dir.join(relative)).unwrap()
    }

    #[test]
    fn test_one_page_per_post() {
        let (_dir, site) = site();
        let posts = vec![
            post("a", "2021-01-01"),
            post("b", "2023-01-01"),
            post("c", "2022-01-01"),
        ];
        let report = Generator::new(&site)
            .unwrap()
            .generate(&posts, None)
            .unwrap();

        assert_eq!(report.posts, 3);
        for slug in ["a", "b", "c"] {
            let html = read(&site, &format!("{}/index.html", slug));
            assert!(html.contains(&format!("<title>Post {} | My Blog</title>", slug)));
        }
        assert!(site.public_dir.join("404.html").exists());
        assert!(site.public_dir.join("style.css").exists());
        assert!(site.public_dir.join("rss.xml").exists());
        assert!(site.public_dir.join("sitemap.xml").exists());
    }

    #[test]
    fn test_listing_is_date_descending() {
        let (_dir, site) = site();
        let posts = vec![
            post("y2021", "2021-01-01"),
            post("y2023", "2023-01-01"),
            post("y2022", "2022-01-01"),
        ];
        Generator::new(&site)
            .unwrap()
            .generate(&posts, None)
            .unwrap();

        let index = read(&site, "index.html");
        let positions: Vec<_> = ["/y2023/", "/y2022/", "/y2021/"]
            .iter()
            .map(|p| index.find(&format!("href=\"{}\"", p)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_listing_respects_max_posts() {
        let (_dir, mut site) = site();
        site.config.index.max_posts = 1;
        let posts = vec![post("old", "2021-01-01"), post("new", "2023-01-01")];
        Generator::new(&site)
            .unwrap()
            .generate(&posts, None)
            .unwrap();

        let index = read(&site, "index.html");
        assert!(index.contains("href=\"/new/\""));
        assert!(!index.contains("href=\"/old/\""));
    }

    #[test]
    fn test_prev_next_navigation() {
        let (_dir, site) = site();
        let posts = vec![
            post("a", "2021-01-01"),
            post("b", "2022-01-01"),
            post("c", "2023-01-01"),
        ];
        Generator::new(&site)
            .unwrap()
            .generate(&posts, None)
            .unwrap();

        let middle = read(&site, "b/index.html");
        assert!(middle.contains(r#"class="prev" href="/c/""#));
        assert!(middle.contains(r#"class="next" href="/a/""#));
        let newest = read(&site, "c/index.html");
        assert!(!newest.contains(r#"class="prev""#));
    }

    #[test]
    fn test_page_scripts_only_on_their_post() {
        let (_dir, site) = site();
        let mut with = post("with", "2022-01-01");
        with.page_scripts = vec![PageScript {
            src: "https://example.com/embed.js".to_string(),
        }];
        let posts = vec![with, post("without", "2021-01-01")];
        Generator::new(&site)
            .unwrap()
            .generate(&posts, None)
            .unwrap();

        assert!(read(&site, "with/index.html").contains("https://example.com/embed.js"));
        assert!(!read(&site, "without/index.html").contains("embed.js"));
        assert!(!read(&site, "index.html").contains("embed.js"));
    }

    #[test]
    fn test_build_banner() {
        let (_dir, site) = site();
        let info = BuildInfo {
            commit_hash: "abcdef0123456789".to_string(),
            commit_date: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        Generator::new(&site)
            .unwrap()
            .generate(&[post("a", "2021-01-01")], Some(&info))
            .unwrap();

        let html = read(&site, "a/index.html");
        assert!(html.contains("abcdef0"));
        assert!(html.contains("2023-11-14"));
    }

    #[test]
    fn test_static_assets_and_hero_copied() {
        let (dir, site) = site();
        fs::create_dir_all(dir.path().join("static/img")).unwrap();
        fs::write(dir.path().join("static/img/logo.png"), "png").unwrap();
        fs::write(dir.path().join("static/README.md"), "skip").unwrap();

        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, "jpg").unwrap();
        let mut p = post("a", "2021-01-01");
        p.hero = Some(Hero::Local {
            source: cover,
            url: "/a/cover.jpg".to_string(),
        });

        Generator::new(&site).unwrap().generate(&[p], None).unwrap();

        assert_eq!(read(&site, "img/logo.png"), "png");
        assert!(!site.public_dir.join("README.md").exists());
        assert_eq!(read(&site, "a/cover.jpg"), "jpg");
        assert!(read(&site, "a/index.html").contains(r#"src="/a/cover.jpg""#));
    }

    #[test]
    fn test_missing_hero_fails() {
        let (dir, site) = site();
        let mut p = post("a", "2021-01-01");
        p.hero = Some(Hero::Local {
            source: dir.path().join("missing.jpg"),
            url: "/a/missing.jpg".to_string(),
        });
        assert!(Generator::new(&site).unwrap().generate(&[p], None).is_err());
    }

    #[test]
    fn test_static_file_shadowing_generated_file_fails() {
        let (dir, site) = site();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/style.css"), "body {}").unwrap();

        let err = Generator::new(&site)
            .unwrap()
            .generate(&[post("a", "2021-01-01")], None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::OutputCollision(p)) if p.as_path() == Path::new("style.css")
        ));
    }

    #[test]
    fn test_failed_build_leaves_public_dir_untouched() {
        let (dir, site) = site();
        let generator = Generator::new(&site).unwrap();
        generator.generate(&[post("a", "2021-01-01")], None).unwrap();
        let index_before = read(&site, "index.html");

        // A new post plus a static file that collides with the old post page
        fs::create_dir_all(dir.path().join("static/a")).unwrap();
        fs::write(dir.path().join("static/a/index.html"), "mine").unwrap();
        fs::write(dir.path().join("static/extra.txt"), "extra").unwrap();
        let posts = vec![post("a", "2021-01-01"), post("b", "2022-01-01")];
        assert!(generator.generate(&posts, None).is_err());

        assert_eq!(read(&site, "index.html"), index_before);
        assert!(read(&site, "a/index.html").contains("Post a"));
        assert!(!site.public_dir.join("b").exists());
        assert!(!site.public_dir.join("extra.txt").exists());
    }

    #[test]
    fn test_second_run_writes_nothing() {
        let (_dir, site) = site();
        let posts = vec![post("a", "2021-01-01"), post("b", "2022-01-01")];
        let generator = Generator::new(&site).unwrap();

        let first = generator.generate(&posts, None).unwrap();
        assert!(first.written > 0);
        let second = generator.generate(&posts, None).unwrap();
        assert_eq!(second.written, 0);
        assert_eq!(second.removed, 0);
        assert_eq!(second.unchanged, first.written);
    }
}
