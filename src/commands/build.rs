//! Build the site

use anyhow::Result;
use std::time::Instant;

use crate::build_info::BuildInfo;
use crate::content::ContentLoader;
use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Load posts, render every page and copy assets
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = Instant::now();

    let posts = ContentLoader::new(site).load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let build_info = BuildInfo::discover(&site.base_dir)?;
    if let Some(info) = &build_info {
        tracing::debug!("Building from commit {}", info.short_hash());
    }

    let report = Generator::new(site)?.generate(&posts, build_info.as_ref())?;

    tracing::info!(
        "Generated in {:.2}s: {} written, {} unchanged, {} removed",
        start.elapsed().as_secs_f64(),
        report.written,
        report.unchanged,
        report.removed
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_site_builds() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let report = run(&site).unwrap();

        assert_eq!(report.posts, 0);
        let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(index.contains("No posts yet."));
    }

    #[test]
    fn test_drafts_follow_config() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("wip.md"),
            "---\ntitle: WIP\nslug: wip\ndate: 2024-01-01\ndraft: true\n---\nSoon.\n",
        )
        .unwrap();

        let mut site = Site::new(dir.path()).unwrap();
        assert_eq!(run(&site).unwrap().posts, 0);

        site.config.render_drafts = true;
        assert_eq!(run(&site).unwrap().posts, 1);
        assert!(site.public_dir.join("wip/index.html").is_file());
    }
}
