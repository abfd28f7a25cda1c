//! Sitemap generation
//!
//! Lists the home page and every post page:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/hello/</loc>
//!     <lastmod>2024-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::config::SiteConfig;
use crate::content::{Post, PostQuery};
use crate::helpers::{escape_html, full_url_for};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build `sitemap.xml`. Post entries follow listing order.
pub fn build_sitemap(config: &SiteConfig, posts: &[Post]) -> String {
    let ordered = PostQuery::new().run(posts);

    // The home page changes whenever the newest post does
    let home = url_entry(&full_url_for(config, "/"), ordered.first().copied());
    let entries: String = ordered
        .iter()
        .map(|&post| url_entry(&full_url_for(config, &post.path()), Some(post)))
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{SITEMAP_NS}\">\n{home}{entries}</urlset>\n"
    )
}

fn url_entry(loc: &str, lastmod: Option<&Post>) -> String {
    let lastmod = lastmod
        .map(|p| format!("\n    <lastmod>{}</lastmod>", p.date.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!(
        "  <url>\n    <loc>{}</loc>{}\n  </url>\n",
        escape_html(loc),
        lastmod
    )
}
