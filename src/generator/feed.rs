//! RSS feed generation

use anyhow::{anyhow, Result};
use rss::{validation::Validate, ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::config::SiteConfig;
use crate::content::{Post, PostQuery};
use crate::helpers::full_url_for;

/// Build `rss.xml` from the newest posts
pub fn build_feed(config: &SiteConfig, posts: &[Post]) -> Result<String> {
    let items: Vec<_> = PostQuery::new()
        .limit(config.feed.limit)
        .run(posts)
        .into_iter()
        .map(|post| post_to_item(post, config))
        .collect();

    let description = if config.description.trim().is_empty() {
        config.title.clone()
    } else {
        config.description.clone()
    };

    // No lastBuildDate: the feed must not change between identical builds
    let channel = ChannelBuilder::default()
        .title(&config.title)
        .link(full_url_for(config, "/"))
        .description(description)
        .language(Some(config.language.clone()))
        .generator("folio".to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;
    Ok(channel.to_string())
}

fn post_to_item(post: &Post, config: &SiteConfig) -> rss::Item {
    let link = full_url_for(config, &post.path());

    ItemBuilder::default()
        .title(post.title.clone())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.excerpt.clone())
        .pub_date(post.date.and_utc().to_rfc2822())
        .build()
}
