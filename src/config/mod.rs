//! Configuration module

mod site;

pub use site::AnalyticsConfig;
pub use site::FeedConfig;
pub use site::HighlightConfig;
pub use site::IndexConfig;
pub use site::SiteConfig;
pub use site::SitemapConfig;
