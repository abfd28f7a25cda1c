//! Content module - discovers posts and turns them into plain data

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod query;

pub use frontmatter::{normalize_slug, parse_date_string, FrontMatter, PostMeta};
pub use loader::ContentLoader;
pub use markdown::{MarkdownRenderer, MORE_MARKER};
pub use post::{Hero, PageScript, Post};
pub use query::{find_by_slug, sort_posts, PostQuery, SortOrder};
