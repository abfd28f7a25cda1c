//! Error types for content loading and site validation

use std::path::PathBuf;
use thiserror::Error;

/// A problem with a single content file
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` has no front-matter block (expected a leading `---` fence)")]
    MissingFrontMatter(PathBuf),

    #[error("`{0}` has an unterminated front-matter block")]
    UnterminatedFrontMatter(PathBuf),

    #[error("malformed front-matter in `{0}`")]
    Yaml(PathBuf, #[source] serde_yaml::Error),

    #[error("`{path}` is missing required front-matter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("`{path}` has an invalid date `{value}`")]
    InvalidDate { path: PathBuf, value: String },

    #[error("`{path}` has an invalid slug `{value}`: {reason}")]
    InvalidSlug {
        path: PathBuf,
        value: String,
        reason: &'static str,
    },

    #[error("failed to render markdown in `{0}`: {1}")]
    Render(PathBuf, String),
}

/// A problem that only shows up when looking at the whole site
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("slug `{slug}` is used by both `{first}` and `{second}`")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("slug `{slug}` in `{path}` collides with a reserved output path")]
    ReservedSlug { slug: String, path: PathBuf },

    #[error("hero image `{hero}` referenced by `{path}` does not exist")]
    MissingHero { hero: String, path: PathBuf },

    #[error("no post with slug `{0}`")]
    UnknownSlug(String),

    #[error("`{0}` would be written twice; a static file or hero image shadows a generated file")]
    OutputCollision(PathBuf),
}
