//! Helper functions shared by the loader, generator and templates

mod text;
mod url;

pub use text::*;
pub use url::*;
