//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::{ContentLoader, Post};
use crate::Site;

/// One row of `folio list --json`
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    date: String,
    slug: &'a str,
    title: &'a str,
    draft: bool,
    source: &'a str,
}

/// Print posts newest first
pub fn run(site: &Site, json: bool) -> Result<()> {
    let posts = ContentLoader::new(site).load_posts()?;
    if json {
        println!("{}", to_json(&posts)?);
    } else {
        print!("{}", to_table(&posts));
    }
    Ok(())
}

fn to_table(posts: &[Post]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        out.push_str(&format!(
            "  {}  {}  {}{}\n",
            post.date.format("%Y-%m-%d"),
            post.slug,
            post.title,
            if post.draft { " [draft]" } else { "" }
        ));
    }
    out
}

fn to_json(posts: &[Post]) -> Result<String> {
    let entries: Vec<_> = posts
        .iter()
        .map(|p| ListEntry {
            date: p.date.format("%Y-%m-%d").to_string(),
            slug: &p.slug,
            title: &p.title,
            draft: p.draft,
            source: &p.source,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::query::tests::post;

    #[test]
    fn test_table() {
        let mut draft = post("b", "2022-05-01");
        draft.draft = true;
        let posts = vec![draft, post("a", "2021-01-01")];
        assert_eq!(
            to_table(&posts),
            "Posts (2):\n  2022-05-01  b  Post b [draft]\n  2021-01-01  a  Post a\n"
        );
    }

    #[test]
    fn test_json() {
        let json = to_json(&[post("a", "2021-01-01")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["slug"], "a");
        assert_eq!(value[0]["date"], "2021-01-01");
        assert_eq!(value[0]["source"], "a.md");
    }
}
