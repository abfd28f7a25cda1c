//! Preview server that rebuilds the site on change

use anyhow::{Context, Result};
use axum::Router;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebouncedEvent};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::Site;

/// Build the router serving the public dir, with `404.html` as fallback
pub fn router(public_dir: &Path) -> Router {
    let not_found = ServeFile::new(public_dir.join("404.html"));
    let files = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(not_found);

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Serve the public dir, optionally rebuilding on source changes
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool) -> Result<()> {
    let app = router(&site.public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port)
        .parse()
        .with_context(|| format!("Invalid address {}:{}", ip, port))?;

    if watch {
        let base_dir = site.base_dir.clone();
        let drafts = site.config.render_drafts;
        let targets = watch_targets(site);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_rebuild(base_dir, drafts, targets) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("Serving at http://{}:{}", ip, port);
    if watch {
        println!("Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Content dir, static dir and config file, where they exist
fn watch_targets(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    [
        (site.content_dir.clone(), RecursiveMode::Recursive),
        (site.static_dir.clone(), RecursiveMode::Recursive),
        (site.config_path(), RecursiveMode::NonRecursive),
    ]
    .into_iter()
    .filter(|(path, _)| path.exists())
    .collect()
}

fn watch_and_rebuild(
    base_dir: PathBuf,
    drafts: bool,
    targets: Vec<(PathBuf, RecursiveMode)>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for (path, mode) in &targets {
        debouncer.watcher().watch(path, *mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    for result in rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let relevant: Vec<_> = events.iter().filter(|e| is_relevant(e)).collect();
        if relevant.is_empty() {
            continue;
        }
        for event in &relevant {
            tracing::info!("Changed: {}", event.path.display());
        }

        // Reopen the site so config edits take effect
        let rebuilt = Site::new(&base_dir).and_then(|mut site| {
            site.config.render_drafts |= drafts;
            site.build()
        });
        match rebuilt {
            Ok(report) => tracing::info!(
                "Rebuilt {} posts ({} files written)",
                report.posts,
                report.written
            ),
            Err(e) => tracing::error!("Rebuild failed: {:#}", e),
        }
    }

    Ok(())
}

/// Skip editor droppings and VCS internals
fn is_relevant(event: &DebouncedEvent) -> bool {
    let path = event.path.to_string_lossy();
    !path.contains("/.git/")
        && !path.ends_with(".DS_Store")
        && !path.ends_with('~')
        && !path.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_debouncer_mini::DebouncedEventKind;

    fn event(path: &str) -> DebouncedEvent {
        DebouncedEvent {
            path: PathBuf::from(path),
            kind: DebouncedEventKind::Any,
        }
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(&event("/site/content/posts/a.md")));
        assert!(!is_relevant(&event("/site/content/posts/.a.md.swp")));
        assert!(!is_relevant(&event("/site/content/posts/a.md~")));
        assert!(!is_relevant(&event("/site/.git/index")));
    }

    #[test]
    fn test_watch_targets_skip_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        let site = Site::new(dir.path()).unwrap();

        let targets = watch_targets(&site);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, site.content_dir);
    }
}
