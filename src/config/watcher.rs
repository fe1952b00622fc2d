//! Hot reload of the site configuration file.
//!
//! Editors typically emit several modify events per save. Each event
//! reloads the file, but only a configuration that differs from the one
//! last published is forwarded to the server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::SiteConfig;

/// Top-level sections of `SiteConfig` that differ between `old` and `new`.
pub fn changed_sections(old: &SiteConfig, new: &SiteConfig) -> Vec<&'static str> {
    let checks = [
        ("service_name", old.service_name != new.service_name),
        ("listener", old.listener != new.listener),
        ("timeouts", old.timeouts != new.timeouts),
        ("upstreams", old.upstreams != new.upstreams),
        ("cache", old.cache != new.cache),
        ("weather", old.weather != new.weather),
        ("cors", old.cors != new.cors),
        ("header", old.header != new.header),
        ("observability", old.observability != new.observability),
    ];
    checks
        .into_iter()
        .filter_map(|(name, changed)| changed.then_some(name))
        .collect()
}

/// Tracks the last published configuration and filters repeats.
#[derive(Debug)]
struct Reloader {
    published: SiteConfig,
    tx: mpsc::UnboundedSender<SiteConfig>,
}

impl Reloader {
    /// Publish `next` if it changes anything. Returns the changed sections.
    fn offer(&mut self, next: SiteConfig) -> Vec<&'static str> {
        let sections = changed_sections(&self.published, &next);
        if sections.is_empty() {
            tracing::debug!("Config file unchanged, skipping reload");
            return sections;
        }

        // Listener settings are bound at startup.
        if sections.contains(&"listener") {
            tracing::warn!("Listener changes take effect after a restart");
        }
        tracing::info!(sections = ?sections, "Config reloaded");
        self.published = next.clone();
        let _ = self.tx.send(next);
        sections
    }
}

/// Watches the configuration file and streams validated updates.
pub struct ConfigWatcher {
    path: PathBuf,
    reloader: Reloader,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, seeded with the configuration in effect.
    ///
    /// Returns the watcher and a receiver for changed configurations.
    pub fn new(path: &Path, current: SiteConfig) -> (Self, mpsc::UnboundedReceiver<SiteConfig>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                reloader: Reloader {
                    published: current,
                    tx,
                },
            },
            rx,
        )
    }

    /// Start watching the file; keep the returned watcher alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let mut reloader = self.reloader;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(next) => {
                            reloader.offer(next);
                        }
                        Err(e) => tracing::error!(
                            path = ?path,
                            error = %e,
                            "Failed to reload config, keeping current configuration"
                        ),
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
