//! Installed-app watcher turning filesystem changes into package events.
//!
//! App documents are named `<package-id>.json`; a created document is an
//! install, a removed one an uninstall. Anything else under the apps
//! directory is ignored, mirroring the package data-scheme check of the
//! OS-level feed.

use notify::Watcher;
use shelf_types::ShelfEvent;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, error, info};

pub struct PackageWatcher {
    _watcher_thread: std::thread::JoinHandle<()>,
    _bridge_thread: std::thread::JoinHandle<()>,
}

/// Watch `apps_dir` and forward install/uninstall events into the
/// orchestrator's event channel.
pub fn spawn_package_watcher(
    apps_dir: PathBuf,
    tx: tokio_mpsc::UnboundedSender<ShelfEvent>,
) -> PackageWatcher {
    let (sync_tx, sync_rx) = mpsc::channel::<ShelfEvent>();

    let watcher_thread = std::thread::spawn(move || {
        if let Err(e) = watch_apps_dir(&apps_dir, &sync_tx) {
            error!("Package watcher error: {e}");
        }
    });

    let bridge_thread = std::thread::spawn(move || {
        while let Ok(event) = sync_rx.recv() {
            if tx.send(event).is_err() {
                debug!("Package event receiver dropped, stopping watcher");
                break;
            }
        }
    });

    PackageWatcher {
        _watcher_thread: watcher_thread,
        _bridge_thread: bridge_thread,
    }
}

fn watch_apps_dir(apps_dir: &Path, tx: &mpsc::Sender<ShelfEvent>) -> crate::error::Result<()> {
    let (watcher_tx, watcher_rx) = mpsc::channel();

    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<notify::Event>| match result {
            Ok(event) => {
                let installed = match event.kind {
                    notify::EventKind::Create(_) => true,
                    notify::EventKind::Remove(_) => false,
                    _ => return,
                };
                for path in &event.paths {
                    let Some(package) = package_id(path) else {
                        continue;
                    };
                    let event = if installed {
                        ShelfEvent::AppInstalled { package }
                    } else {
                        ShelfEvent::AppUninstalled { package }
                    };
                    let _ = watcher_tx.send(event);
                }
            }
            Err(e) => {
                error!("Watcher error: {}", e);
            }
        })?;

    watcher.watch(apps_dir, notify::RecursiveMode::NonRecursive)?;
    info!("Watching apps directory: {:?}", apps_dir);

    while let Ok(event) = watcher_rx.recv() {
        let _ = tx.send(event);
    }

    Ok(())
}

/// Package identifier from an app document path. Paths not shaped like
/// `<id>.json` carry no package and are ignored.
fn package_id(path: &Path) -> Option<i64> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_id_from_document_name() {
        assert_eq!(package_id(Path::new("/apps/42.json")), Some(42));
    }

    #[test]
    fn test_non_json_paths_are_ignored() {
        assert_eq!(package_id(Path::new("/apps/42.tmp")), None);
        assert_eq!(package_id(Path::new("/apps/42")), None);
    }

    #[test]
    fn test_non_numeric_stems_are_ignored() {
        assert_eq!(package_id(Path::new("/apps/readme.json")), None);
    }
}
