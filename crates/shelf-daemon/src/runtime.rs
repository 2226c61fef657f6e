//! Daemon runtime: engine ownership and the serial event loop.
//!
//! The loop task is the single logical owner of the engine; every row
//! collection mutation and preference write happens here, in event
//! arrival order.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::content::{FsAppSource, FsGateway, HandlerTable};
use crate::error::Result;
use crate::package_watcher::spawn_package_watcher;
use shelf_core::ShelfCore;
use shelf_core::config::Directories;

/// Build the engine over the file-backed providers and run the event
/// loop until ctrl-c.
///
/// # Errors
///
/// Returns an error if directories cannot be created, the preference
/// store cannot be read, or the startup population worker dies.
pub async fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let dirs = data_dir.map_or_else(Directories::new, Directories::with_base);
    dirs.ensure_exists()?;

    let gateway = Arc::new(FsGateway::new(&dirs));
    let apps = Arc::new(FsAppSource::new(&dirs));
    let resolver = Arc::new(HandlerTable::load(&dirs.handlers_file));

    let (mut core, mut notices) = ShelfCore::new(&dirs.prefs_file, gateway, apps, resolver)?;

    let (event_tx, mut events) = mpsc::unbounded_channel();
    let _watcher = spawn_package_watcher(dirs.apps_dir.clone(), event_tx);

    // Events arriving during the fetch wait in the channel and apply
    // after the single populate commit, in arrival order.
    core.populate().await?;
    info!("Shelf ready with {} rows", core.rows().len());

    loop {
        tokio::select! {
            Some(event) = events.recv() => core.process(event).await,
            Some(notice) = notices.recv() => {
                // No UI client attached; notices surface in the log.
                debug!("Row notice: {notice:?}");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
