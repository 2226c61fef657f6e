//! Shelf daemon library: file-backed content providers and the serial
//! event loop hosting the row aggregation engine.
//!
//! The daemon gives the engine concrete boundaries: channel and app
//! documents on disk, a launch handler table, and a filesystem watcher
//! that turns app document changes into install/uninstall events.

pub mod content;
pub mod error;
pub mod package_watcher;
pub mod runtime;

pub use content::{FsAppSource, FsGateway, HandlerTable};
pub use error::{DaemonError, Result};
pub use package_watcher::spawn_package_watcher;
pub use runtime::run;
