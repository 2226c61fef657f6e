//! File-backed content providers.
//!
//! Channels live as one JSON document per file under the channels
//! directory, installed applications as one document per file under the
//! apps directory (named `<package-id>.json`), and launch resolution
//! comes from a prefix-matching handler table. A malformed document is
//! logged and skipped; it never aborts listing the remaining documents.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use shelf_core::config::Directories;
use shelf_core::source::{AppSource, LaunchResolver, SourceGateway};
use shelf_types::{CandidateRow, LaunchTarget, RawItem, ResolvedHandler, RowId, SourceKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One channel document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelDoc {
    id: i64,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    app_link_uri: String,
    #[serde(default)]
    kind: SourceKind,
    #[serde(default)]
    programs: Vec<ProgramDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramDoc {
    id: i64,
    title: String,
    #[serde(default)]
    poster_uri: Option<String>,
    intent_uri: String,
}

impl ProgramDoc {
    fn into_raw_item(self) -> RawItem {
        RawItem {
            id: self.id,
            label: self.title,
            icon: self.poster_uri,
            launch: LaunchTarget::new(self.intent_uri),
        }
    }
}

/// One installed application document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppDoc {
    id: i64,
    name: String,
    package: String,
    #[serde(default)]
    icon_uri: Option<String>,
    #[serde(default)]
    launch_uri: Option<String>,
}

impl AppDoc {
    fn into_raw_item(self) -> RawItem {
        let launch = self
            .launch_uri
            .unwrap_or_else(|| format!("app://{}", self.package));
        RawItem {
            id: self.id,
            label: self.name,
            icon: self.icon_uri,
            launch: LaunchTarget::new(launch),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WatchNextDoc {
    #[serde(default)]
    programs: Vec<ProgramDoc>,
}

/// Parse every `.json` document in `dir`, skipping unreadable or
/// malformed entries without aborting the listing.
fn read_json_docs<T: DeserializeOwned>(dir: &Path) -> Vec<T> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read {dir:?}: {e}");
            return Vec::new();
        }
    };

    let mut docs = Vec::new();
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    paths.sort();

    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read document {path:?}: {e}");
                continue;
            }
        };
        match serde_json::from_str(&content) {
            Ok(doc) => docs.push(doc),
            Err(e) => warn!("Ignoring malformed document {path:?}: {e}"),
        }
    }

    docs
}

/// Channel provider over a directory of channel documents.
pub struct FsGateway {
    channels_dir: PathBuf,
    watch_next_file: PathBuf,
}

impl FsGateway {
    #[must_use]
    pub fn new(dirs: &Directories) -> Self {
        Self {
            channels_dir: dirs.channels_dir.clone(),
            watch_next_file: dirs.watch_next_file.clone(),
        }
    }
}

impl SourceGateway for FsGateway {
    fn list_candidate_rows(&self) -> Vec<CandidateRow> {
        read_json_docs::<ChannelDoc>(&self.channels_dir)
            .into_iter()
            .filter_map(|doc| {
                if doc.display_name.is_empty() || doc.app_link_uri.is_empty() {
                    warn!("Ignoring channel {} with empty name or link", doc.id);
                    return None;
                }
                Some(CandidateRow {
                    id: RowId(doc.id),
                    title: doc.display_name,
                    app_link: doc.app_link_uri,
                    kind: doc.kind,
                })
            })
            .collect()
    }

    fn list_items(&self, row: RowId) -> Vec<RawItem> {
        read_json_docs::<ChannelDoc>(&self.channels_dir)
            .into_iter()
            .find(|doc| RowId(doc.id) == row)
            .map(|doc| {
                doc.programs
                    .into_iter()
                    .map(ProgramDoc::into_raw_item)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list_watch_next(&self) -> Vec<RawItem> {
        let content = match std::fs::read_to_string(&self.watch_next_file) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<WatchNextDoc>(&content) {
            Ok(doc) => doc
                .programs
                .into_iter()
                .map(ProgramDoc::into_raw_item)
                .collect(),
            Err(e) => {
                warn!("Ignoring malformed watch-next listing: {e}");
                Vec::new()
            }
        }
    }
}

/// Installed application source over a directory of app documents.
pub struct FsAppSource {
    apps_dir: PathBuf,
}

impl FsAppSource {
    #[must_use]
    pub fn new(dirs: &Directories) -> Self {
        Self {
            apps_dir: dirs.apps_dir.clone(),
        }
    }
}

impl AppSource for FsAppSource {
    fn installed_apps(&self) -> Vec<RawItem> {
        let mut apps: Vec<RawItem> = read_json_docs::<AppDoc>(&self.apps_dir)
            .into_iter()
            .map(AppDoc::into_raw_item)
            .collect();
        apps.sort_by_key(|app| app.id);
        apps
    }

    fn app_item(&self, package: i64) -> Option<RawItem> {
        let path = self.apps_dir.join(format!("{package}.json"));
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<AppDoc>(&content) {
            Ok(doc) => Some(doc.into_raw_item()),
            Err(e) => {
                warn!("Ignoring malformed app document {path:?}: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct HandlerRule {
    prefix: String,
    package: String,
}

/// Launch resolution over a list of uri-prefix rules. Application
/// targets (`app://<package>`) resolve to themselves without a rule.
pub struct HandlerTable {
    rules: Vec<HandlerRule>,
}

impl HandlerTable {
    /// Load the table; a missing or malformed file yields an empty one.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                debug!("No handler table at {path:?}");
                return Self { rules: Vec::new() };
            }
        };
        match serde_json::from_str(&content) {
            Ok(rules) => Self { rules },
            Err(e) => {
                warn!("Ignoring malformed handler table {path:?}: {e}");
                Self { rules: Vec::new() }
            }
        }
    }
}

impl LaunchResolver for HandlerTable {
    fn resolve(&self, target: &LaunchTarget) -> Option<ResolvedHandler> {
        let mut best: Option<&HandlerRule> = None;
        for rule in &self.rules {
            if target.uri.starts_with(&rule.prefix)
                && best.is_none_or(|b| rule.prefix.len() > b.prefix.len())
            {
                best = Some(rule);
            }
        }
        if let Some(rule) = best {
            return Some(ResolvedHandler {
                package: rule.package.clone(),
            });
        }

        target
            .uri
            .strip_prefix("app://")
            .map(|package| ResolvedHandler {
                package: package.to_string(),
            })
    }
}
