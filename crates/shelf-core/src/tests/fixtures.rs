//! Test fixtures and helpers

use crate::source::{AppSource, LaunchResolver, STUB_HANDLER_PACKAGE, SourceGateway};
use shelf_types::{CandidateRow, LaunchTarget, RawItem, ResolvedHandler, RowId, SourceKind};
use std::collections::HashMap;
use std::sync::Mutex;

pub const PLAYER_PACKAGE: &str = "com.example.player";

/// A provider item whose target the [`PrefixResolver`] can open.
pub fn make_program(id: i64) -> RawItem {
    RawItem {
        id,
        label: format!("program {id}"),
        icon: None,
        launch: LaunchTarget::new(format!("ok://play/{id}")),
    }
}

/// A provider item that resolves only to the stub handler.
pub fn make_stub_program(id: i64) -> RawItem {
    RawItem {
        id,
        label: format!("program {id}"),
        icon: None,
        launch: LaunchTarget::new(format!("stub://play/{id}")),
    }
}

/// An installed application entry.
pub fn make_app(id: i64) -> RawItem {
    RawItem {
        id,
        label: format!("app {id}"),
        icon: Some(format!("icon://{id}")),
        launch: LaunchTarget::new(format!("app://{id}")),
    }
}

pub fn make_candidate(id: i64, title: &str) -> CandidateRow {
    CandidateRow {
        id: RowId(id),
        title: title.to_string(),
        app_link: format!("channel://{id}"),
        kind: SourceKind::Preview,
    }
}

/// In-memory gateway whose content tests can mutate mid-scenario.
#[derive(Default)]
pub struct StaticGateway {
    candidates: Mutex<Vec<CandidateRow>>,
    items: Mutex<HashMap<i64, Vec<RawItem>>>,
    watch_next: Mutex<Vec<RawItem>>,
}

impl StaticGateway {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_channel(self, id: i64, title: &str, items: Vec<RawItem>) -> Self {
        self.candidates.lock().unwrap().push(make_candidate(id, title));
        self.items.lock().unwrap().insert(id, items);
        self
    }

    #[must_use]
    pub fn with_candidate(self, candidate: CandidateRow, items: Vec<RawItem>) -> Self {
        self.items.lock().unwrap().insert(candidate.id.0, items);
        self.candidates.lock().unwrap().push(candidate);
        self
    }

    #[must_use]
    pub fn with_watch_next(self, items: Vec<RawItem>) -> Self {
        *self.watch_next.lock().unwrap() = items;
        self
    }

    pub fn set_items(&self, id: i64, items: Vec<RawItem>) {
        self.items.lock().unwrap().insert(id, items);
    }

    pub fn set_watch_next(&self, items: Vec<RawItem>) {
        *self.watch_next.lock().unwrap() = items;
    }
}

impl SourceGateway for StaticGateway {
    fn list_candidate_rows(&self) -> Vec<CandidateRow> {
        self.candidates.lock().unwrap().clone()
    }

    fn list_items(&self, row: RowId) -> Vec<RawItem> {
        self.items
            .lock()
            .unwrap()
            .get(&row.0)
            .cloned()
            .unwrap_or_default()
    }

    fn list_watch_next(&self) -> Vec<RawItem> {
        self.watch_next.lock().unwrap().clone()
    }
}

/// In-memory installed application set.
#[derive(Default)]
pub struct StaticApps {
    apps: Mutex<Vec<RawItem>>,
}

impl StaticApps {
    pub fn new(apps: Vec<RawItem>) -> Self {
        Self {
            apps: Mutex::new(apps),
        }
    }

    pub fn add(&self, app: RawItem) {
        self.apps.lock().unwrap().push(app);
    }
}

impl AppSource for StaticApps {
    fn installed_apps(&self) -> Vec<RawItem> {
        self.apps.lock().unwrap().clone()
    }

    fn app_item(&self, package: i64) -> Option<RawItem> {
        self.apps
            .lock()
            .unwrap()
            .iter()
            .find(|app| app.id == package)
            .cloned()
    }
}

/// Resolves `ok://` and `app://` targets to a real player and `stub://`
/// targets to the stub handler.
pub struct PrefixResolver;

impl LaunchResolver for PrefixResolver {
    fn resolve(&self, target: &LaunchTarget) -> Option<ResolvedHandler> {
        if target.uri.starts_with("ok://") || target.uri.starts_with("app://") {
            Some(ResolvedHandler {
                package: PLAYER_PACKAGE.to_string(),
            })
        } else if target.uri.starts_with("stub://") {
            Some(ResolvedHandler {
                package: STUB_HANDLER_PACKAGE.to_string(),
            })
        } else {
            None
        }
    }
}
