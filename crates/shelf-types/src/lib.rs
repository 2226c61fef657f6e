//! Shared types for shelf launcher components.
//!
//! This crate provides the core types used across shelf-core and
//! shelf-daemon. All types are serializable so rows, events and notices
//! can cross process or persistence boundaries unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable 64-bit identifier of a home-screen row.
///
/// Three reserved identifiers exist for the fixed rows; every other value
/// is a provider-assigned channel id, stable only for the lifetime of the
/// providing source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RowId(pub i64);

impl RowId {
    /// The favorites row. Pinned: kept even when empty.
    pub const FAVORITES: RowId = RowId(-1);

    /// The all-installed-apps row. Pinned: kept even when empty.
    pub const ALL_APPS: RowId = RowId(-2);

    /// The continue-watching row.
    pub const WATCH_NEXT: RowId = RowId(-3);

    /// Classify this identifier.
    ///
    /// Row handling dispatches on the returned variant; the reserved
    /// constants never appear in comparisons outside this method.
    #[must_use]
    pub fn kind(self) -> RowKind {
        match self {
            Self::FAVORITES => RowKind::Favorites,
            Self::ALL_APPS => RowKind::AllApps,
            Self::WATCH_NEXT => RowKind::WatchNext,
            Self(raw) => RowKind::Provider(raw),
        }
    }

    /// Whether this row is retained even with zero items.
    #[must_use]
    pub fn is_pinned(self) -> bool {
        matches!(self.kind(), RowKind::Favorites | RowKind::AllApps)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            RowKind::Favorites => write!(f, "favorites"),
            RowKind::AllApps => write!(f, "all-apps"),
            RowKind::WatchNext => write!(f, "watch-next"),
            RowKind::Provider(raw) => write!(f, "channel:{raw}"),
        }
    }
}

/// Tagged classification of a row identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Favorites,
    AllApps,
    WatchNext,
    /// A dynamically-discovered channel supplied by an external source.
    Provider(i64),
}

/// Origin of a candidate row as declared by its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Channel published by an installed application.
    #[default]
    Preview,
    /// Broadcast-style channel from a tuner source.
    Broadcast,
}

/// Opaque action descriptor used to launch an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTarget {
    pub uri: String,
}

impl LaunchTarget {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// A launch handler resolved for a [`LaunchTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHandler {
    /// Package/component name of the handling application.
    pub package: String,
}

/// A raw item straight from a provider, before launchability filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub id: i64,
    pub label: String,
    /// Opaque icon handle (URI or resource reference); loading is the
    /// renderer's concern.
    pub icon: Option<String>,
    pub launch: LaunchTarget,
}

impl RawItem {
    /// Promote to a validated [`Item`] once the launch target resolved.
    #[must_use]
    pub fn into_item(self) -> Item {
        Item {
            id: self.id,
            label: self.label,
            icon: self.icon,
            launch: self.launch,
        }
    }
}

/// One launchable entry within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub label: String,
    pub icon: Option<String>,
    pub launch: LaunchTarget,
}

/// One horizontally-scrollable section of the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub title: String,
    pub items: Vec<Item>,
}

/// A raw row listing record from an external source, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    pub id: RowId,
    pub title: String,
    /// Primary launch reference of the providing source. A candidate with
    /// an empty title or an empty link never reaches filtering.
    pub app_link: String,
    #[serde(default)]
    pub kind: SourceKind,
}

/// External events consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShelfEvent {
    /// An application was installed.
    AppInstalled { package: i64 },

    /// An application was fully removed.
    AppUninstalled { package: i64 },

    /// An application was added to the favorite set.
    FavoriteAdded { package: i64 },

    /// An application was removed from the favorite set.
    FavoriteRemoved { package: i64 },

    /// The user opted to hide a row.
    HideRow { row: RowId },

    /// The user opted to show a previously hidden row.
    ShowRow { row: RowId },

    /// A row was dragged onto another row's position.
    ReorderRow { moved: RowId, target: RowId },

    /// A row gained focus; used for scroll synchronization.
    SelectRow { row: RowId },
}

/// Observer notifications produced by the row collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowNotice {
    RowAdded { id: RowId, index: usize },

    RowRemoved { id: RowId, index: usize },

    RowMoved { id: RowId, from: usize, to: usize },

    RowSelected { id: RowId, index: usize },

    /// A row's item content changed in place.
    RowUpdated { id: RowId },
}
