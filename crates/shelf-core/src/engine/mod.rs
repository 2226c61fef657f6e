//! The event orchestrator owning the row collection.
//!
//! One logical owner serializes every collection mutation and every
//! preference write; provider I/O runs on the blocking worker pool and
//! hands plain data back for a single commit.

use crate::collection::RowCollection;
use crate::filter;
use crate::ordering;
use crate::prefs::{KEY_CHANNEL_ORDER, KEY_FAVORITE_APPS, KEY_HIDDEN_CHANNELS, PreferenceStore};
use crate::source::{self, AppSource, LaunchResolver, SourceGateway};
use crate::{Error, Result};
use shelf_types::{RawItem, Row, RowId, RowKind, RowNotice, ShelfEvent};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

pub(crate) const TITLE_FAVORITES: &str = "Favorites";
pub(crate) const TITLE_ALL_APPS: &str = "All apps";
pub(crate) const TITLE_WATCH_NEXT: &str = "Watch next";

/// Core shelf engine: reconciles provider data, persisted preferences and
/// runtime events into one ordered row collection.
pub struct ShelfCore {
    prefs: PreferenceStore,
    gateway: Arc<dyn SourceGateway>,
    apps: Arc<dyn AppSource>,
    resolver: Arc<dyn LaunchResolver>,
    rows: RowCollection,

    /// Cached copies of the persisted sets; updated only after the
    /// corresponding write succeeded.
    hidden: Vec<RowId>,
    order: Vec<RowId>,
    favorites: Vec<i64>,

    /// Events received before the startup population commits, applied in
    /// arrival order right after it.
    pending: VecDeque<ShelfEvent>,
    populated: bool,

    /// Channel to send notices to observers
    notice_tx: UnboundedSender<RowNotice>,
}

impl ShelfCore {
    /// Create a new `ShelfCore` with a channel for row notices.
    /// Returns the engine and a receiver for notices.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference store cannot be read.
    pub fn new(
        prefs_path: &Path,
        gateway: Arc<dyn SourceGateway>,
        apps: Arc<dyn AppSource>,
        resolver: Arc<dyn LaunchResolver>,
    ) -> Result<(Self, UnboundedReceiver<RowNotice>)> {
        let prefs = PreferenceStore::open(prefs_path)?;

        let hidden = prefs
            .get(KEY_HIDDEN_CHANNELS)
            .into_iter()
            .map(RowId)
            .collect();
        let order = prefs.get(KEY_CHANNEL_ORDER).into_iter().map(RowId).collect();
        let favorites = prefs.get(KEY_FAVORITE_APPS);

        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        Ok((
            Self {
                prefs,
                gateway,
                apps,
                resolver,
                rows: RowCollection::new(notice_tx.clone()),
                hidden,
                order,
                favorites,
                pending: VecDeque::new(),
                populated: false,
                notice_tx,
            },
            notice_rx,
        ))
    }

    /// Run the startup fetch and commit the initial population.
    ///
    /// The fetch happens on the blocking pool; the result lands in the
    /// collection as one commit, after which queued events drain in
    /// arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is cancelled or panics; the
    /// engine stays unpopulated and keeps queueing events.
    pub async fn populate(&mut self) -> Result<()> {
        if self.populated {
            warn!("populate called twice, ignoring");
            return Ok(());
        }

        let gateway = Arc::clone(&self.gateway);
        let apps = Arc::clone(&self.apps);
        let resolver = Arc::clone(&self.resolver);
        let hidden = self.hidden.clone();
        let order = self.order.clone();
        let favorites = self.favorites.clone();

        let rows = tokio::task::spawn_blocking(move || {
            build_rows(&*gateway, &*apps, &*resolver, &hidden, &order, &favorites)
        })
        .await
        .map_err(|e| Error::Population(e.to_string()))?;

        info!("Initial population with {} rows", rows.len());
        self.rows.populate(rows);
        self.populated = true;

        self.drain_pending().await;
        Ok(())
    }

    /// Process an event - notices are sent via channel.
    ///
    /// Events arriving before [`Self::populate`] commits are queued so
    /// they never mutate a collection that does not exist yet.
    pub async fn process(&mut self, event: ShelfEvent) {
        if !self.populated {
            debug!("Queueing event before population: {event:?}");
            self.pending.push_back(event);
            return;
        }
        self.dispatch(event).await;
    }

    async fn dispatch(&mut self, event: ShelfEvent) {
        match event {
            ShelfEvent::AppInstalled { package } => self.handle_app_installed(package),
            ShelfEvent::AppUninstalled { package } => self.handle_app_uninstalled(package),
            ShelfEvent::FavoriteAdded { package } => self.handle_favorite_added(package),
            ShelfEvent::FavoriteRemoved { package } => self.handle_favorite_removed(package),
            ShelfEvent::HideRow { row } => self.handle_hide(row),
            ShelfEvent::ShowRow { row } => self.handle_show(row).await,
            ShelfEvent::ReorderRow { moved, target } => self.handle_reorder(moved, target),
            ShelfEvent::SelectRow { row } => self.handle_select(row),
        }
    }

    async fn drain_pending(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            debug!("Applying queued event: {event:?}");
            self.dispatch(event).await;
        }
    }

    /// Add the installed app to the all-apps row content (not a new row).
    fn handle_app_installed(&mut self, package: i64) {
        if self.hidden.contains(&RowId::ALL_APPS) {
            return;
        }

        let Some(item) = self.apps.app_item(package) else {
            debug!("Installed package {package} not found in app source");
            return;
        };

        let Some(row) = self.rows.get_mut(RowId::ALL_APPS) else {
            debug!("All-apps row not present, skipping install of {package}");
            return;
        };
        if row.items.iter().any(|i| i.id == package) {
            return;
        }
        row.items.push(item.into_item());
        self.send_notice(RowNotice::RowUpdated { id: RowId::ALL_APPS });
    }

    /// Remove the app from the visible rows that carry it, and from the
    /// persisted favorite set regardless of row visibility.
    fn handle_app_uninstalled(&mut self, package: i64) {
        if !self.hidden.contains(&RowId::ALL_APPS) {
            self.remove_row_item(RowId::ALL_APPS, package);
        }
        if !self.hidden.contains(&RowId::FAVORITES) {
            self.remove_row_item(RowId::FAVORITES, package);
        }
        self.persist_favorite_removal(package);
    }

    fn handle_favorite_added(&mut self, package: i64) {
        if self.favorites.contains(&package) {
            debug!("Package {package} already a favorite");
            return;
        }

        let mut next = self.favorites.clone();
        next.push(package);
        if let Err(e) = self.prefs.set(KEY_FAVORITE_APPS, &next) {
            warn!("Failed to persist favorites: {e}");
            return;
        }
        self.favorites = next;

        if self.hidden.contains(&RowId::FAVORITES) {
            return;
        }
        let Some(item) = self.apps.app_item(package) else {
            debug!("Favorite package {package} not found in app source");
            return;
        };
        if let Some(row) = self.rows.get_mut(RowId::FAVORITES)
            && !row.items.iter().any(|i| i.id == package)
        {
            row.items.push(item.into_item());
            self.send_notice(RowNotice::RowUpdated { id: RowId::FAVORITES });
        }
    }

    fn handle_favorite_removed(&mut self, package: i64) {
        self.persist_favorite_removal(package);
        if !self.hidden.contains(&RowId::FAVORITES) {
            self.remove_row_item(RowId::FAVORITES, package);
        }
    }

    /// Add `row` to the hidden set, persist, and drop it from the
    /// collection. Hiding an already-hidden row changes nothing.
    fn handle_hide(&mut self, row: RowId) {
        if self.hidden.contains(&row) {
            debug!("Row {row} already hidden");
            return;
        }

        let mut next = self.hidden.clone();
        next.push(row);
        if let Err(e) = self.prefs.set(KEY_HIDDEN_CHANNELS, &raw_ids(&next)) {
            warn!("Failed to persist hidden rows: {e}");
            return;
        }
        self.hidden = next;
        self.rows.remove(row);
    }

    /// Un-hide `row`, re-derive its content and insert it at the ordered
    /// position. A derived row with no items is only inserted when
    /// pinned. Showing an already-visible row changes nothing.
    async fn handle_show(&mut self, row: RowId) {
        if !self.hidden.contains(&row) && self.rows.contains(row) {
            debug!("Row {row} already shown");
            return;
        }

        if self.hidden.contains(&row) {
            let mut next = self.hidden.clone();
            next.retain(|id| *id != row);
            if let Err(e) = self.prefs.set(KEY_HIDDEN_CHANNELS, &raw_ids(&next)) {
                warn!("Failed to persist hidden rows: {e}");
                return;
            }
            self.hidden = next;
        }

        let Some(derived) = self.derive_row(row).await else {
            debug!("Row {row} derived empty, not shown");
            return;
        };
        self.rows.insert(derived, &self.order);
    }

    /// Persist the full order resulting from the drag and relocate the
    /// moved row. Either id absent from the collection makes the whole
    /// drag a no-op.
    fn handle_reorder(&mut self, moved: RowId, target: RowId) {
        let (Some(from), Some(to)) = (self.rows.index_of(moved), self.rows.index_of(target)) else {
            debug!("Reorder references absent row ({moved} -> {target})");
            return;
        };

        let mut ids = self.rows.ids();
        let id = ids.remove(from);
        ids.insert(to, id);

        if let Err(e) = self.prefs.set(KEY_CHANNEL_ORDER, &raw_ids(&ids)) {
            warn!("Failed to persist row order: {e}");
            return;
        }
        self.order = ids;
        self.rows.move_row(from, to);
    }

    /// Pure read: expose the row's current index for scroll-to-position.
    fn handle_select(&mut self, row: RowId) {
        if let Some(index) = self.rows.index_of(row) {
            self.send_notice(RowNotice::RowSelected { id: row, index });
        }
    }

    /// Re-derive a row's content off the orchestrator task. Reserved rows
    /// use their fixed fetch paths; provider rows re-query the gateway.
    /// Returns `None` for an empty non-pinned derivation.
    async fn derive_row(&self, row: RowId) -> Option<Row> {
        let gateway = Arc::clone(&self.gateway);
        let apps = Arc::clone(&self.apps);
        let resolver = Arc::clone(&self.resolver);
        let favorites = self.favorites.clone();

        let derived = tokio::task::spawn_blocking(move || match row.kind() {
            RowKind::Favorites => Some(favorites_row(&*apps, &favorites)),
            RowKind::AllApps => Some(all_apps_row(&*apps)),
            RowKind::WatchNext => {
                let items = filter::filter_items(&*resolver, gateway.list_watch_next());
                (!items.is_empty()).then(|| Row {
                    id: RowId::WATCH_NEXT,
                    title: TITLE_WATCH_NEXT.to_string(),
                    items,
                })
            }
            RowKind::Provider(_) => provider_row(&*gateway, &*resolver, row),
        });

        match derived.await {
            Ok(row) => row,
            Err(e) => {
                warn!("Row derivation failed: {e}");
                None
            }
        }
    }

    /// Drop `package` from the persisted favorite set; the cached copy
    /// only follows a successful write.
    fn persist_favorite_removal(&mut self, package: i64) {
        if !self.favorites.contains(&package) {
            return;
        }
        let mut next = self.favorites.clone();
        next.retain(|p| *p != package);
        match self.prefs.set(KEY_FAVORITE_APPS, &next) {
            Ok(()) => self.favorites = next,
            Err(e) => warn!("Failed to persist favorites: {e}"),
        }
    }

    fn remove_row_item(&mut self, row_id: RowId, item_id: i64) {
        if let Some(row) = self.rows.get_mut(row_id) {
            let before = row.items.len();
            row.items.retain(|item| item.id != item_id);
            if row.items.len() != before {
                self.send_notice(RowNotice::RowUpdated { id: row_id });
            }
        }
    }

    fn send_notice(&self, notice: RowNotice) {
        if let Err(e) = self.notice_tx.send(notice) {
            error!("Failed to send row notice: {e}");
        }
    }

    /// The last committed row snapshot.
    #[must_use]
    pub fn rows(&self) -> &RowCollection {
        &self.rows
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[must_use]
    pub fn hidden(&self) -> &[RowId] {
        &self.hidden
    }

    #[must_use]
    pub fn order(&self) -> &[RowId] {
        &self.order
    }

    #[must_use]
    pub fn favorites(&self) -> &[i64] {
        &self.favorites
    }
}

fn raw_ids(ids: &[RowId]) -> Vec<i64> {
    ids.iter().map(|id| id.0).collect()
}

/// Build the full ordered startup population. Runs on the blocking pool.
fn build_rows(
    gateway: &dyn SourceGateway,
    apps: &dyn AppSource,
    resolver: &dyn LaunchResolver,
    hidden: &[RowId],
    order: &[RowId],
    favorites: &[i64],
) -> Vec<Row> {
    let mut rows = Vec::new();

    if !hidden.contains(&RowId::FAVORITES) {
        rows.push(favorites_row(apps, favorites));
    }

    if !hidden.contains(&RowId::ALL_APPS) {
        rows.push(all_apps_row(apps));
    }

    if !hidden.contains(&RowId::WATCH_NEXT) {
        let items = filter::filter_items(resolver, gateway.list_watch_next());
        if items.is_empty() {
            debug!("Watch-next row empty, dropping");
        } else {
            rows.push(Row {
                id: RowId::WATCH_NEXT,
                title: TITLE_WATCH_NEXT.to_string(),
                items,
            });
        }
    }

    for candidate in gateway.list_candidate_rows() {
        if !source::is_well_formed(&candidate) {
            debug!("Skipping malformed candidate row {}", candidate.id);
            continue;
        }
        if hidden.contains(&candidate.id) {
            continue;
        }
        if rows.iter().any(|row| row.id == candidate.id) {
            warn!("Duplicate candidate row {}, keeping first", candidate.id);
            continue;
        }
        let items = filter::filter_items(resolver, gateway.list_items(candidate.id));
        if items.is_empty() {
            continue;
        }
        rows.push(Row {
            id: candidate.id,
            title: candidate.title,
            items,
        });
    }

    ordering::merge_ordered(rows, order, |row| row.id)
}

/// The favorites row: the persisted favorite set joined against the
/// installed apps. Pinned, so an empty result still yields the row.
fn favorites_row(apps: &dyn AppSource, favorites: &[i64]) -> Row {
    let items = favorites
        .iter()
        .filter_map(|package| apps.app_item(*package))
        .map(RawItem::into_item)
        .collect();
    Row {
        id: RowId::FAVORITES,
        title: TITLE_FAVORITES.to_string(),
        items,
    }
}

/// The all-apps row: every installed app, uncapped. Pinned.
fn all_apps_row(apps: &dyn AppSource) -> Row {
    let items = apps
        .installed_apps()
        .into_iter()
        .map(RawItem::into_item)
        .collect();
    Row {
        id: RowId::ALL_APPS,
        title: TITLE_ALL_APPS.to_string(),
        items,
    }
}

/// A provider channel row, re-derived from the candidate listing and the
/// item filter. Empty or unknown channels yield `None`.
fn provider_row(
    gateway: &dyn SourceGateway,
    resolver: &dyn LaunchResolver,
    row: RowId,
) -> Option<Row> {
    let candidate = gateway
        .list_candidate_rows()
        .into_iter()
        .filter(source::is_well_formed)
        .find(|candidate| candidate.id == row)?;

    let items = filter::filter_items(resolver, gateway.list_items(row));
    if items.is_empty() {
        return None;
    }
    Some(Row {
        id: row,
        title: candidate.title,
        items,
    })
}
