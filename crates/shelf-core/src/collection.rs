//! The mutable, identifier-indexed ordered sequence of rows the UI
//! observes.
//!
//! All mutating calls are serialized onto the orchestrator; readers see
//! the last committed snapshot. Mutations emit [`RowNotice`] values over
//! the engine's notice channel.

use crate::ordering;
use shelf_types::{Row, RowId, RowNotice};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, warn};

pub struct RowCollection {
    rows: Vec<Row>,
    populated: bool,
    notice_tx: UnboundedSender<RowNotice>,
}

impl RowCollection {
    pub(crate) fn new(notice_tx: UnboundedSender<RowNotice>) -> Self {
        Self {
            rows: Vec::new(),
            populated: false,
            notice_tx,
        }
    }

    /// Replace the whole sequence with the startup population. Valid only
    /// once; a repeat call is ignored. Duplicated identifiers keep their
    /// first occurrence so the collection never holds two rows per id.
    pub(crate) fn populate(&mut self, ordered: Vec<Row>) {
        if self.populated {
            warn!("populate called twice, ignoring");
            return;
        }

        let mut rows: Vec<Row> = Vec::with_capacity(ordered.len());
        for row in ordered {
            if rows.iter().any(|r| r.id == row.id) {
                warn!("Duplicate row {} in population, keeping first", row.id);
                continue;
            }
            rows.push(row);
        }

        self.rows = rows;
        self.populated = true;
    }

    /// Insert `row` at the position a re-run of the order merge over the
    /// current ids plus the new id would give it.
    pub(crate) fn insert(&mut self, row: Row, preferred: &[RowId]) {
        if self.contains(row.id) {
            debug!("Row {} already present, not inserting", row.id);
            return;
        }

        let mut ids = self.ids();
        ids.push(row.id);
        let merged = ordering::merge_ordered(ids, preferred, |id| *id);
        let index = merged
            .iter()
            .position(|id| *id == row.id)
            .unwrap_or(self.rows.len());

        let id = row.id;
        self.rows.insert(index, row);
        self.notify(RowNotice::RowAdded { id, index });
    }

    /// Delete the row with `id` if present; absent is a no-op, not an
    /// error.
    pub(crate) fn remove(&mut self, id: RowId) {
        let Some(index) = self.index_of(id) else {
            debug!("Row {id} not present, nothing to remove");
            return;
        };
        self.rows.remove(index);
        self.notify(RowNotice::RowRemoved { id, index });
    }

    /// Relocate the row at `from` to `to`. Either index out of range is a
    /// no-op.
    pub(crate) fn move_row(&mut self, from: usize, to: usize) {
        if from >= self.rows.len() || to >= self.rows.len() || from == to {
            debug!("Ignoring move {from} -> {to} over {} rows", self.rows.len());
            return;
        }
        let row = self.rows.remove(from);
        let id = row.id;
        self.rows.insert(to, row);
        self.notify(RowNotice::RowMoved { id, from, to });
    }

    #[must_use]
    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: RowId) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Row identifiers in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn notify(&self, notice: RowNotice) {
        if let Err(e) = self.notice_tx.send(notice) {
            error!("Failed to send row notice: {e}");
        }
    }
}
