//! Launchability filtering for raw provider items.

use crate::source::{LaunchResolver, STUB_HANDLER_PACKAGE};
use shelf_types::{Item, RawItem};
use tracing::debug;

/// Maximum number of items a filtered row may carry.
pub const MAX_ROW_ITEMS: usize = 5;

/// Keep the first [`MAX_ROW_ITEMS`] items whose launch target resolves to
/// a real handler, preserving relative order. Unresolvable and
/// stub-handled items are dropped, never stored.
#[must_use]
pub fn filter_items(resolver: &dyn LaunchResolver, raw: Vec<RawItem>) -> Vec<Item> {
    let mut items = Vec::new();

    for candidate in raw {
        if items.len() == MAX_ROW_ITEMS {
            break;
        }
        match resolver.resolve(&candidate.launch) {
            Some(handler) if handler.package != STUB_HANDLER_PACKAGE => {
                items.push(candidate.into_item());
            }
            Some(_) => {
                // This can't be opened with any real app
                debug!("Dropping stub-handled item {}", candidate.id);
            }
            None => {
                debug!("Dropping unresolvable item {}", candidate.id);
            }
        }
    }

    items
}
