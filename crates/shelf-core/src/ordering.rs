//! Merging live rows with the user's persisted display order.
//!
//! Pure functions over immutable inputs so the policy is testable in
//! isolation from the row collection.

use shelf_types::RowId;

/// Merge `items` with the user's `preferred` order.
///
/// Items whose id appears in `preferred` come first, sorted by that id's
/// index; the rest follow in their original relative order (stable
/// partition). With no persisted order at all, the all-apps row trails
/// every other item; once the user orders it explicitly, its index
/// governs like any other id.
#[must_use]
pub fn merge_ordered<T, F>(items: Vec<T>, preferred: &[RowId], id_of: F) -> Vec<T>
where
    F: Fn(&T) -> RowId,
{
    if preferred.is_empty() {
        let (all_apps, mut rest): (Vec<T>, Vec<T>) = items
            .into_iter()
            .partition(|item| id_of(item) == RowId::ALL_APPS);
        rest.extend(all_apps);
        return rest;
    }

    let (mut present, rest): (Vec<T>, Vec<T>) = items
        .into_iter()
        .partition(|item| preferred.contains(&id_of(item)));
    present.sort_by_key(|item| preferred.iter().position(|id| *id == id_of(item)));
    present.extend(rest);
    present
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[RowId]) -> Vec<i64> {
        rows.iter().map(|id| id.0).collect()
    }

    #[test]
    fn test_empty_order_pins_all_apps_last() {
        // order=[], items=[Favorites, Watch, AllApps] -> [Favorites, Watch, AllApps]
        let items = vec![RowId::FAVORITES, RowId::WATCH_NEXT, RowId::ALL_APPS];
        let merged = merge_ordered(items, &[], |id| *id);
        assert_eq!(
            merged,
            vec![RowId::FAVORITES, RowId::WATCH_NEXT, RowId::ALL_APPS]
        );
    }

    #[test]
    fn test_empty_order_moves_leading_all_apps_to_tail() {
        let items = vec![RowId::ALL_APPS, RowId::FAVORITES, RowId(9)];
        let merged = merge_ordered(items, &[], |id| *id);
        assert_eq!(merged, vec![RowId::FAVORITES, RowId(9), RowId::ALL_APPS]);
    }

    #[test]
    fn test_explicit_order_governs_all_apps() {
        // order=[AllApps, Favorites], items=[Favorites, Watch, AllApps]
        //   -> [AllApps, Favorites, Watch]
        let items = vec![RowId::FAVORITES, RowId::WATCH_NEXT, RowId::ALL_APPS];
        let merged = merge_ordered(items, &[RowId::ALL_APPS, RowId::FAVORITES], |id| *id);
        assert_eq!(
            merged,
            vec![RowId::ALL_APPS, RowId::FAVORITES, RowId::WATCH_NEXT]
        );
    }

    #[test]
    fn test_rest_keeps_original_relative_order() {
        let items = vec![RowId(5), RowId(1), RowId(4), RowId(2), RowId(3)];
        let merged = merge_ordered(items, &[RowId(2), RowId(1)], |id| *id);
        // present sorted by preferred index, rest stable
        assert_eq!(ids(&merged), vec![2, 1, 5, 4, 3]);
    }

    #[test]
    fn test_ordered_ids_absent_from_items_are_ignored() {
        let items = vec![RowId(1), RowId(2)];
        let merged = merge_ordered(items, &[RowId(99), RowId(2), RowId(1)], |id| *id);
        assert_eq!(ids(&merged), vec![2, 1]);
    }

    #[test]
    fn test_new_sources_land_after_ordered_ones() {
        let items = vec![RowId(30), RowId(10), RowId(20)];
        let merged = merge_ordered(items, &[RowId(10), RowId(20)], |id| *id);
        assert_eq!(ids(&merged), vec![10, 20, 30]);
    }

    #[test]
    fn test_empty_items_merge_to_empty() {
        let merged = merge_ordered(Vec::<RowId>::new(), &[RowId(1)], |id| *id);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_with_projection() {
        let items = vec![(RowId(2), "b"), (RowId(1), "a")];
        let merged = merge_ordered(items, &[RowId(1), RowId(2)], |pair| pair.0);
        assert_eq!(merged, vec![(RowId(1), "a"), (RowId(2), "b")]);
    }
}
