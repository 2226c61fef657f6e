//! Boundary traits for external content providers.
//!
//! Implementations perform provider I/O and therefore run on the blocking
//! worker pool, never on the orchestrator task. They skip malformed
//! records and return empty sequences on absence or failure; none of
//! these calls surfaces an error to the engine.

use shelf_types::{CandidateRow, LaunchTarget, RawItem, ResolvedHandler, RowId};

/// Known no-op launch handler. An item whose target resolves only here is
/// treated as not actually launchable.
pub const STUB_HANDLER_PACKAGE: &str = "com.android.tv.frameworkpackagestubs";

/// Read-only access to external content channels.
pub trait SourceGateway: Send + Sync {
    /// List raw candidate rows. Malformed records are skipped without
    /// aborting the remaining listing.
    fn list_candidate_rows(&self) -> Vec<CandidateRow>;

    /// List raw items for one channel, in source order, without dedup.
    fn list_items(&self, row: RowId) -> Vec<RawItem>;

    /// Fixed fetch path for the continue-watching row.
    fn list_watch_next(&self) -> Vec<RawItem>;
}

/// Read-only access to the installed application set.
pub trait AppSource: Send + Sync {
    /// All currently installed, launchable applications.
    fn installed_apps(&self) -> Vec<RawItem>;

    /// Look up a single application by package identifier.
    fn app_item(&self, package: i64) -> Option<RawItem>;
}

/// Resolution of launch targets to their handling application.
pub trait LaunchResolver: Send + Sync {
    /// The handler for `target`, or `None` when nothing can open it.
    fn resolve(&self, target: &LaunchTarget) -> Option<ResolvedHandler>;
}

/// A candidate with an empty display name or an empty launch reference
/// never reaches filtering.
#[must_use]
pub fn is_well_formed(candidate: &CandidateRow) -> bool {
    !candidate.title.is_empty() && !candidate.app_link.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_types::SourceKind;

    fn candidate(title: &str, app_link: &str) -> CandidateRow {
        CandidateRow {
            id: RowId(1),
            title: title.to_string(),
            app_link: app_link.to_string(),
            kind: SourceKind::Preview,
        }
    }

    #[test]
    fn test_well_formed_candidate() {
        assert!(is_well_formed(&candidate("Trending", "myflix://home")));
    }

    #[test]
    fn test_empty_title_discarded() {
        assert!(!is_well_formed(&candidate("", "myflix://home")));
    }

    #[test]
    fn test_empty_app_link_discarded() {
        assert!(!is_well_formed(&candidate("Trending", "")));
    }
}
