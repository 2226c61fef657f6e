//! Durable key/value persistence for identifier sequences.
//!
//! Values are comma-joined decimal 64-bit integers; the empty sequence
//! serializes to the empty string and back. A write either fully replaces
//! a key's value or fails leaving the prior value readable.

use crate::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Ordered sequence of application identifiers in the favorites row.
pub const KEY_FAVORITE_APPS: &str = "favoriteApps";

/// Set of hidden row identifiers.
pub const KEY_HIDDEN_CHANNELS: &str = "hiddenChannels";

/// User-preferred row display order.
pub const KEY_CHANNEL_ORDER: &str = "channels";

/// String-keyed store of `i64` sequences, persisted as a line-oriented
/// `key=value` file.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, Vec<i64>>,
}

impl PreferenceStore {
    /// Open the store at `path`, loading any existing content.
    ///
    /// A missing file yields an empty store. An unparseable line is
    /// logged and skipped; the remaining lines still load.
    ///
    /// # Errors
    ///
    /// Returns an error only when an existing file cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let mut values = BTreeMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            for line in content.lines() {
                if line.is_empty() {
                    continue;
                }
                let Some((key, value)) = line.split_once('=') else {
                    warn!("Skipping malformed preference line: {line}");
                    continue;
                };
                values.insert(key.to_string(), deserialize_ids(value));
            }
            debug!("Loaded {} preference keys from {}", values.len(), path.display());
        } else {
            debug!("Preference file not found at {}", path.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Get the sequence stored under `key`. An absent key is an empty
    /// sequence, never an error.
    #[must_use]
    pub fn get(&self, key: &str) -> Vec<i64> {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Replace the sequence stored under `key` and persist the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written; the previously
    /// stored value remains both on disk and readable via [`Self::get`].
    pub fn set(&mut self, key: &str, values: &[i64]) -> Result<()> {
        let previous = self.values.insert(key.to_string(), values.to_vec());

        if let Err(e) = self.write_all() {
            // Roll back so reads keep reflecting durable state.
            match previous {
                Some(old) => {
                    self.values.insert(key.to_string(), old);
                }
                None => {
                    self.values.remove(key);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Serialize the whole map to a temp file, then rename over the
    /// target so a failed write never corrupts the prior content.
    fn write_all(&self) -> Result<()> {
        let mut content = String::new();
        for (key, values) in &self.values {
            content.push_str(key);
            content.push('=');
            content.push_str(&serialize_ids(values));
            content.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Comma-join a sequence of identifiers. Empty input gives `""`.
#[must_use]
pub fn serialize_ids(values: &[i64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined identifier sequence. `""` gives the empty
/// sequence; an unparseable token is logged and skipped.
#[must_use]
pub fn deserialize_ids(value: &str) -> Vec<i64> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .split(',')
        .filter_map(|token| match token.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Skipping unparseable identifier: {token:?}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_serialize_empty_is_empty_string() {
        assert_eq!(serialize_ids(&[]), "");
    }

    #[test]
    fn test_deserialize_empty_is_empty_sequence() {
        assert!(deserialize_ids("").is_empty());
    }

    #[test]
    fn test_serialize_joins_with_commas() {
        assert_eq!(serialize_ids(&[1, -2, 300]), "1,-2,300");
    }

    #[test]
    fn test_deserialize_skips_bad_tokens() {
        assert_eq!(deserialize_ids("1,nope,3"), vec![1, 3]);
    }

    proptest! {
        #[test]
        fn prop_roundtrip(values in proptest::collection::vec(any::<i64>(), 0..32)) {
            prop_assert_eq!(deserialize_ids(&serialize_ids(&values)), values);
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(&dir.path().join("prefs")).unwrap();
        assert!(store.get(KEY_CHANNEL_ORDER).is_empty());
    }

    #[test]
    fn test_absent_key_is_empty_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(&dir.path().join("prefs")).unwrap();
        assert!(store.get("neverWritten").is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(&dir.path().join("prefs")).unwrap();
        store.set(KEY_HIDDEN_CHANNELS, &[-3, 12]).unwrap();
        assert_eq!(store.get(KEY_HIDDEN_CHANNELS), vec![-3, 12]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs");

        let mut store = PreferenceStore::open(&path).unwrap();
        store.set(KEY_FAVORITE_APPS, &[7, 8]).unwrap();
        store.set(KEY_CHANNEL_ORDER, &[]).unwrap();
        drop(store);

        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.get(KEY_FAVORITE_APPS), vec![7, 8]);
        assert!(store.get(KEY_CHANNEL_ORDER).is_empty());
    }

    #[test]
    fn test_set_replaces_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(&dir.path().join("prefs")).unwrap();
        store.set(KEY_CHANNEL_ORDER, &[1, 2, 3]).unwrap();
        store.set(KEY_CHANNEL_ORDER, &[3]).unwrap();
        assert_eq!(store.get(KEY_CHANNEL_ORDER), vec![3]);
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(&dir.path().join("prefs")).unwrap();
        store.set(KEY_HIDDEN_CHANNELS, &[5]).unwrap();
        store.set(KEY_CHANNEL_ORDER, &[1, 5]).unwrap();
        assert_eq!(store.get(KEY_HIDDEN_CHANNELS), vec![5]);
        assert_eq!(store.get(KEY_CHANNEL_ORDER), vec![1, 5]);
    }

    #[test]
    fn test_open_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs");
        std::fs::write(&path, "channels=1,2\ngarbage line\nfavoriteApps=9\n").unwrap();

        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.get(KEY_CHANNEL_ORDER), vec![1, 2]);
        assert_eq!(store.get(KEY_FAVORITE_APPS), vec![9]);
    }
}
