//! Memoized table loading.
//!
//! A table is reused as long as the file at the same path still has the
//! same content; edits to the file cause a reload on the next call.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::error::LoadError;
use crate::loader::{RouteTable, load_from_reader, read_source};

struct CachedTable {
    fingerprint: u64,
    table: Arc<RouteTable>,
}

#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CachedTable>,
}

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for `path`, parsing the file only if its content changed.
    pub fn load(&mut self, path: &Path) -> Result<Arc<RouteTable>, LoadError> {
        let bytes = read_source(path)?;
        let fingerprint = fingerprint(&bytes);

        if let Some(cached) = self.entries.get(path) {
            if cached.fingerprint == fingerprint {
                debug!(path = %path.display(), "Route table cache hit");
                return Ok(Arc::clone(&cached.table));
            }
        }

        debug!(path = %path.display(), "Route table cache miss");
        let table = Arc::new(load_from_reader(bytes.as_slice())?);
        self.entries.insert(
            path.to_path_buf(),
            CachedTable {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    const HEADER: &str =
        "Order_ID,Route,Distance_KM,Fuel_Consumption_L,Toll_Charges_INR,Traffic_Delay_Minutes,Weather_Impact\n";

    #[test]
    fn test_same_content_returns_cached_table() {
        let path = env::temp_dir().join("route_planner_cache_same.csv");
        fs::write(&path, format!("{HEADER}1,Delhi-Mumbai,1400,180,500,45,\n")).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_changed_content_reloads() {
        let path = env::temp_dir().join("route_planner_cache_changed.csv");
        fs::write(&path, format!("{HEADER}1,Delhi-Mumbai,1400,180,500,45,\n")).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();

        fs::write(
            &path,
            format!("{HEADER}1,Delhi-Mumbai,1400,180,500,45,\n2,Pune-Goa,450,60,250,90,Rain\n"),
        )
        .unwrap();
        let second = cache.load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let mut cache = TableCache::new();
        let err = cache.load(Path::new("missing/routes.csv")).unwrap_err();

        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(cache.is_empty());
    }
}
