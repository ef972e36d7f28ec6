use std::{
    borrow::Borrow,
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Ordered key-value map, optionally persisted to a JSON file.
///
/// Iteration follows key order. When file-backed, the whole map is rewritten after each
/// mutation while the write lock is still held, and a failed write restores the previous
/// in-memory state, so the map and the file never diverge.
pub struct JsonMapStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    file_path: Option<PathBuf>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing;
    /// any other read failure is returned instead of resetting the file.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let map: BTreeMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: BTreeMap<K, V> = BTreeMap::new();
                write_atomic(&file_path, serde_json::to_vec(&empty).map_err(ServiceError::storage)?).await?;
                empty
            }
            Err(e) => return Err(ServiceError::Storage(format!("{}: {e}", file_path.display()))),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path: Some(file_path) }))
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(BTreeMap::new()), file_path: None })
    }

    async fn save(&self, map: &BTreeMap<K, V>) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else { return Ok(()) };
        let data = serde_json::to_vec_pretty(map).map_err(ServiceError::storage)?;
        write_atomic(path, data).await
    }

    /// List all entries as `(key, value)` pairs in key order.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// All values in key order.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    /// Values matching `pred`, in key order.
    pub async fn filter_values<F>(&self, pred: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().filter(|v| pred(*v)).cloned().collect()
    }

    /// Check if any value satisfies `pred`.
    pub async fn any_value<F>(&self, pred: F) -> bool
    where
        F: Fn(&V) -> bool,
    {
        let map = self.inner.read().await;
        map.values().any(pred)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Get value by key.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().await.contains_key(key)
    }

    /// Insert or replace a value and persist; returns the replaced value.
    pub async fn insert(&self, key: K, value: V) -> Result<Option<V>, ServiceError> {
        let mut map = self.inner.write().await;
        let previous = map.insert(key.clone(), value);
        if let Err(e) = self.save(&map).await {
            match previous {
                Some(old) => map.insert(key, old),
                None => map.remove(&key),
            };
            return Err(e);
        }
        Ok(previous)
    }

    /// Remove a key and persist; returns the removed value. Absent keys are not an error
    /// and do not rewrite the file.
    pub async fn remove<Q>(&self, key: &Q) -> Result<Option<V>, ServiceError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut map = self.inner.write().await;
        let Some((k, removed)) = map.remove_entry(key) else { return Ok(None) };
        if let Err(e) = self.save(&map).await {
            map.insert(k, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Apply a mutation to the underlying map and persist atomically.
    ///
    /// If `f` fails the map must be left as it was; if persisting fails the map is
    /// restored from a snapshot taken before `f` ran.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let snapshot = self.file_path.as_ref().map(|_| map.clone());
        let out = f(&mut map)?;
        if let Err(e) = self.save(&map).await {
            if let Some(snapshot) = snapshot {
                *map = snapshot;
            }
            return Err(e);
        }
        Ok(out)
    }
}

/// Write to a sibling temp file, then rename it over `path`, so a crash mid-write never
/// leaves a truncated map behind.
async fn write_atomic(path: &Path, data: Vec<u8>) -> Result<(), ServiceError> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let tmp_path = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".{file_name}.tmp.{}", uuid::Uuid::new_v4()));

    if let Err(e) = fs::write(&tmp_path, data).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(ServiceError::Storage(format!("{}: {e}", tmp_path.display())));
    }
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(ServiceError::Storage(format!("{}: {e}", path.display())));
    }
    Ok(())
}
