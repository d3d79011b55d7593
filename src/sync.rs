//! Thread-safe wrapper for concurrent collection access.
//!
//! This module provides [`SyncCollection`], a thread-safe wrapper around
//! [`Collection`] that uses `Arc<RwLock<Collection>>` internally. The core
//! collection is single-threaded by design; this wrapper is the opt-in
//! external coordination layer for callers that want to share one
//! collection across threads.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! geoset = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use geoset::sync::SyncCollection;
//! use geoset::Object;
//! use geo::Point;
//! use std::thread;
//!
//! let col = SyncCollection::new();
//! let writer = col.clone();
//!
//! let handle = thread::spawn(move || {
//!     writer
//!         .set("truck1", Object::from(Point::new(-112.26, 33.52)), None, &[])
//!         .unwrap();
//! });
//! handle.join().unwrap();
//!
//! assert_eq!(col.count(), 1);
//! ```

use crate::collection::{Collection, CollectionStats, SetOutcome};
use crate::error::Result;
use crate::object::Object;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe wrapper around [`Collection`] using `Arc<RwLock<Collection>>`.
///
/// Multiple threads may read simultaneously; writes take exclusive access.
/// Query traversals hold the read lock for their full duration, so
/// long-running scans should carry a deadline.
#[derive(Clone, Default)]
pub struct SyncCollection {
    inner: Arc<RwLock<Collection>>,
}

impl SyncCollection {
    /// Create an empty, shareable collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`Collection::set`].
    pub fn set(
        &self,
        id: impl Into<String>,
        obj: Object,
        fields: Option<&[&str]>,
        values: &[f64],
    ) -> Result<SetOutcome> {
        self.inner.write().set(id, obj, fields, values)
    }

    /// See [`Collection::get`]. Returns owned copies so the lock is not
    /// held past the call.
    pub fn get(&self, id: &str) -> Option<(Object, Vec<f64>)> {
        let col = self.inner.read();
        col.get(id).map(|(obj, fields)| (obj.clone(), fields.to_vec()))
    }

    /// See [`Collection::delete`].
    pub fn delete(&self, id: &str) -> Option<(Object, Vec<f64>)> {
        self.inner.write().delete(id)
    }

    /// See [`Collection::set_field`].
    pub fn set_field(&self, id: &str, field: &str, value: f64) -> Result<bool> {
        self.inner.write().set_field(id, field, value)
    }

    /// See [`Collection::set_fields`].
    pub fn set_fields(&self, id: &str, fields: &[&str], values: &[f64]) -> Result<usize> {
        self.inner.write().set_fields(id, fields, values)
    }

    pub fn count(&self) -> usize {
        self.inner.read().count()
    }

    pub fn string_count(&self) -> usize {
        self.inner.read().string_count()
    }

    pub fn point_count(&self) -> usize {
        self.inner.read().point_count()
    }

    pub fn total_weight(&self) -> usize {
        self.inner.read().total_weight()
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.inner.read().bounds()
    }

    pub fn stats(&self) -> CollectionStats {
        self.inner.read().stats()
    }

    /// Field names in ascending order, copied out of the lock.
    pub fn field_arr(&self) -> Vec<String> {
        self.inner.read().field_arr().to_vec()
    }

    /// Run `f` with shared access, e.g. for query traversals:
    ///
    /// ```rust
    /// # use geoset::sync::SyncCollection;
    /// # let col = SyncCollection::new();
    /// let mut ids = Vec::new();
    /// col.read(|col| {
    ///     col.scan(false, None, None, |id, _, _| {
    ///         ids.push(id.to_string());
    ///         true
    ///     })
    /// })
    /// .unwrap();
    /// ```
    pub fn read<R>(&self, f: impl FnOnce(&Collection) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Collection) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use std::thread;

    #[test]
    fn test_concurrent_writers() {
        let col = SyncCollection::new();
        let mut handles = Vec::new();
        for t in 0..4 {
            let col = col.clone();
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    col.set(
                        format!("t{t}:{i}"),
                        Object::from(Point::new(i as f64, t as f64)),
                        None,
                        &[],
                    )
                    .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(col.count(), 100);
        assert_eq!(col.point_count(), 100);
    }

    #[test]
    fn test_read_access_scans() {
        let col = SyncCollection::new();
        col.set("b", Object::from("beta"), None, &[]).unwrap();
        col.set("a", Object::from("alpha"), None, &[]).unwrap();

        let mut ids = Vec::new();
        col.read(|col| {
            col.scan(false, None, None, |id, _, _| {
                ids.push(id.to_string());
                true
            })
        })
        .unwrap();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_get_returns_owned_copies() {
        let col = SyncCollection::new();
        col.set("a", Object::from(Point::new(1.0, 2.0)), Some(&["speed"]), &[30.0])
            .unwrap();
        let (obj, fields) = col.get("a").unwrap();
        assert_eq!(obj, Object::from(Point::new(1.0, 2.0)));
        assert_eq!(fields, vec![30.0]);
    }
}
