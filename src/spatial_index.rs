//! R-tree index over 2-D axis-aligned rectangles.
//!
//! Thin wrapper around [`rstar::RTree`] storing a caller-supplied handle per
//! rectangle. Enumeration is callback-style with early stop; `nearby` yields
//! handles in ascending minimum Euclidean distance from a query point to the
//! stored rectangle.

use rstar::{AABB, Envelope, PointDistance, RTree, RTreeObject};

/// A stored rectangle plus its handle.
#[derive(Debug, Clone)]
struct RectEntry<T> {
    min: [f64; 2],
    max: [f64; 2],
    data: T,
}

impl<T> RTreeObject for RectEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl<T> PointDistance for RectEntry<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope().distance_2(point)
    }
}

impl<T: PartialEq> PartialEq for RectEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max && self.data == other.data
    }
}

/// Spatial index over axis-aligned rectangles.
pub struct SpatialIndex<T> {
    tree: RTree<RectEntry<T>>,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T: PartialEq + Clone> SpatialIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `data` under the rectangle `[min, max]`.
    pub fn insert(&mut self, min: [f64; 2], max: [f64; 2], data: T) {
        self.tree.insert(RectEntry { min, max, data });
    }

    /// Remove the entry matching rectangle and handle. Returns whether an
    /// entry was removed.
    pub fn delete(&mut self, min: [f64; 2], max: [f64; 2], data: T) -> bool {
        self.tree.remove(&RectEntry { min, max, data }).is_some()
    }

    /// Visit every handle whose rectangle overlaps `[min, max]`. The
    /// visitor returns `false` to stop the enumeration.
    pub fn search<F>(&self, min: [f64; 2], max: [f64; 2], mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let query = AABB::from_corners(min, max);
        for entry in self.tree.locate_in_envelope_intersecting(&query) {
            if !visit(&entry.data) {
                break;
            }
        }
    }

    /// Visit handles in ascending distance from `center`, the distance
    /// being the minimum Euclidean distance from the point to the stored
    /// rectangle. The visitor returns `false` to stop.
    pub fn nearby<F>(&self, center: [f64; 2], mut visit: F)
    where
        F: FnMut(&T, f64) -> bool,
    {
        for (entry, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(&center) {
            if !visit(&entry.data, distance_2.sqrt()) {
                break;
            }
        }
    }

    /// Bounds of all stored rectangles as `(min_x, min_y, max_x, max_y)`;
    /// zeros when the index is empty.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        if self.tree.size() == 0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let envelope = self.tree.root().envelope();
        let lower = envelope.lower();
        let upper = envelope.upper();
        (lower[0], lower[1], upper[0], upper[1])
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
