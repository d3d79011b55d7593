//! The collection façade.
//!
//! A [`Collection`] coordinates three indexes over one set of items — an
//! id-ordered map, a value-ordered map for non-spatial values, and an R-tree
//! for spatial ones — plus a side table of numeric fields, while keeping the
//! aggregate counters (object count, point count, byte weight) exactly in
//! sync with every mutation.
//!
//! # Thread safety
//!
//! `Collection` is not internally synchronized: it expects a single writer
//! and a single reader at a time, coordinated externally (a lock, an event
//! loop, or the `sync` feature's wrapper). All operations are synchronous;
//! long traversals yield cooperatively every 256 examined candidates and
//! consult the caller's [`Deadline`] at those points.
//!
//! # Example
//!
//! ```rust
//! use geoset::{Collection, Object};
//! use geo::Point;
//!
//! let mut col = Collection::new();
//! col.set("truck1", Object::from(Point::new(-112.26, 33.52)), None, &[])?;
//!
//! let mut ids = Vec::new();
//! col.scan(false, None, None, |id, _obj, _fields| {
//!     ids.push(id.to_string());
//!     true
//! })?;
//! assert_eq!(ids, ["truck1"]);
//! # Ok::<(), geoset::CollectionError>(())
//! ```

use crate::cursor::{Cursor, Deadline};
use crate::error::{CollectionError, Result};
use crate::field::FieldTable;
use crate::object::Object;
use crate::spatial_index::SpatialIndex;
use geo::{Rect, coord};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::thread;

/// Traversals yield to the scheduler every time the running candidate count
/// masks to this value (period 256, first yield at count 255).
const YIELD_STEP: u64 = 255;

/// An id/value pair owned by the collection and shared into the indexes.
#[derive(Debug)]
pub(crate) struct Item {
    pub(crate) id: String,
    pub(crate) obj: Object,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        // Ids are unique among live items, so identity follows the id.
        self.id == other.id
    }
}

/// Key for the value-ordered index: the value's string form with the id as
/// tie-breaker, so every key is unique and pagination is stable even when
/// many items share a value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ValueKey {
    value: String,
    id: String,
}

impl ValueKey {
    fn for_item(item: &Item) -> Self {
        Self {
            value: item.obj.string_form(),
            id: item.id.clone(),
        }
    }

    /// Range endpoint: sorts before every real item sharing `value`, since
    /// live ids are never empty.
    fn sentinel(value: &str) -> Self {
        Self {
            value: value.to_string(),
            id: String::new(),
        }
    }
}

/// Result of a [`Collection::set`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcome {
    /// The displaced value, when the id already existed.
    pub old_obj: Option<Object>,
    /// The displaced item's field row at replacement time.
    pub old_fields: Option<Vec<f64>>,
    /// The field row after the call.
    pub new_fields: Vec<f64>,
}

/// Snapshot of the aggregate observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Number of items in the collection.
    pub count: usize,
    /// Number of non-spatial (string) items.
    pub string_count: usize,
    /// Sum of coordinate counts over all items.
    pub point_count: usize,
    /// Byte-cost proxy over all items and field rows.
    pub total_weight: usize,
}

impl CollectionStats {
    /// Serialize the snapshot as JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load a snapshot from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Shared cursor/offset/deadline state for one traversal.
struct Pager<'a> {
    count: u64,
    offset: u64,
    cursor: Option<&'a mut dyn Cursor>,
    deadline: Option<&'a Deadline>,
}

impl<'a> Pager<'a> {
    fn new(mut cursor: Option<&'a mut dyn Cursor>, deadline: Option<&'a Deadline>) -> Self {
        let mut offset = 0;
        if let Some(cursor) = cursor.as_deref_mut() {
            offset = cursor.offset();
            cursor.step(offset);
        }
        Self {
            count: 0,
            offset,
            cursor,
            deadline,
        }
    }

    /// Counts a candidate; true when it falls inside the cursor offset and
    /// must be skipped without visiting or stepping.
    fn skip(&mut self) -> bool {
        self.count += 1;
        self.count <= self.offset
    }

    /// Advance the cursor by one examined candidate, yielding to the
    /// scheduler and consulting the deadline every 256 candidates.
    fn next_step(&mut self) -> Result<()> {
        if self.count & YIELD_STEP == YIELD_STEP {
            thread::yield_now();
            if let Some(deadline) = self.deadline {
                deadline.check()?;
            }
        }
        if let Some(cursor) = self.cursor.as_deref_mut() {
            cursor.step(1);
        }
        Ok(())
    }
}

/// An indexed store of geospatial objects keyed by string id.
#[derive(Default)]
pub struct Collection {
    /// Items ordered by id.
    items: BTreeMap<String, Arc<Item>>,
    /// Non-spatial items ordered by (string form, id).
    values: BTreeMap<ValueKey, Arc<Item>>,
    /// Spatial, non-empty items indexed by bounding rectangle.
    index: SpatialIndex<Arc<Item>>,
    fields: FieldTable,
    weight: usize,
    points: usize,
    /// Count of spatial items.
    objects: usize,
    /// Count of non-spatial items.
    nobjects: usize,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in the collection.
    pub fn count(&self) -> usize {
        self.objects + self.nobjects
    }

    /// Number of non-spatial (string) items.
    pub fn string_count(&self) -> usize {
        self.nobjects
    }

    /// Total number of coordinates across all items.
    pub fn point_count(&self) -> usize {
        self.points
    }

    /// In-memory cost proxy of the collection in bytes.
    pub fn total_weight(&self) -> usize {
        self.weight
    }

    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Bounds of the spatial index as `(min_x, min_y, max_x, max_y)`;
    /// zeros when no spatial items are stored.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.index.bounds()
    }

    /// Field name to column index view.
    pub fn field_map(&self) -> &rustc_hash::FxHashMap<String, usize> {
        self.fields.map()
    }

    /// Field names in ascending order.
    pub fn field_arr(&self) -> &[String] {
        self.fields.names()
    }

    /// Snapshot of the aggregate observers.
    pub fn stats(&self) -> CollectionStats {
        CollectionStats {
            count: self.count(),
            string_count: self.string_count(),
            point_count: self.point_count(),
            total_weight: self.total_weight(),
        }
    }

    /// Cost of one item: 16 bytes per coordinate for spatial values or the
    /// string length for non-spatial ones, plus 8 bytes per field column
    /// and the id length.
    fn item_weight(&self, item: &Item) -> usize {
        let obj_weight = if item.obj.is_spatial() {
            item.obj.num_points() * 16
        } else {
            item.obj.string_form().len()
        };
        obj_weight + self.fields.row(&item.id).len() * 8 + item.id.len()
    }

    fn index_insert(&mut self, item: &Arc<Item>) {
        if let Some(rect) = item.obj.rect() {
            self.index.insert(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
                item.clone(),
            );
        }
    }

    fn index_delete(&mut self, item: &Arc<Item>) {
        if let Some(rect) = item.obj.rect() {
            self.index.delete(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
                item.clone(),
            );
        }
    }

    /// Remove `item` from whichever secondary index holds it and undo its
    /// counter contributions. The field row is retained.
    fn unlink(&mut self, item: &Arc<Item>) {
        if item.obj.is_spatial() {
            self.index_delete(item);
            self.objects -= 1;
        } else {
            self.values.remove(&ValueKey::for_item(item));
            self.nobjects -= 1;
        }
        self.points -= item.obj.num_points();
        self.weight -= self.item_weight(item);
    }

    /// Add or replace an object.
    ///
    /// When an item with the same id already exists it is displaced and the
    /// new item adopts its field row. With `fields: None` and a non-empty
    /// `values` slice the entire row is replaced (it may shrink); with
    /// `fields` given, each named field is written individually and `values`
    /// must be the same length.
    pub fn set(
        &mut self,
        id: impl Into<String>,
        obj: Object,
        fields: Option<&[&str]>,
        values: &[f64],
    ) -> Result<SetOutcome> {
        if let Some(fields) = fields {
            if fields.len() != values.len() {
                return Err(CollectionError::ArgumentMismatch {
                    fields: fields.len(),
                    values: values.len(),
                });
            }
        }
        let id = id.into();
        let new_item = Arc::new(Item {
            id: id.clone(),
            obj,
        });

        let mut old_obj = None;
        let mut old_fields = None;
        if let Some(old_item) = self.items.insert(id.clone(), new_item.clone()) {
            self.unlink(&old_item);
            old_fields = Some(self.fields.row(&id).to_vec());
            old_obj = Some(take_obj(old_item));
        }

        if new_item.obj.is_spatial() {
            self.index_insert(&new_item);
            self.objects += 1;
        } else {
            self.values
                .insert(ValueKey::for_item(&new_item), new_item.clone());
            self.nobjects += 1;
        }
        self.points += new_item.obj.num_points();
        self.weight += self.item_weight(&new_item);

        match fields {
            None => {
                if !values.is_empty() {
                    self.weight -= self.fields.row(&id).len() * 8;
                    self.fields.set_row(&id, values.to_vec());
                    self.weight += values.len() * 8;
                }
            }
            Some(names) => {
                for (name, value) in names.iter().zip(values) {
                    self.write_field(&id, name, *value);
                }
            }
        }

        Ok(SetOutcome {
            old_obj,
            old_fields,
            new_fields: self.fields.row(&id).to_vec(),
        })
    }

    /// Look up an object and its field row.
    pub fn get(&self, id: &str) -> Option<(&Object, &[f64])> {
        let item = self.items.get(id)?;
        Some((&item.obj, self.fields.row(id)))
    }

    /// Remove an object, returning it and its field row. Returns `None`
    /// when the id is not present.
    pub fn delete(&mut self, id: &str) -> Option<(Object, Vec<f64>)> {
        let old_item = self.items.remove(id)?;
        self.unlink(&old_item);
        let fields = self.fields.remove_row(id).unwrap_or_default();
        Some((take_obj(old_item), fields))
    }

    /// Set one field, returning whether the stored value changed.
    pub fn set_field(&mut self, id: &str, field: &str, value: f64) -> Result<bool> {
        if !self.items.contains_key(id) {
            return Err(CollectionError::NoSuchId(id.to_string()));
        }
        Ok(self.write_field(id, field, value))
    }

    /// Set several fields at once, returning the number of columns whose
    /// stored value changed.
    pub fn set_fields(&mut self, id: &str, fields: &[&str], values: &[f64]) -> Result<usize> {
        if fields.len() != values.len() {
            return Err(CollectionError::ArgumentMismatch {
                fields: fields.len(),
                values: values.len(),
            });
        }
        if !self.items.contains_key(id) {
            return Err(CollectionError::NoSuchId(id.to_string()));
        }
        let mut updated = 0;
        for (field, value) in fields.iter().zip(values) {
            if self.write_field(id, field, *value) {
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn write_field(&mut self, id: &str, field: &str, value: f64) -> bool {
        let column = self.fields.column(field);
        let (old_len, new_len, updated) = self.fields.write(id, column, value);
        self.weight -= old_len * 8;
        self.weight += new_len * 8;
        updated
    }

    /// Count a candidate against the pager and hand it to the visitor.
    /// `Ok(true)` keeps the traversal going.
    fn visit_item<F>(&self, item: &Item, pager: &mut Pager<'_>, visitor: &mut F) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        if pager.skip() {
            return Ok(true);
        }
        pager.next_step()?;
        Ok(visitor(&item.id, &item.obj, self.fields.row(&item.id)))
    }

    /// Walk all items in id order.
    ///
    /// Returns `Ok(true)` when the whole domain was visited, `Ok(false)`
    /// when the visitor stopped the traversal.
    pub fn scan<'a, F>(
        &self,
        desc: bool,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let items: Box<dyn Iterator<Item = &Arc<Item>>> = if desc {
            Box::new(self.items.values().rev())
        } else {
            Box::new(self.items.values())
        };
        for item in items {
            if !self.visit_item(item, &mut pager, &mut visitor)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Walk items in id order starting at `start`, stopping when the id
    /// crosses `end` (exclusive).
    pub fn scan_range<'a, F>(
        &self,
        start: &str,
        end: &str,
        desc: bool,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let items: Box<dyn Iterator<Item = (&String, &Arc<Item>)>> = if desc {
            Box::new(
                self.items
                    .range::<str, _>((Bound::Unbounded, Bound::Included(start)))
                    .rev(),
            )
        } else {
            Box::new(
                self.items
                    .range::<str, _>((Bound::Included(start), Bound::Unbounded)),
            )
        };
        for (id, item) in items {
            if pager.skip() {
                continue;
            }
            pager.next_step()?;
            // The end bound is checked only for candidates past the cursor
            // offset, keeping pagination in step with the plain scan.
            if !desc && id.as_str() >= end {
                break;
            }
            if desc && id.as_str() <= end {
                break;
            }
            if !visitor(&item.id, &item.obj, self.fields.row(&item.id)) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Walk items in id order starting at `id` (inclusive): ascending over
    /// ids `>= id`, descending over ids `<= id`.
    pub fn scan_greater_or_equal<'a, F>(
        &self,
        id: &str,
        desc: bool,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let items: Box<dyn Iterator<Item = &Arc<Item>>> = if desc {
            Box::new(
                self.items
                    .range::<str, _>((Bound::Unbounded, Bound::Included(id)))
                    .rev()
                    .map(|(_, item)| item),
            )
        } else {
            Box::new(
                self.items
                    .range::<str, _>((Bound::Included(id), Bound::Unbounded))
                    .map(|(_, item)| item),
            )
        };
        for item in items {
            if !self.visit_item(item, &mut pager, &mut visitor)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Walk non-spatial items ordered by (value string, id).
    pub fn search_values<'a, F>(
        &self,
        desc: bool,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let items: Box<dyn Iterator<Item = &Arc<Item>>> = if desc {
            Box::new(self.values.values().rev())
        } else {
            Box::new(self.values.values())
        };
        for item in items {
            if !self.visit_item(item, &mut pager, &mut visitor)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Walk non-spatial items ordered by (value string, id), bounded by the
    /// `start` and `end` value strings. The bounds are compared with the
    /// index's own key ordering, so pagination stays stable when several
    /// items share a value string.
    pub fn search_values_range<'a, F>(
        &self,
        start: &str,
        end: &str,
        desc: bool,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let pstart = ValueKey::sentinel(start);
        let pend = ValueKey::sentinel(end);
        if desc {
            for (key, item) in self.values.range(..=pstart).rev() {
                if *key <= pend {
                    break;
                }
                if !self.visit_item(item, &mut pager, &mut visitor)? {
                    return Ok(false);
                }
            }
        } else {
            for (key, item) in self.values.range(pstart..) {
                if *key >= pend {
                    break;
                }
                if !self.visit_item(item, &mut pager, &mut visitor)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Enumerate spatial items whose rectangle overlaps `rect`, feeding each
    /// through `visit` until it reports a stop or an error.
    fn geo_search<F>(&self, rect: Rect, mut visit: F) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> Result<bool>,
    {
        let mut outcome: Result<bool> = Ok(true);
        self.index.search(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
            |item| match visit(&item.id, &item.obj, self.fields.row(&item.id)) {
                Ok(true) => true,
                Ok(false) => {
                    outcome = Ok(false);
                    false
                }
                Err(err) => {
                    outcome = Err(err);
                    false
                }
            },
        );
        outcome
    }

    /// Quad-tree sampling driver: de-duplicates matches across overlapping
    /// quadrant coverage before handing candidates to `iter`.
    fn geo_sparse(
        &self,
        rect: Rect,
        sparse: u8,
        iter: &mut dyn FnMut(&str, &Object, &[f64]) -> Result<(bool, bool)>,
    ) -> Result<bool> {
        let mut matched: FxHashSet<String> = FxHashSet::default();
        self.geo_sparse_inner(rect, sparse, &mut |id, obj, fields| {
            if matched.contains(id) {
                return Ok((false, true));
            }
            let (hit, keepon) = iter(id, obj, fields)?;
            if hit {
                matched.insert(id.to_string());
            }
            Ok((hit, keepon))
        })
    }

    /// Recursive quadrant subdivision. Quadrants are visited NW, NE, SW,
    /// SE; the horizontal split line belongs to the lower pair. Each leaf
    /// search stops at its first fresh match, which is what thins the
    /// result set to roughly one item per leaf.
    fn geo_sparse_inner(
        &self,
        rect: Rect,
        sparse: u8,
        iter: &mut dyn FnMut(&str, &Object, &[f64]) -> Result<(bool, bool)>,
    ) -> Result<bool> {
        if sparse > 0 {
            let w = rect.max().x - rect.min().x;
            let h = rect.max().y - rect.min().y;
            let quads = [
                Rect::new(
                    coord! { x: rect.min().x, y: rect.min().y + h / 2.0 },
                    coord! { x: rect.min().x + w / 2.0, y: rect.max().y },
                ),
                Rect::new(
                    coord! { x: rect.min().x + w / 2.0, y: rect.min().y + h / 2.0 },
                    coord! { x: rect.max().x, y: rect.max().y },
                ),
                Rect::new(
                    coord! { x: rect.min().x, y: rect.min().y },
                    coord! { x: rect.min().x + w / 2.0, y: rect.min().y + h / 2.0 },
                ),
                Rect::new(
                    coord! { x: rect.min().x + w / 2.0, y: rect.min().y },
                    coord! { x: rect.max().x, y: rect.min().y + h / 2.0 },
                ),
            ];
            for quad in quads {
                if !self.geo_sparse_inner(quad, sparse - 1, iter)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }
        let mut keepon = true;
        self.geo_search(rect, |id, obj, fields| {
            let (hit, still_alive) = iter(id, obj, fields)?;
            if !still_alive {
                keepon = false;
                return Ok(false);
            }
            // A fresh match ends this leaf's search without ending the
            // overall traversal.
            Ok(!hit)
        })?;
        Ok(keepon)
    }

    /// Visit items fully contained within `obj`. With `sparse > 0` the
    /// query rectangle is subdivided into `4^sparse` leaves and each leaf
    /// contributes at most one fresh match.
    pub fn within<'a, F>(
        &self,
        obj: &Object,
        sparse: u8,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let Some(rect) = obj.rect() else {
            return Ok(true);
        };
        if sparse > 0 {
            return self.geo_sparse(rect, sparse, &mut |id, o, fields| {
                if pager.skip() {
                    return Ok((false, true));
                }
                pager.next_step()?;
                if o.within(obj) {
                    Ok((true, visitor(id, o, fields)))
                } else {
                    Ok((false, true))
                }
            });
        }
        self.geo_search(rect, |id, o, fields| {
            if pager.skip() {
                return Ok(true);
            }
            pager.next_step()?;
            if o.within(obj) {
                Ok(visitor(id, o, fields))
            } else {
                Ok(true)
            }
        })
    }

    /// Visit items intersecting `obj`. Sparse mode behaves as in
    /// [`Collection::within`].
    pub fn intersects<'a, F>(
        &self,
        obj: &Object,
        sparse: u8,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        let mut pager = Pager::new(cursor, deadline);
        let Some(rect) = obj.rect() else {
            return Ok(true);
        };
        if sparse > 0 {
            return self.geo_sparse(rect, sparse, &mut |id, o, fields| {
                if pager.skip() {
                    return Ok((false, true));
                }
                pager.next_step()?;
                if o.intersects(obj) {
                    Ok((true, visitor(id, o, fields)))
                } else {
                    Ok((false, true))
                }
            });
        }
        self.geo_search(rect, |id, o, fields| {
            if pager.skip() {
                return Ok(true);
            }
            pager.next_step()?;
            if o.intersects(obj) {
                Ok(visitor(id, o, fields))
            } else {
                Ok(true)
            }
        })
    }

    /// Visit spatial items in ascending distance from `target`'s center,
    /// the distance being the minimum Euclidean distance to each item's
    /// bounding rectangle. Any further distance filtering is up to the
    /// caller.
    pub fn nearby<'a, F>(
        &self,
        target: &Object,
        cursor: Option<&'a mut dyn Cursor>,
        deadline: Option<&'a Deadline>,
        mut visitor: F,
    ) -> Result<bool>
    where
        F: FnMut(&str, &Object, &[f64]) -> bool,
    {
        // Fast negative: a meter-radius circle probes its outer rectangle
        // for at least one candidate before starting the ordered traversal.
        if let Object::Circle(circle) = target {
            if circle.meters() > 0.0 {
                let rect = circle.rect();
                let mut exists = false;
                self.index.search(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                    |_| {
                        exists = true;
                        false
                    },
                );
                if !exists {
                    return Ok(true);
                }
            }
        }
        let center = target.center();
        let mut pager = Pager::new(cursor, deadline);
        let mut outcome: Result<bool> = Ok(true);
        self.index.nearby([center.x(), center.y()], |item, _dist| {
            if pager.skip() {
                return true;
            }
            if let Err(err) = pager.next_step() {
                outcome = Err(err);
                return false;
            }
            let keepon = visitor(&item.id, &item.obj, self.fields.row(&item.id));
            if !keepon {
                outcome = Ok(false);
            }
            keepon
        });
        outcome
    }
}

/// Recover the owned object from a handle that has been removed from every
/// index; falls back to a clone if a reference is still live.
fn take_obj(item: Arc<Item>) -> Object {
    match Arc::try_unwrap(item) {
        Ok(item) => item.obj,
        Err(item) => item.obj.clone(),
    }
}
