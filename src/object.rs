//! Geometry value types stored in a collection.
//!
//! [`Object`] is a tagged variant over the closed set of supported values:
//! the geometric variants backed by `geo` primitives, a meter-radius
//! [`Circle`], and an opaque `String`. The capability set (`rect`,
//! `num_points`, `center`, `within`, `intersects`, ...) is dispatched per
//! variant; non-spatial values behave as plain strings and never enter the
//! spatial index.

use geo::{
    BoundingRect, Coord, CoordsIter, Destination, GeometryCollection, Haversine, Intersects,
    LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Rect, Within, coord,
};

/// Vertices used when approximating a circle boundary as a polygon.
const CIRCLE_STEPS: usize = 64;

/// A circle described by a center point and a radius in meters.
///
/// The bounding rectangle is derived from Haversine destination points at
/// the four cardinal bearings; exact containment and intersection tests run
/// against a fixed-step polygon approximation of the boundary, computed once
/// at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    meters: f64,
    boundary: Polygon,
}

impl Circle {
    /// Create a circle centered at `center` with radius `meters`.
    ///
    /// A non-positive radius yields a degenerate circle that behaves as a
    /// single point.
    pub fn new(center: Point, meters: f64) -> Self {
        let boundary = if meters > 0.0 {
            let ring: Vec<Coord> = (0..=CIRCLE_STEPS)
                .map(|i| {
                    let bearing = (i % CIRCLE_STEPS) as f64 * (360.0 / CIRCLE_STEPS as f64);
                    Haversine.destination(center, bearing, meters).into()
                })
                .collect();
            Polygon::new(LineString::from(ring), vec![])
        } else {
            Polygon::new(LineString::from(vec![center.0, center.0, center.0]), vec![])
        };
        Self {
            center,
            meters,
            boundary,
        }
    }

    /// The circle's center point.
    pub fn center(&self) -> Point {
        self.center
    }

    /// The circle's radius in meters.
    pub fn meters(&self) -> f64 {
        self.meters
    }

    /// Bounding rectangle spanning the circle's geodesic extent.
    pub fn rect(&self) -> Rect {
        if self.meters <= 0.0 {
            return Rect::new(self.center.0, self.center.0);
        }
        let north = Haversine.destination(self.center, 0.0, self.meters);
        let east = Haversine.destination(self.center, 90.0, self.meters);
        let south = Haversine.destination(self.center, 180.0, self.meters);
        let west = Haversine.destination(self.center, 270.0, self.meters);
        Rect::new(
            coord! { x: west.x(), y: south.y() },
            coord! { x: east.x(), y: north.y() },
        )
    }

    fn boundary(&self) -> &Polygon {
        &self.boundary
    }
}

/// A value stored in a collection: a geometry or an opaque string.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Non-spatial value; ordered lexicographically in the value index.
    String(String),
    Point(Point),
    MultiPoint(MultiPoint),
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
    Circle(Circle),
}

impl Object {
    /// Whether this value participates in spatial indexing and predicates.
    pub fn is_spatial(&self) -> bool {
        !matches!(self, Object::String(_))
    }

    /// Whether this value has no spatial extent.
    ///
    /// Points and circles are never empty; the remaining geometric variants
    /// are empty when they carry no coordinates. Strings have no extent.
    pub fn is_empty(&self) -> bool {
        match self {
            Object::String(_) => true,
            Object::Point(_) | Object::Circle(_) => false,
            Object::MultiPoint(g) => g.coords_count() == 0,
            Object::LineString(g) => g.coords_count() == 0,
            Object::MultiLineString(g) => g.coords_count() == 0,
            Object::Polygon(g) => g.coords_count() == 0,
            Object::MultiPolygon(g) => g.coords_count() == 0,
            Object::GeometryCollection(g) => g.coords_count() == 0,
        }
    }

    /// Axis-aligned bounding rectangle, or `None` for empty and non-spatial
    /// values.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Object::String(_) => None,
            Object::Point(p) => Some(Rect::new(p.0, p.0)),
            Object::MultiPoint(g) => g.bounding_rect(),
            Object::LineString(g) => g.bounding_rect(),
            Object::MultiLineString(g) => g.bounding_rect(),
            Object::Polygon(g) => g.bounding_rect(),
            Object::MultiPolygon(g) => g.bounding_rect(),
            Object::GeometryCollection(g) => g.bounding_rect(),
            Object::Circle(c) => Some(c.rect()),
        }
    }

    /// Number of coordinates carried by the value.
    ///
    /// Circles count their center as a single point so the cost proxy stays
    /// independent of the boundary approximation resolution.
    pub fn num_points(&self) -> usize {
        match self {
            Object::String(_) => 0,
            Object::Point(_) | Object::Circle(_) => 1,
            Object::MultiPoint(g) => g.coords_count(),
            Object::LineString(g) => g.coords_count(),
            Object::MultiLineString(g) => g.coords_count(),
            Object::Polygon(g) => g.coords_count(),
            Object::MultiPolygon(g) => g.coords_count(),
            Object::GeometryCollection(g) => g.coords_count(),
        }
    }

    /// Center of the value's bounding rectangle; `(0, 0)` for empty and
    /// non-spatial values.
    pub fn center(&self) -> Point {
        match self {
            Object::Circle(c) => c.center(),
            _ => self
                .rect()
                .map(|r| Point::from(r.center()))
                .unwrap_or_else(|| Point::new(0.0, 0.0)),
        }
    }

    /// Canonical string form: the raw string for non-spatial values, a
    /// GeoJSON geometry for spatial ones.
    pub fn string_form(&self) -> String {
        match self {
            Object::String(s) => s.clone(),
            // Circles serialize as their center point; the radius is not
            // part of the GeoJSON geometry model.
            Object::Circle(c) => geojson_string(&geo::Geometry::Point(c.center())),
            _ => match self.to_geometry() {
                Some(geom) => geojson_string(&geom),
                None => String::new(),
            },
        }
    }

    /// True when `self` is fully contained within `other`.
    pub fn within(&self, other: &Object) -> bool {
        match (self.to_geometry(), other.to_geometry()) {
            (Some(a), Some(b)) => geom_within(&a, &b),
            _ => false,
        }
    }

    /// True when `self` and `other` share any point.
    pub fn intersects(&self, other: &Object) -> bool {
        match (self.to_geometry(), other.to_geometry()) {
            (Some(a), Some(b)) => geom_intersects(&a, &b),
            _ => false,
        }
    }

    fn to_geometry(&self) -> Option<geo::Geometry> {
        match self {
            Object::String(_) => None,
            Object::Point(g) => Some(geo::Geometry::Point(*g)),
            Object::MultiPoint(g) => Some(geo::Geometry::MultiPoint(g.clone())),
            Object::LineString(g) => Some(geo::Geometry::LineString(g.clone())),
            Object::MultiLineString(g) => Some(geo::Geometry::MultiLineString(g.clone())),
            Object::Polygon(g) => Some(geo::Geometry::Polygon(g.clone())),
            Object::MultiPolygon(g) => Some(geo::Geometry::MultiPolygon(g.clone())),
            Object::GeometryCollection(g) => Some(geo::Geometry::GeometryCollection(g.clone())),
            Object::Circle(c) if c.meters() > 0.0 => {
                Some(geo::Geometry::Polygon(c.boundary().clone()))
            }
            // A non-positive radius collapses to the center point; the
            // degenerate boundary ring has no interior for the polygon
            // predicates to work with.
            Object::Circle(c) => Some(geo::Geometry::Point(c.center())),
        }
    }
}

/// Containment with geometry collections folded over their members: a
/// collection is within `b` iff it is non-empty and every member is, and
/// anything is within a collection iff it is within some member.
fn geom_within(a: &geo::Geometry, b: &geo::Geometry) -> bool {
    match (a, b) {
        (geo::Geometry::GeometryCollection(gc), _) => {
            !gc.is_empty() && gc.iter().all(|g| geom_within(g, b))
        }
        (_, geo::Geometry::GeometryCollection(gc)) => gc.iter().any(|g| geom_within(a, g)),
        _ => a.is_within(b),
    }
}

/// Intersection with geometry collections folded over their members.
fn geom_intersects(a: &geo::Geometry, b: &geo::Geometry) -> bool {
    match (a, b) {
        (geo::Geometry::GeometryCollection(gc), _) => gc.iter().any(|g| geom_intersects(g, b)),
        (_, geo::Geometry::GeometryCollection(gc)) => gc.iter().any(|g| geom_intersects(a, g)),
        _ => a.intersects(b),
    }
}

fn geojson_string(geom: &geo::Geometry) -> String {
    geojson::GeoJson::Geometry(geojson::Geometry::new(geojson::Value::from(geom))).to_string()
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(value.to_string())
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::String(value)
    }
}

impl From<Point> for Object {
    fn from(value: Point) -> Self {
        Object::Point(value)
    }
}

impl From<MultiPoint> for Object {
    fn from(value: MultiPoint) -> Self {
        Object::MultiPoint(value)
    }
}

impl From<LineString> for Object {
    fn from(value: LineString) -> Self {
        Object::LineString(value)
    }
}

impl From<MultiLineString> for Object {
    fn from(value: MultiLineString) -> Self {
        Object::MultiLineString(value)
    }
}

impl From<Polygon> for Object {
    fn from(value: Polygon) -> Self {
        Object::Polygon(value)
    }
}

impl From<MultiPolygon> for Object {
    fn from(value: MultiPolygon) -> Self {
        Object::MultiPolygon(value)
    }
}

impl From<GeometryCollection> for Object {
    fn from(value: GeometryCollection) -> Self {
        Object::GeometryCollection(value)
    }
}

impl From<Circle> for Object {
    fn from(value: Circle) -> Self {
        Object::Circle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Polygon {
        Polygon::new(
            LineString::from(vec![
                (min, min),
                (max, min),
                (max, max),
                (min, max),
                (min, min),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_point_capabilities() {
        let obj = Object::from(Point::new(1.0, 2.0));
        assert!(obj.is_spatial());
        assert!(!obj.is_empty());
        assert_eq!(obj.num_points(), 1);

        let rect = obj.rect().unwrap();
        assert_eq!(rect.min(), coord! { x: 1.0, y: 2.0 });
        assert_eq!(rect.max(), coord! { x: 1.0, y: 2.0 });
        assert_eq!(obj.center(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_string_is_opaque() {
        let obj = Object::from("hello");
        assert!(!obj.is_spatial());
        assert!(obj.is_empty());
        assert_eq!(obj.num_points(), 0);
        assert!(obj.rect().is_none());
        assert_eq!(obj.string_form(), "hello");
        assert_eq!(obj.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_empty_line_string() {
        let obj = Object::from(LineString::new(vec![]));
        assert!(obj.is_spatial());
        assert!(obj.is_empty());
        assert!(obj.rect().is_none());
        assert_eq!(obj.num_points(), 0);
    }

    #[test]
    fn test_polygon_rect_and_points() {
        let obj = Object::from(square(0.0, 10.0));
        let rect = obj.rect().unwrap();
        assert_eq!(rect.min(), coord! { x: 0.0, y: 0.0 });
        assert_eq!(rect.max(), coord! { x: 10.0, y: 10.0 });
        assert_eq!(obj.num_points(), 5);
        assert_eq!(obj.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_point_geojson_string_form() {
        let obj = Object::from(Point::new(1.0, 2.0));
        let form = obj.string_form();
        assert!(form.contains("\"Point\""), "unexpected form: {form}");
        assert!(form.contains("[1.0,2.0]") || form.contains("[1,2]"));
    }

    #[test]
    fn test_within_polygon() {
        let unit = Object::from(square(0.0, 1.0));
        let big = Object::from(square(0.0, 10.0));
        let far = Object::from(square(100.0, 110.0));

        assert!(unit.within(&big));
        assert!(!big.within(&unit));
        assert!(!unit.within(&far));
    }

    #[test]
    fn test_intersects_polygon() {
        let a = Object::from(square(0.0, 5.0));
        let b = Object::from(square(4.0, 9.0));
        let c = Object::from(square(50.0, 60.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_string_predicates_are_false() {
        let s = Object::from("hello");
        let p = Object::from(Point::new(0.0, 0.0));
        assert!(!s.within(&p));
        assert!(!p.within(&s));
        assert!(!s.intersects(&p));
    }

    #[test]
    fn test_geometry_collection_predicates() {
        let members = GeometryCollection::from(vec![
            geo::Geometry::Point(Point::new(1.0, 1.0)),
            geo::Geometry::Point(Point::new(2.0, 2.0)),
        ]);
        let gc = Object::from(members);
        let big = Object::from(square(0.0, 10.0));
        let half = Object::from(square(0.0, 1.5));

        assert!(gc.within(&big));
        assert!(!gc.within(&half));
        assert!(gc.intersects(&half));

        let empty = Object::from(GeometryCollection::default());
        assert!(!empty.within(&big));
    }

    #[test]
    fn test_circle_rect_spans_radius() {
        let circle = Circle::new(Point::new(0.0, 0.0), 1000.0);
        let rect = circle.rect();
        assert!(rect.min().x < 0.0 && rect.max().x > 0.0);
        assert!(rect.min().y < 0.0 && rect.max().y > 0.0);
        // 1km is roughly 0.009 degrees at the equator.
        assert!((rect.max().y - 0.009).abs() < 1e-3);
    }

    #[test]
    fn test_circle_contains_nearby_point() {
        let circle = Object::from(Circle::new(Point::new(0.0, 0.0), 10_000.0));
        let near = Object::from(Point::new(0.01, 0.01));
        let far = Object::from(Point::new(1.0, 1.0));

        assert!(near.within(&circle));
        assert!(!far.within(&circle));
        assert!(circle.intersects(&near));
        assert!(!circle.intersects(&far));
    }

    #[test]
    fn test_degenerate_circle() {
        let circle = Circle::new(Point::new(3.0, 4.0), 0.0);
        let rect = circle.rect();
        assert_eq!(rect.min(), coord! { x: 3.0, y: 4.0 });
        assert_eq!(rect.max(), coord! { x: 3.0, y: 4.0 });

        let obj = Object::from(circle);
        assert!(!obj.is_empty());
        assert_eq!(obj.num_points(), 1);
    }

    #[test]
    fn test_degenerate_circle_behaves_as_point() {
        let center = Point::new(3.0, 4.0);
        let circle = Object::from(Circle::new(center, 0.0));
        let point = Object::from(center);

        assert!(circle.within(&point));
        assert!(point.within(&circle));
        assert!(circle.intersects(&point));
        assert!(point.intersects(&circle));

        let around = Object::from(square(0.0, 10.0));
        assert!(circle.within(&around));
        assert!(circle.intersects(&around));

        let elsewhere = Object::from(Point::new(5.0, 5.0));
        assert!(!circle.within(&elsewhere));
        assert!(!circle.intersects(&elsewhere));
    }
}
