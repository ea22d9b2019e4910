use glam::DVec2;

/// A projected polyline/polygon in canvas pixels.
///
/// `mirror` is the signed antimeridian crossing count in effect when the
/// polygon was started: 0 for the globe copy around the view center, +1 for
/// the copy reached by crossing the seam eastwards, and so on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenPolygon {
    points: Vec<DVec2>,
    mirror: i32,
}

impl ScreenPolygon {
    pub fn new(mirror: i32) -> Self {
        Self {
            points: Vec::new(),
            mirror,
        }
    }

    pub fn from_points(points: Vec<DVec2>, mirror: i32) -> Self {
        Self { points, mirror }
    }

    #[inline(always)]
    pub fn push(&mut self, point: DVec2) {
        self.points.push(point);
    }

    /// Push unless the point repeats the last one
    #[inline(always)]
    pub fn push_unique(&mut self, point: DVec2) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn push_front(&mut self, point: DVec2) {
        self.points.insert(0, point);
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn into_points(self) -> Vec<DVec2> {
        self.points
    }

    pub fn first(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn mirror(&self) -> i32 {
        self.mirror
    }

    pub fn with_mirror(mut self, mirror: i32) -> Self {
        self.mirror = mirror;
        self
    }

    /// Append `other`, dropping its first point if it repeats our last one
    pub fn join(mut self, other: ScreenPolygon) -> ScreenPolygon {
        let mut rest = other.points.into_iter().peekable();
        if rest.peek().is_some_and(|p| self.points.last() == Some(p)) {
            rest.next();
        }
        self.points.extend(rest);
        self
    }

    /// Copy shifted horizontally by `dx` pixels
    pub fn translated(&self, dx: f64) -> ScreenPolygon {
        let offset = DVec2::new(dx, 0.0);
        ScreenPolygon {
            points: self.points.iter().map(|p| *p + offset).collect(),
            mirror: self.mirror,
        }
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Horizontal extent in pixels
    pub fn x_span(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| max.x - min.x)
    }
}

/// Canvas rectangle holding valid map pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MapShape {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Rough test whether a segment's bounding box touches the shape
    pub fn touches_segment(&self, a: DVec2, b: DVec2) -> bool {
        let min = a.min(b);
        let max = a.max(b);
        max.x >= self.left() && min.x <= self.right() && max.y >= self.top() && min.y <= self.bottom()
    }
}
