use glam::{Vec2, Vec3};

/// Below this `|r × s|` two directions are treated as parallel and no
/// intersection point is produced.
pub const PARALLEL_EPSILON: f32 = 0.001;

/// World height of every wall's top edge; bottoms sit on the floor (0).
pub const WALL_TOP: f32 = 2.0;

/*------------------------- primitives -------------------------------*/

/// Directed segment: a wall edge or a cast ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    #[inline]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    ClockWise,
    CounterClockWise,
}

/// One static wall of the level.
///
/// `height` is carried along with the map data but the rasteriser always
/// extrudes walls from 0 to 2 world units.
#[derive(Clone, Debug)]
pub struct Wall {
    pub line: Line,
    pub height: f32,
    pub color: Vec3, // RGB, 0‥1
}

impl Wall {
    pub fn new(start: Vec2, end: Vec2, height: f32, color: Vec3) -> Self {
        debug_assert!(start != end, "degenerate wall {start} -> {end}");
        Self {
            line: Line::new(start, end),
            height,
            color,
        }
    }
}

/*------------------------- predicates -------------------------------*/

/// Turn direction of the path `p → q → r`.
///
/// Collinear triples report `ClockWise`.
#[inline]
pub fn orientation(p: Vec2, q: Vec2, r: Vec2) -> Orientation {
    let value = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if value >= 0.0 {
        Orientation::ClockWise
    } else {
        Orientation::CounterClockWise
    }
}

/// Segment straddling test: each segment's endpoints lie on opposite sides
/// of the other one.  Collinear overlaps are not handled.
#[inline]
pub fn has_intersection(l1: &Line, l2: &Line) -> bool {
    let straddles_l1 = orientation(l1.start, l1.end, l2.start) != orientation(l1.start, l1.end, l2.end);
    let straddles_l2 = orientation(l2.start, l2.end, l1.start) != orientation(l2.start, l2.end, l1.end);
    straddles_l1 && straddles_l2
}

/// Crossing point of two segments, `None` when they do not straddle or are
/// (nearly) parallel.
#[inline]
pub fn intersection_point(l1: &Line, l2: &Line) -> Option<Vec2> {
    intersection_point_eps(l1, l2, PARALLEL_EPSILON)
}

/// [`intersection_point`] with an explicit parallel threshold.
pub fn intersection_point_eps(l1: &Line, l2: &Line, parallel_eps: f32) -> Option<Vec2> {
    if !has_intersection(l1, l2) {
        return None;
    }

    let p = l1.start;
    let r = (l1.end - l1.start).normalize();
    let q = l2.start;
    let s = (l2.end - l2.start).normalize();

    let rxs = r.perp_dot(s);
    if rxs.abs() <= parallel_eps {
        return None;
    }

    // p + t·r = q + u·s  ⇒  t = (q − p) × s / (r × s)
    let t = (q - p).perp_dot(s / rxs);
    Some(p + t * r)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
