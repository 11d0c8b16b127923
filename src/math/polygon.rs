//! Helpers for simple polygons given as closed vertex loops.
//! The last vertex connects back to the first; it is never repeated.

use glam::Vec2;

/// Sine of the turn angle below which a corner counts as straight.
const CONVEX_EPSILON: f32 = 1e-4;

/// Shoelace area. Positive for counter-clockwise loops in a y-up frame.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 { return 0.0 }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.perp_dot(b);
    }
    twice_area * 0.5
}

pub fn area(points: &[Vec2]) -> f32 {
    signed_area(points).abs()
}

pub fn is_ccw(points: &[Vec2]) -> bool {
    signed_area(points) > 0.0
}

/// Reverses the loop in place if it winds clockwise.
pub fn ensure_ccw(points: &mut [Vec2]) {
    if signed_area(points) < 0.0 {
        points.reverse();
    }
}

/// Area-weighted centroid. Falls back to the vertex average for degenerate loops.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    let n = points.len();
    if n == 0 { return Vec2::ZERO }
    let signed = signed_area(points);
    if signed.abs() <= f32::EPSILON {
        return points.iter().copied().sum::<Vec2>() / n as f32;
    }
    let mut sum = Vec2::ZERO;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += (a + b) * a.perp_dot(b);
    }
    sum / (6.0 * signed)
}

/// True if every corner of a counter-clockwise loop turns left (or goes straight).
pub fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 { return false }
    for i in 0..n {
        let a = points[(i + n - 1) % n];
        let b = points[i];
        let c = points[(i + 1) % n];
        let ab = b - a;
        let bc = c - b;
        let denominator = ab.length() * bc.length();
        if denominator <= f32::EPSILON { continue }
        if ab.perp_dot(bc) / denominator < -CONVEX_EPSILON {
            return false;
        }
    }
    true
}

/// Even-odd rule. Points exactly on an edge may fall either way.
pub fn point_in_polygon(points: &[Vec2], point: Vec2) -> bool {
    let n = points.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drops vertices closer than `tolerance` to the previously kept one, including across the seam.
pub fn weld_points(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    let mut welded: Vec<Vec2> = Vec::with_capacity(points.len());
    for point in points.iter().copied() {
        if let Some(last) = welded.last() {
            if last.distance(point) < tolerance { continue }
        }
        welded.push(point);
    }
    while welded.len() > 1 && welded[welded.len() - 1].distance(welded[0]) < tolerance {
        welded.pop();
    }
    welded
}

/// Removes vertices lying within `tolerance` of the line through their neighbours.
/// Never reduces the loop below three vertices.
pub fn remove_collinear(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    let mut points = points.to_vec();
    'outer: while points.len() > 3 {
        let n = points.len();
        for i in 0..n {
            let a = points[(i + n - 1) % n];
            let b = points[i];
            let c = points[(i + 1) % n];
            if distance_to_line(b, a, c) < tolerance {
                points.remove(i);
                continue 'outer;
            }
        }
        break;
    }
    points
}

fn distance_to_line(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let length = ab.length();
    if length <= f32::EPSILON {
        return point.distance(a);
    }
    ab.perp_dot(point - a).abs() / length
}

/// True if no two non-adjacent edges of the loop intersect.
pub fn is_simple(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 { return false }
    for i in 0..n {
        let a1 = points[i];
        let a2 = points[(i + 1) % n];
        for j in (i + 1)..n {
            // Adjacent edges share a vertex.
            if j == i + 1 || (i == 0 && j == n - 1) { continue }
            let b1 = points[j];
            let b2 = points[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

/// Proper or touching intersection of segments `p1p2` and `q1q2`.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) &&
       ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1)) ||
    (d2 == 0.0 && on_segment(q1, q2, p2)) ||
    (d3 == 0.0 && on_segment(p1, p2, q1)) ||
    (d4 == 0.0 && on_segment(p1, p2, q2))
}

fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: Vec2, b: Vec2, point: Vec2) -> bool {
    point.x >= a.x.min(b.x) && point.x <= a.x.max(b.x) &&
    point.y >= a.y.min(b.y) && point.y <= a.y.max(b.y)
}
