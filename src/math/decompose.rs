//! Convex decomposition of simple polygons.
//!
//! Ear clipping produces a triangulation, then a greedy Hertel-Mehlhorn pass merges
//! neighbouring pieces across shared diagonals while the result stays convex and
//! under the vertex cap. Pieces are returned as counter-clockwise vertex loops.

use derive_more::*;
use glam::Vec2;
use tracing::instrument;
use super::{is_convex, signed_area};

#[derive(Error, Display, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecomposeError {
    #[display(fmt="Polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[display(fmt="Polygon is not simple, no ear left with {remaining} vertices")]
    NotSimple { remaining: usize },
    #[display(fmt="Vertex cap {max_vertices} is below 3")]
    InvalidVertexCap { max_vertices: usize },
}

/// Triangulates a simple counter-clockwise loop into index triples.
pub fn triangulate(points: &[Vec2]) -> Result<Vec<[usize; 3]>, DecomposeError> {
    let n = points.len();
    if n < 3 {
        return Err(DecomposeError::TooFewVertices { count: n });
    }
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let ear = find_ear(points, &remaining)
            .ok_or(DecomposeError::NotSimple { remaining: remaining.len() })?;
        let count = remaining.len();
        let prev = remaining[(ear + count - 1) % count];
        let next = remaining[(ear + 1) % count];
        triangles.push([prev, remaining[ear], next]);
        remaining.remove(ear);
    }
    triangles.push([remaining[0], remaining[1], remaining[2]]);
    Ok(triangles)
}

fn find_ear(points: &[Vec2], remaining: &[usize]) -> Option<usize> {
    let count = remaining.len();
    (0..count).find(|&k| {
        let i0 = remaining[(k + count - 1) % count];
        let i1 = remaining[k];
        let i2 = remaining[(k + 1) % count];
        let (a, b, c) = (points[i0], points[i1], points[i2]);
        if (b - a).perp_dot(c - b) <= f32::EPSILON {
            return false;
        }
        remaining.iter().all(|&j| {
            if j == i0 || j == i1 || j == i2 { return true }
            let q = points[j];
            if q == a || q == b || q == c { return true }
            !point_in_triangle(q, a, b, c)
        })
    })
}

/// Inclusive of the triangle's edges.
fn point_in_triangle(point: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).perp_dot(point - a) >= 0.0 &&
    (c - b).perp_dot(point - b) >= 0.0 &&
    (a - c).perp_dot(point - c) >= 0.0
}

/// Splits a simple counter-clockwise loop into convex loops of at most `max_vertices`.
/// A loop that is already convex and small enough is returned as is.
#[instrument(skip_all)]
pub fn decompose_convex(points: &[Vec2], max_vertices: usize) -> Result<Vec<Vec<Vec2>>, DecomposeError> {
    if max_vertices < 3 {
        return Err(DecomposeError::InvalidVertexCap { max_vertices });
    }
    if points.len() < 3 {
        return Err(DecomposeError::TooFewVertices { count: points.len() });
    }
    if is_convex(points) {
        return split_convex(points, max_vertices);
    }
    let triangles = triangulate(points)?;
    let mut pieces: Vec<Vec<usize>> = triangles
        .into_iter()
        .map(|triangle| triangle.to_vec())
        .collect();
    while merge_once(points, &mut pieces, max_vertices) {}
    log::debug!("Decomposed {} vertices into {} convex pieces", points.len(), pieces.len());
    Ok(pieces
        .into_iter()
        .map(|piece| piece.into_iter().map(|index| points[index]).collect())
        .collect())
}

/// Merges the first mergeable pair of pieces. Returns false once no pair can merge.
fn merge_once(points: &[Vec2], pieces: &mut Vec<Vec<usize>>, max_vertices: usize) -> bool {
    for i in 0..pieces.len() {
        for j in 0..pieces.len() {
            if i == j { continue }
            let Some(merged) = merge_pair(&pieces[i], &pieces[j]) else { continue };
            if merged.len() > max_vertices { continue }
            let merged_points: Vec<Vec2> = merged.iter().map(|&index| points[index]).collect();
            if !is_convex(&merged_points) { continue }
            pieces[i] = merged;
            pieces.remove(j);
            return true;
        }
    }
    false
}

/// Joins two loops sharing the diagonal `a -> b` in `first` and `b -> a` in `second`.
fn merge_pair(first: &[usize], second: &[usize]) -> Option<Vec<usize>> {
    let p = first.len();
    let q = second.len();
    for s in 0..p {
        let a = first[s];
        let b = first[(s + 1) % p];
        let Some(t) = (0..q).find(|&t| second[t] == b && second[(t + 1) % q] == a) else { continue };

        // First loop from b around to a, then the second loop strictly between a and b.
        let mut merged = Vec::with_capacity(p + q - 2);
        merged.extend((0..p).map(|k| first[(s + 1 + k) % p]));
        merged.extend((0..q - 2).map(|k| second[(t + 2 + k) % q]));
        return Some(merged);
    }
    None
}

/// Fans a convex loop into consecutive convex loops of at most `max_vertices`,
/// all sharing the first vertex.
pub fn split_convex(points: &[Vec2], max_vertices: usize) -> Result<Vec<Vec<Vec2>>, DecomposeError> {
    if max_vertices < 3 {
        return Err(DecomposeError::InvalidVertexCap { max_vertices });
    }
    let n = points.len();
    if n < 3 {
        return Err(DecomposeError::TooFewVertices { count: n });
    }
    if n <= max_vertices {
        return Ok(vec![points.to_vec()]);
    }
    let mut pieces = Vec::new();
    let mut start = 1;
    while start < n - 1 {
        let end = (start + max_vertices - 2).min(n - 1);
        let mut piece = Vec::with_capacity(end - start + 2);
        piece.push(points[0]);
        piece.extend_from_slice(&points[start..=end]);
        pieces.push(piece);
        start = end;
    }
    debug_assert!(pieces.iter().all(|piece| signed_area(piece) >= 0.0));
    Ok(pieces)
}

#[cfg(test)]
mod test {
    use glam::Vec2;
    use crate::math::{area, is_convex, weld_points, remove_collinear, ensure_ccw};
    use super::*;

    fn parse_points(points: &str, origin: Vec2) -> Vec<Vec2> {
        points
            .split_whitespace()
            .map(|pair| {
                let (x, y) = pair.split_once(',').unwrap();
                origin + Vec2::new(x.parse().unwrap(), y.parse().unwrap())
            })
            .collect()
    }

    fn assert_partition(original: &[Vec2], pieces: &[Vec<Vec2>], max_vertices: usize) {
        let total: f32 = pieces.iter().map(|piece| area(piece)).sum();
        assert!((total - area(original)).abs() < area(original) * 1e-3, "{total} vs {}", area(original));
        for piece in pieces {
            assert!(piece.len() >= 3 && piece.len() <= max_vertices);
            assert!(is_convex(piece));
        }
    }

    #[test]
    fn triangulates_square() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let triangles = triangulate(&square).unwrap();
        assert_eq!(2, triangles.len());
    }

    #[test]
    fn convex_input_is_kept() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let pieces = decompose_convex(&square, 8).unwrap();
        assert_eq!(vec![square], pieces);
    }

    #[test]
    fn l_shape() {
        let l_shape = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let pieces = decompose_convex(&l_shape, 8).unwrap();
        assert_eq!(2, pieces.len());
        assert_partition(&l_shape, &pieces, 8);
    }

    #[test]
    fn candy_cane_hitbox() {
        // Concave hook from debug_tileset_objects.tsx, tile 4.
        let mut points = parse_points(
            "0,0 -7.70255,-12.0352 -8.98631,-22.7867 -7.54208,-30.8102 -2.24658,-37.8709 5.77691,-41.5617 \
             13.9609,-42.8455 22.1448,-41.8826 28.7241,-39.3151 33.3777,-35.7848 174.27,99.8123 187.108,87.1351 \
             42.2036,-52.3132 33.2173,-58.411 23.2681,-61.139 23.1077,-61.139 14.1213,-60.9785 4.8141,-60.3367 \
             -5.13504,-56.6459 -14.4423,-50.2271 -22.3053,-40.2779 -25.6752,-30.1683 -25.9961,-21.6634 \
             -25.9961,-13.4795 -24.3914,-7.54208 -22.1448,-1.76517 -17.4912,5.29551 -17.4912,5.45598 -14.2818,9.78866",
            Vec2::new(29.5265, 62.9042),
        );
        ensure_ccw(&mut points);
        let cleaned = remove_collinear(&weld_points(&points, 0.5), 0.5);
        assert!(!is_convex(&cleaned));

        let pieces = decompose_convex(&cleaned, 8).unwrap();
        assert!(pieces.len() > 1);
        assert_partition(&cleaned, &pieces, 8);
    }

    #[test]
    fn splits_large_convex() {
        let circle: Vec<Vec2> = (0..20)
            .map(|i| Vec2::from_angle(i as f32 / 20.0 * std::f32::consts::TAU) * 10.0)
            .collect();
        let pieces = split_convex(&circle, 8).unwrap();
        assert_eq!(3, pieces.len());
        assert_partition(&circle, &pieces, 8);
    }

    #[test]
    fn rejects_bad_cap() {
        let triangle = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        assert_eq!(
            Err(DecomposeError::InvalidVertexCap { max_vertices: 2 }),
            decompose_convex(&triangle, 2)
        );
    }
}
