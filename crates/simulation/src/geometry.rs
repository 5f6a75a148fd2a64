//! Pure geometric helpers shared by placement and edge pruning.

use bevy::math::Vec2;

/// Does the segment `a`-`b` pass within `radius` of `center`?
///
/// Projects `center` onto the infinite line through `a` and `b`, clamps the
/// projection parameter to `[0, 1]` so the closest point stays on the
/// segment, and compares squared distances. A degenerate segment (`a == b`)
/// degrades to a point/circle test.
pub fn segment_intersects_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    let closest = a + ab * t;
    closest.distance_squared(center) <= radius * radius
}

/// Axis-wise exclusion test: `true` when `a` and `b` are within `radius` of
/// each other on **both** axes. This is the placement proximity rule — an
/// exclusion window, not Euclidean distance.
pub fn within_exclusion_zone(a: Vec2, b: Vec2, radius: f32) -> bool {
    (a.x - b.x).abs() < radius && (a.y - b.y).abs() < radius
}
