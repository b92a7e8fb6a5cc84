//! Collision detection for axis-aligned boxes
//!
//! Every collidable pair in the game (ball/paddle, ball/brick, pickup/paddle)
//! is tested as two AABBs. Side resolution uses the penetration depth along
//! each axis: the shallower axis is the collision normal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and a size
    pub fn from_rect(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Square box enclosing a circle
    pub fn from_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Strict AABB overlap test (touching edges do not count)
#[inline]
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Minimum penetration depth along each axis: `(overlap_x, overlap_y)`
#[inline]
pub fn overlap_amounts(a: &Aabb, b: &Aabb) -> (f32, f32) {
    let overlap_x = (a.right() - b.left()).min(b.right() - a.left());
    let overlap_y = (a.bottom() - b.top()).min(b.bottom() - a.top());
    (overlap_x, overlap_y)
}

/// Collision normal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Pick the collision normal: the axis with the smaller overlap.
/// Ties resolve vertically.
pub fn collision_axis(overlap: (f32, f32)) -> Axis {
    let (overlap_x, overlap_y) = overlap;
    if overlap_x < overlap_y {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Reverse the velocity component along `axis`, keep the other one
#[inline]
pub fn reflect_axis(vel: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::Horizontal => Vec2::new(-vel.x, vel.y),
        Axis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

/// Bounce a circle off the left, right and top field walls.
///
/// The position is clamped back onto the boundary and the velocity component
/// is pointed away from the wall, so a ball that is already leaving is never
/// turned back in. Returns true if any wall was hit.
pub fn collide_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, field_width: f32) -> bool {
    let mut hit = false;

    if pos.x + radius > field_width {
        pos.x = field_width - radius;
        vel.x = -vel.x.abs();
        hit = true;
    }
    if pos.x - radius < 0.0 {
        pos.x = radius;
        vel.x = vel.x.abs();
        hit = true;
    }
    if pos.y - radius < 0.0 {
        pos.y = radius;
        vel.y = vel.y.abs();
        hit = true;
    }

    hit
}

/// Check if a circle's bottom edge reached the field bottom
#[inline]
pub fn touches_ground(pos: Vec2, radius: f32, field_height: f32) -> bool {
    pos.y + radius >= field_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_rect(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_intersects_overlapping() {
        assert!(intersects(&rect(0.0, 0.0, 10.0, 10.0), &rect(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_intersects_touching_edges_miss() {
        assert!(!intersects(&rect(0.0, 0.0, 10.0, 10.0), &rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!intersects(&rect(0.0, 0.0, 10.0, 10.0), &rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_overlap_amounts() {
        let ball = Aabb::from_circle(Vec2::new(130.0, 79.0), 10.0);
        let brick = rect(100.0, 50.0, 60.0, 20.0);
        let (ox, oy) = overlap_amounts(&ball, &brick);
        assert!((ox - 40.0).abs() < 1e-4);
        assert!((oy - 1.0).abs() < 1e-4);
        assert_eq!(collision_axis((ox, oy)), Axis::Vertical);
    }

    #[test]
    fn test_side_hit_resolves_horizontally() {
        let ball = Aabb::from_circle(Vec2::new(92.0, 60.0), 10.0);
        let brick = rect(100.0, 50.0, 60.0, 20.0);
        let overlap = overlap_amounts(&ball, &brick);
        assert_eq!(collision_axis(overlap), Axis::Horizontal);
    }

    #[test]
    fn test_reflect_axis() {
        let vel = Vec2::new(120.0, -80.0);
        assert_eq!(reflect_axis(vel, Axis::Horizontal), Vec2::new(-120.0, -80.0));
        assert_eq!(reflect_axis(vel, Axis::Vertical), Vec2::new(120.0, 80.0));
    }

    #[test]
    fn test_right_wall_clamps_and_reflects() {
        let mut pos = Vec2::new(497.0, 200.0);
        let mut vel = Vec2::new(150.0, 50.0);
        assert!(collide_walls(&mut pos, &mut vel, 10.0, 500.0));
        assert_eq!(pos.x, 490.0);
        assert_eq!(vel, Vec2::new(-150.0, 50.0));
    }

    #[test]
    fn test_top_wall_clamps_and_reflects() {
        let mut pos = Vec2::new(200.0, 4.0);
        let mut vel = Vec2::new(0.0, -200.0);
        assert!(collide_walls(&mut pos, &mut vel, 10.0, 500.0));
        assert_eq!(pos.y, 10.0);
        assert_eq!(vel.y, 200.0);
    }

    #[test]
    fn test_no_wall_contact() {
        let mut pos = Vec2::new(250.0, 200.0);
        let mut vel = Vec2::new(100.0, 100.0);
        assert!(!collide_walls(&mut pos, &mut vel, 10.0, 500.0));
        assert_eq!(vel, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_ground_contact() {
        assert!(touches_ground(Vec2::new(0.0, 390.0), 10.0, 400.0));
        assert!(!touches_ground(Vec2::new(0.0, 389.0), 10.0, 400.0));
    }
}
