use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Unit vector, or zero for vectors too short to have a direction.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if !len.is_finite() || len < 1e-12 {
            return Self::zero();
        }
        Self::new(self.x / len, self.y / len)
    }

    /// Left-hand normal (rotated +90 degrees).
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Shortest distance from `p` to the closed segment `a`-`b`.
///
/// A degenerate segment degrades to the point distance `|p - a|`.
pub fn distance_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let l2 = ab.dot(ab);
    if l2 == 0.0 {
        return p.distance(a);
    }
    let t = (p - a).dot(ab) / l2;
    if t < 0.0 {
        return p.distance(a);
    }
    if t > 1.0 {
        return p.distance(b);
    }
    p.distance(a + ab * t)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2 {
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include_point(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }
}

/// Affine 2D transform, row-major `[m11 m12 tx; m21 m22 ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    m11: f64,
    m12: f64,
    m21: f64,
    m22: f64,
    tx: f64,
    ty: f64,
}

impl Transform2D {
    /// Placement of a block instance: the block's `base` point lands on
    /// `location`, after scaling and then rotating about it.
    pub fn from_insert(base: Vec2, location: Vec2, scale: Vec2, rotation_deg: f64) -> Self {
        let r = rotation_deg.to_radians();
        let (sin, cos) = r.sin_cos();
        let m11 = cos * scale.x;
        let m12 = -sin * scale.y;
        let m21 = sin * scale.x;
        let m22 = cos * scale.y;

        Self {
            m11,
            m12,
            m21,
            m22,
            tx: location.x - (m11 * base.x + m12 * base.y),
            ty: location.y - (m21 * base.x + m22 * base.y),
        }
    }

    /// `self ∘ other`: applies `other` first.
    pub fn compose(&self, other: &Transform2D) -> Self {
        Self {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            tx: self.m11 * other.tx + self.m12 * other.ty + self.tx,
            ty: self.m21 * other.tx + self.m22 * other.ty + self.ty,
        }
    }

    pub fn apply_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m11 * p.x + self.m12 * p.y + self.tx,
            self.m21 * p.x + self.m22 * p.y + self.ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_segment_distance_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(3.0, distance_point_to_segment(Vec2::new(5.0, 3.0), a, b));
        assert_eq!(5.0, distance_point_to_segment(Vec2::new(-3.0, 4.0), a, b));
        assert_eq!(2.0, distance_point_to_segment(Vec2::new(12.0, 0.0), a, b));
        assert_eq!(5.0, distance_point_to_segment(Vec2::new(3.0, 4.0), a, a));
    }

    #[test]
    fn insert_transform_rotates_about_base_point() {
        let tx = Transform2D::from_insert(
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(2.0, 2.0),
            90.0,
        );
        let p = tx.apply_point(Vec2::new(2.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 12.0).abs() < 1e-9);
    }
}
