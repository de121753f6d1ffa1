//! Common math types shared by every entity kind.

use serde::{Deserialize, Serialize};

pub use glam::Quat;

/// 3D vector. The arena is laid out with x across its width, y along its
/// length and z pointing up.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        glam::Vec3::from(*self).length()
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// Diagonal 3x3 matrix, used as a non-uniform scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Diag3x3 {
    pub d0: f32,
    pub d1: f32,
    pub d2: f32,
}

impl Default for Diag3x3 {
    fn default() -> Self {
        Self::UNIT
    }
}

impl Diag3x3 {
    pub const UNIT: Self = Self { d0: 1.0, d1: 1.0, d2: 1.0 };

    pub fn new(d0: f32, d1: f32, d2: f32) -> Self {
        Self { d0, d1, d2 }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.d0, self.d1, self.d2)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn height(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Strict overlap: boxes that only share a face do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 7.0);
        assert_eq!(sum.z, 9.0);

        let diff = b - a;
        assert_eq!(diff.x, 3.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);
    }

    #[test]
    fn test_glam_conversion_keeps_axes() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        let g = glam::Vec3::from(v);
        assert_eq!((g.x, g.y, g.z), (3.0, -4.0, 12.0));
        assert_eq!(Vec3::from(g), v);
        assert_relative_eq!(v.length(), 13.0);
        assert_eq!(glam::Vec3::from(Vec3::UP), glam::Vec3::Z);
    }

    #[test]
    fn test_bounding_box_touching_faces_do_not_overlap() {
        let a = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let b = BoundingBox::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = BoundingBox::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(2.0, 2.0, 2.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.contains(&Vec3::new(0.5, 0.5, 0.5)));
    }
}
