use crate::math::Vec3;
use std::ops::Index;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
    pub is_valid: bool
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

// An axis-aligned box. Invalid until the first point is added.
impl BoundingBox {

    pub fn new() -> BoundingBox {
        BoundingBox {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(0.0, 0.0, 0.0),
            is_valid: false
        }
    }

    pub fn new_from_min_max(min: Vec3, max: Vec3) -> BoundingBox {
        BoundingBox { min, max, is_valid: true }
    }

    pub fn new_from_points(points: &[Vec3]) -> BoundingBox {
        let mut box_ = BoundingBox::new();
        box_.add_points(points);
        box_
    }

    // Returns the midpoint between the min and max points.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn add_point(&mut self, point: &Vec3) {
        if self.is_valid {
            self.min.x = self.min.x.min(point.x);
            self.min.y = self.min.y.min(point.y);
            self.min.z = self.min.z.min(point.z);
            self.max.x = self.max.x.max(point.x);
            self.max.y = self.max.y.max(point.y);
            self.max.z = self.max.z.max(point.z);
        } else {
            self.min = *point;
            self.max = *point;
            self.is_valid = true;
        }
    }

    pub fn add_points(&mut self, points: &[Vec3]) {
        for point in points {
            self.add_point(point);
        }
    }

    pub fn add_box(&mut self, other: &BoundingBox) {
        if !other.is_valid {
            return;
        }
        if self.is_valid {
            self.add_point(&other.min);
            self.add_point(&other.max);
        } else {
            *self = *other;
        }
    }

    pub fn expand_by(&self, w: f64) -> BoundingBox {
        BoundingBox::new_from_min_max(
            self.min - Vec3::new(w, w, w),
            self.max + Vec3::new(w, w, w)
        )
    }

    /// Invalid, or with zero or negative extent along any axis.
    pub fn is_degenerate(&self) -> bool {
        !self.is_valid || (0..3).any(|i| self.max[i] <= self.min[i])
    }

    /// True if any coordinate lies further than `limit` from the origin.
    pub fn exceeds(&self, limit: f64) -> bool {
        self.is_valid && (0..3).any(|i| self.min[i].abs() > limit || self.max[i].abs() > limit)
    }

}

impl Index<usize> for BoundingBox {
    type Output = Vec3;
    fn index(&self, index: usize) -> &Vec3 {
        match index {
            0 => &self.min,
            1 => &self.max,
            _ => panic!("Index out of bounds")
        }
    }
}
