use cgmath::{InnerSpace, Vector3};
use std::ops::{Index, Neg};

pub type Vec3 = Vector3<f64>;

/// Index of the front (positive) side of a plane.
pub const SIDE_FRONT: usize = 0;
/// Index of the back (negative) side of a plane.
pub const SIDE_BACK: usize = 1;

// Magic numbers for numerical precision.

/// Two plane normals are the same if every component is within this distance.
pub const NORMAL_EPSILON: f64 = 0.00001;
/// Two plane distances are the same if within this distance.
pub const DIST_EPSILON: f64 = 0.0001;

/// Which side of a plane a brush face is generated on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneSide {
    Front,
    Back,
}

impl PlaneSide {
    pub fn index(self) -> usize {
        match self {
            PlaneSide::Front => SIDE_FRONT,
            PlaneSide::Back => SIDE_BACK,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub dist: f64,
}

impl Plane {
    pub fn new(normal: Vec3, dist: f64) -> Plane {
        Plane { normal, dist }
    }

    /// Signed distance of `point` from the plane, positive in front.
    pub fn distance_to(&self, point: &Vec3) -> f64 {
        self.normal.dot(*point) - self.dist
    }

    /// Axis of the largest normal component. Ties go to the lowest axis.
    pub fn major_axis(&self) -> usize {
        let mut axis = 0;
        for i in 1..3 {
            if self.normal[i].abs() > self.normal[axis].abs() {
                axis = i;
            }
        }
        axis
    }

    /// A plane is "positive" when its largest normal component points up its axis.
    pub fn is_positive(&self) -> bool {
        self.normal[self.major_axis()] > 0.0
    }

    /// Returns the positive orientation of this plane, and whether it had to be flipped.
    pub fn to_positive(&self) -> (Plane, bool) {
        if self.is_positive() {
            (*self, false)
        } else {
            (-*self, true)
        }
    }

    pub fn is_equal(&self, other: &Plane) -> bool {
        (self.normal.x - other.normal.x).abs() < NORMAL_EPSILON
            && (self.normal.y - other.normal.y).abs() < NORMAL_EPSILON
            && (self.normal.z - other.normal.z).abs() < NORMAL_EPSILON
            && (self.dist - other.dist).abs() < DIST_EPSILON
    }
}

impl Neg for Plane {
    type Output = Plane;

    fn neg(self) -> Plane {
        Plane {
            normal: -self.normal,
            dist: -self.dist,
        }
    }
}

/// Plane table shared by split nodes and brush sides.
///
/// Planes are stored in pairs: the even index holds the positive orientation
/// and the odd index its negation, so `plane_num ^ 1` always names the flipped
/// plane and `plane_num & !1` the positive one.
#[derive(Clone, Debug, Default)]
pub struct PlaneSet {
    planes: Vec<Plane>,
}

impl PlaneSet {
    pub fn new() -> PlaneSet {
        PlaneSet { planes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn find(&self, plane: &Plane) -> Option<usize> {
        self.planes.iter().position(|p| p.is_equal(plane))
    }

    /// Returns the index of `plane`, adding the pair if it isn't known yet.
    pub fn find_or_add(&mut self, plane: Plane) -> usize {
        if let Some(index) = self.find(&plane) {
            return index;
        }

        let (positive, flipped) = plane.to_positive();
        let index = self.planes.len();
        self.planes.push(positive);
        self.planes.push(-positive);

        if flipped {
            index + 1
        } else {
            index
        }
    }

    /// The positive plane of the pair `plane_num` belongs to.
    pub fn positive(&self, plane_num: usize) -> &Plane {
        &self.planes[plane_num & !1]
    }
}

impl Index<usize> for PlaneSet {
    type Output = Plane;

    fn index(&self, index: usize) -> &Plane {
        &self.planes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_set_pairs_test() {
        let mut planes = PlaneSet::new();
        let negative = planes.find_or_add(Plane::new(Vec3::new(-1.0, 0.0, 0.0), -8.0));
        assert_eq!(negative, 1);
        assert_eq!(planes.find_or_add(Plane::new(Vec3::new(1.0, 0.0, 0.0), 8.0)), 0);
        assert_eq!(planes[0].dist, 8.0);
        assert_eq!(planes[negative ^ 1], *planes.positive(negative));
        assert_eq!(planes.len(), 2);
    }

    #[test]
    fn plane_to_positive_test() {
        let (plane, flipped) = Plane::new(Vec3::new(0.0, -0.6, 0.8), 4.0).to_positive();
        assert!(!flipped);
        assert_eq!(plane.dist, 4.0);

        let (plane, flipped) = Plane::new(Vec3::new(0.0, 0.6, -0.8), 4.0).to_positive();
        assert!(flipped);
        assert_eq!(plane.normal, Vec3::new(0.0, -0.6, 0.8));
        assert_eq!(plane.dist, -4.0);
    }
}
