use arrayvec::ArrayVec;
use cgmath::InnerSpace;
use crate::box_::BoundingBox;
use crate::math::{Plane, Vec3};

/// Maximum points a winding may have.
pub const MAX_POINTS_ON_WINDING: usize = 64;

/// Results from Winding.split_with_plane, describing the result of splitting
/// a winding with an arbitrary plane.
#[derive(Debug, PartialEq)]
pub enum SplitType {
    /// Winding wasn't split, every point lies on the plane.
    Coplanar,
    /// Winding wasn't split, but is entirely in front of the plane.
    Front,
    /// Winding wasn't split, but is entirely in back of the plane.
    Back,
    /// Winding was split into a front and a back fragment.
    Split(Winding, Winding),
}

#[derive(Clone, Copy, PartialEq)]
enum PointSide {
    Front,
    Back,
    On,
}

/// An ordered, closed, convex polygon in 3D. Points wind counter-clockwise
/// when seen from the front of the plane the winding lies on.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Winding {
    pub points: ArrayVec<Vec3, MAX_POINTS_ON_WINDING>,
}

impl Winding {

    pub fn new() -> Winding {
        Winding { points: ArrayVec::new() }
    }

    /// Points beyond `MAX_POINTS_ON_WINDING` are dropped.
    pub fn from_points(points: &[Vec3]) -> Winding {
        let mut winding = Winding::new();
        for point in points.iter().take(MAX_POINTS_ON_WINDING) {
            winding.points.push(*point);
        }
        winding
    }

    /// A square of half-size `extent` lying on `plane`, centered on the point
    /// of the plane closest to the origin.
    pub fn base_for_plane(plane: &Plane, extent: f64) -> Winding {
        let up = if plane.major_axis() == 2 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };

        let up = (up - plane.normal * up.dot(plane.normal)).normalize() * extent;
        let right = up.cross(plane.normal).normalize() * extent;
        let origin = plane.normal * plane.dist;

        Winding::from_points(&[
            origin - right - up,
            origin + right - up,
            origin + right + up,
            origin - right + up,
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.points.iter()
    }

    pub fn area(&self) -> f64 {
        let mut area = 0.0;
        for i in 2..self.points.len() {
            let d1 = self.points[i - 1] - self.points[0];
            let d2 = self.points[i] - self.points[0];
            area += d1.cross(d2).magnitude();
        }
        area * 0.5
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new_from_points(&self.points)
    }

    /// Unit normal from the winding order, or None for a collapsed winding.
    pub fn normal(&self) -> Option<Vec3> {
        let mut normal = Vec3::new(0.0, 0.0, 0.0);
        for i in 2..self.points.len() {
            normal += (self.points[i - 1] - self.points[0]).cross(self.points[i] - self.points[0]);
        }
        if normal.magnitude2() < f64::EPSILON {
            return None;
        }
        Some(normal.normalize())
    }

    /// Windings under `min_area`, or with fewer than three points, are noise.
    pub fn is_tiny(&self, min_area: f64) -> bool {
        self.points.len() < 3 || self.area() < min_area
    }

    /// Split with plane. Points within `epsilon` of the plane are on it and go to both fragments.
    pub fn split_with_plane(&self, plane: &Plane, epsilon: f64) -> SplitType {
        let mut dists: ArrayVec<f64, { MAX_POINTS_ON_WINDING + 1 }> = ArrayVec::new();
        let mut sides: ArrayVec<PointSide, { MAX_POINTS_ON_WINDING + 1 }> = ArrayVec::new();
        let mut front_count = 0usize;
        let mut back_count = 0usize;

        for point in &self.points {
            let dist = plane.distance_to(point);
            let side = if dist > epsilon {
                front_count += 1;
                PointSide::Front
            } else if dist < -epsilon {
                back_count += 1;
                PointSide::Back
            } else {
                PointSide::On
            };
            dists.push(dist);
            sides.push(side);
        }

        if front_count == 0 && back_count == 0 {
            return SplitType::Coplanar;
        }
        if front_count == 0 {
            return SplitType::Back;
        }
        if back_count == 0 {
            return SplitType::Front;
        }

        dists.push(dists[0]);
        sides.push(sides[0]);

        let mut front = Winding::new();
        let mut back = Winding::new();
        let mut front_overflow = false;
        let mut back_overflow = false;

        for i in 0..self.points.len() {
            let p1 = self.points[i];

            match sides[i] {
                PointSide::On => {
                    front_overflow |= front.points.try_push(p1).is_err();
                    back_overflow |= back.points.try_push(p1).is_err();
                    continue;
                }
                PointSide::Front => front_overflow |= front.points.try_push(p1).is_err(),
                PointSide::Back => back_overflow |= back.points.try_push(p1).is_err(),
            }

            if sides[i + 1] == PointSide::On || sides[i + 1] == sides[i] {
                continue;
            }

            // Generate a split point, snapping axial planes exactly onto the plane.
            let p2 = self.points[(i + 1) % self.points.len()];
            let dot = dists[i] / (dists[i] - dists[i + 1]);
            let mut mid = Vec3::new(0.0, 0.0, 0.0);
            for j in 0..3 {
                mid[j] = if plane.normal[j] == 1.0 {
                    plane.dist
                } else if plane.normal[j] == -1.0 {
                    -plane.dist
                } else {
                    p1[j] + dot * (p2[j] - p1[j])
                };
            }

            front_overflow |= front.points.try_push(mid).is_err();
            back_overflow |= back.points.try_push(mid).is_err();
        }

        // An overflowed fragment comes back empty, which counts as tiny.
        if front_overflow {
            log::warn!("front fragment exceeded {} points, dropped", MAX_POINTS_ON_WINDING);
            front.points.clear();
        }
        if back_overflow {
            log::warn!("back fragment exceeded {} points, dropped", MAX_POINTS_ON_WINDING);
            back.points.clear();
        }

        SplitType::Split(front, back)
    }

    /// Cut the winding into its front and back fragments.
    ///
    /// A winding lying entirely on the plane goes to the front when `keep_on`
    /// is set, and to the back otherwise. A fragment that overflowed
    /// `MAX_POINTS_ON_WINDING` is returned empty rather than as None.
    pub fn clip(&self, plane: &Plane, epsilon: f64, keep_on: bool) -> (Option<Winding>, Option<Winding>) {
        match self.split_with_plane(plane, epsilon) {
            SplitType::Coplanar => {
                if keep_on {
                    (Some(self.clone()), None)
                } else {
                    (None, Some(self.clone()))
                }
            }
            SplitType::Front => (Some(self.clone()), None),
            SplitType::Back => (None, Some(self.clone())),
            SplitType::Split(front, back) => (Some(front), Some(back)),
        }
    }

    pub fn clip_front(&self, plane: &Plane, epsilon: f64, keep_on: bool) -> Option<Winding> {
        self.clip(plane, epsilon, keep_on).0.filter(|w| !w.is_empty())
    }

    pub fn clip_back(&self, plane: &Plane, epsilon: f64, keep_on: bool) -> Option<Winding> {
        self.clip(plane, epsilon, keep_on).1.filter(|w| !w.is_empty())
    }
}
