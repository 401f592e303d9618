use num::Integer;
use std::iter::{IntoIterator, Iterator};

use super::{
    common::{FloatValueType, ValueType},
    point::{Point2, Point3},
    ray::Ray,
    vector::{Vec2, Vec3},
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Bounding_Boxes.html

/// Two-dimensional bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2<T>
where
    T: ValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Point2<T>,
    /// The maximum extent of the bounds.
    pub p_max: Point2<T>,
}

/// Three-dimensional bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T>
where
    T: ValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Point3<T>,
    /// The maximum extent of the bounds.
    pub p_max: Point3<T>,
}

impl<T> Bounds2<T>
where
    T: ValueType,
{
    /// Creates a new `Bounds2`.
    pub fn new(p_min: Point2<T>, p_max: Point2<T>) -> Self {
        Self { p_min, p_max }
    }

    /// Returns the vector from the minimum to the maximum extent.
    #[inline]
    pub fn diagonal(&self) -> Vec2<T> {
        self.p_max - self.p_min
    }

    /// Calculates the area of this `Bounds2`
    #[inline]
    pub fn area(&self) -> T {
        let d = self.diagonal();
        d.x * d.y
    }

    /// Returns the extent along the x-axis.
    #[inline]
    pub fn width(&self) -> T {
        self.p_max.x - self.p_min.x
    }

    /// Returns the extent along the y-axis.
    #[inline]
    pub fn height(&self) -> T {
        self.p_max.y - self.p_min.y
    }
}

/// A row-by-row iterator over the [`Point2`]s in a `Bounds2`.
/// Starts from `p_min` and excludes the upper bounds.
pub struct Bounds2IntoIter<T>
where
    T: ValueType + Integer,
{
    bb: Bounds2<T>,
    curr: Point2<T>,
}

impl<T> IntoIterator for Bounds2<T>
where
    T: ValueType + Integer,
{
    type Item = Point2<T>;
    type IntoIter = Bounds2IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        assert!(
            self.p_min.x < self.p_max.x && self.p_min.y < self.p_max.y,
            "Bounds2 with a dimension <= 0"
        );
        Bounds2IntoIter {
            bb: self,
            curr: self.p_min,
        }
    }
}

impl<T> Iterator for Bounds2IntoIter<T>
where
    T: ValueType + Integer,
{
    type Item = Point2<T>;

    fn next(&mut self) -> Option<Self::Item> {
        // We exclude the max bound
        let ret = if self.curr.y >= self.bb.p_max.y {
            None
        } else {
            Some(self.curr)
        };

        if ret.is_some() {
            self.curr.x += T::one();
            // We exclude the max bound
            if self.curr.x >= self.bb.p_max.x {
                self.curr.x = self.bb.p_min.x;
                self.curr.y += T::one();
            }
        }

        ret
    }
}

impl<T> Bounds3<T>
where
    T: ValueType,
{
    /// Creates a new `Bounds3`.
    pub fn new(p_min: Point3<T>, p_max: Point3<T>) -> Self {
        Self { p_min, p_max }
    }

    /// Returns the vector from the minimum to the maximum extent.
    #[inline]
    pub fn diagonal(&self) -> Vec3<T> {
        self.p_max - self.p_min
    }

    /// Calculates the volume of this `Bounds3`
    #[inline]
    pub fn volume(&self) -> T {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Checks if `p` is inside this `Bounds3`.
    #[inline]
    pub fn inside(&self, p: Point3<T>) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }
}

impl<T> Bounds3<T>
where
    T: FloatValueType,
{
    /// Finds the parametric range of `ray` that overlaps this `Bounds3`.
    ///
    /// The range is clipped to `[0, ray.t_max]`; `None` if the ray misses.
    pub fn intersections(&self, ray: Ray<T>) -> Option<(T, T)> {
        let mut t0 = T::zero();
        let mut t1 = ray.t_max;

        // Slab test, one axis at a time
        for i in 0..3 {
            let inv_d = T::one() / ray.d[i];
            let mut t_near = (self.p_min[i] - ray.o[i]) * inv_d;
            let mut t_far = (self.p_max[i] - ray.o[i]) * inv_d;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }
}
