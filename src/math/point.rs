use super::{
    common::{impl_approx, impl_index, FloatValueType, ValueType},
    vector::{Vec2, Vec3},
};
use serde::{Deserialize, Serialize};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Points.html

/// Generic two-component point
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Point2<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
}

/// Generic three-component point
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Point3<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Point2<T>
where
    T: ValueType,
{
    /// Creates a new `Point2`.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T) -> Self {
        let p = Self { x, y };
        debug_assert!(!p.has_nans());
        p
    }

    /// Creates a new `Point2` of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.to_f64().unwrap_or(f64::NAN).is_nan() || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
    }
}

impl<T> Point3<T>
where
    T: ValueType,
{
    /// Creates a new `Point3`.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T, z: T) -> Self {
        let p = Self { x, y, z };
        debug_assert!(!p.has_nans());
        p
    }

    /// Creates a new `Point3` of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.z.to_f64().unwrap_or(f64::NAN).is_nan()
    }
}

impl<T> Point3<T>
where
    T: FloatValueType,
{
    /// Returns the squared distance between the two points.
    pub fn dist_sqr(&self, other: Self) -> T {
        (*self - other).len_sqr()
    }

    /// Returns the distance between the two points.
    pub fn dist(&self, other: Self) -> T {
        (*self - other).len()
    }
}

impl<T> std::ops::Add<Vec2<T>> for Point2<T>
where
    T: ValueType,
{
    type Output = Self;

    fn add(self, other: Vec2<T>) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T> std::ops::Sub for Point2<T>
where
    T: ValueType,
{
    type Output = Vec2<T>;

    fn sub(self, other: Self) -> Vec2<T> {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<T> std::ops::Sub<Vec2<T>> for Point2<T>
where
    T: ValueType,
{
    type Output = Self;

    fn sub(self, other: Vec2<T>) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<T> std::ops::Mul<T> for Point2<T>
where
    T: ValueType,
{
    type Output = Self;

    fn mul(self, other: T) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl<T> std::ops::Add<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn add(self, other: Vec3<T>) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T> std::ops::Sub<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    type Output = Self;

    fn sub(self, other: Vec3<T>) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T> std::ops::Sub for Point3<T>
where
    T: ValueType,
{
    type Output = Vec3<T>;

    fn sub(self, other: Self) -> Vec3<T> {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl_index!(Point2: ValueType, 0 => x, 1 => y);
impl_approx!(Point2: ValueType, x, y);
impl_index!(Point3: ValueType, 0 => x, 1 => y, 2 => z);
impl_approx!(Point3: ValueType, x, y, z);
