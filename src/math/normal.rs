use super::{
    common::{impl_approx, impl_index, impl_neg, FloatValueType},
    vector::Vec3,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Normals.html

/// A three-dimensional surface normal
///
/// Note that a `Normal` is not necessarily normalized as it is merely a vector
/// perpendicular to a surface at a position on it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normal<T>
where
    T: FloatValueType,
{
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Normal<T>
where
    T: FloatValueType,
{
    /// Creates a new `Normal`.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T, z: T) -> Self {
        let n = Self { x, y, z };
        debug_assert!(!n.has_nans());
        n
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Calculates the dot product of this `Normal` and a [`Vec3`].
    pub fn dot_v(&self, v: Vec3<T>) -> T {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Calculates the dot product of the two normals.
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the normal's squared length.
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Returns the normal's length.
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }

    /// Returns the normalized normal.
    pub fn normalized(&self) -> Self {
        let l = self.len();
        Self {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    /// Returns this `Normal` flipped to lie in the same hemisphere as `v`.
    pub fn faceforward(&self, v: Vec3<T>) -> Self {
        if self.dot_v(v) < T::zero() {
            -*self
        } else {
            *self
        }
    }
}

impl<T> Default for Normal<T>
where
    T: FloatValueType,
{
    /// The zero normal, marking interactions without surface orientation.
    fn default() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }
}

impl<T> From<Vec3<T>> for Normal<T>
where
    T: FloatValueType,
{
    fn from(v: Vec3<T>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl<T> std::ops::Mul<T> for Normal<T>
where
    T: FloatValueType,
{
    type Output = Self;

    fn mul(self, other: T) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

impl<T> std::ops::MulAssign<T> for Normal<T>
where
    T: FloatValueType,
{
    fn mul_assign(&mut self, other: T) {
        self.x *= other;
        self.y *= other;
        self.z *= other;
    }
}

impl_neg!(Normal, x, y, z);
impl_index!(Normal: FloatValueType, 0 => x, 1 => y, 2 => z);
impl_approx!(Normal: FloatValueType, x, y, z);
