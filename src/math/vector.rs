use super::{
    common::{
        impl_approx, impl_assign_op, impl_binary_op, impl_index, impl_neg, impl_scalar_assign_op,
        impl_scalar_op, FloatValueType, ValueType,
    },
    normal::Normal,
};
use serde::{Deserialize, Serialize};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html

/// Generic two-component vector
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Vec2<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
}

/// Generic three-component vector
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Vec3<T>
where
    T: ValueType,
{
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vec2<T>
where
    T: ValueType,
{
    /// Creates a new `Vec2`.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T) -> Self {
        let v = Self { x, y };
        debug_assert!(!v.has_nans());
        v
    }

    /// Creates a new `Vec2` of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
        }
    }

    /// Creates a new `Vec2` of ones.
    pub fn ones() -> Self {
        Self {
            x: T::one(),
            y: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.to_f64().unwrap_or(f64::NAN).is_nan() || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns the dot product of the two vectors.
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Returns the vector's squared length.
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Returns the component-wise minimum of the two vectors.
    pub fn min(&self, other: Self) -> Self {
        Self {
            x: self.x.mini(other.x),
            y: self.y.mini(other.y),
        }
    }

    /// Returns the component-wise maximum of the two vectors.
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.maxi(other.x),
            y: self.y.maxi(other.y),
        }
    }
}

impl<T> Vec2<T>
where
    T: FloatValueType,
{
    /// Returns the vector's length.
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }
}

impl<T> Vec3<T>
where
    T: ValueType,
{
    /// Creates a new `Vec3`.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(x: T, y: T, z: T) -> Self {
        let v = Self { x, y, z };
        debug_assert!(!v.has_nans());
        v
    }

    /// Creates a new `Vec3` of zeros.
    pub fn zeros() -> Self {
        Self {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }

    /// Creates a new `Vec3` of ones.
    pub fn ones() -> Self {
        Self {
            x: T::one(),
            y: T::one(),
            z: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.y.to_f64().unwrap_or(f64::NAN).is_nan()
            || self.z.to_f64().unwrap_or(f64::NAN).is_nan()
    }

    /// Returns the dot product of the two vectors.
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product of the two vectors.
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns the vector's squared length.
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Returns the component-wise minimum of the two vectors.
    pub fn min(&self, other: Self) -> Self {
        Self {
            x: self.x.mini(other.x),
            y: self.y.mini(other.y),
            z: self.z.mini(other.z),
        }
    }

    /// Returns the component-wise maximum of the two vectors.
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.maxi(other.x),
            y: self.y.maxi(other.y),
            z: self.z.maxi(other.z),
        }
    }

    /// Returns the value of the maximum component.
    pub fn max_comp(&self) -> T {
        self.x.maxi(self.y.maxi(self.z))
    }
}

impl<T> Vec3<T>
where
    T: FloatValueType,
{
    /// Returns the vector's length.
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }

    /// Returns the normalized vector.
    pub fn normalized(&self) -> Self {
        *self / self.len()
    }

    /// Returns the component-wise absolute value.
    pub fn abs(&self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }

    /// Returns the dot product of this vector and a [`Normal`].
    pub fn dot_n(&self, n: Normal<T>) -> T {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl<T> From<Normal<T>> for Vec3<T>
where
    T: FloatValueType,
{
    fn from(n: Normal<T>) -> Self {
        Self {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

impl_binary_op!(Add, add, +, Vec2: ValueType, x, y);
impl_binary_op!(Sub, sub, -, Vec2: ValueType, x, y);
impl_scalar_op!(Mul, mul, *, Vec2: ValueType, x, y);
impl_scalar_op!(Div, div, /, Vec2: ValueType, x, y);
impl_assign_op!(AddAssign, add_assign, +=, Vec2: ValueType, x, y);
impl_assign_op!(SubAssign, sub_assign, -=, Vec2: ValueType, x, y);
impl_scalar_assign_op!(MulAssign, mul_assign, *=, Vec2: ValueType, x, y);
impl_scalar_assign_op!(DivAssign, div_assign, /=, Vec2: ValueType, x, y);
impl_neg!(Vec2, x, y);
impl_index!(Vec2: ValueType, 0 => x, 1 => y);
impl_approx!(Vec2: ValueType, x, y);

impl_binary_op!(Add, add, +, Vec3: ValueType, x, y, z);
impl_binary_op!(Sub, sub, -, Vec3: ValueType, x, y, z);
impl_scalar_op!(Mul, mul, *, Vec3: ValueType, x, y, z);
impl_scalar_op!(Div, div, /, Vec3: ValueType, x, y, z);
impl_assign_op!(AddAssign, add_assign, +=, Vec3: ValueType, x, y, z);
impl_assign_op!(SubAssign, sub_assign, -=, Vec3: ValueType, x, y, z);
impl_scalar_assign_op!(MulAssign, mul_assign, *=, Vec3: ValueType, x, y, z);
impl_scalar_assign_op!(DivAssign, div_assign, /=, Vec3: ValueType, x, y, z);
impl_neg!(Vec3, x, y, z);
impl_index!(Vec3: ValueType, 0 => x, 1 => y, 2 => z);
impl_approx!(Vec3: ValueType, x, y, z);
