use super::common::{
    impl_approx, impl_assign_op, impl_binary_op, impl_index, impl_neg, impl_scalar_assign_op,
    impl_scalar_op, FloatValueType,
};
use serde::{Deserialize, Serialize};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Color_and_Radiometry/Spectral_Representation

/// A spectral power distribution stored as RGB
///
/// Doubles as a dimensionless reflectance or transmittance coefficient.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Spectrum<T>
where
    T: FloatValueType,
{
    /// The r component of the spd
    pub r: T,
    /// The g component of the spd
    pub g: T,
    /// The b component of the spd
    pub b: T,
}

impl<T> Spectrum<T>
where
    T: FloatValueType,
{
    /// Creates a new `Spectrum`.
    ///
    /// Has a debug assert that checks for NaNs.
    pub fn new(r: T, g: T, b: T) -> Self {
        let s = Self { r, g, b };
        debug_assert!(!s.has_nans());
        s
    }

    /// Creates a new `Spectrum` of zeros.
    pub fn zeros() -> Self {
        Self {
            r: T::zero(),
            g: T::zero(),
            b: T::zero(),
        }
    }

    /// Creates a new `Spectrum` of ones.
    pub fn ones() -> Self {
        Self {
            r: T::one(),
            g: T::one(),
            b: T::one(),
        }
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    /// Returns `true` if all components are zero.
    pub fn is_black(&self) -> bool {
        self.r == T::zero() && self.g == T::zero() && self.b == T::zero()
    }

    /// Returns the CIE luminance of this `Spectrum`.
    pub fn luminance(&self) -> T {
        T::from_f64(0.212_671).unwrap() * self.r
            + T::from_f64(0.715_160).unwrap() * self.g
            + T::from_f64(0.072_169).unwrap() * self.b
    }

    /// Returns this `Spectrum` with each component clamped to `[lo, hi]`.
    pub fn clamped(&self, lo: T, hi: T) -> Self {
        Self {
            r: self.r.maxi(lo).mini(hi),
            g: self.g.maxi(lo).mini(hi),
            b: self.b.maxi(lo).mini(hi),
        }
    }

    /// Returns the component-wise exponential.
    pub fn exp(&self) -> Self {
        Self {
            r: self.r.exp(),
            g: self.g.exp(),
            b: self.b.exp(),
        }
    }

    /// Returns the component-wise square root.
    pub fn sqrt(&self) -> Self {
        Self {
            r: self.r.sqrt(),
            g: self.g.sqrt(),
            b: self.b.sqrt(),
        }
    }

    /// Returns the component-wise minimum of the two distributions.
    pub fn min(&self, other: Self) -> Self {
        Self {
            r: self.r.mini(other.r),
            g: self.g.mini(other.g),
            b: self.b.mini(other.b),
        }
    }

    /// Returns the value of the maximum component.
    pub fn max_comp(&self) -> T {
        self.r.maxi(self.g.maxi(self.b))
    }
}

impl_binary_op!(Add, add, +, Spectrum: FloatValueType, r, g, b);
impl_binary_op!(Sub, sub, -, Spectrum: FloatValueType, r, g, b);
impl_binary_op!(Mul, mul, *, Spectrum: FloatValueType, r, g, b);
impl_binary_op!(Div, div, /, Spectrum: FloatValueType, r, g, b);
impl_assign_op!(AddAssign, add_assign, +=, Spectrum: FloatValueType, r, g, b);
impl_assign_op!(SubAssign, sub_assign, -=, Spectrum: FloatValueType, r, g, b);
impl_assign_op!(MulAssign, mul_assign, *=, Spectrum: FloatValueType, r, g, b);
impl_scalar_op!(Mul, mul, *, Spectrum: FloatValueType, r, g, b);
impl_scalar_op!(Div, div, /, Spectrum: FloatValueType, r, g, b);
impl_scalar_assign_op!(MulAssign, mul_assign, *=, Spectrum: FloatValueType, r, g, b);
impl_scalar_assign_op!(DivAssign, div_assign, /=, Spectrum: FloatValueType, r, g, b);
impl_neg!(Spectrum, r, g, b);
impl_index!(Spectrum: FloatValueType, 0 => r, 1 => g, 2 => b);
impl_approx!(Spectrum: FloatValueType, r, g, b);
