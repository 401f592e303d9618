use super::{cos_theta, microfacet::MicrofacetDistribution, same_hemisphere, spherical_direction};
use crate::math::{Point2, Vec3};

// Anisotropic exponential lobe after Ashikhmin and Shirley, with separate
// exponents along the tangent and bitangent.

const INV_2_PI: f32 = 0.5 * std::f32::consts::FRAC_1_PI;
const MAX_EXPONENT: f32 = 10000.0;

#[derive(Copy, Clone)]
pub struct AnisotropicDistribution {
    ex: f32,
    ey: f32,
}

impl AnisotropicDistribution {
    /// Creates a new `AnisotropicDistribution` with exponents along the
    /// tangent and bitangent. Exponents are clamped to a sane range.
    pub fn new(ex: f32, ey: f32) -> Self {
        let clamp = |e: f32| if e.is_nan() { 1.0 } else { e.clamp(0.0, MAX_EXPONENT) };
        Self {
            ex: clamp(ex),
            ey: clamp(ey),
        }
    }

    fn exponent(&self, wh: Vec3<f32>) -> f32 {
        let cos_2_theta = cos_theta(wh) * cos_theta(wh);
        let sin_2_theta = 1.0 - cos_2_theta;
        if sin_2_theta <= 0.0 {
            return 0.0;
        }
        (self.ex * wh.x * wh.x + self.ey * wh.y * wh.y) / sin_2_theta
    }

    fn sample_first_quadrant(&self, u: Point2<f32>) -> (f32, f32) {
        let phi = if (self.ex - self.ey).abs() < f32::EPSILON {
            std::f32::consts::PI * u.x * 0.5
        } else {
            (((self.ex + 1.0) / (self.ey + 1.0)).sqrt()
                * (std::f32::consts::PI * u.x * 0.5).tan())
            .atan()
        };
        let cos_phi = phi.cos();
        let sin_phi = phi.sin();
        let e = self.ex * cos_phi * cos_phi + self.ey * sin_phi * sin_phi;
        let cos_theta = u.y.powf(1.0 / (e + 1.0));
        (phi, cos_theta)
    }
}

impl MicrofacetDistribution for AnisotropicDistribution {
    fn d(&self, wh: Vec3<f32>) -> f32 {
        let cos_theta_h = cos_theta(wh).abs();
        ((self.ex + 2.0) * (self.ey + 2.0)).sqrt() * INV_2_PI * cos_theta_h.powf(self.exponent(wh))
    }

    fn sample_wh(&self, wo: Vec3<f32>, u: Point2<f32>) -> Vec3<f32> {
        // Sample one quadrant of the hemisphere and mirror into the one the
        // remapped sample came from
        let (phi, cos_theta) = if u.x < 0.25 {
            let u = Point2::new(4.0 * u.x, u.y);
            self.sample_first_quadrant(u)
        } else if u.x < 0.5 {
            let u = Point2::new(4.0 * (0.5 - u.x), u.y);
            let (phi, cos_theta) = self.sample_first_quadrant(u);
            (std::f32::consts::PI - phi, cos_theta)
        } else if u.x < 0.75 {
            let u = Point2::new(4.0 * (u.x - 0.5), u.y);
            let (phi, cos_theta) = self.sample_first_quadrant(u);
            (std::f32::consts::PI + phi, cos_theta)
        } else {
            let u = Point2::new(4.0 * (1.0 - u.x), u.y);
            let (phi, cos_theta) = self.sample_first_quadrant(u);
            (2.0 * std::f32::consts::PI - phi, cos_theta)
        };

        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let wh = spherical_direction(sin_theta, cos_theta, phi);
        if same_hemisphere(wo, wh) {
            wh
        } else {
            -wh
        }
    }

    fn pdf(&self, wo: Vec3<f32>, wh: Vec3<f32>) -> f32 {
        if wo.dot(wh) <= 0.0 {
            return 0.0;
        }
        let cos_theta_h = cos_theta(wh).abs();
        ((self.ex + 1.0) * (self.ey + 1.0)).sqrt() * INV_2_PI * cos_theta_h.powf(self.exponent(wh))
    }
}
