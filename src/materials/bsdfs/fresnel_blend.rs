use super::{
    cos_theta, fresnel::pow5, microfacet::MicrofacetDistribution, reflect, same_hemisphere, Bxdf,
    BxdfSample, BxdfType,
};
use crate::{
    math::{Point2, Spectrum, Vec3},
    sampling::cosine_sample_hemisphere,
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Fresnel_Incidence_Effects

/// A glossy lobe over a diffuse substrate, the layered blend of Ashikhmin
/// and Shirley.
pub struct FresnelBlend<'a> {
    rd: Spectrum<f32>,
    rs: Spectrum<f32>,
    distribution: &'a dyn MicrofacetDistribution,
}

impl<'a> FresnelBlend<'a> {
    pub fn new(
        rd: Spectrum<f32>,
        rs: Spectrum<f32>,
        distribution: &'a dyn MicrofacetDistribution,
    ) -> Self {
        Self {
            rd,
            rs,
            distribution,
        }
    }

    fn schlick_fresnel(&self, cos_theta: f32) -> Spectrum<f32> {
        self.rs + (Spectrum::ones() - self.rs) * pow5(1.0 - cos_theta)
    }
}

impl<'a> Clone for FresnelBlend<'a> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a> Copy for FresnelBlend<'a> {}

impl<'a> Bxdf for FresnelBlend<'a> {
    fn f(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> Spectrum<f32> {
        let cos_theta_o = cos_theta(wo).abs();
        let cos_theta_i = cos_theta(wi).abs();
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 {
            return Spectrum::zeros();
        }

        let diffuse = self.rd
            * (Spectrum::ones() - self.rs)
            * (28.0 / (23.0 * std::f32::consts::PI))
            * (1.0 - pow5(1.0 - 0.5 * cos_theta_i))
            * (1.0 - pow5(1.0 - 0.5 * cos_theta_o));

        let wh = {
            let wh = wi + wo;
            if wh == Vec3::zeros() {
                return Spectrum::zeros();
            }
            wh.normalized()
        };
        let specular = self.schlick_fresnel(wi.dot(wh)) * self.distribution.d(wh)
            / (4.0 * wi.dot(wh).abs() * cos_theta_i.max(cos_theta_o));

        diffuse + specular
    }

    fn sample_f(&self, wo: Vec3<f32>, u: Point2<f32>) -> BxdfSample {
        // Split the first dimension between the substrate and the lobe
        let wi = if u.x < 0.5 {
            let u = Point2::new((2.0 * u.x).min(1.0 - f32::EPSILON), u.y);
            let mut wi = cosine_sample_hemisphere(u);
            if wo.z < 0.0 {
                wi.z = -wi.z;
            }
            wi
        } else {
            let u = Point2::new((2.0 * (u.x - 0.5)).min(1.0 - f32::EPSILON), u.y);
            let wh = self.distribution.sample_wh(wo, u);
            let wi = reflect(wo, wh);
            if !same_hemisphere(wo, wi) {
                return BxdfSample::default();
            }
            wi
        };

        let pdf = self.pdf(wo, wi);
        let f = self.f(wo, wi);

        BxdfSample {
            wi,
            f,
            pdf,
            sample_type: self.flags(),
        }
    }

    fn pdf(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> f32 {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let wh = (wo + wi).normalized();
        let pdf_wh = self.distribution.pdf(wo, wh);
        0.5 * (cos_theta(wi).abs() * std::f32::consts::FRAC_1_PI
            + pdf_wh / (4.0 * wo.dot(wh)))
    }

    fn flags(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::GLOSSY
    }
}
