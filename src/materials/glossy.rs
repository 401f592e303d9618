use super::{
    bsdfs::{AnisotropicDistribution, Bsdf, BlinnDistribution, FresnelBlend, MicrofacetDistribution},
    roughness_to_exponent, Material,
};
use crate::{
    interaction::SurfaceInteraction, math::Spectrum, memory::Arena, textures::Texture,
};

use std::sync::Arc;

/// Glossy coat over a diffuse substrate.
pub struct Glossy {
    rd: Arc<dyn Texture<Spectrum<f32>>>,
    rs: Arc<dyn Texture<Spectrum<f32>>>,
    roughness_u: Arc<dyn Texture<f32>>,
    roughness_v: Arc<dyn Texture<f32>>,
    remap_roughness: bool,
}

impl Glossy {
    pub fn new(
        rd: Arc<dyn Texture<Spectrum<f32>>>,
        rs: Arc<dyn Texture<Spectrum<f32>>>,
        roughness_u: Arc<dyn Texture<f32>>,
        roughness_v: Arc<dyn Texture<f32>>,
        remap_roughness: bool,
    ) -> Self {
        Self {
            rd,
            rs,
            roughness_u,
            roughness_v,
            remap_roughness,
        }
    }
}

impl Material for Glossy {
    fn compute_scattering_functions<'a>(
        &'a self,
        scratch: &'a Arena,
        si: &SurfaceInteraction,
    ) -> Bsdf<'a> {
        let mut bsdf = Bsdf::new(si);

        let remap = |roughness: f32| {
            if self.remap_roughness {
                roughness_to_exponent(roughness)
            } else {
                roughness
            }
        };
        let eu = remap(self.roughness_u.evaluate(si));
        let ev = remap(self.roughness_v.evaluate(si));

        let distribution: &dyn MicrofacetDistribution = if (eu - ev).abs() < f32::EPSILON {
            scratch.alloc(BlinnDistribution::new(eu))
        } else {
            scratch.alloc(AnisotropicDistribution::new(eu, ev))
        };

        bsdf.add(scratch.alloc(FresnelBlend::new(
            self.rd.evaluate(si).clamped(0.0, 1.0),
            self.rs.evaluate(si).clamped(0.0, 1.0),
            distribution,
        )));

        bsdf
    }
}
