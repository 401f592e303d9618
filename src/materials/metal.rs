use super::{
    bsdfs::{fresnel::Fresnel, Bsdf, BlinnDistribution, MicrofacetReflection},
    roughness_to_exponent, Material,
};
use crate::{
    interaction::SurfaceInteraction, math::Spectrum, memory::Arena, textures::Texture,
};

use std::sync::Arc;

pub struct Metal {
    eta: Arc<dyn Texture<Spectrum<f32>>>,
    k: Arc<dyn Texture<Spectrum<f32>>>,
    roughness: Arc<dyn Texture<f32>>,
    remap_roughness: bool,
}

impl Metal {
    pub fn new(
        eta: Arc<dyn Texture<Spectrum<f32>>>,
        k: Arc<dyn Texture<Spectrum<f32>>>,
        roughness: Arc<dyn Texture<f32>>,
        remap_roughness: bool,
    ) -> Self {
        Self {
            eta,
            k,
            roughness,
            remap_roughness,
        }
    }
}

impl Material for Metal {
    fn compute_scattering_functions<'a>(
        &'a self,
        scratch: &'a Arena,
        si: &SurfaceInteraction,
    ) -> Bsdf<'a> {
        let mut bsdf = Bsdf::new(si);

        let exponent = if self.remap_roughness {
            roughness_to_exponent(self.roughness.evaluate(si))
        } else {
            self.roughness.evaluate(si)
        };

        let fresnel = Fresnel::conductor(
            Spectrum::ones(),
            self.eta.evaluate(si),
            self.k.evaluate(si),
        );
        let distribution = scratch.alloc(BlinnDistribution::new(exponent));

        bsdf.add(scratch.alloc(MicrofacetReflection::new(
            Spectrum::ones(),
            distribution,
            fresnel,
        )));

        bsdf
    }
}
