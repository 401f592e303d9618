use super::{
    bsdfs::{Bsdf, Lambertian, OrenNayar},
    Material,
};
use crate::{
    interaction::SurfaceInteraction, math::Spectrum, memory::Arena, textures::Texture,
};

use std::sync::Arc;

pub struct Matte {
    kd: Arc<dyn Texture<Spectrum<f32>>>,
    /// Oren-Nayar roughness in radians, zero for plain Lambertian
    sigma: f32,
}

impl Matte {
    pub fn new(kd: Arc<dyn Texture<Spectrum<f32>>>, sigma: f32) -> Self {
        Self { kd, sigma }
    }
}

impl Material for Matte {
    fn compute_scattering_functions<'a>(
        &'a self,
        scratch: &'a Arena,
        si: &SurfaceInteraction,
    ) -> Bsdf<'a> {
        let mut bsdf = Bsdf::new(si);

        let kd = self.kd.evaluate(si).clamped(0.0, 1.0);
        if self.sigma == 0.0 {
            bsdf.add(scratch.alloc(Lambertian::new(kd)));
        } else {
            bsdf.add(scratch.alloc(OrenNayar::new(kd, self.sigma)));
        }

        bsdf
    }
}
