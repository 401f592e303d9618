use super::VolumeIntegrator;
use crate::{
    math::{Ray, Spectrum},
    sampling::Sampler,
    scene::Scene,
};

use serde::{Deserialize, Serialize};

// Emission and absorption only, no in-scattered light. The march jitters
// its start offset per ray to trade banding for noise.

#[derive(Copy, Clone, Deserialize, Serialize)]
pub struct Params {
    pub step_size: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self { step_size: 0.1 }
    }
}

pub struct Emission {
    step_size: f32,
}

impl Emission {
    pub fn new(params: Params) -> Self {
        Self {
            step_size: params.step_size.max(1e-4),
        }
    }
}

impl VolumeIntegrator for Emission {
    fn li(
        &self,
        ray: &Ray<f32>,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> (Spectrum<f32>, Spectrum<f32>) {
        let Some(volume) = scene.volume.as_ref() else {
            return (Spectrum::zeros(), Spectrum::ones());
        };
        let Some((t0, t1)) = volume.intersect(ray) else {
            return (Spectrum::zeros(), Spectrum::ones());
        };

        let mut radiance = Spectrum::zeros();
        let mut transmittance = Spectrum::ones();

        let mut t = t0 + sampler.get_1d() * self.step_size;
        while t < t1 {
            let step = self.step_size.min(t1 - t);
            let p = ray.point(t);

            transmittance *= (-(volume.sigma_t(p) * step)).exp();
            radiance += transmittance * volume.emission(p) * step;

            t += self.step_size;
        }

        (radiance, transmittance)
    }

    fn transmittance(
        &self,
        ray: &Ray<f32>,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> Spectrum<f32> {
        let Some(volume) = scene.volume.as_ref() else {
            return Spectrum::ones();
        };
        let tau = volume.optical_thickness(ray, self.step_size, sampler.get_1d());
        (-tau).exp()
    }
}
