use super::VolumeIntegrator;
use crate::{
    interaction::Interaction,
    lights::PowerLightDistribution,
    math::{Normal, Ray, Spectrum},
    sampling::Sampler,
    scene::Scene,
};

use serde::{Deserialize, Serialize};

// Single scattering: emission plus one bounce of direct light scattered
// toward the viewer at each march step. Light selection reuses the
// power-proportional distribution, built without a normal since media
// points have no orientation.

#[derive(Copy, Clone, Deserialize, Serialize)]
pub struct Params {
    pub step_size: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self { step_size: 0.1 }
    }
}

pub struct SingleScattering {
    step_size: f32,
}

impl SingleScattering {
    pub fn new(params: Params) -> Self {
        Self {
            step_size: params.step_size.max(1e-4),
        }
    }
}

impl VolumeIntegrator for SingleScattering {
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

            let sigma_s = volume.scattering(p);
            if !sigma_s.is_black() && !scene.lights.is_empty() {
                let it = Interaction {
                    p,
                    n: Normal::default(),
                };

                let cdf = PowerLightDistribution::new(&scene.lights, p, None);
                if let Some((light_index, pmf)) = cdf.sample(sampler.get_1d()) {
                    if pmf > 0.0 {
                        let light = &scene.lights[light_index];
                        let ls = light.sample_li(&it, sampler.get_2d());
                        if ls.pdf > 0.0 && !ls.li.is_black() {
                            if let Some(vis) = &ls.vis {
                                if vis.unoccluded(scene) {
                                    // Attenuate the connection through the
                                    // medium as well
                                    let tr_light =
                                        self.transmittance(&vis.ray(), scene, sampler);
                                    let phase = volume.phase(p, ls.wi, -ray.d);
                                    radiance += transmittance
                                        * sigma_s
                                        * ls.li
                                        * tr_light
                                        * (phase * step / (ls.pdf * pmf));
                                }
                            }
                        }
                    }
                }
            }

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
