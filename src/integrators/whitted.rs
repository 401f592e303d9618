use super::{radiance, Integrator, RadianceResult, VolumeIntegrator};
use crate::{
    interaction::Interaction,
    lights::LightSample,
    materials::BxdfType,
    math::{Ray, Spectrum},
    memory::Arena,
    sampling::Sampler,
    scene::{Hit, Scene},
};

use serde::{Deserialize, Serialize};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Introduction/pbrt_System_Overview#WhittedIntegrator

#[derive(Copy, Clone, Deserialize, Serialize)]
pub struct Params {
    pub max_depth: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// Classic Whitted-style transport: one light sample per light without
/// combining techniques, plus recursive specular bounces. Kept around as
/// the cheap, low-noise preview next to [`super::DirectLighting`].
pub struct Whitted {
    max_depth: u32,
}

impl Whitted {
    pub fn new(params: Params) -> Self {
        Self {
            max_depth: params.max_depth,
        }
    }
}

impl Integrator for Whitted {
    fn li(
        &self,
        scratch: &Arena,
        ray: Ray<f32>,
        hit: &Hit,
        scene: &Scene,
        depth: u32,
        volume: Option<&dyn VolumeIntegrator>,
        sampler: &mut dyn Sampler,
    ) -> RadianceResult {
        let si = &hit.si;
        let mut ray_count = 0;

        let mut incoming_radiance = si.emitted_radiance(-ray.d);

        if let Some(material) = si.material.as_ref() {
            let bsdf = material.compute_scattering_functions(scratch, si);

            let it = Interaction::from(si);
            incoming_radiance += scene.lights.iter().fold(Spectrum::zeros(), |c, l| {
                let LightSample { wi, li, pdf, vis } = l.sample_li(&it, sampler.get_2d());
                if pdf > 0.0 && !li.is_black() {
                    let f = bsdf.f(si.wo, wi, BxdfType::all());
                    if let Some(vis) = vis {
                        if !f.is_black() && vis.unoccluded(scene) {
                            return c
                                + f * li * wi.dot_n(si.shading.n).clamp(0.0, 1.0) / pdf;
                        }
                    }
                }
                c
            });

            if depth + 1 < self.max_depth {
                for ray_type in [BxdfType::REFLECTION, BxdfType::TRANSMISSION] {
                    let sample = bsdf.sample_f(
                        si.wo,
                        sampler.get_2d(),
                        sampler.get_1d(),
                        BxdfType::SPECULAR | ray_type,
                    );
                    if sample.pdf == 0.0 || sample.f.is_black() {
                        continue;
                    }

                    let refl = si.spawn_ray(sample.wi);
                    let result =
                        radiance(scratch, refl, scene, depth + 1, self, volume, sampler);
                    incoming_radiance +=
                        sample.f * result.li * sample.wi.dot_n(si.shading.n).abs() / sample.pdf;
                    ray_count += result.ray_scene_intersections;
                }
            }
        }

        RadianceResult {
            li: incoming_radiance,
            ray_scene_intersections: ray_count,
        }
    }
}
