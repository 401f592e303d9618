use super::{radiance, Integrator, RadianceResult, VolumeIntegrator};
use crate::{
    interaction::{Interaction, SurfaceInteraction},
    lights::{Light, PowerLightDistribution},
    materials::{Bsdf, BxdfType},
    math::{Point2, Ray, Spectrum},
    memory::Arena,
    sampling::{power_heuristic, Sampler},
    scene::{Hit, Scene},
};

use serde::{Deserialize, Serialize};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Light_Transport_I_Surface_Reflection/Direct_Lighting

/// How lights are chosen for the direct illumination estimate.
#[derive(Copy, Clone, Deserialize, Serialize)]
pub enum LightStrategy {
    /// Estimate every light with its own set of samples
    SampleAll,
    /// One light per sample, selected uniformly
    SampleOne,
    /// One light per sample, selected proportional to power
    SampleOnePower,
}

#[derive(Copy, Clone, Deserialize, Serialize)]
pub struct Params {
    pub max_depth: u32,
    pub strategy: LightStrategy,
    /// Samples per light under [`LightStrategy::SampleAll`]
    pub light_samples: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_depth: 5,
            strategy: LightStrategy::SampleAll,
            light_samples: 1,
        }
    }
}

#[derive(Copy, Clone)]
struct SampleIds {
    light_2d: usize,
    bsdf_2d: usize,
    bsdf_1d: usize,
}

/// Single-bounce direct illumination with the light- and surface-sampling
/// techniques combined through the power heuristic, plus recursive
/// perfectly-specular bounces up to a fixed depth.
pub struct DirectLighting {
    max_depth: u32,
    strategy: LightStrategy,
    light_samples: u32,
    sample_ids: Vec<SampleIds>,
    select_1d: Option<usize>,
}

impl DirectLighting {
    pub fn new(params: Params) -> Self {
        Self {
            max_depth: params.max_depth,
            strategy: params.strategy,
            light_samples: params.light_samples.max(1),
            sample_ids: Vec::new(),
            select_1d: None,
        }
    }

    fn sample_all_lights(
        &self,
        bsdf: &Bsdf,
        si: &SurfaceInteraction,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> Spectrum<f32> {
        let n = self.light_samples as usize;

        let mut ld = Spectrum::zeros();
        for (i, light) in scene.lights.iter().enumerate() {
            let ids = self.sample_ids.get(i).copied();
            let mut light_ld = Spectrum::zeros();
            for j in 0..n {
                let (u_light, u_bsdf, uc_bsdf) = fetch_samples(ids, j, sampler);
                light_ld +=
                    estimate_direct(bsdf, si, light.as_ref(), scene, u_light, u_bsdf, uc_bsdf);
            }
            ld += light_ld / (n as f32);
        }
        ld
    }

    fn sample_one_light(
        &self,
        bsdf: &Bsdf,
        si: &SurfaceInteraction,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> Spectrum<f32> {
        let n_lights = scene.lights.len();
        let select = self.fetch_select(sampler);
        let light_index = ((select * (n_lights as f32)) as usize).min(n_lights - 1);

        let (u_light, u_bsdf, uc_bsdf) = fetch_samples(self.sample_ids.first().copied(), 0, sampler);
        estimate_direct(
            bsdf,
            si,
            scene.lights[light_index].as_ref(),
            scene,
            u_light,
            u_bsdf,
            uc_bsdf,
        ) * (n_lights as f32)
    }

    fn sample_one_light_power(
        &self,
        bsdf: &Bsdf,
        si: &SurfaceInteraction,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> Spectrum<f32> {
        let mut ld = Spectrum::zeros();

        // Delta lights have no place in the selection distribution, each
        // gets its one sample directly
        for light in scene.lights.iter().filter(|l| l.is_delta()) {
            let u_light = sampler.get_2d();
            ld += estimate_direct(
                bsdf,
                si,
                light.as_ref(),
                scene,
                u_light,
                Point2::zeros(),
                0.0,
            );
        }

        let cdf = PowerLightDistribution::new(&scene.lights, si.p, Some(si.shading.n));
        let select = self.fetch_select(sampler);
        if let Some((light_index, pmf)) = cdf.sample(select) {
            if pmf > 0.0 {
                let (u_light, u_bsdf, uc_bsdf) =
                    fetch_samples(self.sample_ids.first().copied(), 0, sampler);
                ld += estimate_direct(
                    bsdf,
                    si,
                    scene.lights[light_index].as_ref(),
                    scene,
                    u_light,
                    u_bsdf,
                    uc_bsdf,
                ) / pmf;
            }
        }

        ld
    }

    fn fetch_select(&self, sampler: &mut dyn Sampler) -> f32 {
        self.select_1d
            .and_then(|id| sampler.get_1d_array(id).map(|s| s[0]))
            .unwrap_or_else(|| sampler.get_1d())
    }

    #[allow(clippy::too_many_arguments)]
    fn specular_contribution(
        &self,
        scratch: &Arena,
        si: &SurfaceInteraction,
        bsdf: &Bsdf,
        scene: &Scene,
        depth: u32,
        volume: Option<&dyn VolumeIntegrator>,
        sampler: &mut dyn Sampler,
        ray_type: BxdfType,
    ) -> RadianceResult {
        let sample = bsdf.sample_f(
            si.wo,
            sampler.get_2d(),
            sampler.get_1d(),
            BxdfType::SPECULAR | ray_type,
        );
        if sample.pdf == 0.0 || sample.f.is_black() {
            return RadianceResult::default();
        }

        let cos_theta = sample.wi.dot_n(si.shading.n).abs();
        if cos_theta == 0.0 {
            return RadianceResult::default();
        }

        let ray = si.spawn_ray(sample.wi);
        let mut ret = radiance(scratch, ray, scene, depth + 1, self, volume, sampler);
        ret.li = sample.f * ret.li * cos_theta / sample.pdf;

        ret
    }
}

impl Integrator for DirectLighting {
    fn request_samples(&mut self, sampler: &mut dyn Sampler, scene: &Scene) {
        self.sample_ids.clear();
        match self.strategy {
            LightStrategy::SampleAll => {
                let n = self.light_samples as usize;
                for _ in &scene.lights {
                    self.sample_ids.push(SampleIds {
                        light_2d: sampler.request_2d_array(n),
                        bsdf_2d: sampler.request_2d_array(n),
                        bsdf_1d: sampler.request_1d_array(n),
                    });
                }
            }
            LightStrategy::SampleOne | LightStrategy::SampleOnePower => {
                self.sample_ids.push(SampleIds {
                    light_2d: sampler.request_2d_array(1),
                    bsdf_2d: sampler.request_2d_array(1),
                    bsdf_1d: sampler.request_1d_array(1),
                });
                self.select_1d = Some(sampler.request_1d_array(1));
            }
        }
    }

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

            // A purely specular surface has nothing the estimator could
            // evaluate, skip the work entirely
            let non_specular = BxdfType::all() & !BxdfType::SPECULAR;
            if bsdf.num_components(non_specular) > 0 && !scene.lights.is_empty() {
                incoming_radiance += match self.strategy {
                    LightStrategy::SampleAll => {
                        self.sample_all_lights(&bsdf, si, scene, sampler)
                    }
                    LightStrategy::SampleOne => self.sample_one_light(&bsdf, si, scene, sampler),
                    LightStrategy::SampleOnePower => {
                        self.sample_one_light_power(&bsdf, si, scene, sampler)
                    }
                };
            }

            if depth + 1 < self.max_depth {
                for ray_type in [BxdfType::REFLECTION, BxdfType::TRANSMISSION] {
                    let result = self.specular_contribution(
                        scratch, si, &bsdf, scene, depth, volume, sampler, ray_type,
                    );
                    incoming_radiance += result.li;
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

fn fetch_samples(
    ids: Option<SampleIds>,
    j: usize,
    sampler: &mut dyn Sampler,
) -> (Point2<f32>, Point2<f32>, f32) {
    let u_light = ids
        .and_then(|ids| sampler.get_2d_array(ids.light_2d).map(|s| s[j]))
        .unwrap_or_else(|| sampler.get_2d());
    let u_bsdf = ids
        .and_then(|ids| sampler.get_2d_array(ids.bsdf_2d).map(|s| s[j]))
        .unwrap_or_else(|| sampler.get_2d());
    let uc_bsdf = ids
        .and_then(|ids| sampler.get_1d_array(ids.bsdf_1d).map(|s| s[j]))
        .unwrap_or_else(|| sampler.get_1d());
    (u_light, u_bsdf, uc_bsdf)
}

/// One sample of one light's contribution, combining the light- and
/// surface-sampling techniques with the power heuristic.
fn estimate_direct(
    bsdf: &Bsdf,
    si: &SurfaceInteraction,
    light: &dyn Light,
    scene: &Scene,
    u_light: Point2<f32>,
    u_bsdf: Point2<f32>,
    uc_bsdf: f32,
) -> Spectrum<f32> {
    let flags = BxdfType::all() & !BxdfType::SPECULAR;
    let it = Interaction::from(si);
    let wo = si.wo;

    let mut ld = Spectrum::zeros();

    // Sample the light, evaluate the surface
    let light_sample = light.sample_li(&it, u_light);
    if light_sample.pdf > 0.0 && !light_sample.li.is_black() {
        let f = bsdf.f(wo, light_sample.wi, flags)
            * light_sample.wi.dot_n(si.shading.n).abs();
        if !f.is_black() {
            if let Some(vis) = &light_sample.vis {
                if vis.unoccluded(scene) {
                    let weight = if light.is_delta() {
                        // No continuous density to weight against, the
                        // light technique is the only one
                        1.0
                    } else {
                        power_heuristic(
                            light_sample.pdf,
                            bsdf.pdf(wo, light_sample.wi, flags),
                        )
                    };
                    ld += f * light_sample.li * weight / light_sample.pdf;
                }
            }
        }
    }

    // Sample the surface, evaluate the light
    if !light.is_delta() {
        let sample = bsdf.sample_f(wo, u_bsdf, uc_bsdf, flags);
        if sample.pdf > 0.0 && !sample.f.is_black() {
            let light_pdf = light.pdf_li(&it, sample.wi);
            if light_pdf > 0.0 {
                let (li, vis) = light.radiance_along(&it, sample.wi);
                if !li.is_black() {
                    if let Some(vis) = &vis {
                        if vis.unoccluded(scene) {
                            let weight = power_heuristic(sample.pdf, light_pdf);
                            ld += sample.f
                                * li
                                * sample.wi.dot_n(si.shading.n).abs()
                                * weight
                                / sample.pdf;
                        }
                    }
                }
            }
        }
    }

    ld
}
