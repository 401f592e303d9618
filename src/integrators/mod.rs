mod direct_lighting;
mod emission;
mod single_scattering;
mod whitted;

pub use direct_lighting::{DirectLighting, LightStrategy};
pub use emission::Emission;
pub use single_scattering::SingleScattering;
pub use whitted::Whitted;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    math::{Ray, Spectrum},
    memory::Arena,
    sampling::Sampler,
    scene::{Hit, Scene},
};

pub type WhittedParams = whitted::Params;
pub type DirectLightingParams = direct_lighting::Params;
pub type EmissionParams = emission::Params;
pub type SingleScatteringParams = single_scattering::Params;

#[derive(Copy, Clone, Deserialize, Serialize, Display, EnumVariantNames, EnumString)]
pub enum IntegratorType {
    Whitted(whitted::Params),
    DirectLighting(direct_lighting::Params),
}

impl IntegratorType {
    pub fn instantiate(self) -> Box<dyn Integrator> {
        match self {
            IntegratorType::Whitted(params) => Box::new(Whitted::new(params)),
            IntegratorType::DirectLighting(params) => Box::new(DirectLighting::new(params)),
        }
    }
}

impl Default for IntegratorType {
    fn default() -> Self {
        IntegratorType::DirectLighting(direct_lighting::Params::default())
    }
}

#[derive(Copy, Clone, Deserialize, Serialize, Display, EnumVariantNames, EnumString)]
pub enum VolumeIntegratorType {
    Emission(emission::Params),
    SingleScattering(single_scattering::Params),
}

impl VolumeIntegratorType {
    pub fn instantiate(self) -> Box<dyn VolumeIntegrator> {
        match self {
            VolumeIntegratorType::Emission(params) => Box::new(Emission::new(params)),
            VolumeIntegratorType::SingleScattering(params) => {
                Box::new(SingleScattering::new(params))
            }
        }
    }
}

pub struct RadianceResult {
    pub li: Spectrum<f32>,
    pub ray_scene_intersections: usize,
}

impl Default for RadianceResult {
    fn default() -> Self {
        Self {
            li: Spectrum::zeros(),
            ray_scene_intersections: 0,
        }
    }
}

/// Public interface for surface integrators.
pub trait Integrator: Send + Sync {
    /// Registers the sample sequences this integrator consumes. Called
    /// once before rendering begins.
    fn request_samples(&mut self, _sampler: &mut dyn Sampler, _scene: &Scene) {}

    /// Evaluates the outgoing radiance at `hit` toward the ray origin.
    /// Also returns the number of rays intersected with `scene`.
    fn li(
        &self,
        scratch: &Arena,
        ray: Ray<f32>,
        hit: &Hit,
        scene: &Scene,
        depth: u32,
        volume: Option<&dyn VolumeIntegrator>,
        sampler: &mut dyn Sampler,
    ) -> RadianceResult;
}

/// Public interface for participating media integrators.
pub trait VolumeIntegrator: Send + Sync {
    /// Registers the sample sequences this integrator consumes.
    fn request_samples(&mut self, _sampler: &mut dyn Sampler, _scene: &Scene) {}

    /// Integrates the medium along `ray` up to `ray.t_max`, returning the
    /// accumulated radiance and the transmittance to the ray end.
    fn li(
        &self,
        ray: &Ray<f32>,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> (Spectrum<f32>, Spectrum<f32>);

    /// Beam transmittance over `ray`.
    fn transmittance(
        &self,
        ray: &Ray<f32>,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> Spectrum<f32>;
}

/// Evaluates the incoming radiance along `ray`: the one entry point an
/// external render loop, and the specular recursion, calls per ray.
///
/// The surface term is what the hit point (or the infinite lights on a
/// miss) sends back; the medium along the ray adds its own radiance and
/// attenuates the surface term by its transmittance.
pub fn radiance(
    scratch: &Arena,
    ray: Ray<f32>,
    scene: &Scene,
    depth: u32,
    surface: &dyn Integrator,
    volume: Option<&dyn VolumeIntegrator>,
    sampler: &mut dyn Sampler,
) -> RadianceResult {
    let hit = scene.intersect(ray);
    let mut ray_count = 1;

    let surface_li = match &hit {
        Some(hit) => {
            let result = surface.li(scratch, ray, hit, scene, depth, volume, sampler);
            ray_count += result.ray_scene_intersections;
            result.li
        }
        None => scene.background(&ray),
    };

    let (volume_li, transmittance) = match volume {
        Some(integrator) => {
            let media_ray = Ray::new(
                ray.o,
                ray.d,
                hit.as_ref().map_or(ray.t_max, |hit| hit.t),
            );
            integrator.li(&media_ray, scene, sampler)
        }
        None => (Spectrum::zeros(), Spectrum::ones()),
    };

    RadianceResult {
        li: volume_li + transmittance * surface_li,
        ray_scene_intersections: ray_count,
    }
}
