mod area_light;
mod distant_light;
mod distribution;
mod infinite_light;
mod point_light;

pub use area_light::DiffuseAreaLight;
pub use distant_light::DistantLight;
pub use distribution::{LightsCdf, PowerLightDistribution};
pub use infinite_light::ConstantInfiniteLight;
pub use point_light::PointLight;

use crate::{
    interaction::Interaction,
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec3},
    visibility::VisibilityTester,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Light_Interface.html#Light
// https://pbr-book.org/3ed-2018/Light_Sources/Area_Lights

/// Sample from a light source for visibility testing and shading
pub struct LightSample {
    /// Direction from the shading point toward the light
    pub wi: Vec3<f32>,
    pub li: Spectrum<f32>,
    /// Solid angle density `wi` was drawn with; delta lights report the
    /// one-sample value 1
    pub pdf: f32,
    pub vis: Option<VisibilityTester>,
}

/// Sample of the light's own emission for particle tracing
pub struct EmissionSample {
    pub ray: Ray<f32>,
    /// Normal at the emitting point
    pub n: Normal<f32>,
    pub li: Spectrum<f32>,
    pub pdf_pos: f32,
    pub pdf_dir: f32,
}

pub trait Light: Send + Sync {
    /// Total emitted power, used to weight light selection.
    fn power(&self) -> Spectrum<f32>;

    /// `true` when the light has no continuous density to sample against
    /// (point and directional sources).
    fn is_delta(&self) -> bool {
        false
    }

    /// `true` for lights at infinity surrounding the scene.
    fn is_infinite(&self) -> bool {
        false
    }

    /// Returns a [`LightSample`] from the given [`Interaction`] to this
    /// `Light`.
    fn sample_li(&self, it: &Interaction, u: Point2<f32>) -> LightSample;

    /// The density [`Light::sample_li`] draws `wi` with, in solid angle
    /// measure. Zero for delta lights.
    fn pdf_li(&self, it: &Interaction, wi: Vec3<f32>) -> f32;

    /// Radiance arriving at `it` from this light along `wi` together with
    /// the visibility test for the emitting point. Used when the direction
    /// came from the surface's own sampling; delta lights are never reached
    /// that way and return nothing.
    fn radiance_along(
        &self,
        _it: &Interaction,
        _wi: Vec3<f32>,
    ) -> (Spectrum<f32>, Option<VisibilityTester>) {
        (Spectrum::zeros(), None)
    }

    /// Samples a ray leaving the light for particle and importance
    /// transport.
    fn sample_le(&self, u1: Point2<f32>, u2: Point2<f32>) -> EmissionSample;

    /// Radiance added to rays that leave the scene without hitting
    /// anything.
    fn le(&self, _ray: &Ray<f32>) -> Spectrum<f32> {
        Spectrum::zeros()
    }

    /// Mean direction toward the light from `p`, `None` when the light has
    /// no meaningful location.
    fn direction_from(&self, _p: Point3<f32>) -> Option<Vec3<f32>> {
        None
    }
}

pub trait AreaLight: Light {
    /// Returns the radiance emitted toward `w` from a point with geometric
    /// normal `n`. Emission happens on the side `n` points to only.
    fn radiance(&self, n: Normal<f32>, w: Vec3<f32>) -> Spectrum<f32>;
}
