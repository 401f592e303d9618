use std::sync::Arc;

use crate::{
    interaction::SurfaceInteraction,
    lights::Light,
    math::{Ray, Spectrum},
    media::VolumeRegion,
};

/// A found intersection: distance along the ray, index of the hit
/// primitive and the shading point record.
pub struct Hit {
    pub t: f32,
    pub primitive: usize,
    pub si: SurfaceInteraction,
}

/// The intersection oracle. Implementations own the scene geometry and
/// acceleration structures; this core only asks them questions.
pub trait Aggregate: Send + Sync {
    /// Finds the closest intersection within `ray.t_max`. Never mutates
    /// the ray.
    fn intersect(&self, ray: Ray<f32>) -> Option<Hit>;

    /// `true` if anything intersects within `ray.t_max`. For shadow rays.
    fn intersect_p(&self, ray: Ray<f32>) -> bool;
}

/// Immutable world the integrators evaluate against: geometry behind the
/// oracle, the ordered light registry and an optional participating
/// medium.
pub struct Scene {
    pub aggregate: Arc<dyn Aggregate>,
    /// Append-only, the light selection CDF depends on this order
    pub lights: Vec<Arc<dyn Light>>,
    pub volume: Option<Arc<dyn VolumeRegion>>,
}

impl Scene {
    pub fn new(
        aggregate: Arc<dyn Aggregate>,
        lights: Vec<Arc<dyn Light>>,
        volume: Option<Arc<dyn VolumeRegion>>,
    ) -> Self {
        Self {
            aggregate,
            lights,
            volume,
        }
    }

    pub fn intersect(&self, ray: Ray<f32>) -> Option<Hit> {
        self.aggregate.intersect(ray)
    }

    pub fn intersect_p(&self, ray: Ray<f32>) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Radiance from lights at infinity for a ray that left the scene.
    pub fn background(&self, ray: &Ray<f32>) -> Spectrum<f32> {
        self.lights
            .iter()
            .fold(Spectrum::zeros(), |c, l| c + l.le(ray))
    }
}
