use std::sync::Arc;

use crate::{
    lights::AreaLight,
    materials::Material,
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec2, Vec3},
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Interactions#SurfaceInteraction

/// Shading geometry at a surface point, possibly differing from the
/// geometric frame through interpolated normals.
#[derive(Copy, Clone)]
pub struct Shading {
    pub n: Normal<f32>,
    pub dpdu: Vec3<f32>,
    pub dpdv: Vec3<f32>,
}

/// Info for a point on a surface. Produced by the intersection oracle,
/// consumed read-only by shading and lights.
pub struct SurfaceInteraction {
    /// World position
    pub p: Point3<f32>,
    /// Geometric surface normal
    pub n: Normal<f32>,
    /// View direction in world
    pub wo: Vec3<f32>,
    /// Surface parameterization
    pub uv: Point2<f32>,
    pub dpdu: Vec3<f32>,
    pub dpdv: Vec3<f32>,
    /// Screen-space derivatives of the parameterization
    pub duvdx: Vec2<f32>,
    pub duvdy: Vec2<f32>,
    pub shading: Shading,
    /// Material of the hit primitive
    pub material: Option<Arc<dyn Material>>,
    /// Emitter attached to the hit primitive
    pub area_light: Option<Arc<dyn AreaLight>>,
}

impl SurfaceInteraction {
    /// Creates a new `SurfaceInteraction` with the shading frame matching
    /// the geometric one.
    pub fn new(
        p: Point3<f32>,
        uv: Point2<f32>,
        dpdu: Vec3<f32>,
        dpdv: Vec3<f32>,
        wo: Vec3<f32>,
        should_reverse_normals: bool,
    ) -> Self {
        let n = {
            let mut n = Normal::from(dpdu.cross(dpdv).normalized());
            if should_reverse_normals {
                n *= -1.0;
            }
            n
        };
        Self {
            p,
            n,
            wo,
            uv,
            dpdu,
            dpdv,
            duvdx: Vec2::zeros(),
            duvdy: Vec2::zeros(),
            shading: Shading { n, dpdu, dpdv },
            material: None,
            area_light: None,
        }
    }

    /// Replaces the shading frame, flipping the geometric normal onto the
    /// same side when the oracle says the shading normal is authoritative.
    pub fn set_shading_geometry(
        &mut self,
        n: Normal<f32>,
        dpdu: Vec3<f32>,
        dpdv: Vec3<f32>,
        orient_geometric: bool,
    ) {
        self.shading = Shading { n, dpdu, dpdv };
        if orient_geometric {
            self.n = self.n.faceforward(Vec3::from(n));
        }
    }

    /// Returns the radiance emitted by the hit primitive toward `w`, zero
    /// if it carries no emitter or `w` is on the non-emitting side.
    pub fn emitted_radiance(&self, w: Vec3<f32>) -> Spectrum<f32> {
        self.area_light
            .as_ref()
            .map_or_else(Spectrum::zeros, |l| l.radiance(self.n, w))
    }

    /// Spawns a ray from the `SurfaceInteraction` toward `d`.
    pub fn spawn_ray(&self, d: Vec3<f32>) -> Ray<f32> {
        Interaction::from(self).spawn_ray(d)
    }
}

/// A bare interaction point, enough to spawn rays from. Media sample points
/// have a zero normal.
#[derive(Copy, Clone)]
pub struct Interaction {
    pub p: Point3<f32>,
    pub n: Normal<f32>,
}

/// Offset spawned rays along the normal to avoid self-intersection.
const RAY_OFFSET: f32 = 0.001;
/// Back shadow rays off their receiving end.
const SHADOW_EPSILON: f32 = 1e-4;

impl Interaction {
    /// Spawns a ray from this `Interaction` toward `d`.
    pub fn spawn_ray(&self, d: Vec3<f32>) -> Ray<f32> {
        let o = self.offset_origin(d);
        Ray::new(o, d, f32::INFINITY)
    }

    /// Spawns a shadow ray from this `Interaction` to `other`.
    ///
    /// The direction is left unnormalized so `t_max` slightly under one
    /// ends the ray just off the receiving surface.
    pub fn spawn_ray_to(&self, other: &Interaction) -> Ray<f32> {
        let d = other.p - self.p;
        let o = self.offset_origin(d);
        Ray::new(o, other.p - o, 1.0 - SHADOW_EPSILON)
    }

    fn offset_origin(&self, d: Vec3<f32>) -> Point3<f32> {
        if self.n.len_sqr() == 0.0 {
            return self.p;
        }
        let n = Vec3::from(self.n);
        let offset = n * RAY_OFFSET;
        if d.dot(n) > 0.0 {
            self.p + offset
        } else {
            self.p - offset
        }
    }
}

impl From<&SurfaceInteraction> for Interaction {
    fn from(si: &SurfaceInteraction) -> Self {
        Self { p: si.p, n: si.n }
    }
}
