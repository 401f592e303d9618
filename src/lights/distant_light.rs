use super::{EmissionSample, Light, LightSample};
use crate::{
    interaction::Interaction,
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec3},
    sampling::concentric_sample_disk,
    visibility::VisibilityTester,
};

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Sources/Distant_Lights

pub struct DistantLight {
    /// Direction from surfaces toward the light
    w: Vec3<f32>,
    radiance: Spectrum<f32>,
    /// Radius of a sphere bounding everything the light shines on, keeps
    /// shadow ray endpoints and emitted rays outside the scene
    world_radius: f32,
}

impl DistantLight {
    pub fn new(radiance: Spectrum<f32>, w: Vec3<f32>, world_radius: f32) -> Self {
        Self {
            w: w.normalized(),
            radiance,
            world_radius,
        }
    }
}

impl Light for DistantLight {
    fn power(&self) -> Spectrum<f32> {
        self.radiance * (std::f32::consts::PI * self.world_radius * self.world_radius)
    }

    fn is_delta(&self) -> bool {
        true
    }

    fn sample_li(&self, it: &Interaction, _u: Point2<f32>) -> LightSample {
        let vis = Some(VisibilityTester::new(
            *it,
            Interaction {
                p: it.p + self.w * (2.0 * self.world_radius),
                n: Normal::default(),
            },
        ));

        LightSample {
            wi: self.w,
            li: self.radiance,
            pdf: 1.0,
            vis,
        }
    }

    fn pdf_li(&self, _it: &Interaction, _wi: Vec3<f32>) -> f32 {
        0.0
    }

    fn sample_le(&self, u1: Point2<f32>, _u2: Point2<f32>) -> EmissionSample {
        // Pick a point on a world-spanning disk facing the light direction
        let (v1, v2) = coordinate_system(self.w);
        let d = concentric_sample_disk(u1);
        let p = Point3::zeros()
            + (v1 * d.x + v2 * d.y + self.w) * self.world_radius;

        EmissionSample {
            ray: Ray::new(p, -self.w, f32::INFINITY),
            n: Normal::from(-self.w),
            li: self.radiance,
            pdf_pos: 1.0 / (std::f32::consts::PI * self.world_radius * self.world_radius),
            pdf_dir: 1.0,
        }
    }

    fn direction_from(&self, _p: Point3<f32>) -> Option<Vec3<f32>> {
        Some(self.w)
    }
}

/// Builds an orthonormal basis around `v`.
fn coordinate_system(v: Vec3<f32>) -> (Vec3<f32>, Vec3<f32>) {
    let v1 = if v.x.abs() > v.y.abs() {
        Vec3::new(-v.z, 0.0, v.x) / (v.x * v.x + v.z * v.z).sqrt()
    } else {
        Vec3::new(0.0, v.z, -v.y) / (v.y * v.y + v.z * v.z).sqrt()
    };
    (v1, v.cross(v1))
}
