use super::{EmissionSample, Light, LightSample};
use crate::{
    interaction::Interaction,
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec3},
    sampling::{uniform_sample_sphere, uniform_sphere_pdf},
    visibility::VisibilityTester,
};

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Sources/Infinite_Area_Lights

/// Environment emitter with the same radiance in every direction.
pub struct ConstantInfiniteLight {
    radiance: Spectrum<f32>,
    world_center: Point3<f32>,
    world_radius: f32,
}

impl ConstantInfiniteLight {
    pub fn new(radiance: Spectrum<f32>, world_center: Point3<f32>, world_radius: f32) -> Self {
        Self {
            radiance,
            world_center,
            world_radius,
        }
    }
}

impl Light for ConstantInfiniteLight {
    fn power(&self) -> Spectrum<f32> {
        self.radiance * (std::f32::consts::PI * self.world_radius * self.world_radius)
    }

    fn is_infinite(&self) -> bool {
        true
    }

    fn sample_li(&self, it: &Interaction, u: Point2<f32>) -> LightSample {
        let wi = uniform_sample_sphere(u);

        let vis = Some(VisibilityTester::new(
            *it,
            Interaction {
                p: it.p + wi * (2.0 * self.world_radius),
                n: Normal::default(),
            },
        ));

        LightSample {
            wi,
            li: self.radiance,
            pdf: uniform_sphere_pdf(),
            vis,
        }
    }

    fn pdf_li(&self, _it: &Interaction, _wi: Vec3<f32>) -> f32 {
        uniform_sphere_pdf()
    }

    fn radiance_along(
        &self,
        it: &Interaction,
        wi: Vec3<f32>,
    ) -> (Spectrum<f32>, Option<VisibilityTester>) {
        let vis = VisibilityTester::new(
            *it,
            Interaction {
                p: it.p + wi * (2.0 * self.world_radius),
                n: Normal::default(),
            },
        );
        (self.radiance, Some(vis))
    }

    fn sample_le(&self, u1: Point2<f32>, _u2: Point2<f32>) -> EmissionSample {
        // Emit inward from the bounding sphere
        let d = uniform_sample_sphere(u1);
        let p = self.world_center + d * self.world_radius;

        EmissionSample {
            ray: Ray::new(p, -d, f32::INFINITY),
            n: Normal::from(-d),
            li: self.radiance,
            pdf_pos: 1.0
                / (4.0 * std::f32::consts::PI * self.world_radius * self.world_radius),
            pdf_dir: uniform_sphere_pdf(),
        }
    }

    fn le(&self, _ray: &Ray<f32>) -> Spectrum<f32> {
        self.radiance
    }
}
