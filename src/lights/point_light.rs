use super::{EmissionSample, Light, LightSample};
use crate::{
    interaction::Interaction,
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec3},
    sampling::{uniform_sample_sphere, uniform_sphere_pdf},
    visibility::VisibilityTester,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Point_Lights.html

pub struct PointLight {
    p: Point3<f32>,
    i: Spectrum<f32>,
}

impl PointLight {
    /// Creates a new `PointLight` at `p` with intensity `i`.
    pub fn new(p: Point3<f32>, i: Spectrum<f32>) -> Self {
        Self { p, i }
    }
}

impl Light for PointLight {
    fn power(&self) -> Spectrum<f32> {
        self.i * (4.0 * std::f32::consts::PI)
    }

    fn is_delta(&self) -> bool {
        true
    }

    fn sample_li(&self, it: &Interaction, _u: Point2<f32>) -> LightSample {
        let to_light = self.p - it.p;
        let dist_sqr = to_light.len_sqr();
        if dist_sqr == 0.0 {
            return LightSample {
                wi: Vec3::zeros(),
                li: Spectrum::zeros(),
                pdf: 0.0,
                vis: None,
            };
        }
        let li = self.i / dist_sqr;
        let wi = to_light / dist_sqr.sqrt();

        let vis = Some(VisibilityTester::new(
            *it,
            Interaction {
                p: self.p,
                n: Normal::default(),
            },
        ));

        LightSample {
            wi,
            li,
            pdf: 1.0,
            vis,
        }
    }

    fn pdf_li(&self, _it: &Interaction, _wi: Vec3<f32>) -> f32 {
        0.0
    }

    fn sample_le(&self, u1: Point2<f32>, _u2: Point2<f32>) -> EmissionSample {
        let d = uniform_sample_sphere(u1);
        EmissionSample {
            ray: Ray::new(self.p, d, f32::INFINITY),
            n: Normal::from(d),
            li: self.i,
            pdf_pos: 1.0,
            pdf_dir: uniform_sphere_pdf(),
        }
    }

    fn direction_from(&self, p: Point3<f32>) -> Option<Vec3<f32>> {
        let to_light = self.p - p;
        if to_light.len_sqr() == 0.0 {
            None
        } else {
            Some(to_light.normalized())
        }
    }
}
