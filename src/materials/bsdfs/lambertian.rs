use super::{Bxdf, BxdfType};
use crate::math::{Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Lambertian_Reflection

#[derive(Copy, Clone)]
pub struct Lambertian {
    reflectance: Spectrum<f32>,
}

impl Lambertian {
    pub fn new(reflectance: Spectrum<f32>) -> Self {
        Self { reflectance }
    }
}

impl Bxdf for Lambertian {
    fn f(&self, _: Vec3<f32>, _: Vec3<f32>) -> Spectrum<f32> {
        self.reflectance * std::f32::consts::FRAC_1_PI
    }

    fn flags(&self) -> BxdfType {
        BxdfType::DIFFUSE | BxdfType::REFLECTION
    }
}
