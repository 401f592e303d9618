use super::{same_hemisphere, Bxdf, BxdfType};
use crate::math::{Spectrum, Vec3};

// Tabulated reflectance over a regular (theta_in, theta_out, delta_phi)
// grid. The table stores whatever a gonioreflectometer measured, Fresnel
// and all, so lookups are plain interpolation-free bin reads.

#[derive(Debug)]
pub enum TableError {
    EmptyDimensions,
    DimensionMismatch { expected: usize, actual: usize },
}

pub struct BrdfTable {
    n_theta_i: usize,
    n_theta_o: usize,
    n_phi: usize,
    data: Vec<Spectrum<f32>>,
}

impl BrdfTable {
    /// Wraps measured values laid out as `[theta_i][theta_o][delta_phi]`,
    /// with polar angles spanning `[0, pi/2)` and the azimuth difference
    /// spanning `[0, pi)`.
    pub fn new(
        n_theta_i: usize,
        n_theta_o: usize,
        n_phi: usize,
        data: Vec<Spectrum<f32>>,
    ) -> Result<Self, TableError> {
        if n_theta_i == 0 || n_theta_o == 0 || n_phi == 0 {
            return Err(TableError::EmptyDimensions);
        }
        let expected = n_theta_i * n_theta_o * n_phi;
        if data.len() != expected {
            return Err(TableError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            n_theta_i,
            n_theta_o,
            n_phi,
            data,
        })
    }

    fn evaluate(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> Spectrum<f32> {
        let theta_bin = |w: Vec3<f32>, n: usize| {
            let theta = w.z.abs().clamp(0.0, 1.0).acos();
            (((theta / std::f32::consts::FRAC_PI_2) * (n as f32)) as usize).min(n - 1)
        };
        let i = theta_bin(wi, self.n_theta_i);
        let o = theta_bin(wo, self.n_theta_o);

        let d_phi = {
            let phi_i = wi.y.atan2(wi.x);
            let phi_o = wo.y.atan2(wo.x);
            let mut d = (phi_i - phi_o).abs();
            if d > std::f32::consts::PI {
                d = 2.0 * std::f32::consts::PI - d;
            }
            d
        };
        let p = (((d_phi / std::f32::consts::PI) * (self.n_phi as f32)) as usize)
            .min(self.n_phi - 1);

        self.data[(i * self.n_theta_o + o) * self.n_phi + p]
    }
}

pub struct Measured<'a> {
    table: &'a BrdfTable,
}

impl<'a> Measured<'a> {
    pub fn new(table: &'a BrdfTable) -> Self {
        Self { table }
    }
}

impl<'a> Clone for Measured<'a> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a> Copy for Measured<'a> {}

impl<'a> Bxdf for Measured<'a> {
    fn f(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> Spectrum<f32> {
        if !same_hemisphere(wo, wi) {
            return Spectrum::zeros();
        }
        self.table.evaluate(wo, wi)
    }

    fn flags(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::GLOSSY
    }
}
