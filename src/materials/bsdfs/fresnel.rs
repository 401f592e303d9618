use crate::math::Spectrum;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Fresnel_Incidence_Effects

/// Fraction of light reflected off a dielectric boundary.
///
/// `cos_theta_i` below zero means the direction is on the transmitted side
/// and the indices get swapped.
pub fn fr_dielectric(mut cos_theta_i: f32, eta_i: f32, eta_t: f32) -> f32 {
    cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);

    let entering = cos_theta_i > 0.0;
    let (eta_i, eta_t, cos_theta_i) = if entering {
        (eta_i, eta_t, cos_theta_i)
    } else {
        (eta_t, eta_i, cos_theta_i.abs())
    };

    // Snell's law
    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    let total_internal_reflection = sin_theta_t >= 1.0;
    if total_internal_reflection {
        return 1.0;
    }

    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();

    let r_parallel = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perpendicular = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));

    (r_parallel * r_parallel + r_perpendicular * r_perpendicular) / 2.0
}

/// Fresnel reflectance as a closed set of variants so shading components
/// stay trivially destructible in the arena.
#[derive(Copy, Clone)]
pub enum Fresnel {
    Dielectric {
        eta_i: f32,
        eta_t: f32,
    },
    Conductor {
        eta_i: Spectrum<f32>,
        eta_t: Spectrum<f32>,
        k: Spectrum<f32>,
    },
    Schlick {
        rs: Spectrum<f32>,
    },
    /// Reflects everything, for components that bake the boundary into
    /// their measured or fit data.
    NoOp,
}

impl Fresnel {
    pub fn dielectric(eta_i: f32, eta_t: f32) -> Self {
        Self::Dielectric { eta_i, eta_t }
    }

    pub fn conductor(eta_i: Spectrum<f32>, eta_t: Spectrum<f32>, k: Spectrum<f32>) -> Self {
        Self::Conductor { eta_i, eta_t, k }
    }

    pub fn schlick(rs: Spectrum<f32>) -> Self {
        Self::Schlick { rs }
    }

    pub fn evaluate(&self, cos_theta_i: f32) -> Spectrum<f32> {
        match *self {
            Self::Dielectric { eta_i, eta_t } => {
                Spectrum::ones() * fr_dielectric(cos_theta_i, eta_i, eta_t)
            }
            Self::Conductor { eta_i, eta_t, k } => fr_conductor(cos_theta_i, eta_i, eta_t, k),
            Self::Schlick { rs } => {
                let c = cos_theta_i.clamp(-1.0, 1.0);
                rs + (Spectrum::ones() - rs) * pow5(1.0 - c)
            }
            Self::NoOp => Spectrum::ones(),
        }
    }
}

fn fr_conductor(
    mut cos_theta_i: f32,
    eta_i: Spectrum<f32>,
    eta_t: Spectrum<f32>,
    k: Spectrum<f32>,
) -> Spectrum<f32> {
    // pbrt does the abs before calling a helper that does the clamp into [-1,1]
    cos_theta_i = cos_theta_i.abs().min(1.0);
    let eta = eta_t / eta_i;
    let eta_k = k / eta_i;

    let cos_theta_i_2 = cos_theta_i * cos_theta_i;
    let sin_theta_i_2 = 1.0 - cos_theta_i_2;
    let eta_2 = eta * eta;
    let eta_k_2 = eta_k * eta_k;

    let t0 = eta_2 - eta_k_2 - Spectrum::ones() * sin_theta_i_2;
    let a_2_plus_b_2 = (t0 * t0 + eta_2 * eta_k_2 * 4.0).sqrt();
    let t1 = a_2_plus_b_2 + Spectrum::ones() * cos_theta_i_2;
    let a = ((a_2_plus_b_2 + t0) * 0.5).sqrt();
    let t2 = a * cos_theta_i * 2.0;
    let rs = (t1 - t2) / (t1 + t2);

    let t3 = a_2_plus_b_2 * cos_theta_i_2 + Spectrum::ones() * sin_theta_i_2 * sin_theta_i_2;
    let t4 = t2 * sin_theta_i_2;
    let rp = rs * (t3 - t4) / (t3 + t4);

    (rp + rs) * 0.5
}

pub(super) fn pow5(v: f32) -> f32 {
    (v * v) * (v * v) * v
}
