mod anisotropic;
mod blinn;
pub mod fresnel;
mod fresnel_blend;
mod lambertian;
mod measured;
mod microfacet;
mod oren_nayar;
pub mod specular;

pub use anisotropic::AnisotropicDistribution;
pub use blinn::BlinnDistribution;
pub use fresnel::Fresnel;
pub use fresnel_blend::FresnelBlend;
pub use lambertian::Lambertian;
pub use measured::{BrdfTable, Measured, TableError};
pub use microfacet::{MicrofacetDistribution, MicrofacetReflection};
pub use oren_nayar::OrenNayar;

use bitflags::bitflags;

use crate::{
    interaction::SurfaceInteraction,
    math::{Normal, Point2, Spectrum, Vec3},
    sampling::{cosine_sample_hemisphere, uniform_hemisphere_pdf, uniform_sample_hemisphere},
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Materials/BSDFs
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Basic_Interface#BxDF

bitflags! {
    /// Capability set of a scattering component.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BxdfType: u8 {
        const NONE = 0;
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
    }
}

/// One drawn scattering direction with its value and density.
#[derive(Copy, Clone)]
pub struct BxdfSample {
    pub wi: Vec3<f32>,
    pub f: Spectrum<f32>,
    pub pdf: f32,
    pub sample_type: BxdfType,
}

impl Default for BxdfSample {
    fn default() -> Self {
        Self {
            wi: Vec3::zeros(),
            f: Spectrum::zeros(),
            pdf: 0.0,
            sample_type: BxdfType::NONE,
        }
    }
}

/// Interface for an individual BRDF or BTDF function.
///
/// All directions are unit length and expressed in the local shading frame
/// with the normal along +z.
pub trait Bxdf {
    /// Returns the capability set of this `Bxdf`.
    fn flags(&self) -> BxdfType;

    /// Returns `true` if this `Bxdf` has no capabilities outside `flags`.
    fn matches(&self, flags: BxdfType) -> bool {
        flags.contains(self.flags())
    }

    /// Evaluate distribution function for the pair of directions.
    ///
    /// Always zero for specular components, their contribution only comes
    /// through [`Bxdf::sample_f`].
    fn f(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> Spectrum<f32>;

    /// Draws an exitant direction for `wo`, returning it with the
    /// distribution value and the solid angle density the direction was
    /// drawn with. Specular components return a pdf of exactly 1.
    fn sample_f(&self, wo: Vec3<f32>, u: Point2<f32>) -> BxdfSample {
        // Cosine-sample the hemisphere, flipping the direction if necessary
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }

        let pdf = self.pdf(wo, wi);
        let f = self.f(wo, wi);

        BxdfSample {
            wi,
            f,
            pdf,
            sample_type: self.flags(),
        }
    }

    /// The density [`Bxdf::sample_f`] draws the pair with. Zero for
    /// specular components as they have no continuous density.
    fn pdf(&self, wo: Vec3<f32>, wi: Vec3<f32>) -> f32 {
        if same_hemisphere(wo, wi) {
            cos_theta(wi).abs() * std::f32::consts::FRAC_1_PI
        } else {
            0.0
        }
    }

    /// Estimates the hemispherical-directional reflectance from the given
    /// canonical samples.
    fn rho_hd(&self, wo: Vec3<f32>, samples: &[Point2<f32>]) -> Spectrum<f32> {
        let mut r = Spectrum::zeros();
        for u in samples {
            let BxdfSample { wi, f, pdf, .. } = self.sample_f(wo, *u);
            if pdf > 0.0 {
                r += f * cos_theta(wi).abs() / pdf;
            }
        }
        r / (samples.len() as f32)
    }

    /// Estimates the hemispherical-hemispherical reflectance from the given
    /// canonical samples.
    fn rho_hh(&self, samples1: &[Point2<f32>], samples2: &[Point2<f32>]) -> Spectrum<f32> {
        assert!(samples1.len() == samples2.len());

        let mut r = Spectrum::zeros();
        for (u1, u2) in samples1.iter().zip(samples2.iter()) {
            let wo = uniform_sample_hemisphere(*u1);
            let pdf_o = uniform_hemisphere_pdf();
            let BxdfSample { wi, f, pdf, .. } = self.sample_f(wo, *u2);
            if pdf > 0.0 {
                r += f * cos_theta(wi).abs() * cos_theta(wo).abs() / (pdf_o * pdf);
            }
        }
        r / (std::f32::consts::PI * (samples1.len() as f32))
    }
}

pub const MAX_BXDFS: usize = 8;

/// A collection of scattering components at one surface point.
///
/// Components live in the per-thread arena, the `Bsdf` itself on the stack.
pub struct Bsdf<'a> {
    bxdfs: [Option<&'a dyn Bxdf>; MAX_BXDFS],
    n_bxdfs: usize,
    /// Relative refractive index over the boundary, for callers that adjust
    /// a ray's medium on specular transmission
    pub eta: f32,
    ns: Normal<f32>,
    ng: Normal<f32>,
    ss: Vec3<f32>,
    ts: Vec3<f32>,
}

impl<'a> Bsdf<'a> {
    pub fn new(si: &SurfaceInteraction) -> Self {
        Self::with_eta(si, 1.0)
    }

    pub fn with_eta(si: &SurfaceInteraction, eta: f32) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalized();
        let ts = Vec3::from(ns).cross(ss);

        Self {
            bxdfs: [None; MAX_BXDFS],
            n_bxdfs: 0,
            eta,
            ns,
            ng: si.n,
            ss,
            ts,
        }
    }

    /// Adds `bxdf` into this [`Bsdf`].
    pub fn add(&mut self, bxdf: &'a dyn Bxdf) {
        assert!(
            self.n_bxdfs < MAX_BXDFS,
            "Only {} bxdfs fit in a Bsdf",
            MAX_BXDFS
        );
        self.bxdfs[self.n_bxdfs] = Some(bxdf);
        self.n_bxdfs += 1;
    }

    /// Returns the number of components matching `flags`.
    pub fn num_components(&self, flags: BxdfType) -> usize {
        self.components()
            .filter(|bxdf| bxdf.matches(flags))
            .count()
    }

    fn components(&self) -> impl Iterator<Item = &'a dyn Bxdf> + '_ {
        self.bxdfs[..self.n_bxdfs].iter().map(|b| b.unwrap())
    }

    /// Transform `v` from world space to surface local.
    fn world_to_local(&self, v: Vec3<f32>) -> Vec3<f32> {
        Vec3::new(v.dot(self.ss), v.dot(self.ts), v.dot_n(self.ns))
    }

    /// Transform `v` from surface local to world space.
    fn local_to_world(&self, v: Vec3<f32>) -> Vec3<f32> {
        Vec3::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    /// Evaluate distribution function for the pair of world space
    /// directions, over the components matching `flags`.
    pub fn f(&self, wo_world: Vec3<f32>, wi_world: Vec3<f32>, flags: BxdfType) -> Spectrum<f32> {
        let wo = self.world_to_local(wo_world);
        if wo.z == 0.0 {
            return Spectrum::zeros();
        }
        let wi = self.world_to_local(wi_world);

        // Reflection or transmission is decided against the geometric
        // normal so shading normals don't leak light through surfaces
        let reflect = wi_world.dot_n(self.ng) * wo_world.dot_n(self.ng) > 0.0;

        let mut f = Spectrum::zeros();
        for bxdf in self.components() {
            if bxdf.matches(flags)
                && ((reflect && bxdf.flags().contains(BxdfType::REFLECTION))
                    || (!reflect && bxdf.flags().contains(BxdfType::TRANSMISSION)))
            {
                f += bxdf.f(wo, wi);
            }
        }

        f
    }

    /// The average density over matching components for the pair of world
    /// space directions.
    pub fn pdf(&self, wo_world: Vec3<f32>, wi_world: Vec3<f32>, flags: BxdfType) -> f32 {
        if self.n_bxdfs == 0 {
            return 0.0;
        }
        let wo = self.world_to_local(wo_world);
        if wo.z == 0.0 {
            return 0.0;
        }
        let wi = self.world_to_local(wi_world);

        let mut pdf = 0.0;
        let mut matching = 0;
        for bxdf in self.components() {
            if bxdf.matches(flags) {
                matching += 1;
                pdf += bxdf.pdf(wo, wi);
            }
        }

        if matching > 0 {
            pdf / (matching as f32)
        } else {
            0.0
        }
    }

    /// Draws an exitant world space direction for `wo_world` by uniformly
    /// selecting a matching component with `uc` and delegating to it.
    ///
    /// For non-specular samples the returned density is the average over
    /// all matching components at the drawn pair and the value is re-summed
    /// over them, making the estimate a one-sample combination over the
    /// components.
    pub fn sample_f(
        &self,
        wo_world: Vec3<f32>,
        u: Point2<f32>,
        uc: f32,
        flags: BxdfType,
    ) -> BxdfSample {
        let matching = self.num_components(flags);
        if matching == 0 {
            return BxdfSample::default();
        }
        let comp = ((uc * (matching as f32)) as usize).min(matching - 1);
        let (chosen_index, bxdf) = self.bxdfs[..self.n_bxdfs]
            .iter()
            .enumerate()
            .filter_map(|(i, b)| {
                let b = b.unwrap();
                b.matches(flags).then_some((i, b))
            })
            .nth(comp)
            .unwrap();

        let wo = self.world_to_local(wo_world);
        if wo.z == 0.0 {
            return BxdfSample::default();
        }

        let mut sample = bxdf.sample_f(wo, u);
        if sample.pdf == 0.0 {
            return BxdfSample::default();
        }

        let specular = bxdf.flags().contains(BxdfType::SPECULAR);
        if !specular && matching > 1 {
            for (i, other) in self.bxdfs[..self.n_bxdfs].iter().enumerate() {
                let other = other.unwrap();
                if i != chosen_index && other.matches(flags) {
                    sample.pdf += other.pdf(wo, sample.wi);
                }
            }
        }
        if matching > 1 {
            sample.pdf /= matching as f32;
        }

        let wi_world = self.local_to_world(sample.wi);
        if !specular {
            let reflect = wi_world.dot_n(self.ng) * wo_world.dot_n(self.ng) > 0.0;
            sample.f = Spectrum::zeros();
            for other in self.components() {
                if other.matches(flags)
                    && ((reflect && other.flags().contains(BxdfType::REFLECTION))
                        || (!reflect && other.flags().contains(BxdfType::TRANSMISSION)))
                {
                    sample.f += other.f(wo, sample.wi);
                }
            }
        }
        sample.wi = wi_world;

        sample
    }
}

// Trigonometry in the local shading frame where the normal is +z

pub fn cos_theta(w: Vec3<f32>) -> f32 {
    w.z
}

pub fn cos_2_theta(w: Vec3<f32>) -> f32 {
    w.z * w.z
}

pub fn sin_2_theta(w: Vec3<f32>) -> f32 {
    (1.0 - cos_2_theta(w)).max(0.0)
}

pub fn sin_theta(w: Vec3<f32>) -> f32 {
    sin_2_theta(w).sqrt()
}

pub fn tan_theta(w: Vec3<f32>) -> f32 {
    sin_theta(w) / cos_theta(w)
}

pub fn tan_2_theta(w: Vec3<f32>) -> f32 {
    sin_2_theta(w) / cos_2_theta(w)
}

pub fn cos_phi(w: Vec3<f32>) -> f32 {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        1.0
    } else {
        (w.x / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn sin_phi(w: Vec3<f32>) -> f32 {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        0.0
    } else {
        (w.y / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn cos_2_phi(w: Vec3<f32>) -> f32 {
    cos_phi(w) * cos_phi(w)
}

pub fn sin_2_phi(w: Vec3<f32>) -> f32 {
    sin_phi(w) * sin_phi(w)
}

pub fn same_hemisphere(a: Vec3<f32>, b: Vec3<f32>) -> bool {
    a.z * b.z > 0.0
}

/// Mirrors `wo` around `n`. Both should be unit length.
pub fn reflect(wo: Vec3<f32>, n: Vec3<f32>) -> Vec3<f32> {
    -wo + n * 2.0 * wo.dot(n)
}

/// Refracts `wi` through a surface with normal `n` and relative refractive
/// index `eta`. `None` on total internal reflection.
pub fn refract(wi: Vec3<f32>, n: Normal<f32>, eta: f32) -> Option<Vec3<f32>> {
    let cos_theta_i = n.dot_v(wi);
    let sin_2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin_2_theta_t = eta * eta * sin_2_theta_i;

    let total_internal_reflection = sin_2_theta_t >= 1.0;
    if total_internal_reflection {
        return None;
    }

    let cos_theta_t = (1.0 - sin_2_theta_t).sqrt();
    Some(-wi * eta + Vec3::from(n) * (eta * cos_theta_i - cos_theta_t))
}

pub fn spherical_direction(sin_theta: f32, cos_theta: f32, phi: f32) -> Vec3<f32> {
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
