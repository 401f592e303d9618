pub mod bsdfs;
mod glass;
mod glossy;
mod matte;
mod measured;
mod metal;

pub use bsdfs::{Bsdf, BxdfSample, BxdfType};
pub use glass::Glass;
pub use glossy::Glossy;
pub use matte::Matte;
pub use measured::MeasuredMaterial;
pub use metal::Metal;

use crate::{interaction::SurfaceInteraction, memory::Arena};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Materials/Material_Interface_and_Implementations

pub trait Material: Send + Sync {
    /// Returns the [`Bsdf`] for the given [`SurfaceInteraction`], with the
    /// components allocated from `scratch`.
    fn compute_scattering_functions<'a>(
        &'a self,
        scratch: &'a Arena,
        si: &SurfaceInteraction,
    ) -> Bsdf<'a>;
}

/// Maps a perceptual roughness in `(0, 1]` to an exponential lobe width.
pub(crate) fn roughness_to_exponent(roughness: f32) -> f32 {
    let alpha = roughness.clamp(1e-3, 1.0);
    2.0 / (alpha * alpha) - 2.0
}
