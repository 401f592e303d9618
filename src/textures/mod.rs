mod constant;

use crate::interaction::SurfaceInteraction;

pub use constant::ConstantTexture;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Texture/Texture_Interface_and_Basic_Textures

pub trait Texture<T>: Send + Sync {
    /// Evaluates this `Texture` at the given [`SurfaceInteraction`].
    fn evaluate(&self, si: &SurfaceInteraction) -> T;
}
