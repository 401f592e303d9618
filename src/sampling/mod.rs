mod stratified;

pub use stratified::StratifiedSampler;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vec2, Vec3};

#[derive(Copy, Clone, Deserialize, Serialize)]
pub enum SamplerSettings {
    Stratified {
        pixel_samples: Vec2<u16>,
        jitter_samples: bool,
    },
}

impl Default for SamplerSettings {
    fn default() -> Self {
        SamplerSettings::Stratified {
            pixel_samples: Vec2::new(1, 1),
            jitter_samples: true,
        }
    }
}

pub fn create_sampler(settings: SamplerSettings, n_sampled_dimensions: usize) -> Box<dyn Sampler> {
    match settings {
        SamplerSettings::Stratified {
            pixel_samples,
            jitter_samples,
        } => Box::new(StratifiedSampler::new(
            stratified::Params {
                pixel_samples,
                jitter_samples,
            },
            n_sampled_dimensions,
        )),
    }
}

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Sampling_and_Reconstruction/Sampling_Interface.html

/// Image plane and lens coordinates for one primary ray.
#[derive(Copy, Clone)]
pub struct CameraSample {
    pub p_film: Point2<f32>,
    pub p_lens: Point2<f32>,
}

pub trait Sampler: Send {
    /// Clones this `Sampler` with a decorrelated prng stream for `seed`.
    fn clone_seeded(&self, seed: u64) -> Box<dyn Sampler>;

    /// Returns the number of samples per pixel this `Sampler` generates.
    fn samples_per_pixel(&self) -> u32;

    /// Registers a per-sample sequence of `n` 1D values, returning its id.
    ///
    /// All requests happen before the first `start_pixel` call.
    fn request_1d_array(&mut self, n: usize) -> usize;

    /// Registers a per-sample sequence of `n` 2D values, returning its id.
    fn request_2d_array(&mut self, n: usize) -> usize;

    /// Readies the sampler for a new pixel.
    fn start_pixel(&mut self);

    /// Readies the sampler for a new pixel sample.
    fn start_sample(&mut self);

    /// Returns the next dimension in the current sample vector.
    fn get_1d(&mut self) -> f32;

    /// Returns the next two dimensions in the current sample vector.
    fn get_2d(&mut self) -> Point2<f32>;

    /// Returns the registered 1D sequence for the current sample.
    fn get_1d_array(&mut self, id: usize) -> Option<&[f32]>;

    /// Returns the registered 2D sequence for the current sample.
    fn get_2d_array(&mut self, id: usize) -> Option<&[Point2<f32>]>;

    /// Returns the film and lens coordinates for the current sample.
    fn get_camera_sample(&mut self, p_raster: Point2<u16>) -> CameraSample {
        let jitter = self.get_2d();
        CameraSample {
            p_film: Point2::new(f32::from(p_raster.x), f32::from(p_raster.y))
                + Vec2::new(jitter.x, jitter.y),
            p_lens: self.get_2d(),
        }
    }
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/2D_Sampling_with_Multidimensional_Transformations

pub fn cosine_sample_hemisphere(u: Point2<f32>) -> Vec3<f32> {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

pub fn concentric_sample_disk(u: Point2<f32>) -> Point2<f32> {
    let offset = u * 2.0 - Vec2::new(1.0, 1.0);
    if offset == Point2::zeros() {
        return Point2::zeros();
    }

    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (
            std::f32::consts::FRAC_PI_4 * (offset.y / offset.x),
            offset.x,
        )
    } else {
        (
            std::f32::consts::FRAC_PI_2 - std::f32::consts::FRAC_PI_4 * (offset.x / offset.y),
            offset.y,
        )
    };

    Point2::new(theta.cos(), theta.sin()) * r
}

pub fn uniform_sample_hemisphere(u: Point2<f32>) -> Vec3<f32> {
    let z = u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * std::f32::consts::PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_hemisphere_pdf() -> f32 {
    0.5 * std::f32::consts::FRAC_1_PI
}

pub fn uniform_sample_sphere(u: Point2<f32>) -> Vec3<f32> {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * std::f32::consts::PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_sphere_pdf() -> f32 {
    0.25 * std::f32::consts::FRAC_1_PI
}

/// Returns barycentric coordinates distributed uniformly over a triangle.
pub fn uniform_sample_triangle(u: Point2<f32>) -> Point2<f32> {
    let su0 = u.x.sqrt();
    Point2::new(1.0 - su0, u.y * su0)
}

/// The power heuristic for combining two sampling techniques, with the
/// one-sample-each counts folded in.
///
/// Returns zero weight when `own_pdf` is zero so degenerate techniques
/// contribute nothing instead of NaN.
pub fn power_heuristic(own_pdf: f32, other_pdf: f32) -> f32 {
    let own = own_pdf * own_pdf;
    let other = other_pdf * other_pdf;
    if own + other == 0.0 {
        0.0
    } else {
        own / (own + other)
    }
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/Sampling_Random_Variables#Example:Piecewise-Constant1DFunctions

/// A discrete distribution over weighted choices, sampled through its
/// cumulative distribution function.
pub struct Distribution1D {
    func: Vec<f32>,
    cdf: Vec<f32>,
    func_int: f32,
}

impl Distribution1D {
    /// Builds the distribution over `func`. All-zero weights fall back to
    /// a uniform distribution so degenerate scenes keep sampling.
    pub fn new(func: &[f32]) -> Self {
        assert!(!func.is_empty(), "Distribution over nothing");
        debug_assert!(func.iter().all(|w| *w >= 0.0));

        let n = func.len();
        let mut func = func.to_vec();
        let mut cdf = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for (i, f) in func.iter().enumerate() {
            cdf.push(cdf[i] + f / (n as f32));
        }

        let func_int = cdf[n];
        if func_int == 0.0 {
            func.iter_mut().for_each(|f| *f = 1.0);
            for (i, c) in cdf.iter_mut().enumerate().skip(1) {
                *c = (i as f32) / (n as f32);
            }
        } else {
            cdf.iter_mut().for_each(|c| *c /= func_int);
        }

        Self {
            func,
            cdf,
            func_int,
        }
    }

    pub fn len(&self) -> usize {
        self.func.len()
    }

    pub fn is_empty(&self) -> bool {
        self.func.is_empty()
    }

    /// The integral of the unnormalized weights.
    pub fn integral(&self) -> f32 {
        self.func_int
    }

    /// The full non-descending cumulative distribution in `[0, 1]`,
    /// including the leading zero.
    pub fn cdf(&self) -> &[f32] {
        &self.cdf
    }

    /// Samples a choice with probability proportional to its weight.
    /// Returns the index and its probability mass.
    pub fn sample_discrete(&self, u: f32) -> (usize, f32) {
        let i = find_interval(&self.cdf, u);
        (i, self.discrete_pdf(i))
    }

    /// The probability mass of choice `i`, consistent with
    /// [`Self::sample_discrete`].
    pub fn discrete_pdf(&self, i: usize) -> f32 {
        self.cdf[i + 1] - self.cdf[i]
    }
}

/// Finds the largest index with `cdf[i] <= u`, clamped to a valid choice.
fn find_interval(cdf: &[f32], u: f32) -> usize {
    let mut first = 0;
    let mut len = cdf.len();
    while len > 1 {
        let half = len / 2;
        let middle = first + half;
        if cdf[middle] <= u {
            first = middle;
            len -= half;
        } else {
            len = half;
        }
    }
    first.min(cdf.len() - 2)
}
