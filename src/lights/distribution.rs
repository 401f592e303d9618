use std::sync::Arc;

use super::Light;
use crate::{
    math::{Normal, Point3},
    sampling::Distribution1D,
};

// Power-proportional light selection, rebuilt per shading point so the
// optional cosine reweighting can take the local normal into account.

/// The power-weighted light selection strategy.
pub struct PowerLightDistribution;

impl PowerLightDistribution {
    /// Builds the selection distribution over the scene's non-delta lights
    /// at `p`: infinite lights first, then area lights, both in registry
    /// order.
    ///
    /// Weights are the luminance of each light's power, scaled by
    /// `max(0, n . direction-to-light)` when a shading normal is supplied
    /// and the light has a location.
    pub fn new(lights: &[Arc<dyn Light>], p: Point3<f32>, n: Option<Normal<f32>>) -> LightsCdf {
        let mut light_indices = Vec::new();
        let mut weights = Vec::new();

        let mut push = |i: usize, light: &Arc<dyn Light>| {
            let mut weight = light.power().luminance();
            if let (Some(n), Some(dir)) = (n, light.direction_from(p)) {
                weight *= n.dot_v(dir).max(0.0);
            }
            light_indices.push(i);
            weights.push(weight);
        };

        for (i, light) in lights.iter().enumerate() {
            if light.is_infinite() {
                push(i, light);
            }
        }
        for (i, light) in lights.iter().enumerate() {
            if !light.is_delta() && !light.is_infinite() {
                push(i, light);
            }
        }

        let distribution = if weights.is_empty() {
            None
        } else {
            Some(Distribution1D::new(&weights))
        };

        LightsCdf {
            distribution,
            light_indices,
        }
    }
}

/// Per-query cumulative distribution over the selectable lights.
pub struct LightsCdf {
    distribution: Option<Distribution1D>,
    light_indices: Vec<usize>,
}

impl LightsCdf {
    /// `true` when the scene has no selectable lights.
    pub fn is_empty(&self) -> bool {
        self.light_indices.is_empty()
    }

    /// Samples a light, returning its index in the scene's registry and
    /// the probability mass it was selected with.
    pub fn sample(&self, u: f32) -> Option<(usize, f32)> {
        let distribution = self.distribution.as_ref()?;
        let (slot, pmf) = distribution.sample_discrete(u);
        Some((self.light_indices[slot], pmf))
    }

    /// The probability mass of selecting the registry light `light_index`,
    /// consistent with [`LightsCdf::sample`]. Zero for lights outside the
    /// distribution.
    pub fn pdf(&self, light_index: usize) -> f32 {
        let Some(distribution) = self.distribution.as_ref() else {
            return 0.0;
        };
        self.light_indices
            .iter()
            .position(|i| *i == light_index)
            .map_or(0.0, |slot| distribution.discrete_pdf(slot))
    }

    /// The non-descending cumulative values in `[0, 1]`, including the
    /// leading zero.
    pub fn cdf(&self) -> &[f32] {
        self.distribution.as_ref().map_or(&[], Distribution1D::cdf)
    }
}
