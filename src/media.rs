use crate::math::{Bounds3, Point3, Ray, Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Volume_Scattering

/// Phase function of a perfectly isotropic medium.
pub fn phase_isotropic() -> f32 {
    0.25 * std::f32::consts::FRAC_1_PI
}

/// The Henyey-Greenstein phase function for the cosine between the
/// incoming and outgoing directions. Matches the isotropic phase at g = 0.
pub fn phase_hg(cos_theta: f32, g: f32) -> f32 {
    if g.abs() < 1e-3 {
        return phase_isotropic();
    }
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    0.25 * std::f32::consts::FRAC_1_PI * (1.0 - g * g) / (denom * denom.max(0.0).sqrt())
}

/// A participating medium occupying a region of world space.
///
/// Rays passing through pick up emission and in-scattered light and lose
/// energy to absorption and out-scattering. Directions passed in are
/// expected unit length.
pub trait VolumeRegion: Send + Sync {
    /// World bounds of the region.
    fn bounds(&self) -> Bounds3<f32>;

    /// Parametric overlap of `ray` with the region, clipped to
    /// `[0, ray.t_max]`.
    fn intersect(&self, ray: &Ray<f32>) -> Option<(f32, f32)> {
        self.bounds().intersections(*ray)
    }

    /// Radiance emitted per unit length at `p`.
    fn emission(&self, p: Point3<f32>) -> Spectrum<f32>;

    /// Absorption coefficient at `p`.
    fn absorption(&self, p: Point3<f32>) -> Spectrum<f32>;

    /// Out-scattering coefficient at `p`.
    fn scattering(&self, p: Point3<f32>) -> Spectrum<f32>;

    /// Total extinction at `p`.
    fn sigma_t(&self, p: Point3<f32>) -> Spectrum<f32> {
        self.absorption(p) + self.scattering(p)
    }

    /// Fraction of light at `p` scattered from `wi` toward `wo`.
    fn phase(&self, p: Point3<f32>, wi: Vec3<f32>, wo: Vec3<f32>) -> f32;

    /// Optical thickness along `ray`, marched with `step` sized steps from
    /// a start jittered by `offset` in `[0, 1)`.
    fn optical_thickness(&self, ray: &Ray<f32>, step: f32, offset: f32) -> Spectrum<f32> {
        let Some((t0, t1)) = self.intersect(ray) else {
            return Spectrum::zeros();
        };

        let mut tau = Spectrum::zeros();
        let mut t = t0 + offset * step;
        while t < t1 {
            tau += self.sigma_t(ray.point(t)) * step.min(t1 - t);
            t += step;
        }
        tau
    }
}

/// Box-bounded medium with constant coefficients.
pub struct HomogeneousVolume {
    sigma_a: Spectrum<f32>,
    sigma_s: Spectrum<f32>,
    le: Spectrum<f32>,
    /// Henyey-Greenstein asymmetry
    g: f32,
    bounds: Bounds3<f32>,
}

impl HomogeneousVolume {
    pub fn new(
        sigma_a: Spectrum<f32>,
        sigma_s: Spectrum<f32>,
        le: Spectrum<f32>,
        g: f32,
        bounds: Bounds3<f32>,
    ) -> Self {
        Self {
            sigma_a,
            sigma_s,
            le,
            g,
            bounds,
        }
    }
}

impl VolumeRegion for HomogeneousVolume {
    fn bounds(&self) -> Bounds3<f32> {
        self.bounds
    }

    fn emission(&self, p: Point3<f32>) -> Spectrum<f32> {
        if self.bounds.inside(p) {
            self.le
        } else {
            Spectrum::zeros()
        }
    }

    fn absorption(&self, p: Point3<f32>) -> Spectrum<f32> {
        if self.bounds.inside(p) {
            self.sigma_a
        } else {
            Spectrum::zeros()
        }
    }

    fn scattering(&self, p: Point3<f32>) -> Spectrum<f32> {
        if self.bounds.inside(p) {
            self.sigma_s
        } else {
            Spectrum::zeros()
        }
    }

    fn phase(&self, p: Point3<f32>, wi: Vec3<f32>, wo: Vec3<f32>) -> f32 {
        if !self.bounds.inside(p) {
            return 0.0;
        }
        phase_hg(wi.dot(wo), self.g)
    }

    /// Closed form, no marching needed for constant coefficients.
    fn optical_thickness(&self, ray: &Ray<f32>, _step: f32, _offset: f32) -> Spectrum<f32> {
        let Some((t0, t1)) = self.intersect(ray) else {
            return Spectrum::zeros();
        };
        (self.sigma_a + self.sigma_s) * ((t1 - t0) * ray.d.len())
    }
}
