use super::{AreaLight, EmissionSample, Light, LightSample};
use crate::{
    interaction::Interaction,
    math::{Normal, Point2, Point3, Ray, Spectrum, Vec3},
    sampling::{cosine_sample_hemisphere, uniform_sample_triangle, Distribution1D},
    valo_warn,
    visibility::VisibilityTester,
};

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Sources/Area_Lights
// https://www.pbr-book.org/3ed-2018/Light_Transport_I_Surface_Reflection/Sampling_Light_Sources

/// One-sided diffuse emitter over a triangle mesh.
///
/// Emits on the side the triangles' geometric normals point to. Points are
/// sampled proportional to surface area through a cumulative distribution
/// over the triangles.
pub struct DiffuseAreaLight {
    triangles: Vec<[Point3<f32>; 3]>,
    l_emit: Spectrum<f32>,
    area_distribution: Distribution1D,
    area: f32,
}

impl DiffuseAreaLight {
    pub fn new(triangles: Vec<[Point3<f32>; 3]>, l_emit: Spectrum<f32>) -> Self {
        assert!(
            !triangles.is_empty(),
            "Area light needs at least one triangle"
        );

        let areas: Vec<f32> = (0..triangles.len())
            .map(|i| triangle_area(&triangles[i]))
            .collect();
        let area: f32 = areas.iter().sum();
        if area == 0.0 {
            valo_warn!("Area light with degenerate triangles only");
        }

        Self {
            triangles,
            l_emit,
            area_distribution: Distribution1D::new(&areas),
            area,
        }
    }

    /// Total surface area of the mesh.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Geometric normal of triangle `i`.
    pub fn triangle_normal(&self, i: usize) -> Normal<f32> {
        let [a, b, c] = self.triangles[i];
        Normal::from((b - a).cross(c - a).normalized())
    }

    /// Emitted radiance of triangle `i` toward `w`.
    pub fn triangle_radiance(&self, i: usize, w: Vec3<f32>) -> Spectrum<f32> {
        self.radiance(self.triangle_normal(i), w)
    }

    /// Draws a point uniform in area: `uc` picks the triangle through the
    /// area distribution, `u` a barycentric point on it. Returns the point,
    /// its normal, the area measure density and the triangle index.
    pub fn sample_point(&self, uc: f32, u: Point2<f32>) -> (Point3<f32>, Normal<f32>, f32, usize) {
        let (tri, _) = self.area_distribution.sample_discrete(uc);
        let b = uniform_sample_triangle(u);

        let [a, bb, c] = self.triangles[tri];
        let p = a + ((bb - a) * b.x + (c - a) * b.y);

        let pdf_area = if self.area > 0.0 { 1.0 / self.area } else { 0.0 };
        (p, self.triangle_normal(tri), pdf_area, tri)
    }

    /// Intersects the light's own mesh, returning distance and triangle
    /// index of the closest hit.
    pub fn intersect(&self, ray: &Ray<f32>) -> Option<(f32, usize)> {
        let mut closest: Option<(f32, usize)> = None;
        for (i, tri) in self.triangles.iter().enumerate() {
            if let Some(t) = intersect_triangle(ray, tri) {
                if t < closest.map_or(ray.t_max, |(ct, _)| ct) {
                    closest = Some((t, i));
                }
            }
        }
        closest
    }
}

impl Light for DiffuseAreaLight {
    fn power(&self) -> Spectrum<f32> {
        self.l_emit * self.area * std::f32::consts::PI
    }

    fn sample_li(&self, it: &Interaction, u: Point2<f32>) -> LightSample {
        // Reuse the first dimension for triangle selection, remapped back
        // to [0, 1) over the chosen slice
        let (tri, pmf) = self.area_distribution.sample_discrete(u.x);
        let uc = if pmf > 0.0 {
            ((u.x - self.area_distribution.cdf()[tri]) / pmf).clamp(0.0, 1.0 - f32::EPSILON)
        } else {
            u.x
        };
        let b = uniform_sample_triangle(Point2::new(uc, u.y));

        let [a, bb, c] = self.triangles[tri];
        let p = a + ((bb - a) * b.x + (c - a) * b.y);
        let n = self.triangle_normal(tri);

        let to_light = p - it.p;
        let dist_sqr = to_light.len_sqr();
        if dist_sqr == 0.0 || self.area == 0.0 {
            return LightSample {
                wi: Vec3::zeros(),
                li: Spectrum::zeros(),
                pdf: 0.0,
                vis: None,
            };
        }
        let wi = to_light / dist_sqr.sqrt();

        // Area measure to solid angle at the shading point
        let cos_light = n.dot_v(-wi).abs();
        let pdf = if cos_light == 0.0 {
            0.0
        } else {
            dist_sqr / (cos_light * self.area)
        };

        let li = self.radiance(n, -wi);

        let vis = Some(VisibilityTester::new(*it, Interaction { p, n }));

        LightSample { wi, li, pdf, vis }
    }

    fn pdf_li(&self, it: &Interaction, wi: Vec3<f32>) -> f32 {
        let ray = it.spawn_ray(wi);
        let Some((t, tri)) = self.intersect(&ray) else {
            return 0.0;
        };

        let p = ray.point(t);
        let cos_light = self.triangle_normal(tri).dot_v(-wi).abs();
        if cos_light == 0.0 || self.area == 0.0 {
            return 0.0;
        }
        it.p.dist_sqr(p) / (cos_light * self.area)
    }

    fn radiance_along(
        &self,
        it: &Interaction,
        wi: Vec3<f32>,
    ) -> (Spectrum<f32>, Option<VisibilityTester>) {
        let ray = it.spawn_ray(wi);
        let Some((t, tri)) = self.intersect(&ray) else {
            return (Spectrum::zeros(), None);
        };

        let p = ray.point(t);
        let n = self.triangle_normal(tri);
        let li = self.radiance(n, -wi);
        let vis = VisibilityTester::new(*it, Interaction { p, n });

        (li, Some(vis))
    }

    fn sample_le(&self, u1: Point2<f32>, u2: Point2<f32>) -> EmissionSample {
        let (p, n, pdf_area, _) = self.sample_point(u1.x, Point2::new(u1.y, u2.x));

        // Cosine-weighted direction in the frame of the emitting side
        let d_local = cosine_sample_hemisphere(u2);
        let (v1, v2) = {
            let nv = Vec3::from(n);
            let v1 = if nv.x.abs() > nv.y.abs() {
                Vec3::new(-nv.z, 0.0, nv.x) / (nv.x * nv.x + nv.z * nv.z).sqrt()
            } else {
                Vec3::new(0.0, nv.z, -nv.y) / (nv.y * nv.y + nv.z * nv.z).sqrt()
            };
            (v1, nv.cross(v1))
        };
        let d = v1 * d_local.x + v2 * d_local.y + Vec3::from(n) * d_local.z;

        EmissionSample {
            ray: Interaction { p, n }.spawn_ray(d),
            n,
            li: self.l_emit,
            pdf_pos: pdf_area,
            pdf_dir: d_local.z.abs() * std::f32::consts::FRAC_1_PI,
        }
    }

    fn direction_from(&self, p: Point3<f32>) -> Option<Vec3<f32>> {
        // Direction toward the mesh centroid
        let mut centroid = Vec3::zeros();
        for [a, b, c] in &self.triangles {
            centroid += ((*a - Point3::zeros()) + (*b - Point3::zeros()) + (*c - Point3::zeros()))
                / 3.0;
        }
        centroid /= self.triangles.len() as f32;

        let to_light = centroid - (p - Point3::zeros());
        if to_light.len_sqr() == 0.0 {
            None
        } else {
            Some(to_light.normalized())
        }
    }
}

impl AreaLight for DiffuseAreaLight {
    fn radiance(&self, n: Normal<f32>, w: Vec3<f32>) -> Spectrum<f32> {
        if n.dot_v(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::zeros()
        }
    }
}

fn triangle_area(tri: &[Point3<f32>; 3]) -> f32 {
    let [a, b, c] = *tri;
    0.5 * (b - a).cross(c - a).len()
}

/// Möller-Trumbore ray-triangle test.
fn intersect_triangle(ray: &Ray<f32>, tri: &[Point3<f32>; 3]) -> Option<f32> {
    let [a, b, c] = *tri;
    let e1 = b - a;
    let e2 = c - a;

    let p = ray.d.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-9 {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.o - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = ray.d.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    if t > 0.0 && t < ray.t_max {
        Some(t)
    } else {
        None
    }
}
