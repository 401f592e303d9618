use std::sync::Arc;

use approx::assert_relative_eq;

use valo::integrators::{
    radiance, DirectLightingParams, Emission, EmissionParams, IntegratorType, LightStrategy,
    VolumeIntegrator,
};
use valo::interaction::SurfaceInteraction;
use valo::lights::{ConstantInfiniteLight, Light, PointLight};
use valo::materials::{Glass, Material, Matte};
use valo::math::{Bounds3, Point2, Point3, Ray, Spectrum, Vec3};
use valo::media::HomogeneousVolume;
use valo::memory::Arena;
use valo::sampling::{create_sampler, Sampler, SamplerSettings};
use valo::scene::{Aggregate, Hit, Scene};
use valo::textures::ConstantTexture;

/// Unit sphere centered at the origin, seen from the inside.
struct UnitSphere {
    material: Arc<dyn Material>,
}

impl Aggregate for UnitSphere {
    fn intersect(&self, ray: Ray<f32>) -> Option<Hit> {
        // o + t*d on the sphere: |o|^2 + 2t o.d + t^2 |d|^2 = 1
        let o = ray.o - Point3::zeros();
        let a = ray.d.len_sqr();
        let b = 2.0 * o.dot(ray.d);
        let c = o.len_sqr() - 1.0;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let t = {
            let t0 = (-b - sqrt_d) / (2.0 * a);
            let t1 = (-b + sqrt_d) / (2.0 * a);
            if t0 > 1e-4 {
                t0
            } else if t1 > 1e-4 {
                t1
            } else {
                return None;
            }
        };
        if t >= ray.t_max {
            return None;
        }

        let p = ray.point(t);
        let n = (p - Point3::zeros()).normalized();
        // Tangents perpendicular to the outward normal
        let dpdu = if n.x.abs() > 0.1 {
            Vec3::new(-n.z, 0.0, n.x).normalized()
        } else {
            Vec3::new(0.0, n.z, -n.y).normalized()
        };
        let dpdv = n.cross(dpdu);

        let mut si = SurfaceInteraction::new(p, Point2::zeros(), dpdu, dpdv, -ray.d, false);
        si.material = Some(self.material.clone());

        Some(Hit {
            t,
            primitive: 0,
            si,
        })
    }

    fn intersect_p(&self, ray: Ray<f32>) -> bool {
        self.intersect(ray).is_some()
    }
}

/// Oracle for scenes with nothing in them.
struct EmptyAggregate;

impl Aggregate for EmptyAggregate {
    fn intersect(&self, _ray: Ray<f32>) -> Option<Hit> {
        None
    }

    fn intersect_p(&self, _ray: Ray<f32>) -> bool {
        false
    }
}

fn white_matte() -> Arc<dyn Material> {
    Arc::new(Matte::new(
        Arc::new(ConstantTexture::new(Spectrum::new(1.0, 1.0, 1.0))),
        0.0,
    ))
}

fn fresh_sampler() -> Box<dyn Sampler> {
    let mut sampler = create_sampler(SamplerSettings::default(), 4);
    sampler.start_pixel();
    sampler.start_sample();
    sampler
}

#[test]
fn point_light_in_unit_sphere_is_analytic() {
    // A unit sphere with reflectance one, lit by a point light at its
    // center: every interior view direction sees I / pi
    let intensity = 4.0;
    let scene = Scene::new(
        Arc::new(UnitSphere {
            material: white_matte(),
        }),
        vec![Arc::new(PointLight::new(
            Point3::zeros(),
            Spectrum::new(intensity, intensity, intensity),
        ))],
        None,
    );

    let integrator = IntegratorType::DirectLighting(DirectLightingParams {
        max_depth: 1,
        strategy: LightStrategy::SampleAll,
        light_samples: 1,
    })
    .instantiate();

    let mut sampler = fresh_sampler();
    let mut arena = Arena::new();

    let expected = intensity * std::f32::consts::FRAC_1_PI;
    for d in [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-0.3, 0.8, 0.52).normalized(),
    ] {
        let ray = Ray::new(Point3::zeros(), d, f32::INFINITY);
        let result = radiance(
            &arena,
            ray,
            &scene,
            0,
            integrator.as_ref(),
            None,
            sampler.as_mut(),
        );
        assert_relative_eq!(result.li.r, expected, max_relative = 1e-3);
        assert_relative_eq!(result.li.g, expected, max_relative = 1e-3);
        arena.reset();
    }
}

#[test]
fn purely_specular_surface_skips_direct_lighting() {
    // Glass sphere around a point light with recursion disabled: nothing
    // to estimate, nothing to recurse into
    let material: Arc<dyn Material> = Arc::new(Glass::new(
        Arc::new(ConstantTexture::new(Spectrum::new(1.0, 1.0, 1.0))),
        Arc::new(ConstantTexture::new(Spectrum::new(1.0, 1.0, 1.0))),
        1.5,
    ));
    let scene = Scene::new(
        Arc::new(UnitSphere { material }),
        vec![Arc::new(PointLight::new(
            Point3::zeros(),
            Spectrum::new(1.0, 1.0, 1.0),
        ))],
        None,
    );

    let integrator = IntegratorType::DirectLighting(DirectLightingParams {
        max_depth: 1,
        strategy: LightStrategy::SampleAll,
        light_samples: 1,
    })
    .instantiate();

    let mut sampler = fresh_sampler();
    let arena = Arena::new();

    let ray = Ray::new(
        Point3::zeros(),
        Vec3::new(0.0, 0.0, 1.0),
        f32::INFINITY,
    );
    let result = radiance(
        &arena,
        ray,
        &scene,
        0,
        integrator.as_ref(),
        None,
        sampler.as_mut(),
    );
    assert!(result.li.is_black());
}

#[test]
fn specular_depth_bound_drops_deeper_bounces() {
    // With the bound at one bounce more the mirror-side recursion turns on
    // and the glass sphere sees the light through its own wall
    let material: Arc<dyn Material> = Arc::new(Glass::new(
        Arc::new(ConstantTexture::new(Spectrum::new(1.0, 1.0, 1.0))),
        Arc::new(ConstantTexture::new(Spectrum::new(1.0, 1.0, 1.0))),
        1.5,
    ));
    let scene = Scene::new(
        Arc::new(UnitSphere {
            material: material.clone(),
        }),
        vec![Arc::new(ConstantInfiniteLight::new(
            Spectrum::new(1.0, 1.0, 1.0),
            Point3::zeros(),
            10.0,
        ))],
        None,
    );

    let mut arena = Arena::new();
    let ray = Ray::new(
        Point3::zeros(),
        Vec3::new(0.0, 0.0, 1.0),
        f32::INFINITY,
    );

    let shallow = {
        let integrator = IntegratorType::DirectLighting(DirectLightingParams {
            max_depth: 1,
            strategy: LightStrategy::SampleAll,
            light_samples: 1,
        })
        .instantiate();
        let mut sampler = fresh_sampler();
        let r = radiance(
            &arena,
            ray,
            &scene,
            0,
            integrator.as_ref(),
            None,
            sampler.as_mut(),
        );
        r.li
    };
    arena.reset();

    let deep = {
        let integrator = IntegratorType::DirectLighting(DirectLightingParams {
            max_depth: 4,
            strategy: LightStrategy::SampleAll,
            light_samples: 1,
        })
        .instantiate();
        let mut sampler = fresh_sampler();
        let r = radiance(
            &arena,
            ray,
            &scene,
            0,
            integrator.as_ref(),
            None,
            sampler.as_mut(),
        );
        r.li
    };

    // The hard cutoff drops energy, deeper recursion finds more of it
    assert!(shallow.is_black());
    assert!(deep.luminance() > 0.0);
}

fn absorbing_volume(sigma: f32) -> Arc<HomogeneousVolume> {
    Arc::new(HomogeneousVolume::new(
        Spectrum::new(sigma, sigma, sigma),
        Spectrum::zeros(),
        Spectrum::zeros(),
        0.0,
        Bounds3::new(Point3::new(1.0, -1.0, -1.0), Point3::new(3.0, 1.0, 1.0)),
    ))
}

#[test]
fn homogeneous_transmittance_is_analytic() {
    let sigma = 0.7;
    let scene = Scene::new(
        Arc::new(EmptyAggregate),
        Vec::new(),
        Some(absorbing_volume(sigma)),
    );

    let integrator = Emission::new(EmissionParams { step_size: 0.05 });
    let mut sampler = fresh_sampler();

    // The chord through the box is two units long
    let ray = Ray::new(
        Point3::zeros(),
        Vec3::new(1.0, 0.0, 0.0),
        f32::INFINITY,
    );
    let tr = integrator.transmittance(&ray, &scene, sampler.as_mut());

    let expected = (-sigma * 2.0).exp();
    assert_relative_eq!(tr.r, expected, max_relative = 1e-5);
    assert_relative_eq!(tr.g, expected, max_relative = 1e-5);
    assert_relative_eq!(tr.b, expected, max_relative = 1e-5);
}

#[test]
fn medium_attenuates_background_radiance() {
    let sigma = 0.5;
    let background = 2.0;
    let scene = Scene::new(
        Arc::new(EmptyAggregate),
        vec![Arc::new(ConstantInfiniteLight::new(
            Spectrum::new(background, background, background),
            Point3::zeros(),
            100.0,
        )) as Arc<dyn Light>],
        Some(absorbing_volume(sigma)),
    );

    let surface = IntegratorType::default().instantiate();
    let volume = Emission::new(EmissionParams { step_size: 0.01 });
    let mut sampler = fresh_sampler();
    let arena = Arena::new();

    let ray = Ray::new(
        Point3::zeros(),
        Vec3::new(1.0, 0.0, 0.0),
        f32::INFINITY,
    );
    let result = radiance(
        &arena,
        ray,
        &scene,
        0,
        surface.as_ref(),
        Some(&volume as &dyn VolumeIntegrator),
        sampler.as_mut(),
    );

    let expected = background * (-sigma * 2.0).exp();
    // The march start jitter leaves a little noise at this step size
    assert_relative_eq!(result.li.r, expected, max_relative = 2e-2);
}

#[test]
fn miss_sums_infinite_lights() {
    let scene = Scene::new(
        Arc::new(EmptyAggregate),
        vec![
            Arc::new(ConstantInfiniteLight::new(
                Spectrum::new(0.25, 0.5, 0.75),
                Point3::zeros(),
                10.0,
            )) as Arc<dyn Light>,
            Arc::new(ConstantInfiniteLight::new(
                Spectrum::new(0.25, 0.25, 0.25),
                Point3::zeros(),
                10.0,
            )) as Arc<dyn Light>,
        ],
        None,
    );

    let surface = IntegratorType::default().instantiate();
    let mut sampler = fresh_sampler();
    let arena = Arena::new();

    let ray = Ray::new(
        Point3::zeros(),
        Vec3::new(0.0, 1.0, 0.0),
        f32::INFINITY,
    );
    let result = radiance(
        &arena,
        ray,
        &scene,
        0,
        surface.as_ref(),
        None,
        sampler.as_mut(),
    );

    assert_relative_eq!(result.li.r, 0.5, max_relative = 1e-5);
    assert_relative_eq!(result.li.g, 0.75, max_relative = 1e-5);
    assert_relative_eq!(result.li.b, 1.0, max_relative = 1e-5);
}
