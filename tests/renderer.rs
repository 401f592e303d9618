use std::sync::{atomic::AtomicBool, Arc, Mutex};

use approx::assert_relative_eq;

use valo::lights::{ConstantInfiniteLight, Light};
use valo::math::{Bounds2, Point3, Ray, Spectrum, Vec2, Vec3};
use valo::renderer::{render, Camera, FilmSink, RenderSettings};
use valo::sampling::{CameraSample, SamplerSettings};
use valo::scene::{Aggregate, Hit, Scene};

struct EmptyAggregate;

impl Aggregate for EmptyAggregate {
    fn intersect(&self, _ray: Ray<f32>) -> Option<Hit> {
        None
    }

    fn intersect_p(&self, _ray: Ray<f32>) -> bool {
        false
    }
}

struct DomeCamera {
    res: Vec2<u16>,
}

impl Camera for DomeCamera {
    fn ray(&self, sample: &CameraSample) -> Ray<f32> {
        let x = sample.p_film.x / f32::from(self.res.x) - 0.5;
        let y = sample.p_film.y / f32::from(self.res.y) - 0.5;
        Ray::new(
            Point3::zeros(),
            Vec3::new(x, y, 1.0).normalized(),
            f32::INFINITY,
        )
    }
}

struct CollectingFilm {
    res: Vec2<u16>,
    pixels: Mutex<Vec<Spectrum<f32>>>,
}

impl CollectingFilm {
    fn new(res: Vec2<u16>) -> Self {
        Self {
            res,
            pixels: Mutex::new(vec![
                Spectrum::zeros();
                (res.x as usize) * (res.y as usize)
            ]),
        }
    }
}

impl FilmSink for CollectingFilm {
    fn resolution(&self) -> Vec2<u16> {
        self.res
    }

    fn update_tile(&self, bb: Bounds2<u16>, tile_pixels: &[Spectrum<f32>]) {
        let mut pixels = self.pixels.lock().unwrap();
        let tile_width = bb.width() as usize;
        for p in bb {
            let tile_index =
                ((p.y - bb.p_min.y) as usize) * tile_width + ((p.x - bb.p_min.x) as usize);
            pixels[(p.y as usize) * (self.res.x as usize) + (p.x as usize)] =
                tile_pixels[tile_index];
        }
    }
}

fn dome_scene(radiance: f32) -> Scene {
    Scene::new(
        Arc::new(EmptyAggregate),
        vec![Arc::new(ConstantInfiniteLight::new(
            Spectrum::new(radiance, radiance, radiance),
            Point3::zeros(),
            10.0,
        )) as Arc<dyn Light>],
        None,
    )
}

#[test]
fn workers_fill_every_pixel() {
    let res = Vec2::new(16, 16);
    let scene = dome_scene(1.5);
    let camera = DomeCamera { res };
    let film = CollectingFilm::new(res);

    let settings = RenderSettings {
        sampler: SamplerSettings::Stratified {
            pixel_samples: Vec2::new(2, 2),
            jitter_samples: true,
        },
        tile_dim: 4,
        thread_count: Some(3),
        ..RenderSettings::default()
    };

    let abort = AtomicBool::new(false);
    let stats = render(&scene, &camera, &film, settings, &abort);

    // One primary ray per sample per pixel, and nothing to recurse into
    assert_eq!(stats.ray_count, 16 * 16 * 4);

    let pixels = film.pixels.lock().unwrap();
    for pixel in pixels.iter() {
        assert_relative_eq!(pixel.r, 1.5, max_relative = 1e-4);
        assert_relative_eq!(pixel.g, 1.5, max_relative = 1e-4);
        assert_relative_eq!(pixel.b, 1.5, max_relative = 1e-4);
    }
}

#[test]
fn abort_stops_before_any_work() {
    let res = Vec2::new(8, 8);
    let scene = dome_scene(1.0);
    let camera = DomeCamera { res };
    let film = CollectingFilm::new(res);

    let abort = AtomicBool::new(true);
    let stats = render(
        &scene,
        &camera,
        &film,
        RenderSettings::default(),
        &abort,
    );

    assert_eq!(stats.ray_count, 0);

    let pixels = film.pixels.lock().unwrap();
    assert!(pixels.iter().all(|p| p.is_black()));
}
