use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    time::Instant,
};

use serde::{Deserialize, Serialize};

use crate::{
    integrators::{radiance, Integrator, IntegratorType, VolumeIntegrator, VolumeIntegratorType},
    math::{Bounds2, Point2, Ray, Spectrum, Vec2},
    memory::Arena,
    sampling::{create_sampler, CameraSample, Sampler, SamplerSettings},
    scene::Scene,
    valo_debug, valo_info, valo_trace,
};

/// Camera projection, external to this core. Maps film and lens
/// coordinates to a primary ray.
pub trait Camera: Send + Sync {
    fn ray(&self, sample: &CameraSample) -> Ray<f32>;
}

/// The accumulation buffer, external to this core. Tile writes from
/// different workers never overlap but the sink is expected to serialize
/// against its own readers.
pub trait FilmSink: Send + Sync {
    fn resolution(&self) -> Vec2<u16>;
    fn update_tile(&self, bb: Bounds2<u16>, pixels: &[Spectrum<f32>]);
}

#[derive(Copy, Clone, Deserialize, Serialize)]
pub struct RenderSettings {
    pub integrator: IntegratorType,
    pub volume_integrator: Option<VolumeIntegratorType>,
    pub sampler: SamplerSettings,
    pub tile_dim: u16,
    /// Worker threads to use, every core when not set
    pub thread_count: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            volume_integrator: None,
            sampler: SamplerSettings::default(),
            tile_dim: 16,
            thread_count: None,
        }
    }
}

#[derive(Copy, Clone)]
pub struct RenderStats {
    pub secs: f32,
    pub ray_count: usize,
}

// Dimensions the integrators consume through get_1d/get_2d before falling
// back to the prng
const N_SAMPLED_DIMENSIONS: usize = 4;

/// Renders `scene` through `camera` into `film`.
///
/// Pixels are partitioned into tiles handed out to worker threads; each
/// worker owns its arena and its decorrelated sampler clone and resets the
/// arena after every primary ray. `abort` is checked between pixels, the
/// renderer simply stops calling the integrators when it flips.
pub fn render(
    scene: &Scene,
    camera: &dyn Camera,
    film: &dyn FilmSink,
    settings: RenderSettings,
    abort: &AtomicBool,
) -> RenderStats {
    let start = Instant::now();

    let mut integrator = settings.integrator.instantiate();
    let mut volume_integrator = settings.volume_integrator.map(VolumeIntegratorType::instantiate);

    // Sample requirements registration happens on the master sampler so
    // every seeded clone carries the same sequence layout
    let mut master_sampler = create_sampler(settings.sampler, N_SAMPLED_DIMENSIONS);
    integrator.request_samples(master_sampler.as_mut(), scene);
    if let Some(volume_integrator) = volume_integrator.as_mut() {
        volume_integrator.request_samples(master_sampler.as_mut(), scene);
    }

    let thread_count = settings
        .thread_count
        .unwrap_or_else(num_cpus::get)
        .max(1);
    let samplers: Vec<Box<dyn Sampler>> = (0..thread_count)
        .map(|i| master_sampler.clone_seeded((i as u64) + 1))
        .collect();

    let tiles = Mutex::new(film_tiles(film.resolution(), settings.tile_dim.max(1)));
    valo_info!(
        "render: {} tiles across {} threads",
        tiles.lock().unwrap().len(),
        thread_count
    );

    let integrator: &dyn Integrator = integrator.as_ref();
    let volume_integrator: Option<&dyn VolumeIntegrator> = volume_integrator.as_deref();

    let ray_count = AtomicUsize::new(0);
    std::thread::scope(|s| {
        for (thread_id, mut sampler) in samplers.into_iter().enumerate() {
            let tiles = &tiles;
            let ray_count = &ray_count;
            s.spawn(move || {
                let mut arena = Arena::new();
                let mut rays = 0;

                loop {
                    if abort.load(Ordering::Relaxed) {
                        valo_debug!("Render thread {}: Aborted", thread_id);
                        break;
                    }

                    let tile = tiles.lock().unwrap().pop_front();
                    let Some(tile) = tile else {
                        break;
                    };
                    valo_trace!("Render thread {}: Render tile {:?}", thread_id, tile);

                    rays += render_tile(
                        scene,
                        camera,
                        film,
                        integrator,
                        volume_integrator,
                        sampler.as_mut(),
                        &mut arena,
                        tile,
                        abort,
                    );
                }

                ray_count.fetch_add(rays, Ordering::Relaxed);
                valo_debug!("Render thread {}: Done", thread_id);
            });
        }
    });

    RenderStats {
        secs: start.elapsed().as_secs_f32(),
        ray_count: ray_count.load(Ordering::Relaxed),
    }
}

#[allow(clippy::too_many_arguments)]
fn render_tile(
    scene: &Scene,
    camera: &dyn Camera,
    film: &dyn FilmSink,
    integrator: &dyn Integrator,
    volume_integrator: Option<&dyn VolumeIntegrator>,
    sampler: &mut dyn Sampler,
    arena: &mut Arena,
    tile: Bounds2<u16>,
    abort: &AtomicBool,
) -> usize {
    let tile_width = tile.width();
    let mut pixels = vec![Spectrum::zeros(); tile.area() as usize];
    let mut rays = 0;

    for p in tile {
        if abort.load(Ordering::Relaxed) {
            break;
        }

        sampler.start_pixel();
        let sample_count = sampler.samples_per_pixel();

        let mut color = Spectrum::zeros();
        for _ in 0..sample_count {
            sampler.start_sample();

            let camera_sample = sampler.get_camera_sample(p);
            let ray = camera.ray(&camera_sample);

            let result = radiance(
                arena,
                ray,
                scene,
                0,
                integrator,
                volume_integrator,
                sampler,
            );
            color += result.li;
            rays += result.ray_scene_intersections;

            // Transient shading allocations live exactly one primary ray
            arena.reset();
        }
        color /= sample_count as f32;

        let Vec2 {
            x: tile_x,
            y: tile_y,
        } = p - tile.p_min;
        pixels[((tile_y as usize) * (tile_width as usize)) + (tile_x as usize)] = color;
    }

    film.update_tile(tile, &pixels);
    rays
}

fn film_tiles(res: Vec2<u16>, tile_dim: u16) -> VecDeque<Bounds2<u16>> {
    let mut tiles = VecDeque::new();
    let mut y = 0;
    while y < res.y {
        let mut x = 0;
        while x < res.x {
            tiles.push_back(Bounds2::new(
                Point2::new(x, y),
                Point2::new((x + tile_dim).min(res.x), (y + tile_dim).min(res.y)),
            ));
            x += tile_dim;
        }
        y += tile_dim;
    }
    tiles
}
