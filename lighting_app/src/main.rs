//! Lighting demo application
//!
//! Drives the lighting pipeline headless over the recording backend: a small
//! scene of flickering point lights, two suns and a spot light is rendered for
//! a fixed number of frames, alternating lit and cleared views.

use pbr_lighting::core::config::Config;
use pbr_lighting::foundation::logging;
use pbr_lighting::prelude::*;
use rand::Rng;
use thiserror::Error;

const FRAMES: u64 = 120;
const CONFIG_PATH: &str = "lighting.toml";

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] pbr_lighting::config::ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

struct LightingApp {
    renderer: Renderer,
    scene: Scene,
    camera: Camera,
    base_energy: Vec<f32>,
}

impl LightingApp {
    fn new(config: RendererConfig) -> Result<Self, AppError> {
        log::info!("Creating lighting demo (threaded: {})", config.threaded);

        let lighting = config.lighting.clone();
        let mut renderer = Renderer::new(Box::new(RecordingBackend::new(BackendCaps::default())), config);
        renderer.add_block(BlockLight::new(lighting))?;
        renderer.init_pipeline()?;

        let scene = Self::build_scene();
        let base_energy = scene.lights.iter().map(|light| light.energy).collect();
        let camera = Camera::look_at(Vec3::new(0.0, 4.0, 12.0), Vec3::zeros(), Vec3::y());

        Ok(Self {
            renderer,
            scene,
            camera,
            base_energy,
        })
    }

    fn build_scene() -> Scene {
        let mut scene = Scene::default();

        scene.lights.push(Light::direct(Vec3::new(-0.3, -1.0, -0.4), Colour::rgb(1.0, 0.95, 0.85), 1.2));
        scene.lights.push(Light::direct(Vec3::new(0.5, -0.2, 0.8), Colour::rgb(0.4, 0.5, 0.9), 0.3));

        for (index, colour) in [Colour::rgb(1.0, 0.3, 0.2), Colour::rgb(0.2, 1.0, 0.3), Colour::rgb(0.3, 0.4, 1.0)]
            .into_iter()
            .enumerate()
        {
            let x = index as f32 * 3.0 - 3.0;
            scene.lights.push(Light::point(Vec3::new(x, 1.5, 0.0), colour, 4.0, 6.0));
        }

        scene.lights.push(
            Light::spot(Vec3::new(0.0, 6.0, 2.0), -Vec3::y(), Colour::WHITE, 8.0, 12.0, 25.0).with_shadow_bias(0.05),
        );

        for x in -2..=2 {
            scene.items.push(Item {
                transform: Mat4::new_translation(&Vec3::new(x as f32 * 2.0, 0.0, 0.0)),
                ..Item::default()
            });
        }

        scene.env.fog.enabled = true;
        scene.env.fog.density = 0.02;
        scene.env.radiance.colour = Colour::rgb(0.1, 0.1, 0.15);
        scene
    }

    fn update_scene(&mut self) {
        let mut rng = rand::thread_rng();
        for (light, base) in self.scene.lights.iter_mut().zip(&self.base_energy) {
            if light.light_type == LightType::Point {
                light.energy = base * rng.gen_range(0.8_f32..1.2);
            }
        }
    }

    fn run(&mut self) -> Result<(), AppError> {
        log::info!("Rendering {} frames...", FRAMES);

        for _ in 0..FRAMES {
            self.update_scene();

            self.renderer.begin_frame()?;
            let shot = Shot::gather(&self.scene);
            self.renderer
                .render(Shading::Shaded, &shot, &self.camera, Some(&self.scene.env))?;
            self.renderer.render(Shading::Clear, &shot, &self.camera, None)?;
            self.renderer.end_frame()?;

            let frame = self.renderer.frame();
            if frame.frame % 30 == 0 {
                log::info!(
                    "Frame {}: {} lights, {} items, {:.3} ms",
                    frame.frame,
                    shot.lights.len(),
                    shot.items.len(),
                    frame.delta_time * 1000.0
                );
            }
        }

        log::info!("Lighting demo completed");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting lighting demo");

    let config = RendererConfig::load_or_default(CONFIG_PATH).map_err(AppError::from)?;
    log::debug!("Renderer config: {:?}", config);

    let mut app = LightingApp::new(config)?;
    match app.run() {
        Ok(()) => {
            log::info!("Lighting demo finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Application error: {:?}", e);
            Err(e.into())
        }
    }
}
