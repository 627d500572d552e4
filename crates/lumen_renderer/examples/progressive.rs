//! Headless progressive render demo.
//!
//! Accumulates a number of path-traced frames of the example scene and
//! writes the converged image to a PNG.

use anyhow::{Context, Result};
use lumen_renderer::{Camera, Renderer, Scene};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 450;
const FRAMES: u32 = 64;

fn main() -> Result<()> {
    env_logger::init();

    println!("Lumen - progressive render demo");
    println!("===============================");

    let scene = Scene::example();

    let mut camera = Camera::new(45.0, 0.1, 100.0);
    camera.on_resize(WIDTH, HEIGHT);

    let mut renderer = Renderer::new();
    renderer.on_resize(WIDTH, HEIGHT)?;
    renderer.settings_mut().bounces = 8;

    println!(
        "Rendering {}x{} over {} accumulated frames...",
        WIDTH, HEIGHT, FRAMES
    );

    let start = std::time::Instant::now();
    for frame in 1..=FRAMES {
        renderer.render(&scene, &camera);

        if frame % 16 == 0 {
            println!(
                "  frame {:3}/{} ({:.1} ms)",
                frame,
                FRAMES,
                renderer.last_render_time() * 1000.0
            );
        }
    }
    println!("Accumulated in {:?}", start.elapsed());

    let image = renderer
        .final_image()
        .context("no image after a successful resize")?;

    let filename = "output.png";
    image::save_buffer(
        filename,
        image.as_bytes(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )
    .context("failed to save image")?;
    println!("Saved to {}", filename);

    Ok(())
}
