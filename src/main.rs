use std::time::Instant;

use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use rand::SeedableRng;

use pathtracer::{config, trace, CrateRng, Screen};

fn main() -> Result<()> {
    let config = config::GLOBAL();
    let (width, height) = (config.width.get(), config.height.get());

    let mut rng = match config.seed {
        Some(seed) => CrateRng::seed_from_u64(seed),
        None => CrateRng::from_entropy(),
    };
    let (camera, world) = config.scene.create(&mut rng)?;

    let mut screen = Screen::new(width, height);
    eprintln!("Rendering scene {}...", config.scene);
    let start = Instant::now();
    trace::render(&mut screen, &camera, &world);
    eprintln!("Rendered in {:.2?}", start.elapsed());

    let buffer = screen.encode();
    let mut window = Window::new("Pathtracer", width, height, WindowOptions::default())?;
    window.limit_update_rate(Some(config.delay));
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, width, height)?;
    }

    Ok(())
}
