//! ASCII mirror-ball raytracer - redraws only the terminal cells that change
//!
//! Controls:
//! - w/s: Move forward/back
//! - a/d: Move left/right
//! - y/x: Move up/down
//! - q, Escape or Ctrl-C: Quit
//!
//! Usage:
//!   ascii_mirror_rt                      - Run interactive mode
//!   ascii_mirror_rt --snapshot out.txt   - Render one frame to a text file

use anyhow::Context;
use ascii_mirror_rt::cli::Args;
use ascii_mirror_rt::logger::init_logger;
use ascii_mirror_rt::observer::LogObserver;
use ascii_mirror_rt::terminal::{parse_key_event, Action, TerminalDisplay};
use ascii_mirror_rt::{Camera, Frame, RenderConfig, Renderer, Scene};
use clap::Parser;
use log::info;
use std::fs;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let interactive = args.snapshot.is_none();
    init_logger(args.log_level.into(), args.log_file.as_deref(), interactive)?;

    let terminal_size = if args.fit_terminal {
        let (w, h) = crossterm::terminal::size().context("Failed to query terminal size")?;
        Some((w as usize, h as usize))
    } else {
        None
    };
    let config = args.into_config(terminal_size)?;

    info!(
        "Grid {}x{}, viewport {:?}, camera {:?}, sphere {:?} r={}",
        config.width,
        config.height,
        config.viewport(),
        config.camera,
        config.sphere_center,
        config.sphere_radius
    );

    let scene = Scene::mirror_ball(config.sphere_center, config.sphere_radius);
    info!("Scene has {} shape(s)", scene.shapes().len());
    let renderer = Renderer::new(config.width, config.height, config.aspect_ratio)
        .with_parallel(config.parallel)
        .with_observer(Box::new(LogObserver));

    match args.snapshot.as_deref() {
        Some(path) => run_snapshot(&config, &scene, renderer, path),
        None => run_interactive(&config, &scene, renderer),
    }
}

/// Render a single frame and write the viewport rows as text
fn run_snapshot(config: &RenderConfig, scene: &Scene, mut renderer: Renderer, path: &Path) -> anyhow::Result<()> {
    let camera = Camera::new(config.camera);
    renderer.render(&camera, scene);

    let text = frame_to_text(renderer.frame(), renderer.viewport().height);
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote snapshot to {}", path.display());
    Ok(())
}

fn frame_to_text(frame: &Frame, rows: usize) -> String {
    let mut text = String::with_capacity((frame.width() + 1) * rows);
    for row in frame.rows().take(rows) {
        text.extend(row.iter());
        text.push('\n');
    }
    text
}

/// Camera for the first frame; the start key moves it like any other key
fn start_camera(config: &RenderConfig, first: Action) -> Option<Camera> {
    let mut camera = Camera::new(config.camera);
    match first {
        Action::Quit => None,
        action => {
            camera.apply(action, config.step);
            Some(camera)
        }
    }
}

fn run_interactive(config: &RenderConfig, scene: &Scene, mut renderer: Renderer) -> anyhow::Result<()> {
    let mut terminal = TerminalDisplay::new().context("Failed to initialize terminal")?;
    let first = terminal.wait_for_start("Press any key to start")?;
    let Some(mut camera) = start_camera(config, first) else {
        return Ok(());
    };

    loop {
        renderer.render(&camera, scene);
        terminal.draw(renderer.frame())?;

        match parse_key_event(terminal.read_key()?) {
            Action::Quit => break,
            action => camera.apply(action, config.step),
        }
    }

    drop(terminal);
    info!("Exited at camera {:?}", camera.position);
    Ok(())
}
