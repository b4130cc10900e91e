//! Command line arguments

use crate::config::{
    ConfigError, RenderConfig, DEFAULT_ASPECT_RATIO, DEFAULT_HEIGHT, DEFAULT_SPHERE_RADIUS,
    DEFAULT_STEP, DEFAULT_WIDTH,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use nalgebra::Point3;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Parse `x,y,z` into a point
pub fn parse_point(s: &str) -> Result<Point3<f32>, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", s));
    }
    let mut coords = [0.0f32; 3];
    for (coord, part) in coords.iter_mut().zip(&parts) {
        *coord = part
            .parse()
            .map_err(|e| format!("invalid coordinate '{}': {}", part, e))?;
    }
    Ok(Point3::from(coords))
}

#[derive(Debug, Parser)]
#[command(name = "ascii_mirror_rt")]
#[command(version = "0.1.0")]
#[command(about = "Ray-traced mirror ball over a checkerboard, drawn in the terminal")]
#[command(long_about = "
Ray-traces a mirror sphere over an infinite checkerboard floor and redraws
only the terminal cells that changed.

Controls:
  w/s  move forward/back    a/d  move left/right
  y/x  move up/down         q    quit
")]
pub struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Size the grid to the current terminal instead of --width/--height
    #[arg(long)]
    pub fit_terminal: bool,

    /// Target aspect ratio of the rendered area
    #[arg(long, default_value_t = DEFAULT_ASPECT_RATIO)]
    pub aspect_ratio: f32,

    /// Initial camera position
    #[arg(long, value_parser = parse_point, default_value = "0,1,-6", allow_hyphen_values = true)]
    pub camera: Point3<f32>,

    /// Sphere center
    #[arg(long, value_parser = parse_point, default_value = "0,2,3", allow_hyphen_values = true)]
    pub sphere_center: Point3<f32>,

    /// Sphere radius
    #[arg(long, default_value_t = DEFAULT_SPHERE_RADIUS)]
    pub sphere_radius: f32,

    /// Camera movement per key press
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f32,

    /// Render rows on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Render one frame to this file and exit without touching the terminal
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Build a validated config; `terminal_size` replaces the grid when given
    pub fn into_config(
        &self,
        terminal_size: Option<(usize, usize)>,
    ) -> Result<RenderConfig, ConfigError> {
        let (width, height) = terminal_size.unwrap_or((self.width, self.height));
        let config = RenderConfig {
            width,
            height,
            aspect_ratio: self.aspect_ratio,
            camera: self.camera,
            sphere_center: self.sphere_center,
            sphere_radius: self.sphere_radius,
            step: self.step,
            parallel: !self.sequential,
        };
        config.validate()?;
        Ok(config)
    }
}
