//! ASCII mirror-ball raytracer
//!
//! This library ray-traces a reflective sphere over a checkerboard floor into a
//! fixed grid of terminal cells and redraws only the cells that changed.

pub mod cli;
pub mod config;
pub mod frame;
pub mod logger;
pub mod observer;
pub mod renderer;
pub mod scene;
pub mod shading;
pub mod terminal;

pub use config::RenderConfig;
pub use frame::Frame;
pub use renderer::Renderer;
pub use scene::{Camera, Scene};
pub use terminal::TerminalDisplay;

/// Glyph palette from emptiest to densest
pub const PALETTE: &str = " .:-=+*";
