//! Render configuration and validation

use crate::renderer::Viewport;
use nalgebra::Point3;

pub const DEFAULT_WIDTH: usize = 200;
pub const DEFAULT_HEIGHT: usize = 250;
pub const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;
pub const DEFAULT_CAMERA: [f32; 3] = [0.0, 1.0, -6.0];
pub const DEFAULT_SPHERE_CENTER: [f32; 3] = [0.0, 2.0, 3.0];
pub const DEFAULT_SPHERE_RADIUS: f32 = 1.0;
pub const DEFAULT_STEP: f32 = 0.2;

/// Everything fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub aspect_ratio: f32,
    pub camera: Point3<f32>,
    pub sphere_center: Point3<f32>,
    pub sphere_radius: f32,
    pub step: f32,
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            camera: Point3::from(DEFAULT_CAMERA),
            sphere_center: Point3::from(DEFAULT_SPHERE_CENTER),
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            step: DEFAULT_STEP,
            parallel: true,
        }
    }
}

impl RenderConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::fit(self.width, self.height, self.aspect_ratio)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // cursor positions are u16 on the wire
        let max = u16::MAX as usize;
        if self.width == 0 || self.height == 0 || self.width > max || self.height > max {
            return Err(ConfigError::GridSize {
                width: self.width,
                height: self.height,
            });
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(ConfigError::AspectRatio(self.aspect_ratio));
        }
        if !self.sphere_radius.is_finite() || self.sphere_radius <= 0.0 {
            return Err(ConfigError::Radius(self.sphere_radius));
        }
        if !self.step.is_finite() {
            return Err(ConfigError::Step(self.step));
        }
        let finite = |p: &Point3<f32>| p.iter().all(|c| c.is_finite());
        if !finite(&self.camera) || !finite(&self.sphere_center) {
            return Err(ConfigError::Position);
        }
        if self.viewport().is_empty() {
            return Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
                aspect_ratio: self.aspect_ratio,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size {width}x{height} must be between 1 and 65535 in each dimension")]
    GridSize { width: usize, height: usize },

    #[error("Aspect ratio must be a positive number, got {0}")]
    AspectRatio(f32),

    #[error("Sphere radius must be a positive number, got {0}")]
    Radius(f32),

    #[error("Movement step must be finite, got {0}")]
    Step(f32),

    #[error("Camera and sphere positions must be finite")]
    Position,

    #[error("A {width}x{height} grid leaves no cells at aspect ratio {aspect_ratio}")]
    EmptyViewport {
        width: usize,
        height: usize,
        aspect_ratio: f32,
    },
}
