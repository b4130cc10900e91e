//! Scene definitions for the mirror-ball raytracer

use crate::renderer::{Hit, Ray};
use crate::terminal::Action;
use nalgebra::{Point3, Vector3};

/// Anything a camera ray can hit
pub trait Hittable: Send + Sync {
    fn intersect(&self, ray: &Ray) -> Option<Hit>;
}

/// Sphere primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Hittable for Sphere {
    /// Nearest intersection in front of the ray origin.
    ///
    /// Only the near root of the quadratic is considered, so a ray that starts
    /// inside the sphere (near root behind it) reports a miss.
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if t <= 0.0 {
            return None;
        }

        let point = ray.at(t);
        let normal = (point - self.center).normalize();
        Some(Hit { t, point, normal })
    }
}

/// Immutable set of shapes, built once at startup
pub struct Scene {
    shapes: Vec<Box<dyn Hittable>>,
}

impl Scene {
    pub fn new(shapes: Vec<Box<dyn Hittable>>) -> Self {
        Self { shapes }
    }

    /// The single mirror sphere hovering over the floor
    pub fn mirror_ball(center: Point3<f32>, radius: f32) -> Self {
        Self::new(vec![Box::new(Sphere::new(center, radius))])
    }

    pub fn shapes(&self) -> &[Box<dyn Hittable>] {
        &self.shapes
    }

    /// Closest hit over every shape
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.shapes
            .iter()
            .filter_map(|shape| shape.intersect(ray))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }
}

/// Eye point. It always looks down +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>) -> Self {
        Self { position }
    }

    /// Move the eye by `step` along the axis the action names
    pub fn apply(&mut self, action: Action, step: f32) {
        let delta = match action {
            Action::Forward => Vector3::new(0.0, 0.0, step),
            Action::Back => Vector3::new(0.0, 0.0, -step),
            Action::Left => Vector3::new(-step, 0.0, 0.0),
            Action::Right => Vector3::new(step, 0.0, 0.0),
            Action::Up => Vector3::new(0.0, step, 0.0),
            Action::Down => Vector3::new(0.0, -step, 0.0),
            Action::Quit | Action::None => return,
        };
        self.position += delta;
    }
}
