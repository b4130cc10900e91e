//! CPU ray tracer that renders the scene into a glyph frame
//!
//! Each cell of the viewport casts one ray from the camera. Sphere hits bounce
//! once off the mirror surface toward the checkerboard floor; misses either
//! land on the floor or leave the cell as sky. Only cells whose glyph changed
//! are flagged for the display writer.

use crate::frame::Frame;
use crate::observer::{FrameObserver, FrameStats};
use crate::scene::{Camera, Scene};
use crate::shading::{shade_floor, shade_surface, BLANK};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use std::time::Instant;

/// A ray in 3D space. The direction is unit length.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// `direction` must be non-zero
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Hit record for ray-object intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

/// Reflect a vector around a normal
pub fn reflect(v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    *v - 2.0 * v.dot(n) * *n
}

/// Top-left sub-rectangle of the grid that keeps the target aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn fit(width: usize, height: usize, aspect_ratio: f32) -> Self {
        let mut adjusted_width = width;
        let mut adjusted_height = (width as f32 / aspect_ratio) as usize;
        if adjusted_height > height {
            adjusted_height = height;
            adjusted_width = ((height as f32 * aspect_ratio) as usize).min(width);
        }
        Self {
            width: adjusted_width,
            height: adjusted_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Camera ray through the view plane at distance 1 for cell (x, y)
    pub fn ray(&self, camera: &Point3<f32>, x: usize, y: usize) -> Ray {
        let w = self.width as f32;
        let h = self.height as f32;
        let u = (x as f32 - w / 2.0) / w * (w / h);
        let v = (h / 2.0 - y as f32) / h;
        Ray::new(*camera, Vector3::new(u, v, 1.0))
    }
}

/// What a camera ray ended up seeing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Sphere hit whose reflection lands on the floor
    Reflection { hit: Hit, floor: Point3<f32> },
    /// Sphere hit whose reflection heads for the sky
    Glow { hit: Hit },
    /// Direct view of the floor
    Floor { point: Point3<f32> },
    Sky,
}

impl Sample {
    pub fn hit(&self) -> Option<&Hit> {
        match self {
            Sample::Reflection { hit, .. } | Sample::Glow { hit } => Some(hit),
            Sample::Floor { .. } | Sample::Sky => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Sample::Reflection { floor, .. } => shade_floor(floor),
            Sample::Glow { .. } => shade_surface(1.0),
            Sample::Floor { point } => shade_floor(point),
            Sample::Sky => BLANK,
        }
    }
}

/// Follow one camera ray through the scene
pub fn trace(scene: &Scene, ray: &Ray) -> Sample {
    match scene.intersect(ray) {
        Some(hit) => {
            let bounce = Ray::new(hit.point, reflect(&ray.direction, &hit.normal));
            let floor_dist = -hit.point.y / bounce.direction.y;
            if floor_dist > 0.0 {
                Sample::Reflection {
                    hit,
                    floor: bounce.at(floor_dist),
                }
            } else {
                Sample::Glow { hit }
            }
        }
        None if ray.direction.y < 0.0 => {
            let floor_dist = -ray.origin.y / ray.direction.y;
            Sample::Floor {
                point: ray.at(floor_dist),
            }
        }
        None => Sample::Sky,
    }
}

/// Shade one viewport row in place, returning how many cells changed
fn render_row(
    viewport: &Viewport,
    camera: &Point3<f32>,
    scene: &Scene,
    y: usize,
    glyphs: &mut [char],
    changed: &mut [bool],
) -> usize {
    let mut count = 0;
    for x in 0..viewport.width {
        let glyph = trace(scene, &viewport.ray(camera, x, y)).glyph();
        if glyph != glyphs[x] {
            glyphs[x] = glyph;
            changed[x] = true;
            count += 1;
        }
    }
    count
}

/// Owns the on-screen frame and redraws it from a camera position
pub struct Renderer {
    frame: Frame,
    viewport: Viewport,
    parallel: bool,
    frames_rendered: u64,
    observer: Option<Box<dyn FrameObserver>>,
}

impl Renderer {
    pub fn new(width: usize, height: usize, aspect_ratio: f32) -> Self {
        Self {
            frame: Frame::new(width, height),
            viewport: Viewport::fit(width, height, aspect_ratio),
            parallel: true,
            frames_rendered: 0,
            observer: None,
        }
    }

    /// Split rows across the rayon pool (on by default)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn FrameObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Trace a single viewport cell without touching the frame
    #[cfg(test)]
    pub(crate) fn sample(&self, camera: &Camera, scene: &Scene, x: usize, y: usize) -> Sample {
        trace(scene, &self.viewport.ray(&camera.position, x, y))
    }

    /// Render the scene into the frame, flagging every cell whose glyph changed
    pub fn render(&mut self, camera: &Camera, scene: &Scene) -> FrameStats {
        let start = Instant::now();
        let viewport = self.viewport;
        let width = self.frame.width();
        let eye = camera.position;

        self.frame.clear_changes();

        let changed = if viewport.is_empty() {
            0
        } else {
            let (glyphs, mask) = self.frame.parts_mut();
            if self.parallel {
                glyphs
                    .par_chunks_mut(width)
                    .zip(mask.par_chunks_mut(width))
                    .take(viewport.height)
                    .enumerate()
                    .map(|(y, (row, row_mask))| {
                        render_row(&viewport, &eye, scene, y, row, row_mask)
                    })
                    .sum::<usize>()
            } else {
                glyphs
                    .chunks_mut(width)
                    .zip(mask.chunks_mut(width))
                    .take(viewport.height)
                    .enumerate()
                    .map(|(y, (row, row_mask))| {
                        render_row(&viewport, &eye, scene, y, row, row_mask)
                    })
                    .sum::<usize>()
            }
        };

        self.frames_rendered += 1;
        let stats = FrameStats {
            frame: self.frames_rendered,
            changed,
            elapsed: start.elapsed(),
            viewport,
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.frame_rendered(&stats);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Action;
    use std::sync::{Arc, Mutex};

    const WIDTH: usize = 200;
    const HEIGHT: usize = 250;
    const ASPECT: f32 = 16.0 / 9.0;

    fn default_scene() -> Scene {
        Scene::mirror_ball(Point3::new(0.0, 2.0, 3.0), 1.0)
    }

    fn default_camera() -> Camera {
        Camera::new(Point3::new(0.0, 1.0, -6.0))
    }

    #[test]
    fn test_ray_creation() {
        let ray = Ray::new(Point3::origin(), Vector3::new(3.0, 0.0, 0.0));
        assert!((ray.direction.norm() - 1.0).abs() < 1e-6);
        assert!((ray.at(5.0).x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect() {
        let v = Vector3::new(1.0, -1.0, 0.0);
        let n = Vector3::new(0.0, 1.0, 0.0);
        let r = reflect(&v, &n);
        assert!((r.x - 1.0).abs() < 0.001);
        assert!((r.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect_keeps_unit_length() {
        let pairs = [
            (Vector3::new(0.0, 0.1, 1.0), Vector3::new(0.0, -0.2, -1.0)),
            (Vector3::new(1.0, 2.0, 3.0), Vector3::new(-3.0, 1.0, 0.5)),
            (Vector3::new(-0.4, -0.9, 0.1), Vector3::new(0.0, 1.0, 0.0)),
            (Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0)),
        ];
        for (d, n) in pairs {
            let r = reflect(&d.normalize(), &n.normalize());
            assert!((r.norm() - 1.0).abs() < 1e-5, "|{:?}| != 1", r);
        }
    }

    #[test]
    fn test_viewport_fit() {
        assert_eq!(
            Viewport::fit(WIDTH, HEIGHT, ASPECT),
            Viewport { width: 200, height: 112 }
        );
        // height-limited grid shrinks the width instead
        assert_eq!(
            Viewport::fit(400, 100, ASPECT),
            Viewport { width: 177, height: 100 }
        );
        assert!(Viewport::fit(1, 1, ASPECT).is_empty());
    }

    #[test]
    fn test_center_ray_faces_forward() {
        let viewport = Viewport::fit(WIDTH, HEIGHT, ASPECT);
        let ray = viewport.ray(&Point3::origin(), 100, 56);
        assert!((ray.direction - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_cell_facing_sphere_sees_reflection() {
        let renderer = Renderer::new(WIDTH, HEIGHT, ASPECT);
        // the sphere sits one unit above eye level nine units ahead,
        // so its center projects to v = 1/9, row 56 - 112/9 = 44
        let sample = renderer.sample(&default_camera(), &default_scene(), 100, 44);

        let hit = sample.hit().expect("cell facing the sphere must hit it");
        assert!((hit.t - 8.056).abs() < 1e-2);
        // the bounce comes back down and meets the floor behind the camera
        // at (0, 0, -8.33): floor(0) + floor(-8.33) = -9 is odd, an off tile
        match sample {
            Sample::Reflection { floor, .. } => {
                assert!(floor.x.abs() < 1e-5);
                assert!(floor.y.abs() < 1e-4);
                assert!((floor.z + 8.332).abs() < 1e-2);
                assert_eq!(shade_floor(&floor), ' ');
            }
            other => panic!("expected a floor reflection, got {:?}", other),
        }
        assert_eq!(sample.glyph(), ' ');
    }

    #[test]
    fn test_upward_miss_is_sky_and_downward_miss_is_floor() {
        let scene = default_scene();
        let up = Ray::new(Point3::new(0.0, 1.0, -6.0), Vector3::new(0.5, 0.5, 1.0));
        assert_eq!(trace(&scene, &up), Sample::Sky);

        let down = Ray::new(Point3::new(0.0, 1.0, -6.0), Vector3::new(0.0, -0.5, 1.0));
        match trace(&scene, &down) {
            Sample::Floor { point } => {
                assert!(point.y.abs() < 1e-5);
                assert!((point.z + 4.0).abs() < 1e-4);
            }
            other => panic!("expected floor, got {:?}", other),
        }
    }

    #[test]
    fn test_glancing_top_reflects_to_sky() {
        let scene = default_scene();
        // hits near the top of the sphere, bounce keeps climbing
        let ray = Ray::new(Point3::new(0.0, 2.9, -6.0), Vector3::new(0.0, 0.0, 1.0));
        let sample = trace(&scene, &ray);
        assert!(matches!(sample, Sample::Glow { .. }));
        assert_eq!(sample.glyph(), '*');
    }

    #[test]
    fn test_first_render_draws_and_second_is_idle() {
        let scene = default_scene();
        let camera = default_camera();
        let mut renderer = Renderer::new(WIDTH, HEIGHT, ASPECT);

        let first = renderer.render(&camera, &scene);
        assert!(first.changed > 0);
        assert_eq!(first.changed, renderer.frame().changed_count());
        let snapshot = renderer.frame().clone();

        let second = renderer.render(&camera, &scene);
        assert_eq!(second.changed, 0);
        assert_eq!(renderer.frame().changed_count(), 0);
        assert_eq!(renderer.frame().rows().collect::<Vec<_>>(), snapshot.rows().collect::<Vec<_>>());
        assert_eq!(second.frame, 2);
    }

    #[test]
    fn test_cells_outside_viewport_stay_blank() {
        let mut renderer = Renderer::new(WIDTH, HEIGHT, ASPECT);
        renderer.render(&default_camera(), &default_scene());

        let frame = renderer.frame();
        let viewport = renderer.viewport();
        for row in viewport.height..frame.height() {
            for col in 0..frame.width() {
                assert_eq!(frame.glyph(row, col), ' ');
                assert!(!frame.is_changed(row, col));
            }
        }
        assert!(frame.changes().all(|(row, col, _)| row < viewport.height && col < viewport.width));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scene = default_scene();
        let mut camera = default_camera();
        let mut parallel = Renderer::new(WIDTH, HEIGHT, ASPECT).with_parallel(true);
        let mut sequential = Renderer::new(WIDTH, HEIGHT, ASPECT).with_parallel(false);

        for action in [Action::None, Action::Forward, Action::Left, Action::Up, Action::Up] {
            camera.apply(action, 0.2);
            let a = parallel.render(&camera, &scene);
            let b = sequential.render(&camera, &scene);
            assert_eq!(a.changed, b.changed);
            assert_eq!(parallel.frame(), sequential.frame());
        }
    }

    #[test]
    fn test_rising_camera_leaves_the_sphere() {
        let scene = default_scene();
        let mut camera = default_camera();
        let mut renderer = Renderer::new(WIDTH, HEIGHT, ASPECT);
        renderer.render(&camera, &scene);
        assert!(renderer.sample(&camera, &scene, 100, 44).hit().is_some());

        let mut left_sphere = false;
        for _ in 0..100 {
            camera.apply(Action::Up, 0.2);
            let stats = renderer.render(&camera, &scene);
            if renderer.sample(&camera, &scene, 100, 44).hit().is_none() {
                assert!(stats.changed > 0);
                left_sphere = true;
                break;
            }
        }
        assert!(left_sphere, "camera never rose above the sphere");
    }

    #[test]
    fn test_camera_inside_sphere_sees_no_sphere() {
        let scene = default_scene();
        let camera = Camera::new(Point3::new(0.0, 2.0, 3.0));
        let renderer = Renderer::new(32, 18, ASPECT);
        let viewport = renderer.viewport();
        for y in 0..viewport.height {
            for x in 0..viewport.width {
                assert!(renderer.sample(&camera, &scene, x, y).hit().is_none());
            }
        }
    }

    struct Recorder(Arc<Mutex<Vec<FrameStats>>>);

    impl FrameObserver for Recorder {
        fn frame_rendered(&mut self, stats: &FrameStats) {
            self.0.lock().unwrap().push(*stats);
        }
    }

    #[test]
    fn test_observer_sees_every_frame() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut renderer =
            Renderer::new(64, 36, ASPECT).with_observer(Box::new(Recorder(log.clone())));
        let scene = default_scene();
        let camera = default_camera();

        let first = renderer.render(&camera, &scene);
        renderer.render(&camera, &scene);

        let seen = log.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], first);
        assert_eq!(seen[1].frame, 2);
        assert_eq!(seen[1].changed, 0);
    }
}
