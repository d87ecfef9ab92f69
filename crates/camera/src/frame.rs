use std::ops::Range;

use cgmath::{Matrix4, SquareMatrix};

use crate::camera::{Camera, Movement};
use crate::controller::MovementKeys;

pub const DEFAULT_MODEL_SCALE: f32 = 0.02;

/// The three matrices handed to the renderer each frame.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct TransformSet {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl Default for TransformSet {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
        }
    }
}

/// A non-indexed triangle draw over the static vertex buffer.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct DrawCommand {
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl DrawCommand {
    pub fn vertices(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

/// The renderer side of a frame.
pub trait FrameTarget {
    type Error: std::fmt::Display;

    /// Makes `transforms` visible to the next draw.
    fn upload_transforms(&mut self, transforms: &TransformSet) -> Result<(), Self::Error>;

    fn draw(&mut self, command: &DrawCommand) -> Result<(), Self::Error>;
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum FrameStatus {
    /// Drawn with this frame's transforms.
    Drawn,
    /// Drawn, but with transforms from an earlier frame.
    Stale,
    /// Nothing was drawn.
    Skipped,
}

/// Runs the per-frame camera update and hands the result to a
/// [`FrameTarget`].
///
/// Failures are logged and never stop the loop: the frame is either drawn
/// with the last good transforms or skipped.
pub struct FrameDriver {
    camera: Camera,
    keys: MovementKeys,
    model: Matrix4<f32>,
    command: DrawCommand,
    transforms: TransformSet,
}

impl FrameDriver {
    pub fn new(camera: Camera, vertex_count: u32, model_scale: f32) -> Self {
        let model = Matrix4::from_scale(model_scale);
        Self {
            camera,
            keys: MovementKeys::new(),
            model,
            command: DrawCommand {
                first_vertex: 0,
                vertex_count,
            },
            transforms: TransformSet {
                model,
                ..Default::default()
            },
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn keys(&self) -> &MovementKeys {
        &self.keys
    }

    /// The transforms of the last successful update.
    pub fn transforms(&self) -> &TransformSet {
        &self.transforms
    }

    pub fn command(&self) -> DrawCommand {
        self.command
    }

    pub fn key(&mut self, movement: Movement, pressed: bool) {
        self.keys.set(movement, pressed);
    }

    pub fn release_keys(&mut self) {
        self.keys.release_all();
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.camera.track_pointer(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.camera.reset_pointer();
    }

    /// Applies held keys for `elapsed` seconds and recomputes the transforms.
    ///
    /// Returns `false` and keeps the previous transforms if they can't be
    /// computed for this `aspect` (ex: a minimized window).
    pub fn update(&mut self, elapsed: f32, aspect: f32) -> bool {
        for movement in self.keys.held() {
            self.camera.apply_movement(movement, elapsed);
        }

        if !aspect.is_finite() || aspect <= 0.0 {
            log::warn!("invalid aspect ratio {}, reusing previous transforms", aspect);
            return false;
        }
        let (view, projection) = self.camera.view_projection(aspect);
        self.transforms = TransformSet {
            model: self.model,
            view,
            projection,
        };
        true
    }

    pub fn frame<T: FrameTarget>(&mut self, elapsed: f32, aspect: f32, target: &mut T) -> FrameStatus {
        let mut fresh = self.update(elapsed, aspect);
        if let Err(e) = target.upload_transforms(&self.transforms) {
            log::warn!("failed to upload transforms, drawing with stale ones: {}", e);
            fresh = false;
        }
        if let Err(e) = target.draw(&self.command) {
            log::warn!("draw failed, skipping frame: {}", e);
            return FrameStatus::Skipped;
        }
        if fresh {
            FrameStatus::Drawn
        } else {
            FrameStatus::Stale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use cgmath::Point3;

    #[derive(Default)]
    struct RecordingTarget {
        uploads: Vec<TransformSet>,
        draws: Vec<DrawCommand>,
        fail_upload: bool,
        fail_draw: bool,
    }

    impl FrameTarget for RecordingTarget {
        type Error = String;

        fn upload_transforms(&mut self, transforms: &TransformSet) -> Result<(), String> {
            if self.fail_upload {
                return Err("no uniform named `view`".to_string());
            }
            self.uploads.push(*transforms);
            Ok(())
        }

        fn draw(&mut self, command: &DrawCommand) -> Result<(), String> {
            if self.fail_draw {
                return Err("surface lost".to_string());
            }
            self.draws.push(*command);
            Ok(())
        }
    }

    fn driver() -> FrameDriver {
        FrameDriver::new(Camera::default(), 36, DEFAULT_MODEL_SCALE)
    }

    #[test]
    fn draws_whole_buffer() {
        let mut target = RecordingTarget::default();
        let mut driver = driver();
        assert_eq!(FrameStatus::Drawn, driver.frame(0.016, 1.5, &mut target));
        assert_eq!(vec![DrawCommand { first_vertex: 0, vertex_count: 36 }], target.draws);
        assert_eq!(0..36, target.draws[0].vertices());

        let uploaded = target.uploads[0];
        assert_eq!(Matrix4::from_scale(0.02), uploaded.model);
        let (view, projection) = Camera::default().view_projection(1.5);
        assert_eq!(view, uploaded.view);
        assert_eq!(projection, uploaded.projection);
    }

    #[test]
    fn held_keys_move_the_camera() {
        let mut target = RecordingTarget::default();
        let mut driver = driver();
        driver.key(Movement::Forward, true);
        driver.frame(1.0, 1.0, &mut target);
        driver.key(Movement::Forward, false);
        driver.frame(1.0, 1.0, &mut target);
        let z = driver.camera().position().z;
        assert!((z - 0.5).abs() < 1e-5, "z = {}", z);
        assert_ne!(target.uploads[0].view, Camera::default().view_matrix());
    }

    #[test]
    fn pointer_turns_the_camera() {
        let mut driver = driver();
        driver.pointer_moved(100.0, 100.0);
        driver.pointer_moved(100.0, 50.0);
        assert!((driver.camera().pitch() - 5.0).abs() < 1e-5);
        driver.pointer_left();
        driver.pointer_moved(0.0, 0.0);
        assert!((driver.camera().pitch() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_aspect_keeps_previous_transforms() {
        let mut target = RecordingTarget::default();
        let mut driver = driver();
        driver.frame(0.016, 2.0, &mut target);
        let good = *driver.transforms();

        driver.key(Movement::StrafeLeft, true);
        assert_eq!(FrameStatus::Stale, driver.frame(0.016, 0.0, &mut target));
        assert_eq!(FrameStatus::Stale, driver.frame(0.016, f32::NAN, &mut target));
        assert_eq!(good, *driver.transforms());
        assert_eq!(vec![good, good, good], target.uploads);
        // The camera itself still moved.
        assert!(driver.camera().position().x < 0.0);
        assert_eq!(3, target.draws.len());
    }

    #[test]
    fn failed_upload_still_draws() {
        let mut target = RecordingTarget {
            fail_upload: true,
            ..Default::default()
        };
        let mut driver = driver();
        assert_eq!(FrameStatus::Stale, driver.frame(0.016, 1.0, &mut target));
        assert_eq!(1, target.draws.len());

        target.fail_upload = false;
        assert_eq!(FrameStatus::Drawn, driver.frame(0.016, 1.0, &mut target));
    }

    #[test]
    fn failed_draw_skips_frame() {
        let mut target = RecordingTarget {
            fail_draw: true,
            ..Default::default()
        };
        let mut driver = FrameDriver::new(
            Camera::new(&CameraConfig {
                position: Point3::new(1.0, 2.0, 3.0),
                ..Default::default()
            }),
            3,
            1.0,
        );
        assert_eq!(FrameStatus::Skipped, driver.frame(0.016, 1.0, &mut target));
        assert_eq!(FrameStatus::Skipped, driver.frame(0.016, 1.0, &mut target));
        assert!(target.draws.is_empty());
        assert_eq!(2, target.uploads.len());
    }
}
