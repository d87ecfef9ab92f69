use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

/// Pitch never reaches the poles, otherwise `direction x up` degenerates and
/// yaw stops meaning anything.
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Movement {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl Movement {
    pub const ALL: [Movement; 4] = [
        Movement::Forward,
        Movement::Backward,
        Movement::StrafeLeft,
        Movement::StrafeRight,
    ];
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct CameraConfig {
    pub position: Point3<f32>,
    /// Degrees. -90 looks down -z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per pointer pixel.
    pub sensitivity: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            speed: 4.5,
            sensitivity: 0.1,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// Computes the unit look direction for the given angles (degrees).
///
/// Y is up; yaw = -90, pitch = 0 looks down -z.
pub fn direction_from_angles(yaw: f32, pitch: f32) -> Vector3<f32> {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// A free flying camera.
///
/// Orientation is stored as yaw/pitch angles; the look direction is always
/// rebuilt from them rather than rotated incrementally, so it can't drift.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    yaw: f32,
    pitch: f32,
    direction: Vector3<f32>,
    up: Vector3<f32>,
    fov: f32,
    speed: f32,
    sensitivity: f32,
    znear: f32,
    zfar: f32,
    // No pointer sample has been seen yet while this is `None`.
    last_pointer: Option<(f64, f64)>,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let pitch = config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            position: config.position,
            yaw: config.yaw,
            pitch,
            direction: direction_from_angles(config.yaw, pitch),
            up: Vector3::unit_y(),
            fov: config.fov,
            speed: config.speed,
            sensitivity: config.sensitivity,
            znear: config.znear,
            zfar: config.zfar,
            last_pointer: None,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn last_pointer(&self) -> Option<(f64, f64)> {
        self.last_pointer
    }

    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vector3<f32> {
        self.direction.cross(self.up).normalize()
    }

    /// Moves the camera for `elapsed` seconds.
    ///
    /// The distance only depends on the total time, not on how it is split
    /// between frames.
    pub fn apply_movement(&mut self, movement: Movement, elapsed: f32) {
        let distance = self.speed * elapsed;
        match movement {
            Movement::Forward => self.position += self.direction * distance,
            Movement::Backward => self.position -= self.direction * distance,
            Movement::StrafeLeft => self.position -= self.right() * distance,
            Movement::StrafeRight => self.position += self.right() * distance,
        }
    }

    /// Turns the camera by a pointer offset in pixels.
    ///
    /// Screen rows grow downwards, so moving the pointer up (negative `dy`)
    /// raises the pitch.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += self.sensitivity * dx;
        self.pitch += self.sensitivity * -dy;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.direction = direction_from_angles(self.yaw, self.pitch);
    }

    /// Feeds an absolute pointer position.
    ///
    /// The first sample only records the position so that the camera doesn't
    /// jump when the pointer first enters the window.
    pub fn track_pointer(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) {
            self.apply_pointer_delta((x - last_x) as f32, (y - last_y) as f32);
        }
    }

    /// Forgets the last pointer sample, e.g. when the pointer leaves the
    /// window.
    pub fn reset_pointer(&mut self) {
        self.last_pointer = None;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// OpenGL style perspective projection (clip z in -1..1).
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        cgmath::perspective(cgmath::Deg(self.fov), aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self, aspect: f32) -> (Matrix4<f32>, Matrix4<f32>) {
        (self.view_matrix(), self.projection_matrix(aspect))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{EuclideanSpace, Transform};
    use float_eq::assert_float_eq;

    fn assert_vec_eq(expected: Vector3<f32>, actual: Vector3<f32>) {
        assert_float_eq!(expected.x, actual.x, abs <= 1e-5);
        assert_float_eq!(expected.y, actual.y, abs <= 1e-5);
        assert_float_eq!(expected.z, actual.z, abs <= 1e-5);
    }

    #[test]
    fn default_looks_down_negative_z() {
        let camera = Camera::default();
        assert_vec_eq(Vector3::new(0.0, 0.0, -1.0), camera.direction());
        assert_vec_eq(Vector3::new(1.0, 0.0, 0.0), camera.right());
    }

    #[test]
    fn direction_is_unit_length() {
        for (yaw, pitch) in [(0.0, 0.0), (33.0, 12.5), (-270.0, -89.0), (720.5, 45.0)] {
            assert_float_eq!(1.0, direction_from_angles(yaw, pitch).magnitude(), abs <= 1e-6);
        }
    }

    #[test]
    fn config_pitch_is_clamped() {
        let camera = Camera::new(&CameraConfig {
            pitch: 120.0,
            ..Default::default()
        });
        assert_eq!(PITCH_LIMIT, camera.pitch());
    }

    #[test]
    fn pitch_stays_within_limits() {
        let mut camera = Camera::default();
        // 0.1 degrees per pixel: 10000 pixels up is far past the pole.
        camera.apply_pointer_delta(0.0, -10000.0);
        assert_eq!(PITCH_LIMIT, camera.pitch());
        camera.apply_pointer_delta(0.0, -1.0);
        assert_eq!(PITCH_LIMIT, camera.pitch());
        // Coming back down takes effect immediately, no accumulated overshoot.
        camera.apply_pointer_delta(0.0, 10.0);
        assert_float_eq!(PITCH_LIMIT - 1.0, camera.pitch(), abs <= 1e-4);

        for dy in [3000.0, -1234.5, 17.0, 99999.0, -42.0] {
            camera.apply_pointer_delta(5.0, dy);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&camera.pitch()));
            assert!(camera.direction().y.abs() < 1.0);
        }
    }

    #[test]
    fn pointer_up_raises_pitch() {
        let mut camera = Camera::default();
        camera.apply_pointer_delta(0.0, -20.0);
        assert_float_eq!(2.0, camera.pitch(), abs <= 1e-5);
        assert!(camera.direction().y > 0.0);
    }

    #[test]
    fn pointer_right_turns_right() {
        let mut camera = Camera::default();
        camera.apply_pointer_delta(900.0, 0.0);
        assert_float_eq!(0.0, camera.yaw(), abs <= 1e-4);
        assert_vec_eq(Vector3::new(1.0, 0.0, 0.0), camera.direction());
    }

    #[test]
    fn first_pointer_sample_only_seeds() {
        let mut camera = Camera::default();
        assert_eq!(None, camera.last_pointer());
        camera.track_pointer(400.0, 300.0);
        assert_eq!(Some((400.0, 300.0)), camera.last_pointer());
        assert_eq!(-90.0, camera.yaw());
        assert_eq!(0.0, camera.pitch());

        camera.track_pointer(410.0, 280.0);
        assert_float_eq!(-89.0, camera.yaw(), abs <= 1e-5);
        assert_float_eq!(2.0, camera.pitch(), abs <= 1e-5);

        camera.reset_pointer();
        camera.track_pointer(0.0, 0.0);
        assert_float_eq!(-89.0, camera.yaw(), abs <= 1e-5);
    }

    #[test]
    fn movement_follows_direction() {
        let mut camera = Camera::default();
        camera.apply_movement(Movement::Forward, 1.0);
        assert_vec_eq(Vector3::new(0.0, 0.0, 0.5), camera.position().to_vec());
        camera.apply_movement(Movement::Backward, 2.0);
        assert_vec_eq(Vector3::new(0.0, 0.0, 9.5), camera.position().to_vec());
        camera.apply_movement(Movement::StrafeRight, 1.0);
        assert_vec_eq(Vector3::new(4.5, 0.0, 9.5), camera.position().to_vec());
        camera.apply_movement(Movement::StrafeLeft, 2.0);
        assert_vec_eq(Vector3::new(-4.5, 0.0, 9.5), camera.position().to_vec());
    }

    #[test]
    fn movement_is_frame_rate_independent() {
        let mut once = Camera::default();
        once.apply_pointer_delta(137.0, -42.0);
        let mut split = once.clone();

        once.apply_movement(Movement::Forward, 0.5);
        once.apply_movement(Movement::StrafeLeft, 0.5);
        for _ in 0..50 {
            split.apply_movement(Movement::Forward, 0.01);
            split.apply_movement(Movement::StrafeLeft, 0.01);
        }
        assert_vec_eq(once.position().to_vec(), split.position().to_vec());

        let travelled = once.position() - CameraConfig::default().position;
        let expected = (once.direction() - once.right()) * 4.5 * 0.5;
        assert_vec_eq(expected, travelled);
    }

    #[test]
    fn view_maps_target_onto_negative_z() {
        let mut camera = Camera::default();
        camera.apply_pointer_delta(250.0, 130.0);
        let target = camera.position() + camera.direction() * 3.0;
        let p = camera.view_matrix().transform_point(target);
        assert_vec_eq(Vector3::new(0.0, 0.0, -3.0), p.to_vec());
    }

    #[test]
    fn projection_uses_fixed_clip_planes() {
        let camera = Camera::default();
        let (_, proj) = camera.view_projection(4.0 / 3.0);
        let near = proj.transform_point(cgmath::Point3::new(0.0, 0.0, -0.1));
        let far = proj.transform_point(cgmath::Point3::new(0.0, 0.0, -100.0));
        assert_float_eq!(-1.0, near.z, abs <= 1e-4);
        assert_float_eq!(1.0, far.z, abs <= 1e-4);
        assert_eq!(
            cgmath::perspective(cgmath::Deg(45.0), 4.0 / 3.0, 0.1, 100.0),
            proj
        );
    }
}
