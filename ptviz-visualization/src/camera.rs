//! Trackball camera for the viewer

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Unit, Vector3};
use ptviz_core::Bounds;

/// Maps OpenGL clip depth [-1, 1] to the [0, 1] range wgpu expects
#[rustfmt::skip]
const OPENGL_TO_WGPU: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Closest the camera may get to the target
const MIN_DISTANCE: f32 = 1e-3;

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Projection with wgpu depth conventions
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        OPENGL_TO_WGPU * perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Unit vector pointing right in view space
    fn right(&self) -> Vector3<f32> {
        (self.target - self.position)
            .cross(&self.up)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::x)
    }

    /// Rotate around the target; angles in radians.
    ///
    /// Vertical rotation stops short of the poles so the view never flips.
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.position - self.target;
        let yaw = Rotation3::from_axis_angle(&Unit::new_normalize(self.up), -horizontal);
        let mut offset = yaw * offset;

        let right = Unit::new_normalize(
            self.up
                .cross(&offset)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::x),
        );
        let pitched = Rotation3::from_axis_angle(&right, vertical) * offset;
        let up = self.up.normalize();
        if pitched.normalize().dot(&up).abs() < 0.99 {
            offset = pitched;
        }
        self.position = self.target + offset;
    }

    /// Move camera and target sideways; deltas are fractions of the view distance
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let distance = self.distance();
        let right = self.right();
        let up = right
            .cross(&(self.target - self.position))
            .try_normalize(f32::EPSILON)
            .unwrap_or(self.up);
        let shift = (-right * dx + up * dy) * distance;
        self.position += shift;
        self.target += shift;
    }

    /// Move toward the target by `amount` of the current distance
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let distance = (offset.norm() * (1.0 - amount.clamp(-0.9, 0.9))).max(MIN_DISTANCE);
        self.position = self.target + offset.normalize() * distance;
    }

    /// Look at the center of `bounds` from far enough away to see all of it
    pub fn fit(&mut self, bounds: &Bounds) {
        let radius = (bounds.diagonal() / 2.0).max(MIN_DISTANCE);
        let distance = radius / (self.fov / 2.0).sin();
        let direction = (self.position - self.target)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);
        self.target = bounds.center();
        self.position = self.target + direction * distance;
        self.near = (distance - radius).max(distance * 0.01);
        self.far = distance + radius * 2.0;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::default();
        camera.orbit(0.7, 0.3);
        assert_relative_eq!(camera.distance(), 5.0, epsilon = 1e-4);
        assert!(camera.position.x.abs() > 0.1);
    }

    #[test]
    fn test_orbit_does_not_cross_pole() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.orbit(0.0, 0.2);
        }
        let dir = (camera.position - camera.target).normalize();
        assert!(dir.dot(&camera.up).abs() < 0.99);
    }

    #[test]
    fn test_zoom_and_pan() {
        let mut camera = Camera::default();
        camera.zoom(0.5);
        assert_relative_eq!(camera.distance(), 2.5, epsilon = 1e-5);
        camera.pan(0.1, 0.0);
        assert_relative_eq!(camera.distance(), 2.5, epsilon = 1e-5);
        assert!(camera.target.x.abs() > 0.0);
    }

    #[test]
    fn test_fit_centers_bounds_in_front_of_near_plane() {
        let mut camera = Camera::default();
        let bounds = Bounds {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(256.0, 256.0, 20.0),
        };
        camera.fit(&bounds);
        assert_relative_eq!(camera.target, bounds.center());
        let clip = camera.view_projection() * bounds.center().to_homogeneous();
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }
}
