//! Fixed per-camera geometric model and pixel-to-angle conversion.

/// Vertical field of view of the cameras, degrees.
pub const VERTICAL_FOV_DEG: f64 = 48.94175846;
/// Horizontal field of view of the cameras, degrees.
pub const HORIZONTAL_FOV_DEG: f64 = 134.3449419;
/// Height of the target off the ground, feet.
pub const TARGET_ELEVATION_FT: f64 = 18.25 / 12.0;
/// Height of the camera off the ground, feet.
pub const CAMERA_ELEVATION_FT: f64 = 11.5 / 12.0;
/// Angle the camera makes relative to the horizontal, degrees.
pub const MOUNT_ANGLE_DEG: f64 = 1.0;
/// Distance from the camera to the chassis axis of rotation, feet.
pub const RADIUS_FROM_AXIS_FT: f64 = 14.0 / 12.0;

/// Immutable geometric model of one camera.
///
/// Built once at startup from the configured resolution plus the fixed
/// mounting constants above, then shared read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct CameraModel {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view, degrees.
    pub vertical_fov: f64,
    /// Horizontal field of view, degrees.
    pub horizontal_fov: f64,
    /// Height of the target off the ground, feet.
    pub elevation_of_target: f64,
    /// Height of the camera off the ground, feet.
    pub elevation_of_camera: f64,
    /// Camera tilt relative to the horizontal, degrees.
    pub angle_from_horizontal: f64,
    /// Distance from the camera to the chassis axis of rotation, feet.
    pub radius_from_axis: f64,
}

impl CameraModel {
    pub fn new(
        width: u32,
        height: u32,
        vertical_fov: f64,
        horizontal_fov: f64,
        elevation_of_target: f64,
        elevation_of_camera: f64,
        angle_from_horizontal: f64,
    ) -> Self {
        Self {
            width,
            height,
            vertical_fov,
            horizontal_fov,
            elevation_of_target,
            elevation_of_camera,
            angle_from_horizontal,
            radius_from_axis: RADIUS_FROM_AXIS_FT,
        }
    }

    /// Model for a camera at the given resolution with the standard robot
    /// mounting geometry.
    pub fn with_fixed_geometry(width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            VERTICAL_FOV_DEG,
            HORIZONTAL_FOV_DEG,
            TARGET_ELEVATION_FT,
            CAMERA_ELEVATION_FT,
            MOUNT_ANGLE_DEG,
        )
    }

    /// Horizontal center of the image, pixels.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.width as f64 / 2.0
    }

    /// Normalized image coordinates in [-1, 1], y pointing up.
    #[inline]
    pub fn normalized(&self, px: f64, py: f64) -> (f64, f64) {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        let nx = (px - half_w) / half_w;
        let ny = (py - half_h) / half_h * -1.0;
        (nx, ny)
    }

    /// Angular offset of a pixel from the optical axis: `(pitch, yaw)` in
    /// degrees. The center pixel maps to exactly `(0.0, 0.0)`.
    #[inline]
    pub fn pixel_to_angles(&self, px: f64, py: f64) -> (f64, f64) {
        let (nx, ny) = self.normalized(px, py);
        let pitch = (ny / 2.0) * self.vertical_fov;
        let yaw = (nx / 2.0) * self.horizontal_fov;
        (pitch, yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pixel_maps_to_zero_angles() {
        for (w, h) in [(320, 240), (640, 480), (1280, 720), (160, 120)] {
            let camera = CameraModel::with_fixed_geometry(w, h);
            let (pitch, yaw) = camera.pixel_to_angles(w as f64 / 2.0, h as f64 / 2.0);
            assert_eq!(pitch, 0.0);
            assert_eq!(yaw, 0.0);
        }
    }

    #[test]
    fn test_image_corners_reach_half_fov() {
        let camera = CameraModel::with_fixed_geometry(320, 240);

        // Top-left corner: full negative x, full positive y.
        let (pitch, yaw) = camera.pixel_to_angles(0.0, 0.0);
        assert!((pitch - camera.vertical_fov / 2.0).abs() < 1e-9);
        assert!((yaw + camera.horizontal_fov / 2.0).abs() < 1e-9);

        // Bottom-right corner mirrors it.
        let (pitch, yaw) = camera.pixel_to_angles(320.0, 240.0);
        assert!((pitch + camera.vertical_fov / 2.0).abs() < 1e-9);
        assert!((yaw - camera.horizontal_fov / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_y_points_up() {
        let camera = CameraModel::with_fixed_geometry(320, 240);
        // A pixel above the image center has positive normalized y.
        let (_, ny) = camera.normalized(160.0, 60.0);
        assert!(ny > 0.0);
        let (_, ny) = camera.normalized(160.0, 180.0);
        assert!(ny < 0.0);
    }
}
