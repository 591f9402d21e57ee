//! Shared angle and distance math used by both detectors.

use crate::vision::camera::CameraModel;

/// How close (in degrees) the tangent argument may get to an odd multiple of
/// 90° before the distance is treated as degenerate.
const SINGULARITY_EPS_DEG: f64 = 1e-6;

/// Ground distance to the target, in the same unit as the camera elevations
/// (feet), from the target's pitch angle in degrees.
///
/// `(elevation_of_target - elevation_of_camera) / tan(pitch + mount angle)`.
/// When the tangent argument lands on an odd multiple of 90° the distance is
/// degenerate; a signed infinity is returned instead of a garbage value and
/// consumers are expected to disregard it.
pub fn distance_to_target(pitch_deg: f64, camera: &CameraModel) -> f64 {
    let rise = camera.elevation_of_target - camera.elevation_of_camera;
    let total_deg = pitch_deg + camera.angle_from_horizontal;

    // Distance from total_deg to the nearest 90 + k*180.
    let nearest_odd_90 = ((total_deg - 90.0) / 180.0).round() * 180.0 + 90.0;
    if (total_deg - nearest_odd_90).abs() < SINGULARITY_EPS_DEG {
        return if rise == 0.0 {
            0.0
        } else {
            rise.signum() * f64::INFINITY
        };
    }

    rise / total_deg.to_radians().tan()
}

/// Horizontal pixel offset of a target from the camera's optical center.
#[inline]
pub fn offset_from_center(pixel_x: f64, camera: &CameraModel) -> f64 {
    pixel_x - camera.center_x()
}

/// Yaw corrected for a camera mounted off the chassis axis of rotation.
///
/// `radius` is the camera's distance from the axis; a degenerate (infinite)
/// target distance yields 0, the limit of the correction.
pub fn adjusted_yaw(yaw_deg: f64, distance: f64, radius: f64) -> f64 {
    if distance.is_infinite() {
        return 0.0;
    }
    yaw_deg * (radius / (distance + radius))
}
