//! Per-frame target candidates with their attached angular geometry.

use nalgebra::Point2;

use crate::vision::camera::CameraModel;
use crate::vision::geometry::{adjusted_yaw, distance_to_target, offset_from_center};
use crate::vision::rect::Rect;

/// A retro-reflective tape candidate that passed every contour filter.
///
/// Angles are taken at the bounding box top-left pixel and the offset at the
/// bounding box center, matching the calibrated behavior of the robot this
/// geometry was tuned on.
#[derive(Debug, Clone)]
pub struct TapeCandidate {
    pub rect: Rect,
    /// Contour area over bounding box area, in (0, 1].
    pub area_ratio: f64,
    /// Bounding box width over height.
    pub aspect_ratio: f64,
    /// Horizontal pixel offset from the camera center.
    pub offset: f64,
    pub normalized_x: f64,
    pub normalized_y: f64,
    /// Vertical angle from the optical axis, degrees.
    pub pitch: f64,
    /// Horizontal angle from the optical axis, degrees.
    pub yaw: f64,
    /// Ground distance to the target, feet; signed infinity when degenerate.
    pub distance: f64,
}

impl TapeCandidate {
    pub fn new(rect: Rect, area_ratio: f64, camera: &CameraModel) -> Self {
        let (normalized_x, normalized_y) = camera.normalized(rect.x, rect.y);
        let (pitch, yaw) = camera.pixel_to_angles(rect.x, rect.y);
        Self {
            rect,
            area_ratio,
            aspect_ratio: rect.aspect_ratio(),
            offset: offset_from_center(rect.x + rect.width / 2.0, camera),
            normalized_x,
            normalized_y,
            pitch,
            yaw,
            distance: distance_to_target(pitch, camera),
        }
    }

    #[inline]
    pub fn bounding_area(&self) -> f64 {
        self.rect.area()
    }
}

/// A fiducial marker candidate that passed the margin filter.
#[derive(Debug, Clone)]
pub struct FiducialCandidate {
    /// Integer id encoded by the marker pattern.
    pub id: u32,
    /// Bias-corrected center pixel.
    pub center: Point2<f64>,
    /// Corner polygon of the detected pattern, for annotation.
    pub corners: [[f64; 2]; 4],
    pub offset: f64,
    pub normalized_x: f64,
    pub normalized_y: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub distance: f64,
}

impl FiducialCandidate {
    pub fn new(id: u32, center: Point2<f64>, corners: [[f64; 2]; 4], camera: &CameraModel) -> Self {
        let (normalized_x, normalized_y) = camera.normalized(center.x, center.y);
        let (pitch, yaw) = camera.pixel_to_angles(center.x, center.y);
        Self {
            id,
            center,
            corners,
            offset: offset_from_center(center.x, camera),
            normalized_x,
            normalized_y,
            pitch,
            yaw,
            distance: distance_to_target(pitch, camera),
        }
    }
}

/// The chosen target of a frame, tagged by which detector produced it.
///
/// Both variants expose the same geometric surface so the selection boundary
/// never has to care which detector ran.
#[derive(Debug, Clone)]
pub enum TargetCandidate {
    Tape(TapeCandidate),
    Fiducial(FiducialCandidate),
}

impl TargetCandidate {
    /// Horizontal pixel offset from the camera center.
    pub fn offset(&self) -> f64 {
        match self {
            Self::Tape(t) => t.offset,
            Self::Fiducial(f) => f.offset,
        }
    }

    pub fn normalized_x(&self) -> f64 {
        match self {
            Self::Tape(t) => t.normalized_x,
            Self::Fiducial(f) => f.normalized_x,
        }
    }

    /// Vertical angle from the optical axis, degrees.
    pub fn pitch(&self) -> f64 {
        match self {
            Self::Tape(t) => t.pitch,
            Self::Fiducial(f) => f.pitch,
        }
    }

    /// Horizontal angle from the optical axis, degrees.
    pub fn yaw(&self) -> f64 {
        match self {
            Self::Tape(t) => t.yaw,
            Self::Fiducial(f) => f.yaw,
        }
    }

    /// Ground distance to the target, feet; signed infinity when degenerate.
    pub fn distance(&self) -> f64 {
        match self {
            Self::Tape(t) => t.distance,
            Self::Fiducial(f) => f.distance,
        }
    }

    /// Yaw corrected for a camera mounted `radius` feet off the chassis axis
    /// of rotation.
    pub fn adjusted_yaw(&self, radius: f64) -> f64 {
        adjusted_yaw(self.yaw(), self.distance(), radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> CameraModel {
        CameraModel::with_fixed_geometry(320, 240)
    }

    #[test]
    fn test_tape_candidate_geometry() {
        let cam = camera();
        let rect = Rect::new(160.0, 120.0, 60.0, 50.0);
        let c = TapeCandidate::new(rect, 0.6, &cam);

        // Top-left pixel sits on the image center row/column.
        assert_eq!(c.pitch, 0.0);
        assert_eq!(c.yaw, 0.0);
        // Offset is measured from the bounding box center.
        assert_eq!(c.offset, 30.0);
        assert_relative_eq!(c.aspect_ratio, 1.2);
        assert_eq!(c.bounding_area(), 3000.0);
    }

    #[test]
    fn test_fiducial_candidate_geometry() {
        let cam = camera();
        let corners = [[0.0; 2]; 4];
        let c = FiducialCandidate::new(5, Point2::new(160.0, 120.0), corners, &cam);
        assert_eq!(c.offset, 0.0);
        assert_eq!(c.pitch, 0.0);
        assert_eq!(c.yaw, 0.0);
        assert_eq!(c.normalized_x, 0.0);
    }

    #[test]
    fn test_uniform_accessors_agree_across_variants() {
        let cam = camera();
        let tape = TargetCandidate::Tape(TapeCandidate::new(
            Rect::new(100.0, 60.0, 60.0, 50.0),
            0.6,
            &cam,
        ));
        let fiducial = TargetCandidate::Fiducial(FiducialCandidate::new(
            1,
            Point2::new(100.0, 60.0),
            [[0.0; 2]; 4],
            &cam,
        ));
        assert_relative_eq!(tape.pitch(), fiducial.pitch());
        assert_relative_eq!(tape.yaw(), fiducial.yaw());
        assert_relative_eq!(tape.distance(), fiducial.distance());
        // Offsets differ: tape measures from the box center.
        assert_relative_eq!(tape.offset(), fiducial.offset() + 30.0);
    }
}
