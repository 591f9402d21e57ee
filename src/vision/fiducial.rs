//! Fiducial marker candidates built from the external pattern detector's
//! output.

use std::collections::BTreeMap;

use nalgebra::Point2;

use crate::vision::camera::CameraModel;
use crate::vision::candidate::FiducialCandidate;

/// Marker family the detector is configured for.
pub const TAG_FAMILY: &str = "tag16h5";

/// Detections with a decision margin below this are discarded.
pub const DEFAULT_MIN_MARGIN: f64 = 10.0;

/// Fixed pixel correction applied to detected centers before any geometry is
/// computed. Calibration carry-over from the physical camera rig.
const CENTER_BIAS: (f64, f64) = (-10.0, 10.0);

/// One raw detection from the external marker detector.
#[derive(Debug, Clone)]
pub struct MarkerDetection {
    /// Integer id encoded by the pattern.
    pub id: u32,
    /// Center pixel of the pattern, uncorrected.
    pub center: Point2<f64>,
    /// Detector confidence; higher is better.
    pub margin: f64,
    /// Corner polygon of the pattern outline.
    pub corners: [[f64; 2]; 4],
}

/// Filter raw detections by margin and enrich the survivors with geometry,
/// keyed by marker id.
///
/// When the detector reports the same id more than once in a frame the later
/// detection overwrites the earlier one; last seen wins.
pub fn build_candidates(
    detections: &[MarkerDetection],
    min_margin: f64,
    camera: &CameraModel,
) -> BTreeMap<u32, FiducialCandidate> {
    let mut candidates = BTreeMap::new();
    for det in detections {
        if det.margin < min_margin {
            continue;
        }
        let center = Point2::new(det.center.x + CENTER_BIAS.0, det.center.y + CENTER_BIAS.1);
        candidates.insert(
            det.id,
            FiducialCandidate::new(det.id, center, det.corners, camera),
        );
    }
    candidates
}
