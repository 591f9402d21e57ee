//! Per-frame best-candidate selection.

use std::collections::BTreeMap;

use crate::vision::candidate::{FiducialCandidate, TapeCandidate};

/// Pick the tape candidate with the largest bounding area.
///
/// Ties go to the last candidate in input order. That tie-break is inherited
/// from the calibrated pipeline and is deliberate, not incidental; callers
/// relying on a different spatial priority must sort beforehand.
pub fn select_tape(candidates: &[TapeCandidate]) -> Option<&TapeCandidate> {
    let mut best: Option<&TapeCandidate> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.bounding_area() < current.bounding_area() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Look up the configured target id among this frame's fiducial candidates.
///
/// Absence of the configured id means no selection, no matter how many other
/// markers were detected.
pub fn select_fiducial(
    candidates: &BTreeMap<u32, FiducialCandidate>,
    target_id: u32,
) -> Option<&FiducialCandidate> {
    candidates.get(&target_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::camera::CameraModel;
    use crate::vision::rect::Rect;
    use nalgebra::Point2;

    fn camera() -> CameraModel {
        CameraModel::with_fixed_geometry(320, 240)
    }

    fn tape(area: f64) -> TapeCandidate {
        // Square box of the requested area.
        let side = area.sqrt();
        TapeCandidate::new(Rect::new(100.0, 100.0, side, side), 0.6, &camera())
    }

    #[test]
    fn test_largest_bounding_area_wins() {
        let candidates = vec![tape(50.0), tape(200.0), tape(120.0)];
        let selected = select_tape(&candidates).unwrap();
        assert!((selected.bounding_area() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_resolve_to_last_in_input_order() {
        let mut first = tape(200.0);
        first.area_ratio = 0.5;
        let mut last = tape(200.0);
        last.area_ratio = 0.7;
        let candidates = [first, tape(100.0), last];
        let selected = select_tape(&candidates).unwrap();
        assert_eq!(selected.area_ratio, 0.7);
    }

    #[test]
    fn test_no_candidates_no_selection() {
        assert!(select_tape(&[]).is_none());
    }

    #[test]
    fn test_fiducial_lookup_by_target_id() {
        let cam = camera();
        let mut map = BTreeMap::new();
        map.insert(
            3,
            FiducialCandidate::new(3, Point2::new(50.0, 50.0), [[0.0; 2]; 4], &cam),
        );
        map.insert(
            7,
            FiducialCandidate::new(7, Point2::new(250.0, 50.0), [[0.0; 2]; 4], &cam),
        );

        assert_eq!(select_fiducial(&map, 7).unwrap().id, 7);
        assert!(select_fiducial(&map, 9).is_none());
    }
}
