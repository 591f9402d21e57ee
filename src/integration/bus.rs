//! Control-bus seam: live tuning parameters in, detection results out.

use crate::vision::ColorThreshold;

/// Bus keys shared with the robot controller's dashboard.
pub mod keys {
    pub const HUE_MIN: &str = "hueMin";
    pub const HUE_MAX: &str = "hueMax";
    pub const SAT_MIN: &str = "satMin";
    pub const SAT_MAX: &str = "satMax";
    pub const VAL_MIN: &str = "valMin";
    pub const VAL_MAX: &str = "valMax";

    pub const DETECTION_MODE: &str = "detectionMode";
    pub const FIDUCIAL_TARGET_ID: &str = "aprilTagTargetID";

    pub const TAPE_TARGET_DETECTED: &str = "tapeTargetDetected";
    pub const FIDUCIAL_TARGET_DETECTED: &str = "aprilTagTargetDetected";
    pub const OFFSET: &str = "offset";
    pub const TARGET_X: &str = "targetX";
    pub const Y_COOR: &str = "ycoor";
    pub const AREA_RATIO: &str = "areaRatio";
    pub const ASPECT_RATIO: &str = "aspectRatio";
    pub const BOUNDING_AREA: &str = "BoundingArea";
}

/// Shared key-value store between the vision coprocessor and the robot
/// controller. Writes are fire-and-forget.
pub trait ControlBus {
    fn get_number(&mut self, key: &str, default: f64) -> f64;
    fn put_number(&mut self, key: &str, value: f64);
}

/// Which detector (and camera) is active, chosen by the robot controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// No detection work; frames pass through.
    #[default]
    Idle,
    /// Tape tracking on camera A.
    Tape,
    /// Fiducial tracking on camera B.
    Fiducial,
}

impl DetectionMode {
    /// Decode the bus value; anything unrecognized falls back to idle.
    pub fn from_number(value: f64) -> Self {
        match value as i64 {
            1 => Self::Tape,
            2 => Self::Fiducial,
            _ => Self::Idle,
        }
    }
}

/// Snapshot of the live-tunable bus state, read once at the top of each
/// frame and held fixed for the whole iteration.
#[derive(Debug, Clone)]
pub struct FrameSettings {
    pub mode: DetectionMode,
    pub threshold: ColorThreshold,
    pub target_id: u32,
}

impl FrameSettings {
    /// Read mode, threshold, and fiducial target id from the bus.
    ///
    /// `previous` supplies the per-key defaults so values persist when the
    /// bus has no entry yet.
    pub fn read<B: ControlBus>(bus: &mut B, previous: &ColorThreshold) -> Self {
        let threshold = ColorThreshold {
            hue_min: channel(bus, keys::HUE_MIN, previous.hue_min),
            hue_max: channel(bus, keys::HUE_MAX, previous.hue_max),
            sat_min: channel(bus, keys::SAT_MIN, previous.sat_min),
            sat_max: channel(bus, keys::SAT_MAX, previous.sat_max),
            val_min: channel(bus, keys::VAL_MIN, previous.val_min),
            val_max: channel(bus, keys::VAL_MAX, previous.val_max),
        };
        Self {
            mode: DetectionMode::from_number(bus.get_number(keys::DETECTION_MODE, 0.0)),
            threshold,
            target_id: bus.get_number(keys::FIDUCIAL_TARGET_ID, 1.0).max(0.0) as u32,
        }
    }
}

fn channel<B: ControlBus>(bus: &mut B, key: &str, default: u8) -> u8 {
    bus.get_number(key, default as f64).clamp(0.0, 255.0) as u8
}

/// Seed the six threshold keys onto the bus so dashboards start from the
/// current values instead of zeros.
pub fn publish_threshold<B: ControlBus>(bus: &mut B, threshold: &ColorThreshold) {
    bus.put_number(keys::HUE_MIN, threshold.hue_min as f64);
    bus.put_number(keys::HUE_MAX, threshold.hue_max as f64);
    bus.put_number(keys::SAT_MIN, threshold.sat_min as f64);
    bus.put_number(keys::SAT_MAX, threshold.sat_max as f64);
    bus.put_number(keys::VAL_MIN, threshold.val_min as f64);
    bus.put_number(keys::VAL_MAX, threshold.val_max as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapBus {
        values: HashMap<String, f64>,
    }

    impl ControlBus for MapBus {
        fn get_number(&mut self, key: &str, default: f64) -> f64 {
            self.values.get(key).copied().unwrap_or(default)
        }

        fn put_number(&mut self, key: &str, value: f64) {
            self.values.insert(key.to_string(), value);
        }
    }

    #[test]
    fn test_mode_decoding() {
        assert_eq!(DetectionMode::from_number(0.0), DetectionMode::Idle);
        assert_eq!(DetectionMode::from_number(1.0), DetectionMode::Tape);
        assert_eq!(DetectionMode::from_number(2.0), DetectionMode::Fiducial);
        assert_eq!(DetectionMode::from_number(5.0), DetectionMode::Idle);
        assert_eq!(DetectionMode::from_number(-1.0), DetectionMode::Idle);
    }

    #[test]
    fn test_settings_fall_back_to_previous_threshold() {
        let mut bus = MapBus::default();
        let previous = ColorThreshold::default();
        let settings = FrameSettings::read(&mut bus, &previous);
        assert_eq!(settings.threshold, previous);
        assert_eq!(settings.mode, DetectionMode::Idle);
        assert_eq!(settings.target_id, 1);
    }

    #[test]
    fn test_settings_pick_up_live_tuning() {
        let mut bus = MapBus::default();
        bus.put_number(keys::HUE_MIN, 42.0);
        bus.put_number(keys::DETECTION_MODE, 2.0);
        bus.put_number(keys::FIDUCIAL_TARGET_ID, 7.0);

        let settings = FrameSettings::read(&mut bus, &ColorThreshold::default());
        assert_eq!(settings.threshold.hue_min, 42);
        assert_eq!(settings.mode, DetectionMode::Fiducial);
        assert_eq!(settings.target_id, 7);
    }

    #[test]
    fn test_publish_threshold_seeds_all_keys() {
        let mut bus = MapBus::default();
        publish_threshold(&mut bus, &ColorThreshold::default());
        for key in [
            keys::HUE_MIN,
            keys::HUE_MAX,
            keys::SAT_MIN,
            keys::SAT_MAX,
            keys::VAL_MIN,
            keys::VAL_MAX,
        ] {
            assert!(bus.values.contains_key(key));
        }
    }
}
