//! Core detection engine: camera geometry, the two target detectors, best
//! candidate selection, and the debounced presence state machine.

mod camera;
mod candidate;
mod fiducial;
mod geometry;
mod presence;
mod rect;
mod selector;
mod tape;

pub use camera::CameraModel;
pub use candidate::{FiducialCandidate, TapeCandidate, TargetCandidate};
pub use fiducial::{DEFAULT_MIN_MARGIN, MarkerDetection, TAG_FAMILY, build_candidates};
pub use geometry::{adjusted_yaw, distance_to_target, offset_from_center};
pub use presence::{DebouncedPresence, PresenceState};
pub use rect::Rect;
pub use selector::{select_fiducial, select_tape};
pub use tape::{ColorThreshold, TapeParams, color_mask, detect_tape};
