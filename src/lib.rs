//! Vision coprocessor pipeline for competition-robot target detection.
//!
//! The crate continuously processes camera frames, locates either a
//! retro-reflective tape target (HSV threshold + contour heuristics) or a
//! fiducial marker (external pattern detector), attaches angular geometry
//! (pitch, yaw, distance, offset) to every candidate, picks the best one per
//! frame, and publishes the result to a shared control bus read by the robot
//! controller.
//!
//! The [`vision`] module holds the pure detection engine; the [`integration`]
//! module holds the traits that bind it to the outside world (frame sources
//! and sinks, the control bus, the marker detector, startup configuration)
//! plus the [`VisionPipeline`] frame loop that ties everything together.

pub mod integration;
pub mod vision;

pub use integration::{
    ConfigError, ControlBus, DetectionMode, FrameReport, FrameSettings, FrameSink, FrameSource,
    MarkerDetector, StartupConfig, VisionPipeline,
};
pub use vision::{
    CameraModel, ColorThreshold, DebouncedPresence, FiducialCandidate, MarkerDetection,
    PresenceState, Rect, TapeCandidate, TapeParams, TargetCandidate,
};
