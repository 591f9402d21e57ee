//! Traits for the frame I/O and marker-detection collaborators.

use std::fmt;

use image::{GrayImage, RgbImage};

use crate::vision::MarkerDetection;

/// Blocking source of color frames.
///
/// `grab` blocks until a frame is available and has no timeout; acquisition
/// failure is signaled by a zero timestamp, never by returning early.
pub trait FrameSource {
    /// Block for the next frame. A timestamp of 0 means the frame is invalid
    /// and must be skipped; `error_description` explains why.
    fn grab(&mut self) -> (u64, RgbImage);

    /// Human-readable description of the most recent acquisition error.
    fn error_description(&self) -> String;
}

/// Fire-and-forget video output stream.
pub trait FrameSink<I> {
    fn put_frame(&mut self, frame: &I);

    /// Report an upstream error on this stream.
    fn notify_error(&mut self, message: &str);
}

/// External fiducial marker detector.
///
/// Failures are transient by contract: the pipeline logs them and proceeds
/// with an empty detection set, so implementations should reserve errors for
/// per-frame hiccups, not permanent faults.
pub trait MarkerDetector {
    type Error: fmt::Display;

    fn detect(&mut self, frame: &GrayImage) -> Result<Vec<MarkerDetection>, Self::Error>;
}
