//! Integration seams binding the detection engine to external collaborators:
//! the control bus, frame sources and sinks, the marker detector, startup
//! configuration, and the frame loop that drives them.

mod bus;
mod config;
mod pipeline;
mod source;

pub use bus::{ControlBus, DetectionMode, FrameSettings, keys, publish_threshold};
pub use config::{CameraSetup, ConfigError, StartupConfig};
pub use pipeline::{FrameReport, VisionPipeline};
pub use source::{FrameSink, FrameSource, MarkerDetector};
