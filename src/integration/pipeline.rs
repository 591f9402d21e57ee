//! The per-frame detection loop: mode dispatch, detection, selection,
//! presence update, publication.

use std::time::Instant;

use image::{GrayImage, Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;
use log::{debug, warn};

use crate::integration::bus::{ControlBus, DetectionMode, FrameSettings, keys, publish_threshold};
use crate::integration::source::{FrameSink, FrameSource, MarkerDetector};
use crate::vision::{
    CameraModel, ColorThreshold, DEFAULT_MIN_MARGIN, DebouncedPresence, FiducialCandidate,
    PresenceState, TapeCandidate, TapeParams, TargetCandidate, build_candidates, detect_tape,
    select_fiducial, select_tape,
};

const CANDIDATE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const SELECTED_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Summary of one loop iteration, for logging and tests.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub mode: DetectionMode,
    /// False when the frame grab failed and the iteration was skipped.
    pub acquired: bool,
    /// The target chosen this frame, geometry attached, if any.
    pub target: Option<TargetCandidate>,
    /// Tape presence state after this frame.
    pub presence: PresenceState,
}

impl FrameReport {
    /// Whether this frame produced a selected target.
    pub fn selected(&self) -> bool {
        self.target.is_some()
    }
}

/// Single-threaded synchronous frame pump.
///
/// Each iteration blocks on frame acquisition, runs the active detector, the
/// selector, and the presence update, then publishes results; all outputs of
/// frame N complete before frame N+1 is grabbed. Live-tunable state is read
/// once per iteration and held fixed, so there are no intra-frame races by
/// construction.
///
/// Camera A is bound to the tape model and camera B to the fiducial model;
/// the binding never crosses.
pub struct VisionPipeline<B, S, KA, KM, M>
where
    B: ControlBus,
    S: FrameSource,
    KA: FrameSink<RgbImage>,
    KM: FrameSink<GrayImage>,
    M: MarkerDetector,
{
    bus: B,
    camera_a: S,
    camera_b: S,
    annotated_sink: KA,
    mask_sink: KM,
    marker: M,
    model_a: CameraModel,
    model_b: CameraModel,
    tape_params: TapeParams,
    threshold: ColorThreshold,
    min_margin: f64,
    presence: DebouncedPresence,
}

impl<B, S, KA, KM, M> VisionPipeline<B, S, KA, KM, M>
where
    B: ControlBus,
    S: FrameSource,
    KA: FrameSink<RgbImage>,
    KM: FrameSink<GrayImage>,
    M: MarkerDetector,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mut bus: B,
        camera_a: S,
        camera_b: S,
        annotated_sink: KA,
        mask_sink: KM,
        marker: M,
        model_a: CameraModel,
        model_b: CameraModel,
    ) -> Self {
        let threshold = ColorThreshold::default();
        publish_threshold(&mut bus, &threshold);
        Self {
            bus,
            camera_a,
            camera_b,
            annotated_sink,
            mask_sink,
            marker,
            model_a,
            model_b,
            tape_params: TapeParams::default(),
            threshold,
            min_margin: DEFAULT_MIN_MARGIN,
            presence: DebouncedPresence::default(),
        }
    }

    /// Override the tape shape filters.
    pub fn with_tape_params(mut self, params: TapeParams) -> Self {
        self.tape_params = params;
        self
    }

    /// Override the fiducial margin floor.
    pub fn with_min_margin(mut self, min_margin: f64) -> Self {
        self.min_margin = min_margin;
        self
    }

    /// Override the tape-loss debounce window.
    pub fn with_debounce(mut self, debounce_secs: f64) -> Self {
        self.presence = DebouncedPresence::new(debounce_secs);
        self
    }

    /// Run the loop until the process is terminated.
    pub fn run(&mut self) {
        let started = Instant::now();
        loop {
            let report = self.process_frame(started.elapsed().as_secs_f64());
            debug!(
                "frame: mode={:?} acquired={} selected={} presence={:?}",
                report.mode, report.acquired, report.selected(), report.presence
            );
        }
    }

    /// One loop iteration at the given monotonic timestamp.
    pub fn process_frame(&mut self, now_secs: f64) -> FrameReport {
        let settings = FrameSettings::read(&mut self.bus, &self.threshold);
        self.threshold = settings.threshold;

        let source = match settings.mode {
            DetectionMode::Fiducial => &mut self.camera_b,
            _ => &mut self.camera_a,
        };
        let (timestamp, frame) = source.grab();
        if timestamp == 0 {
            let description = source.error_description();
            warn!("frame acquisition failed: {description}");
            self.annotated_sink.notify_error(&description);
            return FrameReport {
                mode: settings.mode,
                acquired: false,
                target: None,
                presence: self.presence.state(),
            };
        }

        let mut annotated = frame.clone();
        let target = match settings.mode {
            DetectionMode::Idle => None,
            DetectionMode::Tape => self.process_tape(&frame, &mut annotated, now_secs),
            DetectionMode::Fiducial => {
                self.process_fiducial(&frame, &mut annotated, settings.target_id)
            }
        };

        self.annotated_sink.put_frame(&annotated);
        FrameReport {
            mode: settings.mode,
            acquired: true,
            target,
            presence: self.presence.state(),
        }
    }

    /// Tape path: mask, contour filtering, largest-area selection, debounced
    /// presence. The mask is published every frame regardless of outcome.
    fn process_tape(
        &mut self,
        frame: &RgbImage,
        annotated: &mut RgbImage,
        now_secs: f64,
    ) -> Option<TargetCandidate> {
        let (mask, candidates) =
            detect_tape(frame, &self.threshold, &self.tape_params, &self.model_a);

        for candidate in &candidates {
            draw_box(annotated, candidate, CANDIDATE_COLOR);
        }

        let selected = select_tape(&candidates).cloned();
        let presence = self.presence.update(selected.is_some(), now_secs);

        if let Some(target) = &selected {
            draw_box(annotated, target, SELECTED_COLOR);
            self.bus.put_number(keys::TAPE_TARGET_DETECTED, 1.0);
            self.bus.put_number(keys::OFFSET, target.offset);
            self.bus.put_number(keys::TARGET_X, target.normalized_x);
            self.bus.put_number(keys::Y_COOR, target.rect.y);
            self.bus.put_number(keys::AREA_RATIO, target.area_ratio);
            self.bus.put_number(keys::ASPECT_RATIO, target.aspect_ratio);
            self.bus
                .put_number(keys::BOUNDING_AREA, target.bounding_area());
        } else if presence == PresenceState::NoTarget {
            self.bus.put_number(keys::TAPE_TARGET_DETECTED, 0.0);
        }
        // While the debounce window holds, the last published values stay on
        // the bus untouched: stale but valid.

        self.mask_sink.put_frame(&mask);
        selected.map(TargetCandidate::Tape)
    }

    /// Fiducial path: marker detection on the greyscale frame, id lookup,
    /// immediate absence reporting. No debounce here; the two policies are
    /// intentionally separate.
    fn process_fiducial(
        &mut self,
        frame: &RgbImage,
        annotated: &mut RgbImage,
        target_id: u32,
    ) -> Option<TargetCandidate> {
        let grey = imageops::grayscale(frame);
        let detections = match self.marker.detect(&grey) {
            Ok(detections) => detections,
            Err(err) => {
                warn!("marker detector failed, treating as empty: {err}");
                Vec::new()
            }
        };

        let candidates = build_candidates(&detections, self.min_margin, &self.model_b);
        for candidate in candidates.values() {
            debug!("marker id {} at {:?}", candidate.id, candidate.center);
            draw_corners(annotated, candidate);
        }

        match select_fiducial(&candidates, target_id) {
            Some(target) => {
                self.bus.put_number(keys::FIDUCIAL_TARGET_DETECTED, 1.0);
                self.bus.put_number(keys::OFFSET, target.offset);
                self.bus.put_number(keys::TARGET_X, target.normalized_x);
                Some(TargetCandidate::Fiducial(target.clone()))
            }
            None => {
                self.bus.put_number(keys::FIDUCIAL_TARGET_DETECTED, 0.0);
                None
            }
        }
    }
}

fn draw_box(canvas: &mut RgbImage, candidate: &TapeCandidate, color: Rgb<u8>) {
    let rect = candidate.rect;
    if rect.width < 1.0 || rect.height < 1.0 {
        return;
    }
    draw_hollow_rect_mut(
        canvas,
        PixelRect::at(rect.x as i32, rect.y as i32).of_size(rect.width as u32, rect.height as u32),
        color,
    );
}

fn draw_corners(canvas: &mut RgbImage, candidate: &FiducialCandidate) {
    let corners = candidate.corners;
    for i in 0..4 {
        let [x1, y1] = corners[i];
        let [x2, y2] = corners[(i + 1) % 4];
        draw_line_segment_mut(
            canvas,
            (x1 as f32, y1 as f32),
            (x2 as f32, y2 as f32),
            MARKER_COLOR,
        );
    }
}
