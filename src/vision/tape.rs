//! Retro-reflective tape detection: HSV threshold mask plus contour shape
//! filtering.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::vision::camera::CameraModel;
use crate::vision::candidate::TapeCandidate;
use crate::vision::rect::Rect;

/// Inclusive HSV channel bounds for the binary mask.
///
/// Channels use the OpenCV 8-bit scaling (hue halved into [0, 180), sat and
/// val in [0, 255]) so values tuned against standard dashboards carry over.
/// Refreshed from the control bus every frame; the defaults are the last
/// field-tuned values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorThreshold {
    pub hue_min: u8,
    pub hue_max: u8,
    pub sat_min: u8,
    pub sat_max: u8,
    pub val_min: u8,
    pub val_max: u8,
}

impl Default for ColorThreshold {
    fn default() -> Self {
        Self {
            hue_min: 76,
            hue_max: 127,
            sat_min: 53,
            sat_max: 212,
            val_min: 89,
            val_max: 255,
        }
    }
}

impl ColorThreshold {
    #[inline]
    fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.hue_min
            && h <= self.hue_max
            && s >= self.sat_min
            && s <= self.sat_max
            && v >= self.val_min
            && v <= self.val_max
    }
}

/// Tunable shape filters for tape contours. Defaults are the field-calibrated
/// values; every bound stays overridable.
#[derive(Debug, Clone)]
pub struct TapeParams {
    /// Bounding boxes smaller than this are noise.
    pub min_bounding_area: f64,
    /// Expected top-of-box y coordinate, pixels.
    pub ideal_y: f64,
    pub y_tolerance: f64,
    /// Horizontal window half-width around the image center, pixels.
    pub x_tolerance: f64,
    /// Expected contour area over bounding area.
    pub ideal_area_ratio: f64,
    pub area_ratio_tolerance: f64,
    /// Expected bounding box width over height.
    pub ideal_aspect_ratio: f64,
    pub aspect_ratio_tolerance: f64,
}

impl Default for TapeParams {
    fn default() -> Self {
        Self {
            min_bounding_area: 100.0,
            ideal_y: 100.0,
            y_tolerance: 20.0,
            x_tolerance: 70.0,
            ideal_area_ratio: 0.6,
            area_ratio_tolerance: 0.2,
            ideal_aspect_ratio: 1.2,
            aspect_ratio_tolerance: 0.23,
        }
    }
}

/// Single-channel binary mask of the frame: 255 where every HSV channel is
/// inside the threshold, 0 elsewhere. Same resolution as the input.
pub fn color_mask(frame: &RgbImage, threshold: &ColorThreshold) -> GrayImage {
    let mut mask = GrayImage::new(frame.width(), frame.height());
    for (x, y, pixel) in frame.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        if threshold.contains(h, s, v) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }
    mask
}

/// RGB to HSV with OpenCV 8-bit scaling: hue in [0, 180), sat/val in [0, 255].
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = v - min;

    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };

    let h = if delta > 0.0 {
        let deg = if v == rf {
            60.0 * (gf - bf) / delta
        } else if v == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        let deg = if deg < 0.0 { deg + 360.0 } else { deg };
        deg / 2.0
    } else {
        0.0
    };

    ((h.round() as u32 % 180) as u8, s.round() as u8, v as u8)
}

/// Run the full tape detector on a color frame.
///
/// Returns the binary mask (published to the mask sink every frame) together
/// with every contour that survived the shape filters. Only external contour
/// borders are considered; holes inside a blob are ignored.
pub fn detect_tape(
    frame: &RgbImage,
    threshold: &ColorThreshold,
    params: &TapeParams,
    camera: &CameraModel,
) -> (GrayImage, Vec<TapeCandidate>) {
    let mask = color_mask(frame, threshold);
    let candidates = contour_candidates(&mask, params, camera);
    (mask, candidates)
}

/// Extract outer contours from a binary mask and keep the ones that look
/// like the tape target.
pub fn contour_candidates(
    mask: &GrayImage,
    params: &TapeParams,
    camera: &CameraModel,
) -> Vec<TapeCandidate> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| evaluate_contour(&contour.points, params, camera))
        .collect()
}

/// Apply the shape filters to one contour, producing a candidate if it
/// qualifies.
///
/// Filter order matches the calibrated pipeline: bounding-area noise floor,
/// vertical window, horizontal window, then the two ratio windows.
pub fn evaluate_contour(
    points: &[Point<u32>],
    params: &TapeParams,
    camera: &CameraModel,
) -> Option<TapeCandidate> {
    let rect = bounding_rect(points)?;
    if rect.area() < params.min_bounding_area {
        return None;
    }
    if !(rect.y > params.ideal_y - params.y_tolerance
        && rect.y < params.ideal_y + params.y_tolerance)
    {
        return None;
    }
    let ideal_x = camera.center_x();
    if !(rect.x > ideal_x - params.x_tolerance && rect.x < ideal_x + params.x_tolerance) {
        return None;
    }

    let area_ratio = contour_area(points) / rect.area();
    if !(area_ratio > params.ideal_area_ratio - params.area_ratio_tolerance
        && area_ratio < params.ideal_area_ratio + params.area_ratio_tolerance)
    {
        return None;
    }
    let aspect_ratio = rect.aspect_ratio();
    if !(aspect_ratio > params.ideal_aspect_ratio - params.aspect_ratio_tolerance
        && aspect_ratio < params.ideal_aspect_ratio + params.aspect_ratio_tolerance)
    {
        return None;
    }

    Some(TapeCandidate::new(rect, area_ratio, camera))
}

/// Pixel-inclusive bounding rectangle of a contour.
fn bounding_rect(points: &[Point<u32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::new(
        min_x as f64,
        min_y as f64,
        (max_x - min_x + 1) as f64,
        (max_y - min_y + 1) as f64,
    ))
}

/// Polygon area of the contour border by the shoelace formula.
fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        acc += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    acc.abs() / 2.0
}
