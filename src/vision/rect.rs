/// Axis-aligned bounding box in pixel units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f64,
    /// Top-left y coordinate
    pub y: f64,
    /// Width of the bounding box
    pub width: f64,
    /// Height of the bounding box
    pub height: f64,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width over height; 0 for a degenerate box.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.area(), 1200.0);
        assert_eq!(rect.center(), (25.0, 40.0));
    }

    #[test]
    fn test_aspect_ratio() {
        let rect = Rect::new(0.0, 0.0, 30.0, 40.0);
        assert!((rect.aspect_ratio() - 0.75).abs() < 1e-9);

        let degenerate = Rect::new(0.0, 0.0, 30.0, 0.0);
        assert_eq!(degenerate.aspect_ratio(), 0.0);
    }
}
