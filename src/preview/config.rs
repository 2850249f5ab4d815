use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::PreviewError;

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.25;

/// Visible area the preview is fitted into, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `1280x800`.
impl FromStr for Viewport {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PreviewError::Validation(format!("viewport '{}' is not WIDTHxHEIGHT", s));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: f64 = w.trim().parse().map_err(|_| invalid())?;
        let height: f64 = h.trim().parse().map_err(|_| invalid())?;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(invalid());
        }
        Ok(Self::new(width, height))
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Size given to text, HTML and binary pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PageSize {
    /// US Letter at 96 dpi
    fn default() -> Self {
        Self {
            width: 816.0,
            height: 1056.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewConfig {
    pub viewport: Viewport,
    pub page_size: PageSize,
}

impl PreviewConfig {
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}

/// Largest zoom at which a `width` x `height` page fits the viewport.
///
/// Degenerate sizes fit at 1.0. The result is not clamped.
pub fn fit_zoom(viewport: Viewport, width: f64, height: f64) -> f64 {
    let zoom = (viewport.width / width).min(viewport.height / height);
    if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        assert_eq!("1024x768".parse::<Viewport>().unwrap(), Viewport::new(1024.0, 768.0));
        assert_eq!(" 800 X 600 ".parse::<Viewport>().unwrap(), Viewport::new(800.0, 600.0));
        assert!("800".parse::<Viewport>().is_err());
        assert!("0x600".parse::<Viewport>().is_err());
        assert!("axb".parse::<Viewport>().is_err());
    }

    #[test]
    fn test_fit_zoom() {
        let viewport = Viewport::new(1000.0, 500.0);
        assert_eq!(fit_zoom(viewport, 500.0, 1000.0), 0.5);
        assert_eq!(fit_zoom(viewport, 100.0, 100.0), 5.0);
        assert_eq!(fit_zoom(viewport, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_clamp_zoom() {
        assert_eq!(clamp_zoom(0.1), MIN_ZOOM);
        assert_eq!(clamp_zoom(9.0), MAX_ZOOM);
        assert_eq!(clamp_zoom(1.5), 1.5);
    }
}
