//! Screen-to-canvas mapping for the fixed-size board.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

/// Where the canvas sits on screen and how far it is zoomed.
///
/// Unlike an infinite-canvas camera, the canvas origin is pinned to a
/// screen position chosen by the host layout; only zoom is user-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the canvas' top-left corner.
    pub origin: Point,
    /// Screen units per canvas unit.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            zoom: 1.0,
            min_zoom: 0.25,
            max_zoom: 4.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Set zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Multiply zoom by `factor`.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Reset zoom to 100%.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Zoom as a percentage for display.
    pub fn zoom_percentage(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }
}
