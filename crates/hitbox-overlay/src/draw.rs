//! The draw-primitive surface the overlay renders through.
//!
//! The overlay never talks to a GPU directly; it submits screen-space lines,
//! half-circles, and circles to a [`DrawSurface`]. Backends decide how to
//! realize them -- the `renderer` feature ships a wgpu line batcher, and
//! [`RecordingSurface`] simply records calls for tests and headless runs.
//!
//! Every primitive carries a [`DrawStyle`]: category color, line width, and
//! a depth-test flag. The overlay always submits `depth_test = true`, the
//! convention for "draw on top of the scene regardless of occlusion".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Rgba;
use crate::project::ScreenPoint;

// ---------------------------------------------------------------------------
// Style and errors
// ---------------------------------------------------------------------------

/// Styling shared by all primitives of one shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    /// RGBA line color.
    pub color: Rgba,
    /// Line width in pixels.
    pub width: f32,
    /// Draw ignoring scene depth occlusion.
    pub depth_test: bool,
}

/// Which half of a circle an arc covers, in screen terms (upper = smaller y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcHalf {
    Upper,
    Lower,
    Left,
    Right,
}

/// A draw backend failure.
#[derive(Debug, Error)]
pub enum DrawError {
    /// The backend could not accept the primitive.
    #[error("draw backend failure: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// DrawSurface
// ---------------------------------------------------------------------------

/// Screen-space line/arc primitive sink.
pub trait DrawSurface {
    /// Draw a line segment between two pixels.
    fn line(&mut self, a: ScreenPoint, b: ScreenPoint, style: DrawStyle) -> Result<(), DrawError>;

    /// Draw half of a circle, approximated with `segments` line segments.
    fn half_circle(
        &mut self,
        center: ScreenPoint,
        radius: i32,
        half: ArcHalf,
        segments: u32,
        style: DrawStyle,
    ) -> Result<(), DrawError>;

    /// Draw a full circle, approximated with `segments` line segments.
    fn circle(
        &mut self,
        center: ScreenPoint,
        radius: i32,
        segments: u32,
        style: DrawStyle,
    ) -> Result<(), DrawError>;
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        a: ScreenPoint,
        b: ScreenPoint,
        style: DrawStyle,
    },
    HalfCircle {
        center: ScreenPoint,
        radius: i32,
        half: ArcHalf,
        segments: u32,
        style: DrawStyle,
    },
    Circle {
        center: ScreenPoint,
        radius: i32,
        segments: u32,
        style: DrawStyle,
    },
}

impl DrawCall {
    /// The style the primitive was submitted with.
    pub fn style(&self) -> &DrawStyle {
        match self {
            DrawCall::Line { style, .. }
            | DrawCall::HalfCircle { style, .. }
            | DrawCall::Circle { style, .. } => style,
        }
    }
}

/// A surface that records every call. The backend for tests and for
/// headless inspection of what a frame would draw.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// All primitives submitted this frame, in submission order.
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard recorded calls, keeping the allocation.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded line primitives.
    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }

    /// All calls submitted with the given color.
    pub fn calls_with_color(&self, color: Rgba) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|c| c.style().color == color)
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn line(&mut self, a: ScreenPoint, b: ScreenPoint, style: DrawStyle) -> Result<(), DrawError> {
        self.calls.push(DrawCall::Line { a, b, style });
        Ok(())
    }

    fn half_circle(
        &mut self,
        center: ScreenPoint,
        radius: i32,
        half: ArcHalf,
        segments: u32,
        style: DrawStyle,
    ) -> Result<(), DrawError> {
        self.calls.push(DrawCall::HalfCircle {
            center,
            radius,
            half,
            segments,
            style,
        });
        Ok(())
    }

    fn circle(
        &mut self,
        center: ScreenPoint,
        radius: i32,
        segments: u32,
        style: DrawStyle,
    ) -> Result<(), DrawError> {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            segments,
            style,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> DrawStyle {
        DrawStyle {
            color: [1.0, 0.0, 0.0, 1.0],
            width: 1.0,
            depth_test: true,
        }
    }

    #[test]
    fn recording_surface_keeps_submission_order() {
        let mut surface = RecordingSurface::new();
        surface
            .line(ScreenPoint::new(0, 0), ScreenPoint::new(1, 1), style())
            .unwrap();
        surface
            .circle(ScreenPoint::new(5, 5), 10, 8, style())
            .unwrap();

        assert_eq!(surface.calls.len(), 2);
        assert!(matches!(surface.calls[0], DrawCall::Line { .. }));
        assert!(matches!(surface.calls[1], DrawCall::Circle { .. }));
        assert_eq!(surface.line_count(), 1);
    }

    #[test]
    fn calls_with_color_filters() {
        let mut surface = RecordingSurface::new();
        let red = style();
        let blue = DrawStyle {
            color: [0.0, 0.0, 1.0, 1.0],
            ..red
        };
        surface
            .line(ScreenPoint::new(0, 0), ScreenPoint::new(1, 0), red)
            .unwrap();
        surface
            .line(ScreenPoint::new(0, 0), ScreenPoint::new(0, 1), blue)
            .unwrap();

        assert_eq!(surface.calls_with_color(red.color).len(), 1);
        assert_eq!(surface.calls_with_color(blue.color).len(), 1);
    }

    #[test]
    fn clear_drops_calls() {
        let mut surface = RecordingSurface::new();
        surface
            .half_circle(ScreenPoint::new(0, 0), 4, ArcHalf::Upper, 4, style())
            .unwrap();
        surface.clear();
        assert!(surface.calls.is_empty());
    }
}
