//! wgpu line renderer for the overlay.
//!
//! This module is feature-gated behind `renderer`. When the feature is not
//! enabled, this module compiles to nothing. It provides a
//! [`DrawSurface`](crate::draw::DrawSurface) backend that expands arcs into
//! line segments on the CPU and batches everything into a single line-list
//! draw per frame, plus a windowed runner for quick visual inspection.
//!
//! This is a diagnostic backend, not a production renderer: one pipeline,
//! one vertex buffer, one-pixel lines.

pub mod app;
pub mod renderer;

pub use app::run_windowed;
pub use renderer::{LineBatch, LineRenderer};
