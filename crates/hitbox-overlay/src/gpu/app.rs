//! Windowed runner for the overlay.
//!
//! Provides [`run_windowed`], which opens a window and draws the overlay
//! over the given scene every frame until the window closes. Intended for
//! quick visual inspection of a scene's collision geometry; hosts with their
//! own event loop integrate [`LineRenderer`] and
//! [`LineBatch`](super::LineBatch) directly instead.
//!
//! This module is feature-gated behind `renderer`.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{WindowAttributes, WindowId};

use hitbox_world::math::Vec2;
use hitbox_world::scene::Scene;

use super::renderer::{LineBatch, LineRenderer};
use crate::project::OrthoCamera;
use crate::render::HitboxRenderer;

/// Open a window and draw the overlay every frame until it is closed.
///
/// The camera is pixel-perfect (one world unit per pixel), centered on
/// `view_center`, and tracks window resizes.
///
/// # Errors
///
/// Returns an error if the event loop cannot be created or if renderer
/// initialization fails.
pub fn run_windowed(
    scene: Scene,
    overlay: HitboxRenderer,
    view_center: Vec2,
    window_title: &str,
    width: u32,
    height: u32,
) -> Result<(), anyhow::Error> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App {
        state: AppState::Pending {
            scene,
            overlay,
            view_center,
            title: window_title.to_owned(),
            width,
            height,
        },
        init_failed: false,
    };

    event_loop.run_app(&mut app)?;

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize overlay window (see logs for details)"
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state machine
// ---------------------------------------------------------------------------

/// Winit 0.30 requires window creation inside `resumed`, so the app runs a
/// two-phase state machine: `Pending` before the window exists, `Running`
/// once window and renderer are initialized.
enum AppState {
    Pending {
        scene: Scene,
        overlay: HitboxRenderer,
        view_center: Vec2,
        title: String,
        width: u32,
        height: u32,
    },
    Running {
        scene: Scene,
        overlay: HitboxRenderer,
        view_center: Vec2,
        renderer: LineRenderer,
        batch: LineBatch,
    },
    /// Temporary placeholder used during state transitions.
    Transitioning,
}

struct App {
    state: AppState,
    /// Set when window or renderer init fails, so `run_windowed` can return
    /// an error after the event loop exits.
    init_failed: bool,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let state = std::mem::replace(&mut self.state, AppState::Transitioning);
        match state {
            AppState::Pending {
                scene,
                overlay,
                view_center,
                title,
                width,
                height,
            } => {
                let window_attrs = WindowAttributes::default()
                    .with_title(title)
                    .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

                match event_loop.create_window(window_attrs) {
                    Ok(window) => {
                        let window = Arc::new(window);
                        match pollster::block_on(LineRenderer::new(window.clone())) {
                            Ok(renderer) => {
                                tracing::info!(width, height, "overlay window created");
                                window.request_redraw();
                                self.state = AppState::Running {
                                    scene,
                                    overlay,
                                    view_center,
                                    renderer,
                                    batch: LineBatch::new(),
                                };
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to initialize line renderer -- exiting");
                                self.init_failed = true;
                                event_loop.exit();
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create window -- exiting");
                        self.init_failed = true;
                        event_loop.exit();
                    }
                }
            }
            running @ AppState::Running { .. } => {
                self.state = running;
            }
            AppState::Transitioning => {
                tracing::warn!("resumed called during state transition");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running {
            scene,
            overlay,
            view_center,
            renderer,
            batch,
        } = &mut self.state
        else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested -- shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                let (width, height) = renderer.surface_size();
                let camera = OrthoCamera::pixel_perfect(*view_center, width, height);

                batch.clear();
                overlay.draw_all(scene, &camera, batch);

                match renderer.render(batch) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = renderer.window().inner_size();
                        renderer.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory -- exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "surface error during render");
                    }
                }

                renderer.window().request_redraw();
            }
            _ => {}
        }
    }
}
