//! Interactive overlay demo -- a fixed scene with one of every shape kind.
//!
//! Run with:
//!   cargo run --example overlay_visual --features renderer -p hitbox-overlay
//!
//! Controls:
//!   Space -- toggle the overlay
//!   R -- rescan the scene
//!   N -- spawn another enemy and register its subtree
//!   Escape -- quit

use std::sync::Arc;

use hitbox_overlay::gpu::{LineBatch, LineRenderer};
use hitbox_overlay::prelude::*;
use hitbox_world::prelude::*;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

// ---------------------------------------------------------------------------
// Scene construction
// ---------------------------------------------------------------------------

/// Build a fixed scene exercising every shape kind and most categories.
fn build_scene() -> Scene {
    let mut scene = Scene::new();

    // Terrain: a composite border with a floating island.
    let terrain = scene.spawn_root();
    scene
        .attach_shape(
            terrain,
            Vec2::zero(),
            ShapeKind::Composite {
                paths: vec![
                    vec![
                        Vec2::new(-350.0, -250.0),
                        Vec2::new(350.0, -250.0),
                        Vec2::new(350.0, -200.0),
                        Vec2::new(-350.0, -200.0),
                    ],
                    vec![
                        Vec2::new(-80.0, -40.0),
                        Vec2::new(80.0, -40.0),
                        Vec2::new(80.0, -10.0),
                        Vec2::new(-80.0, -10.0),
                    ],
                ],
            },
        )
        .expect("terrain shape");

    // Player: a vertical capsule standing on the floor.
    let player = scene.spawn_root();
    scene
        .grant(player, Capabilities::PLAYER)
        .expect("player caps");
    scene
        .set_transform(player, Transform2D::from_translation(Vec2::new(-200.0, -160.0)))
        .expect("player transform");
    scene
        .attach_shape(
            player,
            Vec2::zero(),
            ShapeKind::Capsule {
                size: Vec2::new(30.0, 80.0),
                orientation: CapsuleOrientation::Vertical,
            },
        )
        .expect("player shape");

    // Enemies: a circle and a horizontal capsule.
    spawn_enemy(&mut scene, Vec2::new(120.0, -170.0));
    let crawler = scene.spawn_root();
    scene.grant(crawler, Capabilities::ENEMY).expect("crawler caps");
    scene
        .set_transform(crawler, Transform2D::from_translation(Vec2::new(240.0, -180.0)))
        .expect("crawler transform");
    scene
        .attach_shape(
            crawler,
            Vec2::zero(),
            ShapeKind::Capsule {
                size: Vec2::new(70.0, 28.0),
                orientation: CapsuleOrientation::Horizontal,
            },
        )
        .expect("crawler shape");

    // A ladder up to the island.
    let ladder = scene.spawn_root();
    scene.grant(ladder, Capabilities::LADDER).expect("ladder caps");
    scene
        .set_transform(ladder, Transform2D::from_translation(Vec2::new(-60.0, -120.0)))
        .expect("ladder transform");
    scene
        .attach_shape(
            ladder,
            Vec2::zero(),
            ShapeKind::Box {
                size: Vec2::new(20.0, 160.0),
            },
        )
        .expect("ladder shape");

    // Spikes: a damaging polygon strip.
    let spikes = scene.spawn_root();
    scene
        .grant(spikes, Capabilities::DAMAGE_TRIGGER)
        .expect("spike caps");
    scene
        .set_transform(spikes, Transform2D::from_translation(Vec2::new(0.0, -195.0)))
        .expect("spike transform");
    scene
        .attach_shape(
            spikes,
            Vec2::zero(),
            ShapeKind::Polygon {
                paths: vec![vec![
                    Vec2::new(-40.0, 0.0),
                    Vec2::new(-20.0, 25.0),
                    Vec2::new(0.0, 0.0),
                    Vec2::new(20.0, 25.0),
                    Vec2::new(40.0, 0.0),
                ]],
            },
        )
        .expect("spike shape");

    // A trigger that doubles as a camera zone.
    let gate = scene.spawn_root();
    scene
        .grant(gate, Capabilities::TRIGGER | Capabilities::CAMERA_ZONE)
        .expect("gate caps");
    scene
        .set_transform(gate, Transform2D::from_translation(Vec2::new(180.0, -60.0)))
        .expect("gate transform");
    scene
        .attach_shape(
            gate,
            Vec2::zero(),
            ShapeKind::Box {
                size: Vec2::new(120.0, 200.0),
            },
        )
        .expect("gate shape");

    // A one-way platform edge.
    let edge = scene.spawn_root();
    scene
        .grant(edge, Capabilities::TILE_INTERACTION)
        .expect("edge caps");
    scene
        .attach_shape(
            edge,
            Vec2::new(-160.0, 40.0),
            ShapeKind::EdgeChain {
                points: vec![
                    Vec2::new(-60.0, 0.0),
                    Vec2::new(-20.0, 10.0),
                    Vec2::new(20.0, 10.0),
                    Vec2::new(60.0, 0.0),
                ],
            },
        )
        .expect("edge shape");

    scene
}

/// Spawn one circular enemy at `position` and return its entity.
fn spawn_enemy(scene: &mut Scene, position: Vec2) -> EntityId {
    let enemy = scene.spawn_root();
    scene.grant(enemy, Capabilities::ENEMY).expect("enemy caps");
    scene
        .set_transform(enemy, Transform2D::from_translation(position))
        .expect("enemy transform");
    scene
        .attach_shape(enemy, Vec2::zero(), ShapeKind::Circle { radius: 18.0 })
        .expect("enemy shape");
    enemy
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

enum RenderState {
    Pending,
    Running { renderer: LineRenderer, batch: LineBatch },
}

struct OverlayApp {
    scene: Scene,
    overlay: HitboxRenderer,
    render_state: RenderState,
    spawned: u32,
}

impl ApplicationHandler for OverlayApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self.render_state, RenderState::Running { .. }) {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Hitbox Overlay -- Space toggle, R rescan, N spawn, ESC quit")
            .with_inner_size(winit::dpi::PhysicalSize::new(800u32, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                match pollster::block_on(LineRenderer::new(window.clone())) {
                    Ok(renderer) => {
                        window.request_redraw();
                        self.render_state = RenderState::Running {
                            renderer,
                            batch: LineBatch::new(),
                        };
                    }
                    Err(e) => {
                        eprintln!("renderer init failed: {e}");
                        event_loop.exit();
                    }
                }
            }
            Err(e) => {
                eprintln!("window creation failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let RenderState::Running { renderer, batch } = &mut self.render_state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => renderer.resize(new_size),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::Space) => {
                        let enabled = self.overlay.toggle();
                        tracing::info!(enabled, "overlay toggled");
                        if enabled {
                            self.overlay.search_hitboxes(&self.scene);
                        }
                    }
                    PhysicalKey::Code(KeyCode::KeyR) => {
                        self.overlay.search_hitboxes(&self.scene);
                        tracing::info!(
                            registered = self.overlay.registry().total_len(),
                            "rescanned scene"
                        );
                    }
                    PhysicalKey::Code(KeyCode::KeyN) => {
                        let x = -300.0 + 60.0 * self.spawned as f32;
                        let enemy = spawn_enemy(&mut self.scene, Vec2::new(x, 120.0));
                        self.overlay.update_hitbox(&self.scene, enemy);
                        self.spawned += 1;
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let (width, height) = renderer.surface_size();
                let camera = OrthoCamera::pixel_perfect(Vec2::zero(), width, height);

                batch.clear();
                self.overlay.draw_all(&self.scene, &camera, batch);

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
                    Err(e) => tracing::warn!(error = %e, "surface error during render"),
                }

                renderer.window().request_redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let scene = build_scene();
    let mut overlay = HitboxRenderer::new(OverlayConfig {
        start_enabled: true,
        ..Default::default()
    });
    overlay.search_hitboxes(&scene);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = OverlayApp {
        scene,
        overlay,
        render_state: RenderState::Pending,
        spawned: 0,
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
