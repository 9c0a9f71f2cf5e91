//! Line batching and the wgpu line-list pipeline.
//!
//! [`LineBatch`] is the CPU side: a [`DrawSurface`] that turns lines, arcs,
//! and circles into colored line-segment vertices in screen-pixel
//! coordinates. [`LineRenderer`] is the GPU side: it uploads a batch and
//! draws it with a `LineList` pipeline whose shader maps pixel coordinates
//! to clip space via a viewport uniform.
//!
//! The batch is rebuilt from scratch every frame, matching the overlay's
//! recompute-everything model; nothing persists between frames but the
//! buffers' allocations.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::draw::{ArcHalf, DrawError, DrawStyle, DrawSurface};
use crate::project::ScreenPoint;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A single vertex with screen-pixel position and RGBA color.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout for the shader.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Viewport size uniform; padded to 16 bytes for WGSL layout rules.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

/// Maximum line segments per frame (determines vertex buffer size).
/// Generous for an overlay: even dense terrain stays well under this.
const MAX_SEGMENTS_PER_FRAME: usize = 65_536;
const VERTICES_PER_SEGMENT: usize = 2;
const MAX_VERTICES: usize = MAX_SEGMENTS_PER_FRAME * VERTICES_PER_SEGMENT;

// ---------------------------------------------------------------------------
// LineBatch
// ---------------------------------------------------------------------------

/// CPU-side accumulation of one frame's overlay lines.
///
/// Arcs and circles tessellate here with the segment counts the overlay
/// chose. Line width and the depth flag are accepted for surface parity but
/// this backend draws one-pixel lines on top of whatever is already in the
/// frame.
#[derive(Debug, Default)]
pub struct LineBatch {
    vertices: Vec<Vertex>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated vertices, two per line segment.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of accumulated line segments.
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_SEGMENT
    }

    /// Discard accumulated vertices, keeping the allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    fn push_segment(&mut self, a: [f32; 2], b: [f32; 2], color: [f32; 4]) {
        self.vertices.push(Vertex { position: a, color });
        self.vertices.push(Vertex { position: b, color });
    }

    /// Tessellate an arc of `sweep` radians starting at `start`, in screen
    /// coordinates (y down, so positive angles run counter-clockwise on
    /// screen).
    fn push_arc(
        &mut self,
        center: ScreenPoint,
        radius: i32,
        start: f32,
        sweep: f32,
        segments: u32,
        color: [f32; 4],
    ) {
        let segments = segments.max(1);
        let point_at = |theta: f32| {
            [
                center.x as f32 + radius as f32 * theta.cos(),
                center.y as f32 - radius as f32 * theta.sin(),
            ]
        };
        let mut prev = point_at(start);
        for i in 1..=segments {
            let theta = start + sweep * (i as f32 / segments as f32);
            let next = point_at(theta);
            self.push_segment(prev, next, color);
            prev = next;
        }
    }
}

impl DrawSurface for LineBatch {
    fn line(&mut self, a: ScreenPoint, b: ScreenPoint, style: DrawStyle) -> Result<(), DrawError> {
        self.push_segment(
            [a.x as f32, a.y as f32],
            [b.x as f32, b.y as f32],
            style.color,
        );
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
        use std::f32::consts::PI;
        let start = match half {
            ArcHalf::Upper => 0.0,
            ArcHalf::Lower => PI,
            ArcHalf::Right => -PI / 2.0,
            ArcHalf::Left => PI / 2.0,
        };
        self.push_arc(center, radius, start, PI, segments, style.color);
        Ok(())
    }

    fn circle(
        &mut self,
        center: ScreenPoint,
        radius: i32,
        segments: u32,
        style: DrawStyle,
    ) -> Result<(), DrawError> {
        self.push_arc(
            center,
            radius,
            0.0,
            2.0 * std::f32::consts::PI,
            segments,
            style.color,
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LineRenderer
// ---------------------------------------------------------------------------

/// wgpu renderer that draws a [`LineBatch`] over a window surface.
///
/// # GPU Initialization
///
/// Call [`LineRenderer::new`] with an `Arc<winit::window::Window>`. This
/// performs async wgpu adapter/device selection, surface creation, and
/// pipeline setup. If no suitable GPU is available the error is returned and
/// the host can fall back to a headless surface.
pub struct LineRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    window: Arc<winit::window::Window>,
}

impl LineRenderer {
    /// Initialize wgpu: surface, device, queue, pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("hitbox_overlay_renderer"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader_source = include_str!("shaders.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("overlay_line_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let viewport = ViewportUniform {
            size: [width as f32, height as f32],
            _pad: [0.0, 0.0],
        };
        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("viewport_uniform"),
            contents: bytemuck::cast_slice(&[viewport]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("viewport_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("viewport_bind_group"),
            layout: &viewport_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("overlay_line_pipeline_layout"),
            bind_group_layouts: &[&viewport_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("overlay_line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("overlay_vertex_buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            viewport_buffer,
            viewport_bind_group,
            window,
        })
    }

    /// Render one frame from the accumulated batch.
    ///
    /// Uploads the viewport uniform and batch vertices, clears to a dark
    /// background, and issues a single line-list draw.
    ///
    /// # Errors
    ///
    /// Returns a [`wgpu::SurfaceError`] if the surface cannot provide an
    /// output texture (e.g., window minimized, surface lost).
    pub fn render(&mut self, batch: &LineBatch) -> Result<(), wgpu::SurfaceError> {
        let viewport = ViewportUniform {
            size: [self.config.width as f32, self.config.height as f32],
            _pad: [0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.viewport_buffer, 0, bytemuck::cast_slice(&[viewport]));

        let vertices = batch.vertices();
        let vertices = &vertices[..vertices.len().min(MAX_VERTICES)];
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_line_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_line_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let vertex_count = vertices.len() as u32;
            if vertex_count > 0 {
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Resize the surface when the window size changes.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Current surface size in pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Get a reference to the window.
    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}

// ---------------------------------------------------------------------------
// Tests (CPU-side batching only; no GPU required)
// ---------------------------------------------------------------------------
