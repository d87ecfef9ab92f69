use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use flycam_camera::{
    Camera, CameraConfig, DrawCommand, FrameDriver, FrameStatus, FrameTarget, Movement,
    TransformSet, DEFAULT_MODEL_SCALE,
};
use flycam_mesh::{Vertex, VertexBuffer};
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

mod resources;
mod shader;

pub use resources::{embedded_model, load_model};
pub use shader::{ShaderError, BUILTIN_SHADER};

// This is needed because wgpu uses Direct-X style coordinates while cgmath uses
// OpenGL style coordinates.
//
// This matrix simply transforms the coordinates used by cgmath into the ones
// that wgpu need.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub const MODEL_UNIFORM_BINDING: u32 = 0;
pub const VIEW_UNIFORM_BINDING: u32 = 1;
pub const PROJECTION_UNIFORM_BINDING: u32 = 2;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    /// Model to display, the embedded one when `None`.
    pub model: Option<PathBuf>,
    /// WGSL file replacing the built-in shader. Reloaded with `R`.
    pub shader: Option<PathBuf>,
    pub model_scale: f32,
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "flycam".to_string(),
            model: None,
            shader: None,
            model_scale: DEFAULT_MODEL_SCALE,
            camera: CameraConfig::default(),
        }
    }
}

trait BufferExt {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl BufferExt for Vertex {
    /// Describes the layout of the vertex buffer.
    ///
    /// Position and normal are interleaved, 3 floats each.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

// We need this for Rust to store our data correctly for the shaders
#[repr(C)]
// This is so we can store this in a buffer
#[derive(Debug, Copy, Clone, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct MatrixUniform {
    // We can't use cgmath with bytemuck directly so we'll have
    // to convert the Matrix4 into a 4x4 f32 array
    matrix: [[f32; 4]; 4],
}

impl MatrixUniform {
    fn new(matrix: cgmath::Matrix4<f32>) -> Self {
        Self {
            matrix: matrix.into(),
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("{0} matrix has non-finite values")]
    NonFinite(&'static str),
}

fn is_finite(m: &cgmath::Matrix4<f32>) -> bool {
    let values: &[f32; 16] = m.as_ref();
    values.iter().all(|v| v.is_finite())
}

/// The matrices as they are written to the GPU.
///
/// Nothing is returned unless all three are usable, so a bad frame never
/// leaves the GPU with a mix of old and new matrices.
fn gpu_matrices(transforms: &TransformSet) -> Result<[MatrixUniform; 3], UploadError> {
    for (name, m) in [
        ("model", &transforms.model),
        ("view", &transforms.view),
        ("projection", &transforms.projection),
    ] {
        if !is_finite(m) {
            return Err(UploadError::NonFinite(name));
        }
    }
    Ok([
        MatrixUniform::new(transforms.model),
        MatrixUniform::new(transforms.view),
        MatrixUniform::new(OPENGL_TO_WGPU_MATRIX * transforms.projection),
    ])
}

/// One uniform buffer per matrix, all in bind group 0.
struct TransformUniforms {
    model: wgpu::Buffer,
    view: wgpu::Buffer,
    projection: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl TransformUniforms {
    fn new(device: &wgpu::Device, transforms: &TransformSet) -> anyhow::Result<Self> {
        let [model, view, projection] =
            gpu_matrices(transforms).context("initial transforms are unusable")?;
        let create = |label: &str, uniform: MatrixUniform| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let model = create("Model Buffer", model);
        let view = create("View Buffer", view);
        let projection = create("Projection Buffer", projection);

        let entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        // Ex:
        //     @group(0) @binding(1)
        //     var<uniform> u_view: Matrix;
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                entry(MODEL_UNIFORM_BINDING),
                entry(VIEW_UNIFORM_BINDING),
                entry(PROJECTION_UNIFORM_BINDING),
            ],
            label: Some("transform_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: MODEL_UNIFORM_BINDING,
                    resource: model.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: VIEW_UNIFORM_BINDING,
                    resource: view.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: PROJECTION_UNIFORM_BINDING,
                    resource: projection.as_entire_binding(),
                },
            ],
            label: Some("transform_bind_group"),
        });
        Ok(Self {
            model,
            view,
            projection,
            bind_group_layout,
            bind_group,
        })
    }

    fn write(&self, queue: &wgpu::Queue, transforms: &TransformSet) -> Result<(), UploadError> {
        let [model, view, projection] = gpu_matrices(transforms)?;
        queue.write_buffer(&self.model, 0, bytemuck::cast_slice(&[model]));
        queue.write_buffer(&self.view, 0, bytemuck::cast_slice(&[view]));
        queue.write_buffer(&self.projection, 0, bytemuck::cast_slice(&[projection]));
        Ok(())
    }
}

/// A frame being recorded: the [`FrameTarget`] the frame driver talks to.
struct GpuFrame<'a> {
    queue: &'a wgpu::Queue,
    uniforms: &'a TransformUniforms,
    render_pass: wgpu::RenderPass<'a>,
}

impl FrameTarget for GpuFrame<'_> {
    type Error = UploadError;

    fn upload_transforms(&mut self, transforms: &TransformSet) -> Result<(), UploadError> {
        self.uniforms.write(self.queue, transforms)
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), UploadError> {
        self.render_pass.draw(command.vertices(), 0..1);
        Ok(())
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn movement_for_key(keycode: VirtualKeyCode) -> Option<Movement> {
    match keycode {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(Movement::Forward),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(Movement::Backward),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(Movement::StrafeLeft),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(Movement::StrafeRight),
        _ => None,
    }
}

struct State {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Window,
    shader_path: Option<PathBuf>,
    pipeline_layout: wgpu::PipelineLayout,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniforms: TransformUniforms,
    depth_view: wgpu::TextureView,
    driver: FrameDriver,
    last_frame: Instant,
}

impl State {
    // Creating some of the wgpu types requires async code
    async fn new(
        window: Window,
        viewer: &ViewerConfig,
        mesh: &VertexBuffer,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // Backends::all => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: Default::default(),
        });

        // # Safety
        //
        // The surface needs to live as long as the window that created it.
        // State owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }
            .context("failed to create a surface for the window")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;
        log::info!("using adapter {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                    label: None,
                },
                None, // Trace path
            )
            .await
            .context("failed to open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface texture.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let vertex_count =
            u32::try_from(mesh.vertex_count()).context("model has too many vertices")?;
        let mut driver = FrameDriver::new(Camera::new(&viewer.camera), vertex_count, viewer.model_scale);
        driver.update(0.0, config.width as f32 / config.height as f32);

        let uniforms = TransformUniforms::new(&device, driver.transforms())?;
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[/* bind_group = 0 */ &uniforms.bind_group_layout],
            push_constant_ranges: &[],
        });

        let custom = viewer.shader.as_deref().map(|path| {
            shader::read_source(path).and_then(|source| {
                shader::create_pipeline(&device, &pipeline_layout, config.format, &source)
            })
        });
        let render_pipeline = match custom {
            Some(Ok(pipeline)) => pipeline,
            Some(Err(e)) => {
                log::error!("{}", e);
                log::warn!("falling back to the built-in shader");
                shader::create_pipeline(&device, &pipeline_layout, config.format, BUILTIN_SHADER)
                    .context("built-in shader failed to compile")?
            }
            None => {
                shader::create_pipeline(&device, &pipeline_layout, config.format, BUILTIN_SHADER)
                    .context("built-in shader failed to compile")?
            }
        };

        // The vertex buffer is uploaded once and never written again.
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: mesh.as_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let depth_view = create_depth_view(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            shader_path: viewer.shader.clone(),
            pipeline_layout,
            render_pipeline,
            vertex_buffer,
            uniforms,
            depth_view,
            driver,
            last_frame: Instant::now(),
        })
    }

    fn reload_shader(&mut self) {
        let path = match &self.shader_path {
            Some(path) => path,
            None => {
                log::info!("no shader file given, nothing to reload");
                return;
            }
        };
        let pipeline = shader::read_source(path).and_then(|source| {
            shader::create_pipeline(&self.device, &self.pipeline_layout, self.config.format, &source)
        });
        match pipeline {
            Ok(pipeline) => {
                log::info!("reloaded shader {}", path.display());
                self.render_pipeline = pipeline;
            }
            Err(e) => log::error!("{}; keeping the current shader", e),
        }
    }

    fn handle_window_event(&mut self, window_event: WindowEvent, control_flow: &mut ControlFlow) {
        if self.input(&window_event) {
            return;
        }
        match window_event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => match keycode {
                VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                VirtualKeyCode::R => self.reload_shader(),
                _ => {}
            },
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                // new_inner_size is &&mut so we have to dereference it twice
                self.resize(*new_inner_size);
            }
            _ => {}
        }
    }

    pub fn handle_event<T>(&mut self, event: Event<'_, T>, control_flow: &mut ControlFlow) {
        // Redraw continuously; movement depends on keys being held.
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent { event, window_id } if window_id == self.window.id() => {
                self.handle_window_event(event, control_flow)
            }
            Event::RedrawRequested(window_id) if window_id == self.window.id() => {
                match self.render() {
                    Ok(FrameStatus::Drawn) => {}
                    Ok(status) => log::debug!("frame status: {:?}", status),
                    // Reconfigure the surface if lost
                    Err(wgpu::SurfaceError::Lost) => self.resize(self.size),
                    // The system is out of memory, we should probably quit
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of memory, exiting");
                        *control_flow = ControlFlow::Exit
                    }
                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(e) => log::warn!("{:?}", e),
                }
            }
            Event::MainEventsCleared => {
                // RedrawRequested will only trigger once, unless we manually
                // request it.
                self.window.request_redraw();
            }
            _ => (),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => match movement_for_key(*keycode) {
                Some(movement) => {
                    self.driver.key(movement, *state == ElementState::Pressed);
                    true
                }
                None => false,
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.driver.pointer_moved(position.x, position.y);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.driver.pointer_left();
                true
            }
            WindowEvent::Focused(false) => {
                // Key releases are not delivered to an unfocused window.
                self.driver.release_keys();
                true
            }
            _ => false,
        }
    }

    fn render(&mut self) -> Result<FrameStatus, wgpu::SurfaceError> {
        let now = Instant::now();
        let elapsed = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        let aspect = self.config.width as f32 / self.config.height as f32;

        let status = {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.3,
                            g: 0.3,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniforms.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let mut frame = GpuFrame {
                queue: &self.queue,
                uniforms: &self.uniforms,
                render_pass,
            };
            self.driver.frame(elapsed, aspect, &mut frame)
        };

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(status)
    }
}

/// Opens a window and runs the viewer until it is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    let mesh = load_model(config.model.as_deref())?;

    let event_loop = EventLoop::new(); // Loop provided by winit for handling window events
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .build(&event_loop)
        .context("failed to create window")?;

    let mut state = pollster::block_on(State::new(window, &config, &mesh))?;

    event_loop.run(move |event, _, control_flow| {
        state.handle_event(event, control_flow);
    });
}
