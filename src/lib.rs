//! Renders one image onto a GPU quad inside an offscreen target and samples
//! exact pixel colors back out of it.

pub mod error;
pub mod image_texture;
pub mod offscreen;
pub mod shader;
pub mod utils;

use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

pub use error::PickerError;
pub use image_texture::{DecodedImage, ImageTexture};
pub use offscreen::OffscreenTarget;
pub use utils::{quad_extents, Rgba, TransformUniform, Vertex};

/// Bind group slot the image texture is sampled through (the port of the
/// original's texture-unit uniform).
const IMAGE_BIND_GROUP: u32 = 1;

/// Engine construction parameters.
pub struct RendererConfig {
    /// The two-stage quad shader asset.
    pub shader_path: PathBuf,
    /// Initial offscreen target size; replaced on the first differing
    /// render request.
    pub target_width: u32,
    pub target_height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shader_path: PathBuf::from("assets/shaders/quad.glsl"),
            target_width: 1200,
            target_height: 800,
        }
    }
}

struct EngineState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertices: [Vertex; 4],
    target: OffscreenTarget,
    image: Option<ImageTexture>,
    current_path: PathBuf,
}

/// The render/sample engine.
///
/// Owns every GPU resource it touches: the quad buffers, the shader
/// pipeline, the offscreen target and the one resident image. All
/// operations run synchronously on the calling thread, which must be the
/// thread that owns the device. After [`terminate`](Self::terminate) every
/// operation fails with [`PickerError::Terminated`].
pub struct PickerEngine {
    state: Option<EngineState>,
}

impl PickerEngine {
    /// Builds the engine: quad vertex/index buffers, the quad shader
    /// pipeline from the configured asset, and an offscreen target at the
    /// configured initial size. A shader build failure here is fatal to the
    /// session.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: RendererConfig,
    ) -> Result<Self, PickerError> {
        let vertices = utils::initial_quad_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertex buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad index buffer"),
            contents: bytemuck::cast_slice(&utils::QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let projection_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("projection_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<TransformUniform>() as _,
                        ),
                    },
                    count: None,
                }],
            });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("image_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection uniform buffer"),
            contents: bytemuck::bytes_of(&TransformUniform::identity()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
            label: Some("projection_bind_group"),
        });

        let shader_source = std::fs::read_to_string(&config.shader_path).map_err(|err| {
            PickerError::ShaderBuild(format!(
                "could not read {}: {err}",
                config.shader_path.display()
            ))
        })?;
        let stages = shader::split_stage_sources(&shader_source)?;
        let pipeline = shader::build_quad_pipeline(
            &device,
            &stages,
            &projection_layout,
            &texture_layout,
            offscreen::TARGET_FORMAT,
        )?;

        let target = OffscreenTarget::new(&device, config.target_width, config.target_height);
        log::debug!(
            "engine ready, initial target {}x{}",
            config.target_width,
            config.target_height
        );

        Ok(Self {
            state: Some(EngineState {
                device,
                queue,
                pipeline,
                texture_layout,
                projection_buffer,
                projection_bind_group,
                vertex_buffer,
                index_buffer,
                vertices,
                target,
                image: None,
                current_path: PathBuf::new(),
            }),
        })
    }

    /// Draws the image at `path` into a `width` x `height` offscreen target
    /// and returns its color attachment for display.
    ///
    /// Repeating the previous path and size is a cache hit: the existing
    /// attachment is returned without any decode or draw work. The target
    /// is recreated only when the requested size changes. On a decode
    /// failure the target may already have been resized, but no image is
    /// bound and the path is not recorded as current, so the next identical
    /// request retries.
    pub fn render_image(
        &mut self,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<&wgpu::TextureView, PickerError> {
        let state = self.state.as_mut().ok_or(PickerError::Terminated)?;

        if !path.exists() {
            return Err(PickerError::NotFound(path.to_path_buf()));
        }
        if width == 0 || height == 0 {
            return Err(PickerError::InvalidDimensions(format!(
                "zero-sized render target requested ({width}x{height})"
            )));
        }

        if path == state.current_path
            && width == state.target.width()
            && height == state.target.height()
        {
            return Ok(state.target.view());
        }

        if width != state.target.width() || height != state.target.height() {
            state.target = OffscreenTarget::new(&state.device, width, height);
            log::debug!("offscreen target resized to {width}x{height}");
        }

        let aspect_ratio = width as f32 / height as f32;
        let projection =
            TransformUniform::orthographic(-aspect_ratio, aspect_ratio, -1.0, 1.0, -1.0, 1.0);
        state
            .queue
            .write_buffer(&state.projection_buffer, 0, bytemuck::bytes_of(&projection));

        // Release the previous image before loading its replacement; at
        // most one image is ever resident.
        state.image.take();
        let image =
            ImageTexture::from_path(&state.device, &state.queue, &state.texture_layout, path)?;

        let extents = quad_extents(aspect_ratio, image.width(), image.height());
        state.vertices[0].position = [extents.left, extents.bottom, 0.0];
        state.vertices[1].position = [extents.right, extents.bottom, 0.0];
        state.vertices[2].position = [extents.right, extents.top, 0.0];
        state.vertices[3].position = [extents.left, extents.top, 0.0];
        state
            .queue
            .write_buffer(&state.vertex_buffer, 0, bytemuck::cast_slice(&state.vertices));

        let mut encoder = state
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: state.target.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&state.pipeline);
            rpass.set_bind_group(0, &state.projection_bind_group, &[]);
            rpass.set_bind_group(IMAGE_BIND_GROUP, image.bind_group(), &[]);
            rpass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
            rpass.set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..utils::QUAD_INDICES.len() as u32, 0, 0..1);
        }
        state.queue.submit(Some(encoder.finish()));

        state.image = Some(image);
        state.current_path = path.to_path_buf();
        Ok(state.target.view())
    }

    /// Samples the target texel at `(x, y)`, origin bottom left, returning
    /// each 8-bit channel normalized to `[0, 1]`.
    pub fn read_pixel(&self, x: u32, y: u32) -> Result<Rgba, PickerError> {
        let state = self.state.as_ref().ok_or(PickerError::Terminated)?;
        if x >= state.target.width() || y >= state.target.height() {
            return Err(PickerError::InvalidDimensions(format!(
                "pixel ({x}, {y}) outside the {}x{} target",
                state.target.width(),
                state.target.height()
            )));
        }
        Ok(state
            .target
            .read_pixel(&state.device, &state.queue, x, y))
    }

    /// Dimensions of the current offscreen target.
    pub fn target_size(&self) -> Result<(u32, u32), PickerError> {
        let state = self.state.as_ref().ok_or(PickerError::Terminated)?;
        Ok((state.target.width(), state.target.height()))
    }

    /// Dimensions of the resident image, if one is loaded.
    pub fn image_size(&self) -> Result<Option<(u32, u32)>, PickerError> {
        let state = self.state.as_ref().ok_or(PickerError::Terminated)?;
        Ok(state.image.as_ref().map(|img| (img.width(), img.height())))
    }

    /// Writes the current target contents to a PNG file.
    pub fn save_target_png(&self, path: &Path) -> Result<(), String> {
        let state = self.state.as_ref().ok_or("engine has been terminated")?;
        let rgba = state.target.read_back_rgba(&state.device, &state.queue);
        let img =
            image::RgbaImage::from_raw(state.target.width(), state.target.height(), rgba)
                .ok_or("readback size mismatch")?;
        img.save(path).map_err(|e| e.to_string())
    }

    /// Releases the image, the target, the pipeline and the quad buffers.
    /// Safe to call more than once.
    pub fn terminate(&mut self) {
        if self.state.take().is_some() {
            log::debug!("engine terminated");
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_none()
    }
}
