//! The offscreen color target the image quad is drawn into, later displayed
//! (or read back) as a texture.

use crate::utils::Rgba;

/// Format of the offscreen color attachment. Plain (non-sRGB) so readback
/// bytes match what the shader wrote, within 1/255 quantization.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const ROW_ALIGNMENT: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

pub struct OffscreenTarget {
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl OffscreenTarget {
    /// Allocates a color attachment of the given size. Dimensions must be
    /// non-zero (validated by the engine before calling).
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            width,
            height,
            texture,
            view,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The color attachment, for drawing into or displaying.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Reads the texel at `(x, y)` in target space, origin at the bottom
    /// left. Coordinates must be inside `[0, width) x [0, height)`; the
    /// engine checks this before calling.
    pub fn read_pixel(&self, device: &wgpu::Device, queue: &wgpu::Queue, x: u32, y: u32) -> Rgba {
        // Texture rows run top-down; target space runs bottom-up.
        let row = self.height - 1 - y;

        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pixel readback"),
            size: 4,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("pixel readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y: row, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    // single-row copies need no row alignment
                    bytes_per_row: None,
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        let bytes: [u8; 4] = Self::map_and_read(device, &output)[..4]
            .try_into()
            .expect("readback buffer holds one texel");
        Rgba::from_bytes(bytes)
    }

    /// Reads the whole target back as tightly packed RGBA rows, top row
    /// first (texture order).
    pub fn read_back_rgba(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Vec<u8> {
        let bytes_per_row = (self.width * 4).div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT;
        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("target readback"),
            size: (bytes_per_row as u64) * (self.height as u64),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("target readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        let padded = Self::map_and_read(device, &output);
        let mut rgba = Vec::with_capacity((self.width * self.height * 4) as usize);
        for row in padded.chunks(bytes_per_row as usize) {
            rgba.extend_from_slice(&row[..(self.width * 4) as usize]);
        }
        rgba
    }

    /// Blocks until `buffer` is mapped and returns a copy of its contents.
    fn map_and_read(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Vec<u8> {
        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            tx.send(r).ok();
        });
        device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .expect("map_async callback dropped")
            .expect("failed to map readback buffer");

        let data = slice.get_mapped_range().to_vec();
        buffer.unmap();
        data
    }
}
