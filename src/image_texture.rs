use std::path::Path;

use crate::error::PickerError;

/// A decoded image held in CPU memory, flipped so that row 0 is the visual
/// bottom (matching the renderer's bottom-left-origin coordinate system).
#[derive(Debug)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: image::RgbaImage,
}

impl DecodedImage {
    /// Decodes the file at `path`. Only 3- and 4-channel pixel layouts are
    /// accepted; 3-channel images are expanded to RGBA for upload since wgpu
    /// has no 24-bit texture format. Does not check that the file exists —
    /// the caller does that first.
    pub fn open(path: &Path) -> Result<Self, PickerError> {
        let decoded = image::open(path)?;

        let channels = decoded.color().channel_count();
        if channels != 3 && channels != 4 {
            return Err(PickerError::Decode(format!(
                "unsupported channel count {channels} in {} (expected 3 or 4)",
                path.display()
            )));
        }

        let pixels = decoded.flipv().to_rgba8();
        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, bottom row first.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

/// One GPU-resident image: the texture, its linear sampler and the bind
/// group the quad pipeline samples it through. Dropping it releases the
/// texture; the engine keeps at most one alive.
pub struct ImageTexture {
    width: u32,
    height: u32,
    bind_group: wgpu::BindGroup,
}

impl ImageTexture {
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        path: &Path,
    ) -> Result<Self, PickerError> {
        let decoded = DecodedImage::open(path)?;
        log::debug!(
            "loaded {} ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );
        Ok(Self::upload(device, queue, layout, &decoded))
    }

    /// Uploads the decoded pixels into a freshly allocated texture.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        decoded: &DecodedImage,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: decoded.width(),
            height: decoded.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            decoded.pixels(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * decoded.width()),
                rows_per_image: Some(decoded.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Self::create_sampler(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("image_bind_group"),
        });

        Self {
            width: decoded.width(),
            height: decoded.height(),
            bind_group,
        }
    }

    /// Creates the linear min/mag sampler the image is filtered with.
    fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
