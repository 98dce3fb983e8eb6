#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Vertex {
    pub position: [f32; 3],   // x, y, z coordinates
    pub tex_coords: [f32; 2], // u, v texture coordinates
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub transform: [[f32; 4]; 4], // 4x4 matrix, column-major
}

impl TransformUniform {
    pub fn identity() -> Self {
        Self {
            transform: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Orthographic projection mapping the box `[left, right] x [bottom, top]
    /// x [near, far]` onto normalized device coordinates.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let sx = 2.0 / (right - left);
        let sy = 2.0 / (top - bottom);
        let sz = -2.0 / (far - near);
        let tx = -(right + left) / (right - left);
        let ty = -(top + bottom) / (top - bottom);
        let tz = -(far + near) / (far - near);

        Self {
            transform: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [tx, ty, tz, 1.0],
            ],
        }
    }

    /// Applies the transform to a point (w assumed 1).
    pub fn apply(&self, point: [f32; 3]) -> [f32; 3] {
        let m = &self.transform;
        let v = [point[0], point[1], point[2], 1.0];
        let mut out = [0.0f32; 3];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row] * v[3];
        }
        out
    }
}

/// A color with each channel normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            r: bytes[0] as f32 / 255.0,
            g: bytes[1] as f32 / 255.0,
            b: bytes[2] as f32 / 255.0,
            a: bytes[3] as f32 / 255.0,
        }
    }
}

/// World-space bounds of the image quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadExtents {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

/// Bounds that make the image fill the target while keeping its aspect
/// ratio, inside a projection spanning `[-aspect_ratio, aspect_ratio]`
/// horizontally and `[-1, 1]` vertically.
pub fn quad_extents(aspect_ratio: f32, image_width: u32, image_height: u32) -> QuadExtents {
    if image_width > image_height {
        QuadExtents {
            left: -aspect_ratio,
            right: aspect_ratio,
            bottom: -1.0,
            top: 1.0,
        }
    } else {
        // TODO: scale the horizontal extent by width / height here so tall
        // images are pillarboxed instead of stretched to the full width.
        QuadExtents {
            left: -aspect_ratio,
            right: aspect_ratio,
            bottom: -1.0,
            top: 1.0,
        }
    }
}

/// The quad's four vertices with their fixed texture coordinates. Positions
/// start at the origin and are rewritten before every draw.
pub fn initial_quad_vertices() -> [Vertex; 4] {
    [
        Vertex {
            position: [0.0, 0.0, 0.0],
            tex_coords: [0.0, 0.0],
        },
        Vertex {
            position: [0.0, 0.0, 0.0],
            tex_coords: [1.0, 0.0],
        },
        Vertex {
            position: [0.0, 0.0, 0.0],
            tex_coords: [1.0, 1.0],
        },
        Vertex {
            position: [0.0, 0.0, 0.0],
            tex_coords: [0.0, 1.0],
        },
    ]
}

/// Index pattern drawing the quad as two triangles.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];
