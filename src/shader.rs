//! Quad shader loading: one text asset holds both stages, split on `#type`
//! directives, each stage beginning at its own `#version` line.

use std::borrow::Cow;

use crate::error::PickerError;
use crate::utils::Vertex;

const TYPE_TOKEN: &str = "#type";
const VERSION_TOKEN: &str = "#version";

/// The two GLSL stage sources split out of a single shader asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStages {
    pub vertex: String,
    pub fragment: String,
}

/// Slot for a stage-type word. `pixel` is accepted as a fragment synonym;
/// matching is case-insensitive.
fn stage_slot(word: &str) -> Result<usize, PickerError> {
    if word.eq_ignore_ascii_case("vertex") {
        Ok(0)
    } else if word.eq_ignore_ascii_case("fragment") || word.eq_ignore_ascii_case("pixel") {
        Ok(1)
    } else {
        Err(PickerError::ShaderBuild(format!(
            "invalid shader type `{word}`"
        )))
    }
}

/// Splits a two-stage shader asset into its vertex and fragment sources.
///
/// Each stage is introduced by a `#type <vertex|fragment>` line and its
/// source runs from the following `#version` directive to the next `#type`
/// token (or the end of the file). Exactly one stage of each kind must be
/// present.
pub fn split_stage_sources(source: &str) -> Result<ShaderStages, PickerError> {
    let mut stages: [Option<String>; 2] = [None, None];

    let mut pos = source.find(TYPE_TOKEN);
    while let Some(token_at) = pos {
        let after_token = token_at + TYPE_TOKEN.len();
        let rest = &source[after_token..];

        let word_start = rest
            .find(|c: char| !c.is_whitespace())
            .ok_or_else(|| PickerError::ShaderBuild("missing type after #type".into()))?;
        let word_rest = &rest[word_start..];
        let word_len = word_rest
            .find(char::is_whitespace)
            .unwrap_or(word_rest.len());
        let slot = stage_slot(&word_rest[..word_len])?;

        let body_search_from = after_token + word_start + word_len;
        let stage_start = source[body_search_from..]
            .find(VERSION_TOKEN)
            .map(|i| i + body_search_from)
            .ok_or_else(|| {
                PickerError::ShaderBuild("stage source must start with a #version directive".into())
            })?;

        pos = source[stage_start..]
            .find(TYPE_TOKEN)
            .map(|i| i + stage_start);
        let stage_end = pos.unwrap_or(source.len());

        if stages[slot].is_some() {
            return Err(PickerError::ShaderBuild(format!(
                "duplicate {} stage in shader asset",
                if slot == 0 { "vertex" } else { "fragment" }
            )));
        }
        stages[slot] = Some(source[stage_start..stage_end].trim_end().to_string());
    }

    let [vertex, fragment] = stages;
    match (vertex, fragment) {
        (Some(vertex), Some(fragment)) => Ok(ShaderStages { vertex, fragment }),
        _ => Err(PickerError::ShaderBuild(
            "shader asset must contain one vertex and one fragment stage".into(),
        )),
    }
}

/// Compiles one GLSL stage, surfacing the compiler log on failure. The
/// failed module is released by the error scope; nothing leaks.
fn compile_stage(
    device: &wgpu::Device,
    source: &str,
    stage: wgpu::naga::ShaderStage,
    label: &str,
) -> Result<wgpu::ShaderModule, PickerError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: Default::default(),
        },
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(PickerError::ShaderBuild(format!("{label}: {err}"))),
        None => Ok(module),
    }
}

/// Builds the quad render pipeline from a split shader asset.
pub fn build_quad_pipeline(
    device: &wgpu::Device,
    stages: &ShaderStages,
    projection_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
    target_format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, PickerError> {
    let vertex = compile_stage(
        device,
        &stages.vertex,
        wgpu::naga::ShaderStage::Vertex,
        "quad vertex stage",
    )?;
    let fragment = compile_stage(
        device,
        &stages.fragment,
        wgpu::naga::ShaderStage::Fragment,
        "quad fragment stage",
    )?;

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quad pipeline layout"),
        bind_group_layouts: &[projection_layout, texture_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quad pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: Some("main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(PickerError::ShaderBuild(format!(
            "failed to link quad pipeline: {err}"
        ))),
        None => Ok(pipeline),
    }
}
