use std::fmt;
use std::path::PathBuf;

/// Failures surfaced by the render/sample engine.
///
/// Every failure is reported to the caller as a result; nothing aborts the
/// process. A `ShaderBuild` error during engine construction is fatal to the
/// session, since no rendering is possible without the quad program.
#[derive(Debug)]
pub enum PickerError {
    /// No file exists at the requested path. Nothing was mutated.
    NotFound(PathBuf),
    /// The file could not be decoded, or its pixel layout is unsupported.
    Decode(String),
    /// Shader compilation or pipeline linking failed; carries the log.
    ShaderBuild(String),
    /// A zero-sized target was requested, or a coordinate fell outside it.
    InvalidDimensions(String),
    /// The engine was terminated; no further operations are possible.
    Terminated,
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::NotFound(path) => {
                write!(f, "no image file at {}", path.display())
            }
            PickerError::Decode(msg) => write!(f, "failed to decode image: {msg}"),
            PickerError::ShaderBuild(log) => write!(f, "failed to build quad shader: {log}"),
            PickerError::InvalidDimensions(msg) => write!(f, "invalid dimensions: {msg}"),
            PickerError::Terminated => write!(f, "engine has been terminated"),
        }
    }
}

impl std::error::Error for PickerError {}

impl From<image::ImageError> for PickerError {
    fn from(err: image::ImageError) -> Self {
        PickerError::Decode(err.to_string())
    }
}
