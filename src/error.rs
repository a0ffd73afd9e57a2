use thiserror::Error;

/// Errors raised around the rasterization core: startup, asset loading and output.
///
/// The pipeline itself never fails; bad triangles and pixels are discarded silently.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid framebuffer dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("config error: {0}")]
    Config(String),

    #[error("window error: {0}")]
    Window(String),
}

impl From<toml::de::Error> for RasterError {
    fn from(e: toml::de::Error) -> Self {
        RasterError::Config(e.to_string())
    }
}

impl From<minifb::Error> for RasterError {
    fn from(e: minifb::Error) -> Self {
        RasterError::Window(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RasterError>;
