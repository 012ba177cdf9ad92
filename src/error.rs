use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    InvalidCanvas { width: f32, height: f32 },
    CanvasTooSmall { width: f32, height: f32, min_width: f32, min_height: f32 },
    ZeroFireInterval,
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    /// A tuned entity size is negative or non-finite.
    Geometry { name: &'static str, source: GeometryError },
    /// A speed or distance is negative or non-finite.
    NegativeTuning { name: &'static str, value: f32 },
    /// The ship would start partly below the canvas.
    PlayerBelowCanvas { bottom_offset: f32, height: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanvas { width, height } => {
                write!(f, "canvas size {width}x{height} must be finite and positive")
            }
            Self::CanvasTooSmall { width, height, min_width, min_height } => write!(
                f,
                "canvas {width}x{height} is smaller than the required {min_width}x{min_height}"
            ),
            Self::ZeroFireInterval => write!(f, "formation fire interval must be non-zero"),
            Self::ProbabilityOutOfRange { name, value } => {
                write!(f, "{name} = {value} is not a probability in [0, 1]")
            }
            Self::Geometry { name, .. } => write!(f, "invalid {name} size"),
            Self::NegativeTuning { name, value } => {
                write!(f, "{name} = {value} must be finite and non-negative")
            }
            Self::PlayerBelowCanvas { bottom_offset, height } => write!(
                f,
                "player bottom offset {bottom_offset} is less than the ship height {height}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeometryError {
    NegativeSize { width: f32, height: f32 },
    NonFinite,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSize { width, height } => {
                write!(f, "rectangle size {width}x{height} is negative")
            }
            Self::NonFinite => write!(f, "rectangle has a non-finite coordinate"),
        }
    }
}

impl std::error::Error for GeometryError {}
