use std::fmt;

#[derive(Debug)]
pub enum SpritePackError {
    InvalidConfiguration(String),
    EmptyInputSet,
    DuplicateImageId(String),
    Decode { id: String, message: String },
    Encode(String),
    Io(std::io::Error),
}

impl fmt::Display for SpritePackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpritePackError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            SpritePackError::EmptyInputSet => {
                write!(f, "the input folder must contain at least one image file")
            }
            SpritePackError::DuplicateImageId(id) => {
                write!(f, "duplicate image id: {}", id)
            }
            SpritePackError::Decode { id, message } => {
                write!(f, "failed to decode image {}: {}", id, message)
            }
            SpritePackError::Encode(message) => write!(f, "png encode error: {}", message),
            SpritePackError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for SpritePackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpritePackError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpritePackError {
    fn from(value: std::io::Error) -> Self {
        SpritePackError::Io(value)
    }
}
