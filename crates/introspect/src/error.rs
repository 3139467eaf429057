use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectError>;

#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("Failed to parse introspection response: {0}")]
    Parse(String),

    #[error("Invalid SDL schema: {0}")]
    Sdl(String),

    #[error("Failed to load schema override: {0}")]
    Load(String),
}
