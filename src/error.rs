use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid responses: {0}")]
    InvalidResponses(String),

    #[error("no assessment type available for profile: {0}")]
    UnsupportedProfile(String),

    #[error("invitation rejected: {0}")]
    Invitation(String),

    #[error("relationship rejected: {0}")]
    Relationship(String),

    #[error("assessor rejected: {0}")]
    Assessor(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
