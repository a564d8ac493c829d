use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("No container available to attach the modal to")]
    MountTargetMissing,
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for ModalError {
    fn from(e: serde_json::Error) -> Self {
        ModalError::InvalidConfiguration(e.to_string())
    }
}
