use crate::detection::DetectionType;
use err_derive::Error;
use std::path::PathBuf;

/// This is the primary error type of the tool
///
/// Everything below the config-loading variants is recovered locally: the
/// controller logs it and moves on to the next detection type or camera.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the config file cannot be read
    #[error(display = "Failed to read config file {:?}", _0)]
    ConfigIo(PathBuf, #[error(source)] std::io::Error),

    /// Raised when the config file is not valid TOML
    #[error(display = "Failed to parse config file")]
    ConfigParse(#[error(source)] toml::de::Error),

    /// Raised when the config file fails validation
    #[error(display = "Invalid config: {:?}", _0)]
    ConfigValidation(validator::ValidationErrors),

    /// Raised when a positional argument other than `on` follows the identifier
    #[error(display = "Unrecognised argument {:?}, expected `on`", _0)]
    BadDirective(String),

    /// Raised when the identifier is not `location` or `location/camera`
    #[error(display = "Invalid identifier {:?}, expected `location` or `location/camera`", _0)]
    BadIdentifier(String),

    /// Raised when the camera does not answer the reachability probe
    #[error(display = "Camera {} is not reachable", _0)]
    TransportUnreachable(String),

    /// Raised when the camera rejects the config fetch, usually because it
    /// does not support that detection type
    #[error(display = "Error {} fetching {} config. Not supported?", status, detection)]
    UnsupportedDetection {
        /// The detection type that was being fetched
        detection: DetectionType,
        /// The HTTP status the camera answered with
        status: reqwest::StatusCode,
    },

    /// Raised when the camera refuses the new configuration document
    #[error(display = "Camera rejected the {} config write with status {}", detection, status)]
    WriteRejected {
        /// The detection type that was being written
        detection: DetectionType,
        /// The HTTP status the camera answered with
        status: reqwest::StatusCode,
    },

    /// Raised when unpausing a detection that has no saved enabled config
    #[error(
        display = "No saved enabled {} config, the camera must be paused before it can be un-paused",
        _0
    )]
    MissingRestorePoint(DetectionType),

    /// Raised when the camera's document has no recognisable enabled flag
    #[error(display = "No enabled flag found in the {} config document", _0)]
    MalformedDocument(DetectionType),

    /// A transport-level HTTP failure
    #[error(display = "HTTP error")]
    Http(#[error(source)] crate::client::HttpError),

    /// Raised when a snapshot cannot be read or written
    #[error(display = "Snapshot storage error")]
    Storage(#[error(source)] std::io::Error),

    /// Raised when a detection document cannot be parsed or re-emitted
    #[error(display = "Detection document error")]
    Xml(#[error(source)] crate::xmlcfg::XmlError),
}

// The derive already emits From impls for the single-field source
// variants; ConfigValidation carries no source, so it needs one by hand.
impl From<validator::ValidationErrors> for Error {
    fn from(e: validator::ValidationErrors) -> Self {
        Error::ConfigValidation(e)
    }
}
