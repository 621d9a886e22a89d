//! Error types for the wrapview crate.

use std::path::PathBuf;

use thiserror::Error;
use wrapview_core::SchedulerError;

/// Errors that can occur while configuring or driving a wrap-list.
#[derive(Error, Debug)]
pub enum WrapViewError {
    /// Item size has a zero dimension.
    #[error("invalid item size: {width}x{height}")]
    InvalidItemSize { width: u32, height: u32 },

    /// Borders and caption leave no room for the image.
    #[error("item of {width}x{height} leaves no room for the image")]
    NoRoomForImage { width: u32, height: u32 },

    /// Manual layout was requested without a position model.
    #[error("manual layout requires a position model")]
    MissingPositionModel,

    /// A configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The idle scheduler refused the reconcile task.
    #[error("failed to schedule update: {0}")]
    Schedule(#[from] SchedulerError),
}

/// Result type for wrapview operations.
pub type WrapViewResult<T> = Result<T, WrapViewError>;
