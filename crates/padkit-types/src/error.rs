//! Error types for padkit.

use std::io;

/// Errors produced while loading skins and engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum SkinError {
    #[error("malformed skin descriptor: {0}")]
    MalformedSkinDescriptor(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Errors surfaced by skin image loaders.
///
/// These never affect geometry: a failed load only means the view keeps
/// showing its placeholder.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("missing asset: {0}")]
    MissingAsset(String),

    #[error("skin has no representation for {0}")]
    UnsupportedTrait(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SkinError>;
