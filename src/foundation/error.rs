/// Convenience result type used across bandtree.
pub type BandtreeResult<T> = Result<T, BandtreeError>;

/// Top-level error taxonomy used by compiler APIs.
///
/// Only structurally invalid input surfaces here. Data-quality problems (missing years,
/// duplicate memberships, crowded canvases) degrade into [`crate::CompileWarning`]s.
#[derive(thiserror::Error, Debug)]
pub enum BandtreeError {
    /// Structurally invalid graph or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal inconsistency detected while placing boxes or members.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BandtreeError {
    /// Build a [`BandtreeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BandtreeError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`BandtreeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
