use vision_pipeline_core::GeometryError;

/// Errors raised while applying filters to a frame's targets.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A user-supplied batch filter returned more targets than it was given.
    #[error("custom filter `{name}` returned {output} targets from {input} inputs")]
    InvalidCustomFilter {
        name: String,
        input: usize,
        output: usize,
    },
}

/// Errors raised while configuring filters, before the frame loop starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid parameter for `{filter}`: {reason}")]
    InvalidParameter { filter: String, reason: String },
    #[error("unknown filter `{0}`")]
    UnknownFilter(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(filter: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            filter: filter.to_string(),
            reason: reason.into(),
        }
    }
}
