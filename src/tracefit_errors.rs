use thiserror::Error;

#[derive(Error, Debug)]
pub enum TracefitError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON (de)serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid regular expression: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid reconstruction parameters: {0}")]
    InvalidParams(String),

    #[error("No visible pass for satellite {0}")]
    NoVisiblePass(String),

    #[error("Longest pass of {sat_id} has {len} points, at least {min} required")]
    PassTooShort {
        sat_id: String,
        len: usize,
        min: usize,
    },

    #[error("Unstable orbit for {sat_id}: pass points nearly collinear (|n|² = {cross_norm_sq:e})")]
    DegeneratePlane { sat_id: String, cross_norm_sq: f64 },

    #[error("Malformed orbits document: {0}")]
    MalformedDocument(String),
}

impl TracefitError {
    /// `true` for errors that discard a single satellite while the run continues.
    pub fn is_satellite_skip(&self) -> bool {
        matches!(
            self,
            TracefitError::NoVisiblePass(_)
                | TracefitError::PassTooShort { .. }
                | TracefitError::DegeneratePlane { .. }
        )
    }
}

impl PartialEq for TracefitError {
    fn eq(&self, other: &Self) -> bool {
        use TracefitError::*;
        match (self, other) {
            // Wrapped foreign errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,
            (JsonError(_), JsonError(_)) => true,
            (RegexError(a), RegexError(b)) => a == b,

            (InvalidTimestamp(a), InvalidTimestamp(b)) => a == b,
            (InvalidParams(a), InvalidParams(b)) => a == b,
            (NoVisiblePass(a), NoVisiblePass(b)) => a == b,
            (MalformedDocument(a), MalformedDocument(b)) => a == b,
            (
                PassTooShort {
                    sat_id: a,
                    len: la,
                    min: ma,
                },
                PassTooShort {
                    sat_id: b,
                    len: lb,
                    min: mb,
                },
            ) => a == b && la == lb && ma == mb,
            (DegeneratePlane { sat_id: a, .. }, DegeneratePlane { sat_id: b, .. }) => a == b,

            _ => false,
        }
    }
}
