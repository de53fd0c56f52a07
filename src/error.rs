use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation engine.
///
/// The engine performs no I/O, so these are the only two failure modes:
/// a configuration rejected at init time, or an operation called before
/// the world exists. Every operation either fully completes or fails
/// before mutating any state.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration rejected by `init`. Not recoverable automatically;
    /// the caller must supply a corrected configuration and retry.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `step` or `snapshot` called before a successful `init`.
    #[error("simulation not initialized; call init first")]
    NotInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidConfiguration("molecule count must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("count"));
    }

    #[test]
    fn not_initialized_names_the_fix() {
        let msg = Error::NotInitialized.to_string();
        assert!(msg.contains("init"));
    }
}
