//! Script loading errors.

/// Errors raised while loading or validating a screen script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read screen script")]
    Io(#[from] std::io::Error),

    /// The script is not valid JSON for a list of screens.
    #[error("failed to parse screen script")]
    Parse(#[from] serde_json::Error),

    /// The script has no screens.
    #[error("screen script is empty")]
    Empty,

    /// A node navigates to a screen that does not exist.
    #[error("screen {screen} navigates to missing screen {target}")]
    MissingTarget { screen: usize, target: usize },
}
