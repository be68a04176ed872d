//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: render error (scene generation, frame loop stopped)
//! - 11: I/O error (snapshot write)
//! - 12: input error (unknown preset, bad JSON params, invalid parameters)
//! - 13: serialization error

use backdrop_core::BackdropError;
use std::fmt;

pub enum CliError {
    Render(String),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(msg)
            | CliError::Io(msg)
            | CliError::Input(msg)
            | CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<BackdropError> for CliError {
    fn from(e: BackdropError) -> Self {
        let msg = e.to_string();
        match e {
            BackdropError::Io(_) => CliError::Io(msg),
            BackdropError::InvalidColor(_)
            | BackdropError::InvalidParameter { .. }
            | BackdropError::UnknownPreset(_) => CliError::Input(msg),
            _ => CliError::Render(msg),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            CliError::Render(String::new()).exit_code(),
            CliError::Io(String::new()).exit_code(),
            CliError::Input(String::new()).exit_code(),
            CliError::Serialization(String::new()).exit_code(),
        ];
        assert_eq!(codes, [10, 11, 12, 13]);
    }

    #[test]
    fn io_errors_route_to_io() {
        let err = CliError::from(BackdropError::Io("disk full".into()));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn bad_input_routes_to_input() {
        assert_eq!(CliError::from(BackdropError::UnknownPreset("nebula".into())).exit_code(), 12);
        let err = CliError::from(BackdropError::InvalidParameter {
            name: "radius".into(),
            reason: "must be positive".into(),
        });
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn render_failures_route_to_render() {
        let err = CliError::from(BackdropError::Render("empty drawing buffer".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn serde_errors_route_to_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        assert_eq!(CliError::from(bad).exit_code(), 13);
    }
}
