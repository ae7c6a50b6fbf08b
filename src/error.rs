//! Application-level error carrying a process exit code.
//!
//! `nfit` uses a small exit-code taxonomy:
//!
//! - `2` — bad input: unreadable CSV, invalid column selection or options,
//!   failed plot/export writes
//! - `3` — no usable data: empty or fully filtered dataset
//! - `4` — fit failure: the loop terminated without converging

/// Error returned by command handlers; `main` prints the message to stderr and
/// exits with the carried code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
