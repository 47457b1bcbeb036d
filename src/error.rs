//! Application-level error type.
//!
//! The fitting core never fails; everything here comes from the edges of the
//! program (arguments, files, the terminal).

/// Exit code for bad arguments or unreadable/invalid input files.
pub const EXIT_INPUT: u8 = 2;

/// Exit code for runtime failures (terminal I/O, write errors).
pub const EXIT_RUNTIME: u8 = 4;

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

    /// Shorthand for an input/usage error (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    /// Shorthand for a runtime error (exit code 4).
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_constructors_set_exit_codes() {
        assert_eq!(AppError::input("bad csv").exit_code(), EXIT_INPUT);
        assert_eq!(AppError::runtime("tty gone").exit_code(), EXIT_RUNTIME);
        assert_eq!(AppError::input("bad csv").to_string(), "bad csv");
    }
}
