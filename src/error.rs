use std::env;
use std::fmt::{self, Debug, Display};
use std::num::ParseIntError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_internal(&self) -> bool {
        matches!(self.code, 1..=99)
    }

    pub fn is_fetch_failure(&self) -> bool {
        self.code == 110
    }

    pub fn is_mutation_failure(&self) -> bool {
        self.code == 111
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == 112
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<ParseIntError> for Error {
    fn from(_: ParseIntError) -> Self {
        invalid_config_error()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

/// A GET against the backend failed. Local state is left as it was.
pub fn fetch_failure_error(message: &str) -> Error {
    Error {
        code: 110,
        message: message.into(),
    }
}

/// A PUT or DELETE failed and the local collection was rolled back.
pub fn mutation_failure_error(message: &str) -> Error {
    Error {
        code: 111,
        message: message.into(),
    }
}

pub fn cancelled_error() -> Error {
    Error {
        code: 112,
        message: "request cancelled".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn invalid_config_error() -> Error {
    Error {
        code: 2,
        message: "invalid configuration".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::debug!(error = %err, "reqwest error");

    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error<T: Debug>(err: T) -> Error {
    tracing::debug!(error = ?err, "unexpected error");

    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

#[test]
fn error_kinds_test() {
    assert!(fetch_failure_error("boom").is_fetch_failure());
    assert!(mutation_failure_error("boom").is_mutation_failure());
    assert!(cancelled_error().is_cancelled());
    assert!(upstream_error().is_internal());
    assert!(!invalid_input_error().is_internal());
}

#[test]
fn error_display_test() {
    let err = mutation_failure_error("Failed to store selected place");

    assert_eq!(err.to_string(), "Failed to store selected place (code 111)");
}
