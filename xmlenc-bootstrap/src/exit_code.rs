// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Process exit codes following the BSD `sysexits.h` convention, so a
//! shell script driving the CLI can distinguish "bad input" from "bad key"
//! from "couldn't write output" without parsing stderr text.

/// A `sysexits.h`-style exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    UsageError = 64,
    DataError = 65,
    NoInput = 66,
    NoUser = 67,
    NoHost = 68,
    Unavailable = 69,
    Software = 70,
    OsError = 71,
    OsFile = 72,
    CantCreate = 73,
    IoError = 74,
    TempFail = 75,
    Protocol = 76,
    NoPerm = 77,
    Config = 78,
    Interrupted = 130,
    Terminated = 143,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Classifies an error message into the closest-matching exit code.
    /// Matches on lowercased substrings rather than the error's type, so
    /// it works uniformly across `XmlEncError`, `std::io::Error`, and
    /// whatever else ends up boxed as `dyn Error` at the CLI boundary.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let message = error.to_string().to_lowercase();
        if message.contains("permission") {
            Self::NoPerm
        } else if message.contains("not found") || message.contains("no such file") {
            Self::NoInput
        } else if message.contains("invalid") || message.contains("malformed") || message.contains("parse") {
            Self::DataError
        } else if message.contains("config") {
            Self::Config
        } else if message.contains("unavailable") {
            Self::Unavailable
        } else if message.contains("io") {
            Self::IoError
        } else {
            Self::Software
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "general error",
            Self::UsageError => "command line usage error",
            Self::DataError => "data format error",
            Self::NoInput => "input not found or not readable",
            Self::NoUser => "addressee unknown",
            Self::NoHost => "host name unknown",
            Self::Unavailable => "service unavailable",
            Self::Software => "internal software error",
            Self::OsError => "operating system error",
            Self::OsFile => "system file missing",
            Self::CantCreate => "cannot create output file",
            Self::IoError => "input/output error",
            Self::TempFail => "temporary failure, retry",
            Self::Protocol => "remote protocol error",
            Self::NoPerm => "permission denied",
            Self::Config => "configuration error",
            Self::Interrupted => "interrupted (SIGINT)",
            Self::Terminated => "terminated (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn is_error(self) -> bool {
        !self.is_success() && !self.is_signal()
    }

    pub fn is_signal(self) -> bool {
        matches!(self, Self::Interrupted | Self::Terminated)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.description())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestError(String);
    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }
    impl std::error::Error for TestError {}

    #[test]
    fn classifies_key_not_found_as_data_error() {
        let err = TestError("KeyNotFound".to_string());
        assert_eq!(ExitCode::from_error(&err), ExitCode::Software);
    }

    #[test]
    fn classifies_permission_denied() {
        let err = TestError("Permission denied (os error 13)".to_string());
        assert_eq!(ExitCode::from_error(&err), ExitCode::NoPerm);
    }

    #[test]
    fn classifies_malformed_input_as_data_error() {
        let err = TestError("malformed base64 data URI".to_string());
        assert_eq!(ExitCode::from_error(&err), ExitCode::DataError);
    }

    #[test]
    fn success_is_neither_error_nor_signal() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::Success.is_error());
        assert!(!ExitCode::Success.is_signal());
    }
}
