use std::{ops::Add, process::ExitCode};

/// The outcome of loading one input file.
///
/// Statuses are returned rather than raised, so that the caller can combine
/// them. Adding two statuses gives the numeric exit code for the run: `0` only
/// when both loads succeeded, otherwise the sum of their codes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Status {
    /// The file was read and had usable entries.
    #[default]
    Ok,
    /// The file was read, but had no usable entries.
    Empty,
    /// The file couldn't be read or parsed.
    Error,
}

impl Status {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Empty => 1,
            Self::Error => 9,
        }
    }
}

impl Add for Status {
    type Output = u8;

    fn add(self, rhs: Self) -> Self::Output {
        self.code() + rhs.code()
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        Self::from(status.code())
    }
}
