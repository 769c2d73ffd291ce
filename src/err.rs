use crate::println_err;
use std::process::{ExitCode, Termination};
use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum LpErr {
    #[error("[Pipe] Pipeline has already been consumed by a terminal operation")]
    Consumed,

    #[error("[Pipe] Terminal operation `{op}` needs a bounded source, add `limit` before it")]
    Unbounded { op: &'static str },

    #[error("[Pipe] Duplicate key `{key}` while collecting into map, a merge function is required")]
    DuplicateKey { key: String },

    #[error("[Task] Worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("[Task] Unable to spawn worker: {0}")]
    SpawnWorkerErr(String),

    #[error("[Regex] Invalid regex `{reg}`: {err}")]
    InvalidRegex { reg: String, err: String },

    #[error("[Bad Arg] Unknown demo `{0}`, see `-h` for all demos")]
    UnknownDemo(String),

    #[error("[Bad Arg] Unknown arguments: {args:?}")]
    UnknownArgs { args: Vec<String> },

    #[error("[Output] Write to console error: {0}")]
    WriteErr(String),
}

impl Termination for LpErr {
    fn report(self) -> ExitCode {
        println_err!("{}", self);
        ExitCode::from(self.exit_code())
    }
}

impl LpErr {
    pub fn termination(self) -> ! {
        let exit_code = self.exit_code();
        self.report();
        std::process::exit(exit_code as i32);
    }

    fn exit_code(&self) -> u8 {
        match self {
            LpErr::Consumed => 1,
            LpErr::Unbounded { .. } => 2,
            LpErr::DuplicateKey { .. } => 3,
            LpErr::WorkerPanicked(_) => 4,
            LpErr::SpawnWorkerErr(_) => 5,
            LpErr::InvalidRegex { .. } => 6,
            LpErr::UnknownDemo(_) => 7,
            LpErr::UnknownArgs { .. } => 8,
            LpErr::WriteErr(_) => 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errs = [
            LpErr::Consumed,
            LpErr::Unbounded { op: "for_each" },
            LpErr::DuplicateKey { key: "29".to_string() },
            LpErr::WorkerPanicked(String::new()),
            LpErr::SpawnWorkerErr(String::new()),
            LpErr::InvalidRegex { reg: "[".to_string(), err: String::new() },
            LpErr::UnknownDemo("x".to_string()),
            LpErr::UnknownArgs { args: vec![] },
            LpErr::WriteErr(String::new()),
        ];
        let mut codes = errs.iter().map(LpErr::exit_code).collect::<Vec<_>>();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_message() {
        assert_eq!(
            LpErr::Unbounded { op: "collect" }.to_string(),
            "[Pipe] Terminal operation `collect` needs a bounded source, add `limit` before it"
        );
    }
}
