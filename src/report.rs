use std::{fmt, time::Duration};

use bytes::Bytes;
use serde::{ser::SerializeStruct, Serialize};

use crate::{aggregate::Mode, error::FetchError, targets::Target};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResult {
    pub target: Target,
    /// Characters in the body, read as lossy UTF-8.
    pub size: usize,
}

impl FetchResult {
    pub fn from_body(target: Target, body: &[u8]) -> Self {
        let size = String::from_utf8_lossy(body).chars().count();
        Self { target, size }
    }
}

/// The outcome for one target, in the position of that target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Fetched(FetchResult),
    Failed { target: Target, error: FetchError },
}

impl Line {
    pub fn new(target: Target, outcome: Result<Bytes, FetchError>) -> Self {
        match outcome {
            Ok(body) => Self::Fetched(FetchResult::from_body(target, &body)),
            Err(error) => Self::Failed { target, error },
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            Self::Fetched(result) => &result.target,
            Self::Failed { target, .. } => target,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetched(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched(FetchResult { target, size }) => {
                write!(f, "Download from {target}: total {size} characters")
            }
            Self::Failed { target, error } => write!(f, "Download from {target}: failed ({error})"),
        }
    }
}

impl Serialize for Line {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut line = serializer.serialize_struct("line", 2)?;
        line.serialize_field("target", self.target())?;
        match self {
            Self::Fetched(result) => line.serialize_field("size", &(result.size as u64))?,
            Self::Failed { error, .. } => line.serialize_field("error", &error.to_string())?,
        }
        line.end()
    }
}

/// Everything one run produced, in input order.
#[derive(Clone, Debug)]
pub struct Report {
    pub mode: Mode,
    pub lines: Vec<Line>,
    pub elapsed: Duration,
}

impl Report {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn failures(&self) -> usize {
        self.lines.iter().filter(|line| !line.is_success()).count()
    }

    /// The lines as they are displayed.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "Total execution time: {}", self.elapsed_millis())
    }
}

impl Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut report = serializer.serialize_struct("report", 3)?;
        report.serialize_field("mode", &self.mode)?;
        report.serialize_field("elapsed_ms", &self.elapsed_millis())?;
        report.serialize_field("lines", &self.lines)?;
        report.end()
    }
}
