use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%m/%d/%Y";
pub const TIME_FORMAT: &str = "%I:%M %p";

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));

/// One entry of a to-do list.
///
/// `number` is a position, not an identifier: removing an item shifts every
/// item above it down by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub number: u32,
    pub task: String,
    pub date_created: String,
    pub time_created: String,
}

impl Item {
    /// Build an item stamped with the current local date and time.
    pub fn new(number: u32, task: &str) -> Self {
        Self::stamped(number, task, Local::now())
    }

    /// Line breaks in `task` become single spaces: a canonical line is one
    /// physical line.
    pub fn stamped(number: u32, task: &str, at: DateTime<Local>) -> Self {
        Self {
            number,
            task: LINE_BREAKS.replace_all(task, " ").into_owned(),
            date_created: at.format(DATE_FORMAT).to_string(),
            time_created: at.format(TIME_FORMAT).to_string(),
        }
    }

    /// Case-insensitive substring match against the whole canonical line,
    /// metadata included.
    pub fn matches(&self, keyword: &str) -> bool {
        self.to_string()
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }

    /// Canonical-line prefix that identifies item `number`.
    pub fn number_fragment(number: u32) -> String {
        format!("{number}),")
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}),{},{},{}",
            self.number, self.date_created, self.time_created, self.task
        )
    }
}

impl FromStr for Item {
    type Err = AppError;

    fn from_str(line: &str) -> AppResult<Self> {
        let malformed = || AppError::Storage(format!("malformed item line: {line}"));

        let (number, rest) = line.split_once("),").ok_or_else(malformed)?;
        let number = number.trim().parse::<u32>().map_err(|_| malformed())?;

        let mut fields = rest.splitn(3, ',');
        let date_created = fields.next().ok_or_else(malformed)?;
        let time_created = fields.next().ok_or_else(malformed)?;
        let task = fields.next().ok_or_else(malformed)?;

        Ok(Self {
            number,
            task: task.to_string(),
            date_created: date_created.to_string(),
            time_created: time_created.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    #[default]
    File,
    #[serde(alias = "table")]
    Database,
}

impl FromStr for StorageKind {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "database" | "table" => Ok(Self::Database),
            other => Err(AppError::Config(format!("unknown storage type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCode {
    Success,
    DidNotUnderstandRequest,
    DidNotKnowAnswer,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    pub code: ResponseCode,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub status: ResponseStatus,
    pub text: Option<String>,
}

impl AgentResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus {
                code: ResponseCode::Success,
                message: None,
            },
            text: Some(text.into()),
        }
    }

    pub fn failure(code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus {
                code,
                message: Some(message.into()),
            },
            text: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.code == ResponseCode::Success
    }

    /// The user-facing text: the payload on success, the status message otherwise.
    pub fn display_text(&self) -> &str {
        self.text
            .as_deref()
            .or(self.status.message.as_deref())
            .unwrap_or_default()
    }
}
