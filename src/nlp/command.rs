use super::tokenize;
use crate::errors::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Action keywords in the order they are tried.
static ACTION_PATTERNS: Lazy<Vec<(Action, Regex)>> = Lazy::new(|| {
    vec![
        (Action::Add, Regex::new(r"(?i)\bADD\b").expect("valid regex")),
        (Action::Remove, Regex::new(r"(?i)\bREMOVE\b").expect("valid regex")),
        (Action::Get, Regex::new(r"(?i)\bGET\b").expect("valid regex")),
    ]
});

// Only one- and two-digit runs count as item numbers; "100" is a keyword.
static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,2}$").expect("valid regex"));
static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid regex"));

const ALL_KEYWORD: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
    Get,
}

/// A request reduced to one store operation and its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    RemoveByNumber(u32),
    RemoveByKeyword(String),
    GetByNumber(u32),
    GetByKeyword(String),
    GetAllByKeyword(String),
    GetAll,
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Self::Add(_) => Action::Add,
            Self::RemoveByNumber(_) | Self::RemoveByKeyword(_) => Action::Remove,
            Self::GetByNumber(_) | Self::GetByKeyword(_) | Self::GetAllByKeyword(_) | Self::GetAll => {
                Action::Get
            }
        }
    }
}

/// Classify free text into a [`Command`].
///
/// The first action keyword found (ADD, then REMOVE, then GET) wins, matched
/// case-insensitively anywhere in the text. Everything up to and including
/// that keyword and one following whitespace character is dropped; the rest
/// is the argument.
pub fn parse(input: &str) -> AppResult<Command> {
    let Some((action, argument)) = split_action(input) else {
        return Err(unrecognized(input));
    };

    let command = match action {
        Action::Add => parse_add(argument),
        Action::Remove => parse_remove(argument),
        Action::Get => parse_get(argument),
    };
    command.ok_or_else(|| unrecognized(input))
}

fn unrecognized(input: &str) -> AppError {
    AppError::Unrecognized(input.to_string())
}

fn split_action(input: &str) -> Option<(Action, &str)> {
    ACTION_PATTERNS.iter().find_map(|(action, pattern)| {
        let found = pattern.find(input)?;
        let rest = &input[found.end()..];
        Some((*action, rest.strip_prefix(char::is_whitespace).unwrap_or(rest)))
    })
}

fn parse_add(argument: &str) -> Option<Command> {
    if argument.trim().is_empty() {
        return None;
    }
    Some(Command::Add(argument.to_string()))
}

fn parse_remove(argument: &str) -> Option<Command> {
    let tokens = tokenize(argument);
    if let Some(number) = first_number(&tokens) {
        return Some(Command::RemoveByNumber(number));
    }

    let keyword = argument.trim();
    if keyword.is_empty() {
        return None;
    }
    Some(Command::RemoveByKeyword(keyword.to_string()))
}

fn parse_get(argument: &str) -> Option<Command> {
    let tokens = tokenize(argument);

    // The last date in the request is the one searched for.
    if let Some(date) = tokens.iter().rev().find(|token| DATE_TOKEN.is_match(token)) {
        return Some(Command::GetAllByKeyword((*date).to_string()));
    }
    if let Some(number) = first_number(&tokens) {
        return Some(Command::GetByNumber(number));
    }

    let wants_all = tokens.iter().any(|token| is_all(token));
    let keyword = residual_keyword(&tokens);

    match (wants_all, keyword.is_empty()) {
        (true, false) => Some(Command::GetAllByKeyword(keyword)),
        (true, true) => Some(Command::GetAll),
        (false, false) => Some(Command::GetByKeyword(keyword)),
        (false, true) => None,
    }
}

fn first_number(tokens: &[&str]) -> Option<u32> {
    tokens
        .iter()
        .filter(|token| NUMBER_TOKEN.is_match(token))
        .find_map(|token| token.parse().ok())
}

fn is_all(token: &str) -> bool {
    token.eq_ignore_ascii_case(ALL_KEYWORD)
}

/// Every token except item numbers and the ALL keyword, joined by single spaces.
fn residual_keyword(tokens: &[&str]) -> String {
    tokens
        .iter()
        .filter(|token| !NUMBER_TOKEN.is_match(token) && !is_all(token))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
