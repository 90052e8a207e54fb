//! Turns free-text requests into store calls and store outcomes into
//! [`AgentResponse`]s.

use crate::config::AgentConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{AgentResponse, Item, ResponseCode};
use crate::nlp::{self, Command};
use crate::store::{open_store, ListStore};

const NOT_UNDERSTOOD: &str = "Error: Your request could not be understood. Start with ADD, REMOVE or GET.";
const STORAGE_FAILURE: &str = "Error: The to do list could not be accessed";
const ITEM_NOT_FOUND: &str = "Item could not be found";
const ITEM_NOT_REMOVED: &str = "Item could not be removed. No item number or keyword matched your request";
const NO_KEYWORD_MATCH: &str = "No items matched your keyword";
const EMPTY_LIST: &str = "The to do list is empty.";

pub struct Dispatcher {
    store: Box<dyn ListStore>,
}

impl Dispatcher {
    pub fn new(store: Box<dyn ListStore>) -> Self {
        Self { store }
    }

    pub fn from_config(config: &AgentConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::new(open_store(config)?))
    }

    pub fn store(&self) -> &dyn ListStore {
        self.store.as_ref()
    }

    /// Handle one request. Never fails: every error becomes an error status.
    pub fn process(&self, input: &str) -> AgentResponse {
        match self.execute(input) {
            Ok(text) => AgentResponse::success(text),
            Err(error) => self.to_response(error),
        }
    }

    /// Handle one request, returning the success text or the error that
    /// stopped it.
    pub fn execute(&self, input: &str) -> AppResult<String> {
        let command = nlp::parse(input)?;
        tracing::debug!(list = %self.store.list_name(), ?command, "parsed request");

        match command {
            Command::Add(task) => {
                let item = self.store.add(&task)?;
                Ok(format!("Item added: {}", item.task))
            }
            Command::RemoveByNumber(number) => {
                let removed = self.store.remove_by_number(number)?;
                removed_text(removed)
            }
            Command::RemoveByKeyword(keyword) => {
                let removed = self.store.remove_by_keyword(&keyword)?;
                removed_text(removed)
            }
            Command::GetByNumber(number) => found_text(self.store.get_by_number(number)?),
            Command::GetByKeyword(keyword) => found_text(self.store.get_by_keyword(&keyword)?),
            Command::GetAllByKeyword(keyword) => {
                let items = self.store.get_all_by_keyword(&keyword)?;
                if items.is_empty() {
                    return Err(AppError::NotFound(NO_KEYWORD_MATCH.to_string()));
                }
                Ok(join_lines(&items))
            }
            Command::GetAll => {
                let items = self.store.get_all()?;
                if items.is_empty() {
                    return Ok(EMPTY_LIST.to_string());
                }
                Ok(join_lines(&items))
            }
        }
    }

    fn to_response(&self, error: AppError) -> AgentResponse {
        let list = self.store.list_name();
        match error {
            AppError::Unrecognized(input) => {
                tracing::warn!(list = %list, input = %input, "request could not be understood");
                AgentResponse::failure(ResponseCode::DidNotUnderstandRequest, NOT_UNDERSTOOD)
            }
            AppError::NotFound(message) => {
                tracing::warn!(list = %list, reason = %message, "no item matched request");
                AgentResponse::failure(ResponseCode::DidNotKnowAnswer, format!("Error: {message}"))
            }
            error => {
                tracing::error!(list = %list, error = %error, "to do list operation failed");
                AgentResponse::failure(ResponseCode::InternalError, STORAGE_FAILURE)
            }
        }
    }
}

fn removed_text(removed: Option<Item>) -> AppResult<String> {
    removed
        .map(|item| format!("Item removed: {item}"))
        .ok_or_else(|| AppError::NotFound(ITEM_NOT_REMOVED.to_string()))
}

fn found_text(found: Option<Item>) -> AppResult<String> {
    found
        .map(|item| item.to_string())
        .ok_or_else(|| AppError::NotFound(ITEM_NOT_FOUND.to_string()))
}

fn join_lines(items: &[Item]) -> String {
    items.iter().map(|item| format!("{item}\n")).collect()
}
