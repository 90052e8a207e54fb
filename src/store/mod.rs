//! Numbered to-do list storage.
//!
//! Both backends keep the list numbered `1..=count` with no gaps after every
//! add or remove.

mod file;
mod table;

pub use file::FileStore;
pub use table::TableStore;

use crate::config::AgentConfig;
use crate::errors::AppResult;
use crate::models::{Item, StorageKind};

/// Storage contract shared by the file and table backends.
///
/// A "no match" is `Ok(None)` (or an empty `Vec`), never an error. Errors are
/// reserved for failures of the backing resource.
pub trait ListStore: Send {
    fn list_name(&self) -> &str;

    fn count(&self) -> AppResult<u32>;

    /// Append `task` as item `count() + 1`, stamped with the current date and time.
    fn add(&self, task: &str) -> AppResult<Item>;

    /// Remove item `number` and shift every later item down by one.
    fn remove_by_number(&self, number: u32) -> AppResult<Option<Item>>;

    /// Remove the lowest-numbered item whose canonical line contains `keyword`.
    fn remove_by_keyword(&self, keyword: &str) -> AppResult<Option<Item>>;

    fn get_all(&self) -> AppResult<Vec<Item>>;

    fn get_all_by_keyword(&self, keyword: &str) -> AppResult<Vec<Item>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|item| item.matches(keyword))
            .collect())
    }

    fn get_by_keyword(&self, keyword: &str) -> AppResult<Option<Item>> {
        Ok(self.get_all()?.into_iter().find(|item| item.matches(keyword)))
    }

    /// Looks up the `"<n>),"` fragment at the start of the canonical line, so
    /// asking for item 1 never returns item 11.
    fn get_by_number(&self, number: u32) -> AppResult<Option<Item>> {
        let fragment = Item::number_fragment(number);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|item| item.to_string().starts_with(&fragment)))
    }
}

/// Open the backend selected by `config`, creating the list if it does not exist.
pub fn open_store(config: &AgentConfig) -> AppResult<Box<dyn ListStore>> {
    match config.data_storage_type {
        StorageKind::File => Ok(Box::new(FileStore::open(&config.data_dir, &config.name)?)),
        StorageKind::Database => Ok(Box::new(TableStore::open(
            &config.database_path(),
            &config.name,
        )?)),
    }
}
