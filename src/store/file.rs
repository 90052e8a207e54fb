use super::ListStore;
use crate::errors::AppResult;
use crate::models::Item;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const TITLE_SUFFIX: &str = "'s TODO List:";

/// A list kept in `<dir>/<name>.csv`.
///
/// Line 0 is a free-form title that is never parsed and is written back
/// unchanged. Every later non-blank line is an item's canonical line. Stored
/// numbers are not trusted: items are numbered by position on every read and
/// every rewrite.
#[derive(Debug)]
pub struct FileStore {
    name: String,
    dir: PathBuf,
    path: PathBuf,
}

struct Document {
    title: String,
    items: Vec<Item>,
}

impl FileStore {
    pub fn open(dir: &Path, name: &str) -> AppResult<Self> {
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir.to_path_buf()
        };
        fs::create_dir_all(&dir)?;

        let store = Self {
            name: name.to_string(),
            path: dir.join(format!("{name}.csv")),
            dir,
        };

        if !store.path.exists() {
            store.write_document(&Document {
                title: format!("{name}{TITLE_SUFFIX}"),
                items: Vec::new(),
            })?;
            tracing::info!(list = %store.name, path = %store.path.display(), "created to do list file");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> AppResult<Document> {
        let contents = fs::read_to_string(&self.path).inspect_err(|error| {
            tracing::error!(list = %self.name, error = %error, "could not read to do list file");
        })?;

        let mut lines = contents.lines();
        let title = lines.next().unwrap_or_default().to_string();
        let items = lines
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(index, line)| {
                let mut item: Item = line.parse()?;
                item.number = position_number(index);
                Ok(item)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Document { title, items })
    }

    /// Replace the file with `document` in one step: the new contents go to a
    /// temporary file in the same directory which is then renamed over the
    /// old one, so a failed write leaves the previous list intact.
    fn write_document(&self, document: &Document) -> AppResult<()> {
        let mut file = NamedTempFile::new_in(&self.dir)?;
        writeln!(file, "{}", document.title)?;
        for (index, item) in document.items.iter().enumerate() {
            let renumbered = Item {
                number: position_number(index),
                ..item.clone()
            };
            writeln!(file, "{renumbered}")?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).inspect_err(|error| {
            tracing::error!(list = %self.name, error = %error.error, "could not replace to do list file");
        })?;
        Ok(())
    }

    fn remove_first(&self, predicate: impl Fn(&Item) -> bool) -> AppResult<Option<Item>> {
        let mut document = self.read_document()?;
        let Some(index) = document.items.iter().position(predicate) else {
            return Ok(None);
        };

        let removed = document.items.remove(index);
        self.write_document(&document)?;
        tracing::info!(list = %self.name, number = removed.number, "removed item");
        Ok(Some(removed))
    }
}

fn position_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

impl ListStore for FileStore {
    fn list_name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> AppResult<u32> {
        let items = self.read_document()?.items;
        Ok(u32::try_from(items.len()).unwrap_or(u32::MAX))
    }

    fn add(&self, task: &str) -> AppResult<Item> {
        let mut document = self.read_document()?;
        let item = Item::new(position_number(document.items.len()), task);
        document.items.push(item.clone());
        self.write_document(&document)?;
        tracing::info!(list = %self.name, number = item.number, "added item");
        Ok(item)
    }

    fn remove_by_number(&self, number: u32) -> AppResult<Option<Item>> {
        self.remove_first(|item| item.number == number)
    }

    fn remove_by_keyword(&self, keyword: &str) -> AppResult<Option<Item>> {
        self.remove_first(|item| item.matches(keyword))
    }

    fn get_all(&self) -> AppResult<Vec<Item>> {
        Ok(self.read_document()?.items)
    }
}

#[cfg(test)]
mod tests {
    use super::FileStore;
    use crate::store::{contract, ListStore};
    use std::fs;

    fn fresh_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path(), "alice").expect("open store");
        (dir, store)
    }

    #[test]
    fn creates_file_with_title_line() {
        let (_dir, store) = fresh_store();
        let contents = fs::read_to_string(store.path()).expect("read file");
        assert_eq!(contents, "alice's TODO List:\n");
        assert_eq!(store.count().expect("count"), 0);
    }

    #[test]
    fn reopening_keeps_existing_items() {
        let dir = tempfile::tempdir().expect("tempdir");
        FileStore::open(dir.path(), "alice")
            .expect("open store")
            .add("buy milk")
            .expect("add");

        let reopened = FileStore::open(dir.path(), "alice").expect("reopen store");
        let all = reopened.get_all().expect("get all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].task, "buy milk");
    }

    #[test]
    fn rewrite_preserves_title_and_regenerates_numbers() {
        let (_dir, store) = fresh_store();
        fs::write(
            store.path(),
            "My custom title, kept as is\n\
             7),07/01/2020,09:00 AM,first\n\
             \n\
             7),07/01/2020,09:05 AM,second, with comma\n\
             9),07/02/2020,10:00 PM,third\n",
        )
        .expect("seed file");

        let numbers: Vec<u32> = store
            .get_all()
            .expect("get all")
            .iter()
            .map(|item| item.number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let removed = store.remove_by_number(1).expect("remove").expect("item 1");
        assert_eq!(removed.task, "first");

        let contents = fs::read_to_string(store.path()).expect("read file");
        assert_eq!(
            contents,
            "My custom title, kept as is\n\
             1),07/01/2020,09:05 AM,second, with comma\n\
             2),07/02/2020,10:00 PM,third\n"
        );
    }

    #[test]
    fn title_line_is_never_an_item() {
        let (_dir, store) = fresh_store();
        store.add("feed cat").expect("add");
        assert!(store.get_by_keyword("TODO List").expect("get").is_none());
        assert!(store.remove_by_keyword("alice's").expect("remove").is_none());
        assert_eq!(store.count().expect("count"), 1);
    }

    #[test]
    fn malformed_line_is_a_storage_error() {
        let (_dir, store) = fresh_store();
        fs::write(store.path(), "title\nnot an item\n").expect("seed file");
        let error = store.get_all().expect_err("malformed line");
        assert!(error.is_storage());
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let (_dir, store) = fresh_store();
        fs::remove_file(store.path()).expect("remove file");
        assert!(store.get_all().expect_err("missing file").is_storage());
    }

    #[test]
    fn add_appends_with_next_number() {
        let (_dir, store) = fresh_store();
        contract::add_appends_with_next_number(&store);
    }

    #[test]
    fn remove_by_number_renumbers() {
        let (_dir, store) = fresh_store();
        contract::remove_by_number_renumbers(&store);
    }

    #[test]
    fn remove_out_of_range_leaves_store_unchanged() {
        let (_dir, store) = fresh_store();
        contract::remove_out_of_range_leaves_store_unchanged(&store);
    }

    #[test]
    fn remove_by_keyword_takes_first_match() {
        let (_dir, store) = fresh_store();
        contract::remove_by_keyword_takes_first_match(&store);
    }

    #[test]
    fn keyword_queries_filter_in_order() {
        let (_dir, store) = fresh_store();
        contract::keyword_queries_filter_in_order(&store);
    }

    #[test]
    fn get_by_number_never_matches_longer_numbers() {
        let (_dir, store) = fresh_store();
        contract::get_by_number_never_matches_longer_numbers(&store);
    }

    #[test]
    fn failed_rewrite_leaves_file_untouched() {
        let (dir, store) = fresh_store();
        store.add("a").expect("add");
        store.add("b").expect("add");
        let before = fs::read(store.path()).expect("read list file");

        // The temp file cannot be created, so no rewrite can reach the list.
        let broken = FileStore {
            name: "alice".into(),
            dir: dir.path().join("missing"),
            path: store.path().to_path_buf(),
        };
        assert!(broken.remove_by_number(1).expect_err("remove must fail").is_storage());
        assert!(broken.add("c").expect_err("add must fail").is_storage());

        assert_eq!(fs::read(store.path()).expect("read list file"), before);
        assert_eq!(store.count().expect("count"), 2);
    }

    #[test]
    fn multi_line_task_is_stored_on_one_line() {
        let (_dir, store) = fresh_store();
        contract::multi_line_task_is_stored_on_one_line(&store);
    }

    #[test]
    fn date_keyword_matches_creation_date() {
        let (_dir, store) = fresh_store();
        contract::date_keyword_matches_creation_date(&store);
    }
}
