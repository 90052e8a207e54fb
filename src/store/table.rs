use super::ListStore;
use crate::errors::{AppError, AppResult};
use crate::models::Item;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// A list kept as rows of the `items` table, scoped by `list_name`.
///
/// The connection is owned by the store and closed when it is dropped.
#[derive(Debug)]
pub struct TableStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    list_name: String,
}

impl TableStore {
    pub fn open(path: &Path, list_name: &str) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        Self::with_connection(conn, Some(path.to_path_buf()), list_name)
    }

    pub fn open_in_memory(list_name: &str) -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::from)?;
        Self::with_connection(conn, None, list_name)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>, list_name: &str) -> AppResult<Self> {
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            list_name: list_name.to_string(),
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn remove_first(&self, predicate: impl Fn(&Item) -> bool) -> AppResult<Option<Item>> {
        let mut conn = self.conn.lock().map_err(|_| AppError::Storage("database mutex poisoned".to_string()))?;
        let tx = conn.transaction()?;

        let Some((item_id, item)) = load_rows(&tx, &self.list_name)?
            .into_iter()
            .find(|(_, item)| predicate(item))
        else {
            return Ok(None);
        };

        delete_and_renumber(&tx, &self.list_name, item_id, item.number)?;
        tx.commit()?;

        tracing::info!(list = %self.list_name, number = item.number, "removed item");
        Ok(Some(item))
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<(i64, Item)> {
    Ok((
        row.get(0)?,
        Item {
            number: row.get(1)?,
            task: row.get(2)?,
            date_created: row.get(3)?,
            time_created: row.get(4)?,
        },
    ))
}

fn load_rows(conn: &Connection, list_name: &str) -> AppResult<Vec<(i64, Item)>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, list_number, task, date_created, time_created
         FROM items
         WHERE list_name = ?1
         ORDER BY list_number ASC",
    )?;
    let rows = stmt
        .query_map([list_name], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn count_rows(conn: &Connection, list_name: &str) -> AppResult<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(item_id) FROM items WHERE list_name = ?1",
        [list_name],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Delete one row, then close the gap it leaves in a single bulk update.
/// Callers run this inside the transaction that located the row.
fn delete_and_renumber(conn: &Connection, list_name: &str, item_id: i64, number: u32) -> AppResult<()> {
    conn.execute("DELETE FROM items WHERE item_id = ?1", [item_id])?;
    conn.execute(
        "UPDATE items SET list_number = list_number - 1 WHERE list_name = ?1 AND list_number > ?2",
        params![list_name, number],
    )?;
    Ok(())
}

impl ListStore for TableStore {
    fn list_name(&self) -> &str {
        &self.list_name
    }

    fn count(&self) -> AppResult<u32> {
        let conn = self.conn.lock().map_err(|_| AppError::Storage("database mutex poisoned".to_string()))?;
        count_rows(&conn, &self.list_name)
    }

    fn add(&self, task: &str) -> AppResult<Item> {
        let mut conn = self.conn.lock().map_err(|_| AppError::Storage("database mutex poisoned".to_string()))?;
        let tx = conn.transaction()?;

        let item = Item::new(count_rows(&tx, &self.list_name)? + 1, task);
        tx.execute(
            "INSERT INTO items (list_name, list_number, task, date_created, time_created)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.list_name,
                item.number,
                item.task,
                item.date_created,
                item.time_created,
            ],
        )?;
        tx.commit()?;

        tracing::info!(list = %self.list_name, number = item.number, "added item");
        Ok(item)
    }

    fn remove_by_number(&self, number: u32) -> AppResult<Option<Item>> {
        let mut conn = self.conn.lock().map_err(|_| AppError::Storage("database mutex poisoned".to_string()))?;
        let tx = conn.transaction()?;

        let found = tx
            .query_row(
                "SELECT item_id, list_number, task, date_created, time_created
                 FROM items
                 WHERE list_name = ?1 AND list_number = ?2",
                params![self.list_name, number],
                row_to_item,
            )
            .optional()?;
        let Some((item_id, item)) = found else {
            return Ok(None);
        };

        delete_and_renumber(&tx, &self.list_name, item_id, number)?;
        tx.commit()?;

        tracing::info!(list = %self.list_name, number, "removed item");
        Ok(Some(item))
    }

    fn remove_by_keyword(&self, keyword: &str) -> AppResult<Option<Item>> {
        self.remove_first(|item| item.matches(keyword))
    }

    fn get_all(&self) -> AppResult<Vec<Item>> {
        let conn = self.conn.lock().map_err(|_| AppError::Storage("database mutex poisoned".to_string()))?;
        Ok(load_rows(&conn, &self.list_name)?
            .into_iter()
            .map(|(_, item)| item)
            .collect())
    }
}
