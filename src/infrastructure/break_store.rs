use crate::domain::models::BreakSlot;
use crate::infrastructure::error::EngineError;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait BreakStore: Send + Sync {
    fn load(&self) -> Result<Vec<BreakSlot>, EngineError>;
    fn save(&self, slots: &[BreakSlot]) -> Result<(), EngineError>;
}

#[derive(Debug, Default)]
pub struct InMemoryBreakStore {
    slots: Mutex<Vec<BreakSlot>>,
}

impl BreakStore for InMemoryBreakStore {
    fn load(&self) -> Result<Vec<BreakSlot>, EngineError> {
        let slots = self
            .slots
            .lock()
            .map_err(|error| EngineError::InvalidConfig(format!("break store lock poisoned: {error}")))?;
        Ok(slots.clone())
    }

    fn save(&self, slots: &[BreakSlot]) -> Result<(), EngineError> {
        let mut stored = self
            .slots
            .lock()
            .map_err(|error| EngineError::InvalidConfig(format!("break store lock poisoned: {error}")))?;
        *stored = slots.to_vec();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SqliteBreakStore {
    db_path: PathBuf,
}

impl SqliteBreakStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, EngineError> {
        Connection::open(&self.db_path).map_err(EngineError::from)
    }
}

impl BreakStore for SqliteBreakStore {
    fn load(&self) -> Result<Vec<BreakSlot>, EngineError> {
        let connection = self.connect()?;
        let payload: Option<String> = connection
            .query_row("SELECT payload FROM break_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(payload) = payload else {
            return Ok(Vec::new());
        };
        let slots: Vec<BreakSlot> = serde_json::from_str(&payload)?;
        Ok(slots)
    }

    fn save(&self, slots: &[BreakSlot]) -> Result<(), EngineError> {
        let payload = serde_json::to_string(slots)?;
        let connection = self.connect()?;
        connection.execute(
            "INSERT INTO break_state (id, payload)
             VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET payload = excluded.payload",
            params![payload],
        )?;
        Ok(())
    }
}
