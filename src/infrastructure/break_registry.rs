use crate::domain::interval::{minute_of_day, overlaps};
use crate::domain::models::BreakSlot;
use crate::infrastructure::break_store::BreakStore;
use crate::infrastructure::error::EngineError;
use chrono::NaiveTime;
use std::sync::{Arc, Mutex};

type ChangeListener = Box<dyn Fn() + Send + Sync>;

pub struct BreakRegistry {
    store: Arc<dyn BreakStore>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl BreakRegistry {
    pub fn new(store: Arc<dyn BreakStore>) -> Self {
        Self {
            store,
            listeners: Mutex::new(Vec::new()),
        }
    }

    // Always reads through the store so edits from any writer are visible immediately.
    pub fn list(&self) -> Result<Vec<BreakSlot>, EngineError> {
        self.store.load()
    }

    // Point containment is the one-minute degenerate span of the shared
    // overlap definition, so boundary behavior matches the conflict checks.
    pub fn is_blocked(&self, time_of_day: NaiveTime) -> Result<Option<BreakSlot>, EngineError> {
        let minute = minute_of_day(time_of_day);
        Ok(self.store.load()?.into_iter().find(|slot| {
            overlaps(
                minute,
                minute + 1,
                minute_of_day(slot.start),
                minute_of_day(slot.end),
            )
        }))
    }

    pub fn add(&self, slot: BreakSlot) -> Result<(), EngineError> {
        slot.validate().map_err(EngineError::InvalidConfig)?;
        let mut slots = self.store.load()?;
        slots.retain(|existing| existing.id != slot.id);
        slots.push(slot);
        self.store.save(&slots)?;
        log::debug!("break registry: added slot, {} total", slots.len());
        self.notify();
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<bool, EngineError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(false);
        }
        let mut slots = self.store.load()?;
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        if slots.len() == before {
            return Ok(false);
        }
        self.store.save(&slots)?;
        log::debug!("break registry: removed slot {id}");
        self.notify();
        Ok(true)
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let Ok(mut listeners) = self.listeners.lock() else {
            return;
        };
        listeners.push(Box::new(listener));
    }

    fn notify(&self) {
        let Ok(listeners) = self.listeners.lock() else {
            return;
        };
        for listener in listeners.iter() {
            listener();
        }
    }
}
