use crate::time::normalize_time;
use crate::{ItineraryItem, ValidationError, validate_agenda};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgendaError {
    #[error("No agenda item with id {0}")]
    UnknownItem(Uuid),

    #[error("Pinned item '{0}' cannot be moved or removed")]
    Pinned(String),

    #[error("Position {index} is out of range for an agenda of {len} items")]
    OutOfRange { index: usize, len: usize },
}

/// Copy `chosen` with every item given a fresh identifier.
///
/// Identifiers never repeat across calls, even when the same items are
/// applied twice.
pub fn apply_selection(chosen: &[ItineraryItem]) -> Vec<ItineraryItem> {
    chosen
        .iter()
        .map(|item| ItineraryItem {
            id: Uuid::new_v4(),
            ..item.clone()
        })
        .collect()
}

/// The authoritative, in-memory agenda.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Agenda {
    items: Vec<ItineraryItem>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize every item time, then validate the result.
    pub fn from_items(mut items: Vec<ItineraryItem>) -> Result<Self, ValidationError> {
        for item in &mut items {
            item.time = normalize_time(&item.time);
        }
        validate_agenda(&items)?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ItineraryItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ItineraryItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pinned(&self) -> impl Iterator<Item = &ItineraryItem> {
        self.items.iter().filter(|i| i.pinned)
    }

    pub fn flexible(&self) -> impl Iterator<Item = &ItineraryItem> {
        self.items.iter().filter(|i| !i.pinned)
    }

    /// Append an item; its time is normalized on the way in.
    pub fn push(&mut self, mut item: ItineraryItem) -> Uuid {
        item.time = normalize_time(&item.time);
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Result<ItineraryItem, AgendaError> {
        let index = self.index_of(id)?;
        if self.items[index].pinned {
            return Err(AgendaError::Pinned(self.items[index].title.clone()));
        }
        Ok(self.items.remove(index))
    }

    /// Flip the pin and return the new state.
    pub fn toggle_pin(&mut self, id: Uuid) -> Result<bool, AgendaError> {
        let index = self.index_of(id)?;
        let item = &mut self.items[index];
        item.pinned = !item.pinned;
        Ok(item.pinned)
    }

    /// Drag-and-drop reorder. Pinned items stay where they are.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), AgendaError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(AgendaError::OutOfRange { index, len });
            }
        }
        if self.items[from].pinned {
            return Err(AgendaError::Pinned(self.items[from].title.clone()));
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Swap the whole agenda for `chosen`, re-identified.
    pub fn replace_with_selection(&mut self, chosen: &[ItineraryItem]) {
        let fresh = apply_selection(chosen);
        info!(
            "Replacing agenda of {} items with selection of {}",
            self.items.len(),
            fresh.len()
        );
        self.items = fresh;
    }

    fn index_of(&self, id: Uuid) -> Result<usize, AgendaError> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .ok_or(AgendaError::UnknownItem(id))
    }
}
