use crate::ItineraryItem;
use crate::time::is_canonical;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Agenda item id {0} appears more than once")]
    DuplicateId(Uuid),

    #[error("Agenda item at position {0} has an empty title")]
    EmptyTitle(usize),

    #[error("Item '{title}' has time '{time}', expected 24-hour HH:MM")]
    NonCanonicalTime { title: String, time: String },
}

pub fn validate_agenda(items: &[ItineraryItem]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        if !seen.insert(item.id) {
            return Err(ValidationError::DuplicateId(item.id));
        }
        if item.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle(index));
        }
        if !is_canonical(&item.time) {
            return Err(ValidationError::NonCanonicalTime {
                title: item.title.clone(),
                time: item.time.clone(),
            });
        }
    }
    Ok(())
}
