pub mod bracket;
mod itinerary;
pub mod merge;
pub mod reconcile;
pub mod session;
pub mod time;
mod validation;

pub use itinerary::*;
pub use merge::{Agenda, AgendaError, apply_selection};
pub use reconcile::reconcile;
pub use session::{AdvisorySession, AdvisoryStatus, RoundTicket, Selection};
pub use time::{canonical_clock, normalize_time};
pub use validation::*;
