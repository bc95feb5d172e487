use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Placeholder shown wherever a price is unknown.
pub const PRICE_TBD: &str = "TBD";
pub const UNKNOWN_AIRLINE: &str = "Unknown Airline";
pub const DEFAULT_NIGHTLY_RATE: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Travel,
    Hotel,
    Activity,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Travel, ItemKind::Hotel, ItemKind::Activity];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Travel => "travel",
            ItemKind::Hotel => "hotel",
            ItemKind::Activity => "activity",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item kind '{0}' (expected travel, hotel or activity)")]
pub struct UnknownKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownKind;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or(UnknownKind(lowered))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelDetails {
    pub airline: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
    pub price: Option<String>,
}

impl TravelDetails {
    pub fn airline_or_default(&self) -> &str {
        self.airline.as_deref().unwrap_or(UNKNOWN_AIRLINE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelDetails {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub nightly_rate: Option<f64>,
    pub price: Option<String>,
}

impl HotelDetails {
    pub fn nightly_rate_or_default(&self) -> f64 {
        self.nightly_rate
            .filter(|rate| *rate > 0.0)
            .unwrap_or(DEFAULT_NIGHTLY_RATE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityDetails {
    pub date: Option<String>,
    pub price: Option<String>,
}

/// Kind-specific data attached to an itinerary item. The variant is the
/// item's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDetails {
    Travel(TravelDetails),
    Hotel(HotelDetails),
    Activity(ActivityDetails),
}

impl ItemDetails {
    /// Empty details of the given kind.
    pub fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Travel => ItemDetails::Travel(TravelDetails::default()),
            ItemKind::Hotel => ItemDetails::Hotel(HotelDetails::default()),
            ItemKind::Activity => ItemDetails::Activity(ActivityDetails::default()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemDetails::Travel(_) => ItemKind::Travel,
            ItemDetails::Hotel(_) => ItemKind::Hotel,
            ItemDetails::Activity(_) => ItemKind::Activity,
        }
    }

    pub fn price(&self) -> Option<&str> {
        match self {
            ItemDetails::Travel(d) => d.price.as_deref(),
            ItemDetails::Hotel(d) => d.price.as_deref(),
            ItemDetails::Activity(d) => d.price.as_deref(),
        }
    }

    pub fn set_price(&mut self, price: Option<String>) {
        match self {
            ItemDetails::Travel(d) => d.price = price,
            ItemDetails::Hotel(d) => d.price = price,
            ItemDetails::Activity(d) => d.price = price,
        }
    }
}

/// A planned element of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: Uuid,
    pub title: String,
    /// Canonical 24-hour `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pinned: bool,
    pub details: ItemDetails,
}

impl ItineraryItem {
    pub fn new(title: impl Into<String>, time: impl Into<String>, details: ItemDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            time: time.into(),
            description: String::new(),
            pinned: false,
            details,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    pub fn price_or_tbd(&self) -> &str {
        self.details
            .price()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(PRICE_TBD)
    }
}

/// An item as read from model output, before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,
    pub kind: ItemKind,
    /// Already passed through the time normalizer.
    pub time: String,
    pub description: String,
    pub price: Option<String>,
}

/// One alternative proposed by the generation backend, pre-reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItinerary {
    pub explanation: String,
    pub items: Vec<CandidateItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeItinerary {
    pub items: Vec<ItineraryItem>,
    pub explanation: String,
}

/// Output of one advisory round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub original_itinerary: Vec<ItineraryItem>,
    pub alternative_itineraries: Vec<AlternativeItinerary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Travel".parse::<ItemKind>(), Ok(ItemKind::Travel));
        assert_eq!(" HOTEL ".parse::<ItemKind>(), Ok(ItemKind::Hotel));
        assert_eq!(
            "cruise".parse::<ItemKind>(),
            Err(UnknownKind("cruise".to_string()))
        );
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let item = ItineraryItem::new(
            "Flight SF > Paris",
            "10:00",
            ItemDetails::Travel(TravelDetails {
                airline: Some("Air France".to_string()),
                departure_time: Some("10:00 AM".to_string()),
                ..Default::default()
            }),
        )
        .pinned();

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["details"]["type"], "travel");
        assert_eq!(json["details"]["airline"], "Air France");
        assert_eq!(json["details"]["departureTime"], "10:00 AM");
        assert_eq!(json["pinned"], true);

        let back: ItineraryItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn missing_detail_fields_fall_back_to_placeholders() {
        let item: ItineraryItem = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Mystery flight",
            "time": "09:00",
            "details": {"type": "travel"}
        }))
        .unwrap();

        assert_eq!(item.kind(), ItemKind::Travel);
        assert_eq!(item.price_or_tbd(), PRICE_TBD);
        assert!(!item.pinned);
        match &item.details {
            ItemDetails::Travel(d) => assert_eq!(d.airline_or_default(), UNKNOWN_AIRLINE),
            other => panic!("unexpected details: {:?}", other),
        }

        let hotel = HotelDetails {
            nightly_rate: Some(0.0),
            ..Default::default()
        };
        assert_eq!(hotel.nightly_rate_or_default(), DEFAULT_NIGHTLY_RATE);
    }
}
