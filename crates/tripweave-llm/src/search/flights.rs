use super::{UNSCHEDULED_TIME, field, fill_template, option_blocks};
use crate::client::{ChatBackend, GenerationOptions, LlmClient, LlmConfig, generate};
use crate::error::GenerationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use tripweave_core::time::is_canonical;
use tripweave_core::{
    ItemDetails, ItineraryItem, TravelDetails, UNKNOWN_AIRLINE, normalize_time,
};

const UNKNOWN_TIME: &str = "Unknown Time";
const UNKNOWN_PRICE: &str = "Unknown Price";
const UNKNOWN_DURATION: &str = "Unknown Duration";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub depart: NaiveDate,
    pub return_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOption {
    pub id: String,
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: String,
    pub duration: String,
}

impl FlightOption {
    fn from_block(index: usize, lines: &[String]) -> Self {
        Self {
            id: format!("flight-{index}"),
            airline: field(lines, 0, UNKNOWN_AIRLINE),
            departure_time: field(lines, 1, UNKNOWN_TIME),
            arrival_time: field(lines, 2, UNKNOWN_TIME),
            price: field(lines, 3, UNKNOWN_PRICE),
            duration: field(lines, 4, UNKNOWN_DURATION),
        }
    }

    /// Unpinned travel item scheduled at the departure time.
    pub fn into_item(self) -> ItineraryItem {
        let time = normalize_time(&self.departure_time);
        let time = if is_canonical(&time) {
            time
        } else {
            UNSCHEDULED_TIME.to_string()
        };
        let description = format!(
            "{} - {} ({})",
            self.departure_time, self.arrival_time, self.duration
        );
        let price = (self.price != UNKNOWN_PRICE).then_some(self.price);

        ItineraryItem::new(
            format!("{} Flight", self.airline),
            time,
            ItemDetails::Travel(TravelDetails {
                airline: Some(self.airline),
                departure_time: Some(self.departure_time),
                arrival_time: Some(self.arrival_time),
                duration: Some(self.duration),
                price,
            }),
        )
        .with_description(description)
    }
}

pub(crate) fn flight_prompt(query: &FlightQuery) -> (String, String) {
    let depart = query.depart.format("%Y-%m-%d").to_string();
    let return_date = query.return_date.format("%Y-%m-%d").to_string();
    let instruction = fill_template(
        include_str!("../../prompts/flights.md"),
        &[
            ("origin", &query.origin),
            ("destination", &query.destination),
            ("depart", &depart),
            ("return_date", &return_date),
        ],
    );
    let data = format!(
        "Find flights from {} to {} for the specified dates.",
        query.origin, query.destination
    );
    (instruction, data)
}

pub(crate) fn parse_flights(raw: &str) -> Vec<FlightOption> {
    option_blocks(raw)
        .iter()
        .enumerate()
        .map(|(i, lines)| FlightOption::from_block(i, lines))
        .collect()
}

pub async fn search_flights(
    query: &FlightQuery,
    config: LlmConfig,
) -> Result<Vec<FlightOption>, GenerationError> {
    let client = LlmClient::new(config);
    search_flights_with_backend(&client, query, &GenerationOptions::search()).await
}

pub async fn search_flights_with_backend(
    backend: &impl ChatBackend,
    query: &FlightQuery,
    options: &GenerationOptions,
) -> Result<Vec<FlightOption>, GenerationError> {
    info!(
        "Searching flights {} -> {} ({} to {})",
        query.origin, query.destination, query.depart, query.return_date
    );
    let (instruction, data) = flight_prompt(query);
    let raw = generate(backend, &instruction, &data, options).await?;
    let flights = parse_flights(&raw);
    info!("Found {} flight options", flights.len());
    Ok(flights)
}
