use super::{UNSCHEDULED_TIME, field, fill_template, format_usd, option_blocks};
use crate::client::{ChatBackend, GenerationOptions, LlmClient, LlmConfig, generate};
use crate::error::GenerationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use tripweave_core::{DEFAULT_NIGHTLY_RATE, HotelDetails, ItemDetails, ItineraryItem};

pub const TAX_RATE: f64 = 0.15;
pub const RESORT_FEE_PER_NIGHT: f64 = 25.0;
pub const SERVICE_FEE: f64 = 50.0;

/// Nights priced when no stay dates are known.
const DEFAULT_STAY_NIGHTS: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelOption {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Whole dollars; 0 when the model gave no usable rate.
    pub nightly_rate: u32,
    pub rating: f32,
    pub location: String,
    pub amenities: Vec<String>,
}

/// Whole-dollar part of a price like `$1,250.99`.
fn whole_dollars(text: &str) -> u32 {
    let integral = text.split('.').next().unwrap_or_default();
    let digits: String = integral.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn leading_number(text: &str) -> f32 {
    let number: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().unwrap_or(0.0)
}

impl HotelOption {
    fn from_block(index: usize, lines: &[String]) -> Self {
        Self {
            id: format!("hotel-{index}"),
            name: field(lines, 0, "Unknown Hotel"),
            description: field(lines, 1, "No description available"),
            nightly_rate: lines.get(2).map(|l| whole_dollars(l)).unwrap_or(0),
            rating: lines.get(3).map(|l| leading_number(l)).unwrap_or(0.0),
            location: field(lines, 4, "Unknown Location"),
            amenities: lines
                .get(5)
                .map(|l| {
                    l.split(',')
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    fn rate_or_default(&self) -> f64 {
        if self.nightly_rate > 0 {
            f64::from(self.nightly_rate)
        } else {
            DEFAULT_NIGHTLY_RATE
        }
    }

    /// Unpinned hotel item. With stay dates the price is the full stay
    /// total; without, a six-night estimate.
    pub fn into_item(self, stay: Option<(NaiveDate, NaiveDate)>) -> ItineraryItem {
        let rate = self.rate_or_default();
        let (check_in, check_out, price) = match stay {
            Some((check_in, check_out)) => (
                Some(check_in.format("%Y-%m-%d").to_string()),
                Some(check_out.format("%Y-%m-%d").to_string()),
                format_usd(calculate_total_price(
                    Some(rate),
                    Some(check_in),
                    Some(check_out),
                )),
            ),
            None => (None, None, format_usd(rate * DEFAULT_STAY_NIGHTS)),
        };

        ItineraryItem::new(
            self.name,
            UNSCHEDULED_TIME,
            ItemDetails::Hotel(HotelDetails {
                check_in,
                check_out,
                nightly_rate: Some(rate),
                price: Some(price),
            }),
        )
        .with_description(self.description)
    }
}

/// Total for a stay: rate × nights, plus tax, a per-night resort fee and
/// a one-off service fee.
///
/// Missing or non-positive rates fall back to the default nightly rate;
/// missing or inverted dates count as one night.
pub fn calculate_total_price(
    nightly_rate: Option<f64>,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
) -> f64 {
    let rate = nightly_rate
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_NIGHTLY_RATE);
    let nights = match (check_in, check_out) {
        (Some(check_in), Some(check_out)) if check_in < check_out => {
            (check_out - check_in).num_days().max(1) as f64
        }
        _ => 1.0,
    };

    let subtotal = rate * nights;
    subtotal + subtotal * TAX_RATE + RESORT_FEE_PER_NIGHT * nights + SERVICE_FEE
}

pub(crate) fn hotel_prompt(location: &str) -> (String, String) {
    let instruction = fill_template(
        include_str!("../../prompts/hotels.md"),
        &[("location", location)],
    );
    (instruction, format!("Find hotels in {location}."))
}

pub(crate) fn parse_hotels(raw: &str) -> Vec<HotelOption> {
    option_blocks(raw)
        .iter()
        .enumerate()
        .map(|(i, lines)| HotelOption::from_block(i, lines))
        .collect()
}

pub async fn search_hotels(
    location: &str,
    config: LlmConfig,
) -> Result<Vec<HotelOption>, GenerationError> {
    let client = LlmClient::new(config);
    search_hotels_with_backend(&client, location, &GenerationOptions::search()).await
}

pub async fn search_hotels_with_backend(
    backend: &impl ChatBackend,
    location: &str,
    options: &GenerationOptions,
) -> Result<Vec<HotelOption>, GenerationError> {
    info!("Searching hotels in {}", location);
    let (instruction, data) = hotel_prompt(location);
    let raw = generate(backend, &instruction, &data, options).await?;
    let hotels = parse_hotels(&raw);
    info!("Found {} hotel options", hotels.len());
    Ok(hotels)
}
