//! Flight bracketing: arrival flight first, departure flight last.

use crate::{ItemKind, ItineraryItem};
use tracing::debug;

const ARRIVAL_MARKERS: &[&str] = &["arrival", "inbound", "arriving"];
const DEPARTURE_MARKERS: &[&str] = &["departure", "outbound", "departing", "return"];

fn find_flight(items: &[ItineraryItem], markers: &[&str], skip: Option<usize>) -> Option<usize> {
    items.iter().enumerate().position(|(i, item)| {
        if Some(i) == skip || item.kind() != ItemKind::Travel {
            return false;
        }
        let title = item.title.to_lowercase();
        markers.iter().any(|m| title.contains(m))
    })
}

/// Index of the arrival flight, if one can be identified.
pub fn find_arrival_flight(items: &[ItineraryItem]) -> Option<usize> {
    find_flight(items, ARRIVAL_MARKERS, None)
}

/// Index of the departure flight, never the same item as the arrival flight.
pub fn find_departure_flight(items: &[ItineraryItem]) -> Option<usize> {
    find_flight(items, DEPARTURE_MARKERS, find_arrival_flight(items))
}

/// Reorder to `[arrival, ...rest in original order, departure]`.
///
/// When either flight cannot be identified the items come back unchanged.
pub fn bracket_flights(mut items: Vec<ItineraryItem>) -> Vec<ItineraryItem> {
    let (Some(arrival), Some(departure)) =
        (find_arrival_flight(&items), find_departure_flight(&items))
    else {
        debug!(
            "Missing arrival or departure flight in {} items, leaving order unchanged",
            items.len()
        );
        return items;
    };

    // Remove the later index first so the earlier one stays valid.
    let (arrival_item, departure_item) = if arrival > departure {
        let a = items.remove(arrival);
        let d = items.remove(departure);
        (a, d)
    } else {
        let d = items.remove(departure);
        let a = items.remove(arrival);
        (a, d)
    };

    let mut ordered = Vec::with_capacity(items.len() + 2);
    ordered.push(arrival_item);
    ordered.extend(items);
    ordered.push(departure_item);
    ordered
}

/// True if the itinerary already starts with its arrival flight and ends
/// with its departure flight.
pub fn is_bracketed(items: &[ItineraryItem]) -> bool {
    match (find_arrival_flight(items), find_departure_flight(items)) {
        (Some(a), Some(d)) => a == 0 && d + 1 == items.len(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityDetails, HotelDetails, ItemDetails, TravelDetails};

    fn flight(title: &str, time: &str) -> ItineraryItem {
        ItineraryItem::new(title, time, ItemDetails::Travel(TravelDetails::default()))
    }

    fn activity(title: &str, time: &str) -> ItineraryItem {
        ItineraryItem::new(title, time, ItemDetails::Activity(ActivityDetails::default()))
    }

    fn hotel(title: &str, time: &str) -> ItineraryItem {
        ItineraryItem::new(title, time, ItemDetails::Hotel(HotelDetails::default()))
    }

    fn titles(items: &[ItineraryItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn moves_flights_to_the_ends() {
        let items = vec![
            activity("Museum", "14:00"),
            flight("Arrival Flight", "10:00"),
            hotel("Hotel", "12:30"),
            flight("Departure Flight", "15:00"),
        ];
        let bracketed = bracket_flights(items);
        assert_eq!(
            titles(&bracketed),
            vec!["Arrival Flight", "Museum", "Hotel", "Departure Flight"]
        );
        assert!(is_bracketed(&bracketed));
    }

    #[test]
    fn departure_listed_before_arrival() {
        let items = vec![
            flight("Outbound flight home", "15:00"),
            activity("Cruise", "19:00"),
            flight("Inbound flight", "10:00"),
        ];
        let bracketed = bracket_flights(items);
        assert_eq!(
            titles(&bracketed),
            vec!["Inbound flight", "Cruise", "Outbound flight home"]
        );
    }

    #[test]
    fn unchanged_without_both_flights() {
        let items = vec![
            activity("Museum", "14:00"),
            flight("Flight SF > Paris", "10:00"),
            hotel("Hotel", "12:30"),
        ];
        let before = items.clone();
        assert_eq!(bracket_flights(items), before);

        let only_arrival = vec![activity("Museum", "14:00"), flight("Arrival", "10:00")];
        let before = only_arrival.clone();
        assert_eq!(bracket_flights(only_arrival), before);
    }

    #[test]
    fn other_travel_items_keep_their_place() {
        let items = vec![
            flight("Arrival Flight", "10:00"),
            flight("Train to Versailles", "09:00"),
            flight("Departure Flight", "15:00"),
            activity("Palace tour", "11:00"),
        ];
        let bracketed = bracket_flights(items);
        assert_eq!(
            titles(&bracketed),
            vec![
                "Arrival Flight",
                "Train to Versailles",
                "Palace tour",
                "Departure Flight"
            ]
        );
    }

    #[test]
    fn non_travel_items_are_never_flights() {
        let items = vec![
            activity("Arrival drinks", "18:00"),
            activity("Departure lounge spa", "12:00"),
        ];
        assert_eq!(find_arrival_flight(&items), None);
        assert_eq!(find_departure_flight(&items), None);
    }
}
