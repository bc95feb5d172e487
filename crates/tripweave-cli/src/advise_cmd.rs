use anyhow::{Context, Result, anyhow, bail};
use std::fmt::Write as _;
use tracing::warn;
use tripweave_core::{
    AdviceResult, AdvisorySession, AdvisoryStatus, Agenda, ItineraryItem, Selection,
};
use tripweave_llm::advisor::request_advice_with_backend;
use tripweave_llm::{AdviceError, ChatBackend, GenerationOptions};

/// Parse `original` or a 1-based alternative number.
pub fn parse_selection(value: &str) -> Result<Selection, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("original") {
        return Ok(Selection::Original);
    }
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Selection::Alternative(n - 1)),
        _ => Err(format!(
            "expected 'original' or an alternative number starting at 1, got '{value}'"
        )),
    }
}

#[derive(Debug)]
pub struct AdviseReport {
    pub advice: AdviceResult,
    /// The applied agenda, when a selection was requested.
    pub applied: Option<Vec<ItineraryItem>>,
}

/// Run one advisory round, retrying retryable failures up to `retries`
/// times, then optionally apply `selection`.
pub async fn advise(
    backend: &impl ChatBackend,
    agenda: &Agenda,
    selection: Option<Selection>,
    retries: u32,
) -> Result<AdviseReport> {
    let mut session: AdvisorySession<AdviceError> = AdvisorySession::new();
    let mut ticket = session
        .open()
        .context("Advisory session did not start a round")?;
    let mut attempt = 0;

    loop {
        let outcome = request_advice_with_backend(
            backend,
            agenda.items(),
            &GenerationOptions::advice(),
        )
        .await
        .map(|outcome| {
            for warning in &outcome.warnings {
                warn!("{}", warning);
            }
            outcome.advice
        });
        session.complete(ticket, outcome);

        let reason = match session.status() {
            AdvisoryStatus::Ready(_) => break,
            AdvisoryStatus::Failed(e) if e.is_retryable() && attempt < retries => e.to_string(),
            AdvisoryStatus::Failed(e) => {
                return Err(anyhow!(e.clone())).context("Advisory round failed");
            }
            AdvisoryStatus::Idle | AdvisoryStatus::Loading => {
                bail!("Advisory round did not settle")
            }
        };

        attempt += 1;
        warn!("Advisory round failed ({}), retry {}/{}", reason, attempt, retries);
        ticket = session
            .retry()
            .context("Advisory session refused to retry")?;
    }

    let AdvisoryStatus::Ready(advice) = session.status() else {
        bail!("Advisory round did not settle");
    };
    let advice = advice.clone();

    let applied = match selection {
        Some(selection) => {
            if session.select(selection).is_none() {
                bail!(
                    "No such itinerary: {} alternatives available",
                    advice.alternative_itineraries.len()
                );
            }
            match session.apply() {
                Some(items) => Some(
                    Agenda::from_items(items)
                        .context("Selected itinerary is not a valid agenda")?
                        .into_items(),
                ),
                None => None,
            }
        }
        None => None,
    };

    Ok(AdviseReport { advice, applied })
}

fn render_items(out: &mut String, items: &[ItineraryItem]) {
    for item in items {
        let _ = writeln!(
            out,
            "  {}  {}{} ({}) - {}",
            item.time,
            if item.pinned { "[pinned] " } else { "" },
            item.title,
            item.kind(),
            item.price_or_tbd()
        );
    }
}

/// Human-readable listing of the original and every alternative.
pub fn render_advice(advice: &AdviceResult) -> String {
    let mut out = String::from("ORIGINAL:\n");
    render_items(&mut out, &advice.original_itinerary);
    for (i, alternative) in advice.alternative_itineraries.iter().enumerate() {
        let _ = writeln!(out, "\nALTERNATIVE {}: {}", i + 1, alternative.explanation);
        render_items(&mut out, &alternative.items);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tripweave_core::{ActivityDetails, ItemDetails, TravelDetails};
    use tripweave_llm::{ChatResponse, Choice, GenerationError, Message};

    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, GenerationError>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    impl ChatBackend for ScriptedBackend {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn chat(
            &self,
            _messages: Vec<Message>,
            _options: &GenerationOptions,
        ) -> Result<ChatResponse, GenerationError> {
            let text = self.replies.lock().unwrap().remove(0)?;
            Ok(ChatResponse {
                id: String::new(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(text),
                    finish_reason: None,
                }],
                usage: None,
            })
        }
    }

    fn agenda() -> Agenda {
        let flight = |title: &str, time: &str| {
            ItineraryItem::new(title, time, ItemDetails::Travel(TravelDetails::default())).pinned()
        };
        Agenda::from_items(vec![
            flight("Arrival Flight", "09:00"),
            ItineraryItem::new(
                "Louvre",
                "14:00",
                ItemDetails::Activity(ActivityDetails::default()),
            ),
            flight("Departure Flight", "18:00"),
        ])
        .unwrap()
    }

    const REPLY: &str = "ALTERNATIVE 1:\nOutdoors.\n\
        Arrival Flight | travel | 09:00 | In | \n\
        Tuileries Picnic | activity | 12:00 | Lunch | $30\n\
        Departure Flight | travel | 18:00 | Out | \n\
        ALTERNATIVE 2:\nFood.\n\
        Arrival Flight | travel | 09:00 | In | \n\
        Cheese Tasting | activity | 13:00 | Fromagerie | $55\n\
        Departure Flight | travel | 18:00 | Out | \n";

    #[test]
    fn selections_are_one_based() {
        assert_eq!(parse_selection("original"), Ok(Selection::Original));
        assert_eq!(parse_selection(" Original "), Ok(Selection::Original));
        assert_eq!(parse_selection("1"), Ok(Selection::Alternative(0)));
        assert_eq!(parse_selection("2"), Ok(Selection::Alternative(1)));
        assert!(parse_selection("0").is_err());
        assert!(parse_selection("best").is_err());
    }

    #[tokio::test]
    async fn applied_selection_gets_fresh_ids() {
        let agenda = agenda();
        let backend = ScriptedBackend::new(vec![Ok(REPLY.to_string())]);

        let report = advise(&backend, &agenda, Some(Selection::Alternative(1)), 0)
            .await
            .unwrap();
        assert_eq!(report.advice.alternative_itineraries.len(), 2);

        let applied = report.applied.unwrap();
        let titles: Vec<&str> = applied.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Arrival Flight", "Cheese Tasting", "Departure Flight"]);

        let old_ids: HashSet<_> = agenda.items().iter().map(|i| i.id).collect();
        assert!(applied.iter().all(|i| !old_ids.contains(&i.id)));
        Agenda::from_items(applied).unwrap();
    }

    #[tokio::test]
    async fn applied_times_are_canonical() {
        let reply = "ALTERNATIVE 1:\nEarly start.\n\
            Arrival Flight | travel | 09:00 | In | \n\
            Tuileries Walk | activity | 9:30 | Gardens | $0\n\
            Departure Flight | travel | 18:00 | Out | \n";
        let backend = ScriptedBackend::new(vec![Ok(reply.to_string())]);

        let report = advise(&backend, &agenda(), Some(Selection::Alternative(0)), 0)
            .await
            .unwrap();
        let applied = report.applied.unwrap();
        let times: Vec<&str> = applied.iter().map(|i| i.time.as_str()).collect();
        assert_eq!(times, vec!["09:00", "09:30", "18:00"]);
        Agenda::from_items(applied).unwrap();
    }

    #[tokio::test]
    async fn unreadable_times_fail_before_applying() {
        let reply = "ALTERNATIVE 1:\nLoose.\n\
            Arrival Flight | travel | 09:00 | In | \n\
            Picnic | activity | sometime | Lunch | $30\n\
            Departure Flight | travel | 18:00 | Out | \n";
        let backend = ScriptedBackend::new(vec![Ok(reply.to_string())]);

        let err = advise(&backend, &agenda(), Some(Selection::Alternative(0)), 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a valid agenda"));
        assert!(format!("{err:#}").contains("sometime"));
    }

    #[tokio::test]
    async fn retryable_failures_are_retried() {
        let backend = ScriptedBackend::new(vec![
            Ok("nothing parseable".to_string()),
            Err(GenerationError::Timeout(std::time::Duration::from_secs(1))),
            Ok(REPLY.to_string()),
        ]);
        let report = advise(&backend, &agenda(), None, 2).await.unwrap();
        assert!(report.applied.is_none());
        assert_eq!(report.advice.original_itinerary.len(), 3);
    }

    #[tokio::test]
    async fn retries_run_out() {
        let backend = ScriptedBackend::new(vec![
            Ok("nothing parseable".to_string()),
            Ok("still nothing".to_string()),
        ]);
        let err = advise(&backend, &agenda(), None, 1).await.unwrap_err();
        assert!(format!("{err:#}").contains("No valid alternatives"));
    }

    #[tokio::test]
    async fn missing_credentials_are_not_retried() {
        let backend = ScriptedBackend::new(vec![Err(GenerationError::NoCredentials)]);
        let err = advise(&backend, &agenda(), None, 5).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<AdviceError>().map(AdviceError::reason),
            Some("no_credentials")
        );
    }

    #[tokio::test]
    async fn unknown_alternative_is_an_error() {
        let backend = ScriptedBackend::new(vec![Ok(REPLY.to_string())]);
        let err = advise(&backend, &agenda(), Some(Selection::Alternative(4)), 0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("2 alternatives available"));
    }

    #[test]
    fn listing_marks_pinned_items() {
        let agenda = agenda();
        let advice = AdviceResult {
            original_itinerary: agenda.items().to_vec(),
            alternative_itineraries: Vec::new(),
        };
        let listing = render_advice(&advice);
        assert!(listing.starts_with("ORIGINAL:\n  09:00  [pinned] Arrival Flight (travel) - TBD\n"));
        assert!(listing.contains("  14:00  Louvre (activity) - TBD"));
    }
}
