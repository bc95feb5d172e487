mod advise_cmd;
mod agenda_file;
mod config;
mod logging;
mod search_cmd;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tripweave_core::Selection;
use tripweave_llm::search::{
    FlightQuery, search_activities, search_flights, search_hotels, suggest_activities,
};

use advise_cmd::{advise, parse_selection, render_advice};
use agenda_file::{agenda_json, load_agenda, save_agenda};
use config::{BackendFlags, resolve_llm_config};
use search_cmd::{AddTarget, finish_search};

#[derive(Parser)]
#[command(name = "tripweave", about = "Trip itinerary advisor")]
struct Cli {
    /// Chat-completions base URL (overrides TRIPWEAVE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model name (overrides TRIPWEAVE_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Request timeout in seconds, 0 for none (overrides TRIPWEAVE_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Directory for the JSON trace log
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for two alternative itineraries around the pinned items
    Advise {
        /// Agenda JSON file
        agenda: PathBuf,
        /// Apply 'original' or alternative N (1-based)
        #[arg(long, value_parser = parse_selection)]
        select: Option<Selection>,
        /// Write the applied agenda here instead of stdout
        #[arg(long, requires = "select")]
        output: Option<PathBuf>,
        /// Re-run a failed round this many times
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Search for flights, hotels or activities
    Search {
        #[command(subcommand)]
        target: SearchTarget,
    },
    /// Quick activity ideas for a free-form request
    Suggest {
        prompt: String,
    },
}

#[derive(Subcommand)]
enum SearchTarget {
    /// Round-trip flight options
    Flights {
        origin: String,
        destination: String,
        /// Outbound date (YYYY-MM-DD)
        #[arg(long)]
        depart: NaiveDate,
        /// Return date (YYYY-MM-DD)
        #[arg(long = "return")]
        return_date: NaiveDate,
        #[command(flatten)]
        add: AddArgs,
    },
    /// Hotel options in a location
    Hotels {
        location: String,
        /// Check-in date (YYYY-MM-DD), prices the full stay with --check-out
        #[arg(long, requires = "check_out")]
        check_in: Option<NaiveDate>,
        #[arg(long, requires = "check_in")]
        check_out: Option<NaiveDate>,
        #[command(flatten)]
        add: AddArgs,
    },
    /// Activity options in a location matching a request
    Activities {
        location: String,
        request: String,
        /// Date to attach to the added item (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        add: AddArgs,
    },
}

#[derive(Args)]
struct AddArgs {
    /// Append the picked option to this agenda file
    #[arg(long)]
    add_to: Option<PathBuf>,
    /// Option number to add (1-based)
    #[arg(long, requires = "add_to")]
    pick: Option<usize>,
    /// Time for the added item (defaults to the option's own or 00:00)
    #[arg(long, requires = "add_to")]
    at: Option<String>,
}

impl AddArgs {
    fn target(&self) -> AddTarget<'_> {
        AddTarget {
            agenda: self.add_to.as_deref(),
            pick: self.pick,
            at: self.at.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = match logging::init_tracing(&cli.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e:#}");
            None
        }
    };

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("error: {e:#}");
        // flush the file log before exiting
        drop(guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_llm_config(&BackendFlags {
        base_url: cli.base_url,
        model: cli.model,
        timeout_secs: cli.timeout_secs,
    });

    match cli.command {
        Commands::Advise {
            agenda,
            select,
            output,
            retries,
        } => {
            let agenda = load_agenda(&agenda)?;
            let client = tripweave_llm::LlmClient::new(config);
            let report = advise(&client, &agenda, select, retries).await?;

            match (report.applied, output) {
                (Some(applied), Some(path)) => {
                    println!("{}", render_advice(&report.advice));
                    save_agenda(&path, &applied)?;
                    println!("Applied agenda written to {}", path.display());
                }
                (Some(applied), None) => {
                    // stdout carries the JSON; the listing goes to stderr
                    eprintln!("{}", render_advice(&report.advice));
                    println!("{}", agenda_json(&applied)?);
                }
                (None, _) => println!("{}", render_advice(&report.advice)),
            }
        }
        Commands::Search { target } => match target {
            SearchTarget::Flights {
                origin,
                destination,
                depart,
                return_date,
                add,
            } => {
                let query = FlightQuery {
                    origin,
                    destination,
                    depart,
                    return_date,
                };
                let flights = search_flights(&query, config)
                    .await
                    .context("Flight search failed")?;
                finish_search(&flights, &add.target(), |f| f.into_item())?;
            }
            SearchTarget::Hotels {
                location,
                check_in,
                check_out,
                add,
            } => {
                let hotels = search_hotels(&location, config)
                    .await
                    .context("Hotel search failed")?;
                let stay = check_in.zip(check_out);
                finish_search(&hotels, &add.target(), |h| h.into_item(stay))?;
            }
            SearchTarget::Activities {
                location,
                request,
                date,
                add,
            } => {
                let activities = search_activities(&request, &location, config)
                    .await
                    .context("Activity search failed")?;
                finish_search(&activities, &add.target(), |a| a.into_item(date))?;
            }
        },
        Commands::Suggest { prompt } => {
            let suggestions = suggest_activities(&prompt, config)
                .await
                .context("Suggestion request failed")?;
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("{}. {}", i + 1, suggestion.name);
                if !suggestion.description.is_empty() {
                    println!("   {}", suggestion.description.replace('\n', "\n   "));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn advise_flags_parse() {
        let cli = Cli::try_parse_from([
            "tripweave",
            "advise",
            "trip.json",
            "--select",
            "2",
            "--output",
            "out.json",
            "--retries",
            "3",
            "--model",
            "gpt-4o-mini",
        ])
        .unwrap();
        assert_eq!(cli.model.as_deref(), Some("gpt-4o-mini"));
        let Commands::Advise {
            select, retries, ..
        } = cli.command
        else {
            panic!("expected advise");
        };
        assert_eq!(select, Some(Selection::Alternative(1)));
        assert_eq!(retries, 3);
    }

    #[test]
    fn output_without_select_is_rejected() {
        assert!(
            Cli::try_parse_from(["tripweave", "advise", "trip.json", "--output", "o.json"])
                .is_err()
        );
    }

    #[test]
    fn flight_dates_are_checked() {
        let ok = Cli::try_parse_from([
            "tripweave", "search", "flights", "SFO", "CDG", "--depart", "2024-03-01", "--return",
            "2024-03-07",
        ]);
        assert!(ok.is_ok());

        let bad = Cli::try_parse_from([
            "tripweave", "search", "flights", "SFO", "CDG", "--depart", "March 1", "--return",
            "2024-03-07",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn pick_requires_add_to() {
        let parsed = Cli::try_parse_from([
            "tripweave", "search", "hotels", "Paris", "--pick", "2",
        ]);
        assert!(parsed.is_err());
    }
}
