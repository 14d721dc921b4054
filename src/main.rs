mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use juhannus_core::ledger::{SortKey, SortOrder};
use juhannus_core::schedule::{MAX_YEAR, MIN_YEAR};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "juhannus")]
#[command(about = "Run the yearly midsummer vote: deadlines, events and votes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Years the date rules are defined for.
fn year_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR))
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Vote,
}

#[derive(Subcommand)]
enum Commands {
    /// Show midsummer Saturday and the voting/results deadlines
    Deadlines {
        /// Year to compute (defaults to the current year)
        #[arg(short, long, value_parser = year_parser())]
        year: Option<i32>,
    },
    /// Create an event with new header and body texts
    Init {
        #[arg(long, value_parser = year_parser())]
        year: i32,

        /// Header text ($year, $year_spaced, $voting_deadline, $results_deadline are substituted)
        #[arg(long)]
        header: String,

        /// Body text, same placeholders as the header
        #[arg(long)]
        body: String,
    },
    /// List event years
    Events,
    /// Show an event (the latest if no year is given) and its votes
    Show {
        #[arg(value_parser = year_parser())]
        year: Option<i32>,

        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,

        /// Reverse the order
        #[arg(long)]
        desc: bool,
    },
    /// Cast a vote
    Vote {
        name: String,

        #[arg(allow_negative_numbers = true)]
        vote: i64,

        /// Event year (defaults to the latest event)
        #[arg(short, long, value_parser = year_parser())]
        year: Option<i32>,

        /// Act as staff (bypasses the voting deadline)
        #[arg(long)]
        staff: bool,
    },
    /// Change a participant's name and/or vote (staff only)
    Modify {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        vote: Option<i64>,

        #[arg(long)]
        staff: bool,
    },
    /// Delete a participant (staff only)
    Delete {
        id: Uuid,

        #[arg(long)]
        staff: bool,
    },
    /// Hide or show a participant (staff only)
    Visibility {
        id: Uuid,

        #[arg(action = clap::ArgAction::Set)]
        visible: bool,

        #[arg(long)]
        staff: bool,
    },
    /// Delete an event and all of its votes (staff only)
    DeleteEvent {
        #[arg(value_parser = year_parser())]
        year: i32,

        #[arg(long)]
        staff: bool,
    },
    /// Record the result of an event (staff only)
    Result {
        #[arg(value_parser = year_parser())]
        year: i32,

        /// Omit to clear the result
        value: Option<u32>,

        /// Mark the result as final
        #[arg(long = "final")]
        is_final: bool,

        #[arg(long)]
        staff: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,juhannus_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = Context::load()?;

    // Every invocation doubles as the rollover check
    ctx.rollover()?;

    match cli.command {
        Commands::Deadlines { year } => commands::deadlines::run(&ctx, year),
        Commands::Init { year, header, body } => commands::init::run(&ctx, year, header, body),
        Commands::Events => commands::events::run(&ctx),
        Commands::Show { year, sort, desc } => {
            let order = SortOrder {
                key: match sort {
                    SortArg::Name => SortKey::Name,
                    SortArg::Vote => SortKey::Vote,
                },
                ascending: !desc,
            };
            commands::show::run(&ctx, year, order)
        }
        Commands::Vote {
            name,
            vote,
            year,
            staff,
        } => commands::vote::run(&ctx, year, &name, vote, staff),
        Commands::Modify {
            id,
            name,
            vote,
            staff,
        } => commands::participant::modify(&ctx, id, name, vote, staff),
        Commands::Delete { id, staff } => commands::participant::delete(&ctx, id, staff),
        Commands::Visibility { id, visible, staff } => {
            commands::participant::visibility(&ctx, id, visible, staff)
        }
        Commands::DeleteEvent { year, staff } => commands::result::delete_event(&ctx, year, staff),
        Commands::Result {
            year,
            value,
            is_final,
            staff,
        } => commands::result::run(&ctx, year, value, is_final, staff),
    }
}
