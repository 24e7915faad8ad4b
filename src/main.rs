use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use place_booker::api::HttpPlaceApi;
use place_booker::config::Settings;
use place_booker::widget::{
    AuthProvider, BookingWidget, ConsoleNotifier, PageView, PlacePage, StaticAuth, SubmitOutcome,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "place-booker", about = "Browse, book and review rental places")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a place with its reviews and the booking form
    Show { id: String },
    /// Request a booking for a place
    Book {
        id: String,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
        #[arg(long, default_value_t = 1)]
        guests: u32,
        /// Contact name, defaults to the signed-in user's name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: String,
    },
    /// Rate and review a place
    Review {
        id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        name: String,
        #[arg(long)]
        text: String,
    },
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn report(widget: &BookingWidget, outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Submitted | SubmitOutcome::Redirected => {
            print!("{}", widget.render());
            Ok(())
        }
        SubmitOutcome::Invalid(invalid) => anyhow::bail!("Rejected: {}", invalid),
        SubmitOutcome::Failed(e) => Err(e).context("Request to the booking API failed"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(api = %settings.api_url, "🏠 place-booker");

    let api = Arc::new(HttpPlaceApi::new(&settings)?);
    let auth: Arc<dyn AuthProvider> = match &settings.user_name {
        Some(name) => Arc::new(StaticAuth::signed_in(name.clone())),
        None => Arc::new(StaticAuth::signed_out()),
    };
    let mut page = PlacePage::new(api, auth, Arc::new(ConsoleNotifier));

    let id = match &cli.command {
        Command::Show { id } | Command::Book { id, .. } | Command::Review { id, .. } => id.clone(),
    };
    page.load(Some(&id)).await;

    if let Command::Show { .. } = cli.command {
        let view = page.render();
        if view == PageView::Empty {
            anyhow::bail!("Place {} could not be loaded", id);
        }
        print!("{}", view);
        return Ok(());
    }

    let widget = page
        .booking_mut()
        .with_context(|| format!("Place {} could not be loaded", id))?;

    match cli.command {
        Command::Book {
            check_in,
            check_out,
            guests,
            name,
            phone,
            ..
        } => {
            widget.set_date_range(Some(midnight(check_in)), Some(midnight(check_out)));
            widget.set_guests(guests);
            if let Some(name) = name {
                widget.set_name(name);
            }
            widget.set_phone(phone);
            let outcome = widget.submit_booking().await;
            report(widget, outcome)
        }
        Command::Review { rating, name, text, .. } => {
            widget.set_rating(rating);
            widget.set_review_name(name);
            widget.set_review(text);
            let outcome = widget.submit_review().await;
            report(widget, outcome)
        }
        Command::Show { .. } => Ok(()),
    }
}
