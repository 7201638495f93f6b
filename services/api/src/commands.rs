use casa_match::assistant::{provider_from_config, AssistantConversation};
use casa_match::config::AppConfig;
use casa_match::error::AppError;
use casa_match::housing::ami::{income_position, median_income, AMI_BANDS};
use casa_match::housing::listings::{Listing, ListingStore};
use casa_match::housing::matching::{SearchQuery, ALL_BOROUGHS};
use casa_match::housing::profile::{
    FileProfileStore, HouseholdProfile, ProfileSession, MAX_HOUSEHOLD_SIZE, MIN_HOUSEHOLD_SIZE,
};
use casa_match::housing::search::{
    HttpListingClient, ListingSearchClient, MockListingService, SearchFeed, SearchState,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::io::Write;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Borough to search, or "All"
    #[arg(long, default_value = ALL_BOROUGHS)]
    pub(crate) borough: String,
    /// Annual household income in dollars (0 skips the income check)
    #[arg(long, default_value_t = 0)]
    pub(crate) income: u32,
    /// Highest monthly rent you can pay (0 skips the rent check)
    #[arg(long, default_value_t = 0)]
    pub(crate) max_rent: u32,
    /// Number of people in the household
    #[arg(long)]
    pub(crate) household_size: Option<u8>,
    /// Base URL of a running casa-match-api to query instead of the local dataset
    #[arg(long)]
    pub(crate) remote: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AmiArgs {
    /// Number of people in the household
    #[arg(long, value_parser = clap::value_parser!(u8).range(
        MIN_HOUSEHOLD_SIZE as i64..=MAX_HOUSEHOLD_SIZE as i64
    ))]
    pub(crate) household_size: u8,
    /// Annual household income in dollars
    #[arg(long)]
    pub(crate) income: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    /// Question for the housing assistant
    #[arg(required = true, num_args = 1..)]
    pub(crate) message: Vec<String>,
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let mut session = ProfileSession::new(Arc::new(FileProfileStore::new(
        &config.profile.directory,
    )));
    let saved = session.restore()?.cloned();
    if let Some(profile) = &saved {
        println!("Welcome back, {}!", profile.first_name());
        if income_flags_unset(&args) {
            println!("Using the income and rent ceiling from your saved profile.");
        }
    }

    let client: Arc<dyn ListingSearchClient> = match args.remote.as_deref() {
        Some(url) => Arc::new(HttpListingClient::new(url)?),
        None => {
            let store = ListingStore::load(config.listings.dataset.as_deref())?;
            Arc::new(MockListingService::new(store))
        }
    };

    let query = search_query(&args, saved.as_ref());
    let feed = SearchFeed::new(client);

    println!("Searching listings...");
    let mut state = feed.load(query).await;
    if let Some(SearchState::Failed {
        message,
        retryable: true,
        ..
    }) = &state
    {
        println!("{message}");
        println!("Retrying...");
        state = feed.retry().await;
    }

    match state {
        Some(SearchState::Resolved { listings, .. }) => {
            render_listings(&listings, Local::now().date_naive());
        }
        Some(SearchState::Failed { message, .. }) => println!("{message}"),
        _ => {}
    }

    Ok(())
}

fn income_flags_unset(args: &SearchArgs) -> bool {
    args.income == 0 && args.max_rent == 0
}

/// Flags win; with no income or rent flags a saved profile fills them in.
fn search_query(args: &SearchArgs, saved: Option<&HouseholdProfile>) -> SearchQuery {
    if let Some(profile) = saved.filter(|_| income_flags_unset(args)) {
        let mut query = SearchQuery::for_profile(profile, Some(args.borough.as_str()));
        if args.household_size.is_some() {
            query.household_size = args.household_size;
        }
        return query;
    }

    SearchQuery {
        borough: None,
        income: (args.income > 0).then_some(args.income),
        max_rent: (args.max_rent > 0).then_some(args.max_rent),
        household_size: args.household_size,
    }
    .with_borough(Some(args.borough.as_str()))
}

fn render_listings(listings: &[Listing], today: NaiveDate) {
    println!("{} matching listing(s)", listings.len());
    if listings.is_empty() {
        println!("No listings match these filters. Try clearing them (--borough All --income 0 --max-rent 0).");
        return;
    }

    for listing in listings {
        let partner = if listing.is_partner() { " [partner]" } else { "" };
        println!(
            "- {} ({}, {}){}",
            listing.development_name, listing.neighborhood, listing.borough, partner
        );
        println!(
            "  {} | {}% AMI {} | income {}-{} | rent {}-{}/mo",
            listing.address,
            listing.ami_percentage,
            listing.ami_tier().label(),
            dollars(listing.min_income),
            dollars(listing.max_income),
            dollars(listing.rent_range.low()),
            dollars(listing.rent_range.high()),
        );
        println!("  {}", deadline_label(listing.application_deadline, today));
        if let Some(url) = &listing.application_url {
            println!("  Apply: {url}");
        }
    }
}

fn deadline_label(deadline: NaiveDate, today: NaiveDate) -> String {
    let days_left = (deadline - today).num_days();
    let date = deadline.format("%b %-d, %Y");
    match days_left {
        d if d < 0 => format!("Applications closed {date}"),
        0 => format!("Applications close today ({date})"),
        d => format!("Applications close {date} ({d} days left)"),
    }
}

pub(crate) fn run_ami(args: AmiArgs) {
    let position = income_position(args.household_size, args.income);

    println!(
        "Area median income for a household of {}: {}",
        args.household_size,
        dollars(median_income(args.household_size))
    );
    for band in &position.bands {
        let marker = if position.bracket == Some(band.percentage) {
            "  <- your income"
        } else {
            ""
        };
        println!(
            "  {:>8}  up to {}{}",
            band.name,
            dollars(band.income_limit),
            marker
        );
    }

    if let (Some(income), None) = (args.income, position.bracket) {
        let top = AMI_BANDS[AMI_BANDS.len() - 1];
        println!(
            "An income of {} is above the {}% AMI limit.",
            dollars(income),
            top
        );
    }
}

pub(crate) async fn run_ask(args: AskArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let provider = provider_from_config(&config.assistant)?;
    let mut conversation = AssistantConversation::new(provider);
    let message = args.message.join(" ");

    let reply = conversation
        .ask_with(&message, |fragment| {
            print!("{fragment}");
            let _ = std::io::stdout().flush();
        })
        .await;

    match reply {
        Some(reply) if reply.failed => println!("\n{}", reply.reply),
        Some(_) => println!(),
        None => println!("Nothing to ask."),
    }
    Ok(())
}

fn dollars(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}
