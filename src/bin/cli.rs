//! Realty CLI
//!
//! Searches a listing site and prints the flattened listings as JSON.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use realty::{
    error::Result,
    landwatch,
    models::{Config, Listing},
    pipeline::{self, RealtorSearch, ZillowSearch},
    realtor::SortBy,
    utils::http,
};

/// Realty - listing search for Zillow, Realtor.com and LandWatch
#[derive(Parser, Debug)]
#[command(name = "realty", version, about = "Real-estate listing scraper")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "realty.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search Zillow
    Zillow {
        /// Location as typed into the search box
        #[arg(long)]
        term: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Search rentals instead of homes for sale
        #[arg(long)]
        rent: bool,

        #[command(flatten)]
        details: DetailArgs,
    },

    /// Search Realtor.com
    Realtor {
        /// Location, e.g. "Chattanooga, TN"
        #[arg(long)]
        location: String,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,

        /// relevant, price, listing-age, open-house-date, last-reduced, interior-sqft, lot-size
        #[arg(long, default_value = "relevant")]
        sort: SortBy,

        #[arg(long)]
        ascending: bool,

        #[command(flatten)]
        details: DetailArgs,
    },

    /// Search LandWatch
    Landwatch {
        #[arg(long)]
        state: Option<String>,

        #[arg(long, conflicts_with_all = ["city", "region"])]
        county: Option<String>,

        #[arg(long, conflicts_with = "region")]
        city: Option<String>,

        #[arg(long)]
        region: Option<String>,

        #[arg(long)]
        price_min: Option<u64>,

        #[arg(long)]
        price_max: Option<u64>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Args, Debug)]
struct DetailArgs {
    /// Scrape each result's detail page
    #[arg(long)]
    details: bool,

    /// Only keep the first N results
    #[arg(long)]
    max: Option<usize>,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// HTTP client for a search, after checking the configuration.
fn client(config: &Config) -> Result<reqwest::blocking::Client> {
    config.validate()?;
    http::create_client(&config.http)
}

fn print_listings(listings: &[Listing]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(listings)?);
    log::info!("Printed {} listings", listings.len());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = if cli.config.exists() {
        let config = Config::load_or_default(&cli.config);
        log::debug!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        log::debug!("No config at {}, using defaults", cli.config.display());
        Config::default()
    };

    let listings = match cli.command {
        Command::Zillow {
            term,
            page,
            rent,
            details,
        } => {
            let search = ZillowSearch {
                term,
                page,
                rent,
                details: details.details,
                max: details.max,
            };
            pipeline::run_zillow(&client(&config)?, &config, &search)?
        }

        Command::Realtor {
            location,
            limit,
            offset,
            sort,
            ascending,
            details,
        } => {
            let search = RealtorSearch {
                location,
                limit,
                offset,
                sort,
                ascending,
                details: details.details,
                max: details.max,
            };
            pipeline::run_realtor(&client(&config)?, &config, &search)?
        }

        Command::Landwatch {
            state,
            county,
            city,
            region,
            price_min,
            price_max,
            page,
        } => {
            let query = landwatch::Query {
                state,
                county,
                city,
                region,
                price_min,
                price_max,
                page,
                ..landwatch::Query::default()
            };
            pipeline::run_landwatch(&client(&config)?, &query)?
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
            return Ok(());
        }
    };

    print_listings(&listings)
}
