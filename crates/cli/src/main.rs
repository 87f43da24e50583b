//! JBLinx CLI - Drive the storefront cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! jblinx catalog list
//! jblinx catalog show connectx
//!
//! # Work with the cart
//! jblinx cart add connectx
//! jblinx cart add datalinx --price 349.00
//! jblinx cart increase connectx
//! jblinx cart decrease connectx
//! jblinx cart remove datalinx
//! jblinx cart show
//!
//! # Preferences
//! jblinx prefs dark-mode toggle
//! jblinx prefs theme --primary "#112233"
//! jblinx prefs theme --preset sunset
//! jblinx prefs css
//! jblinx prefs cookies accept
//!
//! # Contact form
//! jblinx contact -n "Ada" -e ada@example.com -m "Hello"
//! ```
//!
//! State lives in the JSON file named by `JBLINX_STORE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use commands::prefs::ThemeChange;
use jblinx_storefront::StorefrontConfig;
use jblinx_storefront::preferences::ConsentChoice;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "jblinx")]
#[command(author, version, about = "JBLinx storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and modify the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Display preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Validate and send a contact form message
    Contact {
        /// Your name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Reply-to email address
        #[arg(short, long, default_value = "")]
        email: String,

        /// Message body
        #[arg(short, long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id (e.g. connectx)
        product: String,

        /// Unit price; defaults to the catalog price
        #[arg(short, long)]
        price: Option<String>,
    },
    /// Add one unit to a product already in the cart
    Increase {
        /// Product id
        product: String,
    },
    /// Remove one unit; the line is dropped at zero
    Decrease {
        /// Product id
        product: String,
    },
    /// Remove a product line entirely
    Remove {
        /// Product id
        product: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all products
    List,
    /// Show product details
    Show {
        /// Product id
        product: String,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Show current preferences
    Show,
    /// Switch dark mode
    DarkMode {
        #[arg(value_enum)]
        mode: Switch,
    },
    /// Update the theme palette
    Theme {
        /// Primary color (#rrggbb)
        #[arg(long)]
        primary: Option<String>,

        /// Secondary color (#rrggbb)
        #[arg(long)]
        secondary: Option<String>,

        /// Accent color (#rrggbb)
        #[arg(long)]
        accent: Option<String>,

        /// Apply a quick theme preset (see `prefs presets`)
        #[arg(long, conflicts_with_all = ["primary", "secondary", "accent"])]
        preset: Option<String>,

        /// Restore the default palette
        #[arg(long, conflicts_with_all = ["primary", "secondary", "accent", "preset"])]
        reset: bool,
    },
    /// List the quick theme presets
    Presets,
    /// Print CSS custom properties for the current palette
    Css,
    /// Answer the cookie consent banner
    Cookies {
        #[arg(value_enum)]
        choice: Consent,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Consent {
    Accept,
    Minimal,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
    Toggle,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info for the CLI and warn for the library if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jblinx_cli=info,jblinx_storefront=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(config)?,
            CartAction::Add { product, price } => {
                commands::cart::add(config, &product, price.as_deref())?;
            }
            CartAction::Increase { product } => commands::cart::increase(config, &product)?,
            CartAction::Decrease { product } => commands::cart::decrease(config, &product)?,
            CartAction::Remove { product } => commands::cart::remove(config, &product)?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(config)?,
            CatalogAction::Show { product } => commands::catalog::show(config, &product)?,
        },
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs::show(config)?,
            PrefsAction::DarkMode { mode } => {
                let mode = match mode {
                    Switch::On => Some(true),
                    Switch::Off => Some(false),
                    Switch::Toggle => None,
                };
                commands::prefs::dark_mode(config, mode)?;
            }
            PrefsAction::Theme {
                primary,
                secondary,
                accent,
                preset,
                reset,
            } => {
                let change = match (preset, reset) {
                    (_, true) => ThemeChange::Reset,
                    (Some(name), false) => ThemeChange::Preset(name),
                    (None, false) => ThemeChange::Colors(commands::prefs::ThemeUpdate {
                        primary,
                        secondary,
                        accent,
                    }),
                };
                commands::prefs::theme(config, change)?;
            }
            PrefsAction::Presets => commands::prefs::presets()?,
            PrefsAction::Css => commands::prefs::css(config)?,
            PrefsAction::Cookies { choice } => {
                let choice = match choice {
                    Consent::Accept => ConsentChoice::Accept,
                    Consent::Minimal => ConsentChoice::Minimal,
                };
                commands::prefs::cookies(config, choice)?;
            }
        },
        Commands::Contact {
            name,
            email,
            message,
        } => commands::contact::send(name, email, message)?,
    }
    Ok(())
}
