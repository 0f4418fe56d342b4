//! Kiosk CLI - catalog queries and cart management.
//!
//! # Usage
//!
//! ```bash
//! # List the first 5 products
//! kiosk products --limit 5 --buyer-ip 203.0.113.7
//!
//! # Show a single product
//! kiosk product linen-tote
//!
//! # Recommendations for a product
//! kiosk recommendations gid://shopify/Product/8123456789
//!
//! # Inspect, replace or reset the persisted cart
//! kiosk cart show
//! kiosk cart import cart.json
//! kiosk cart reset
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kiosk_core::Handle;
use kiosk_storefront::cart::{CartStore, FileStorage};
use kiosk_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use kiosk_storefront::shopify::StorefrontClient;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "kiosk")]
#[command(author, version, about = "Kiosk storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Maximum number of products (default 10)
        #[arg(short, long)]
        limit: Option<NonZeroU32>,

        /// IP address of the shopper the request is made for
        #[arg(long)]
        buyer_ip: Option<IpAddr>,
    },
    /// Show a product by handle
    Product {
        /// Product handle (URL slug)
        handle: Handle,

        /// IP address of the shopper the request is made for
        #[arg(long)]
        buyer_ip: Option<IpAddr>,
    },
    /// List recommendations for a product
    Recommendations {
        /// Product ID (e.g., `gid://shopify/Product/123`)
        product_id: String,

        /// IP address of the shopper the request is made for
        #[arg(long)]
        buyer_ip: Option<IpAddr>,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the persisted cart
    Show,
    /// Reset the persisted cart to empty
    Reset,
    /// Replace the persisted cart with a cart snapshot file
    Import {
        /// Path to a cart JSON snapshot
        file: PathBuf,
    },
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

/// Initialize tracing on stderr, as JSON when `KIOSK_LOG_FORMAT=json`.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kiosk_storefront=info,kiosk_cli=info".into());

    let json = std::env::var("KIOSK_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (text_layer, json_layer) = if json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

/// Build a Storefront API client from the Shopify environment variables.
///
/// Only catalog commands call this; cart commands run without credentials.
fn storefront_client() -> Result<StorefrontClient, Box<dyn std::error::Error>> {
    let shopify = ShopifyStorefrontConfig::from_env()?;
    Ok(StorefrontClient::new(&shopify)?)
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { limit, buyer_ip } => {
            let client = storefront_client()?;
            commands::catalog::products(&client, limit, buyer_ip).await?;
        }
        Commands::Product { handle, buyer_ip } => {
            let client = storefront_client()?;
            commands::catalog::product(&client, &handle, buyer_ip).await?;
        }
        Commands::Recommendations {
            product_id,
            buyer_ip,
        } => {
            let client = storefront_client()?;
            commands::catalog::recommendations(&client, product_id.into(), buyer_ip).await?;
        }
        Commands::Cart { action } => {
            let store = CartStore::load(FileStorage::new(&config.cart_dir));
            match action {
                CartAction::Show => commands::cart::show(&store)?,
                CartAction::Reset => commands::cart::reset(&store)?,
                CartAction::Import { file } => commands::cart::import(&store, &file)?,
            }
        }
    }
    Ok(())
}
