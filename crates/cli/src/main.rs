//! Void Shop CLI - Catalog, cart and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! vs-cli migrate
//!
//! # Import products from YAML
//! vs-cli seed products.yaml
//!
//! # Browse the catalog
//! vs-cli products list --query tee --category clothing --sort price-asc
//!
//! # Add a product of your own
//! vs-cli products add -n "Camping Mug" -p 8.75 -c kitchen -k mug,camping
//!
//! # Fill the cart and check out
//! vs-cli cart add 4 --variant M --quantity 2
//! vs-cli checkout --address "Calle 1, Santo Domingo" --payment cod
//! ```
//!
//! # Commands
//!
//! - `migrate` - Apply database migrations
//! - `seed` - Import user products from a YAML file
//! - `products list|add` - Query and extend the catalog
//! - `cart show|add|remove|remove-line|clear` - Manage the cart
//! - `checkout` - Place an order for the whole cart
//! - `buy-now` - Add one product and check out immediately
//!
//! Configuration comes from `VOIDSHOP_*` environment variables (see
//! `voidshop_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voidshop_core::{Category, PaymentMethod, Price, SortOption};
use voidshop_storefront::config::StorefrontConfig;
use voidshop_storefront::state::AppState;

mod commands;

use commands::CliError;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "voidshop_storefront=info,vs_cli=info";

#[derive(Parser)]
#[command(name = "vs-cli")]
#[command(author, version, about = "Void Shop catalog, cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Import user products from a YAML file
    Seed {
        /// Path to the seed file
        file: PathBuf,
    },
    /// Browse and extend the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout {
        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,

        /// Payment method (`card` or `cod`)
        #[arg(short, long, default_value = "card")]
        payment: PaymentMethod,

        /// Print the confirmation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add one product and check out immediately
    BuyNow {
        /// Product id
        product_id: String,

        /// Variant such as a size
        #[arg(short, long)]
        variant: Option<String>,

        /// Units to buy
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,

        /// Payment method (`card` or `cod`)
        #[arg(short, long, default_value = "card")]
        payment: PaymentMethod,

        /// Print the confirmation as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered and sorted
    List {
        /// Case-insensitive text matched against names and keywords
        #[arg(short, long, default_value = "")]
        query: String,

        /// Restrict to a category (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<Category>,

        /// Lowest price to include
        #[arg(long)]
        min_price: Option<Price>,

        /// Highest price to include
        #[arg(long)]
        max_price: Option<Price>,

        /// Sort order (`none`, `price-asc`, `price-desc`, `name`)
        #[arg(short, long, default_value = "none")]
        sort: SortOption,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a user product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price, e.g. 8.75
        #[arg(short, long, allow_negative_numbers = true)]
        price: Decimal,

        /// Category
        #[arg(short, long)]
        category: Category,

        /// Comma-separated search keywords
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart lines and totals
    Show {
        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add units of a product
    Add {
        /// Product id
        product_id: String,

        /// Variant such as a size
        #[arg(short, long)]
        variant: Option<String>,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Take one unit off a line
    Remove {
        /// Product id
        product_id: String,

        /// Variant such as a size
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Remove a whole line
    RemoveLine {
        /// Product id
        product_id: String,

        /// Variant such as a size
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Remove every line
    Clear,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // Logs go to stderr so JSON output on stdout stays parseable
    let json_format = std::env::var("VOIDSHOP_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json_format.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json_format).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file if present so VOIDSHOP_LOG_FORMAT and RUST_LOG apply
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if e.is_user_error() {
            tracing::error!("{}", e.user_message());
        } else {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env().map_err(voidshop_storefront::error::AppError::from)?;

    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::run(&config).await;
    }

    let state = AppState::open(config).await?;

    match cli.command {
        Commands::Migrate => {}
        Commands::Seed { file } => commands::seed::run(&state, &file).await?,
        Commands::Products { action } => match action {
            ProductsAction::List {
                query,
                categories,
                min_price,
                max_price,
                sort,
                json,
            } => {
                let args = commands::products::ListArgs {
                    query,
                    categories,
                    min_price,
                    max_price,
                    sort,
                };
                commands::products::list(&state, args, json)?;
            }
            ProductsAction::Add {
                name,
                price,
                category,
                keywords,
            } => commands::products::add(&state, name, price, category, keywords).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(&state, json)?,
            CartAction::Add {
                product_id,
                variant,
                quantity,
            } => commands::cart::add(&state, &product_id, variant.as_deref(), quantity).await?,
            CartAction::Remove {
                product_id,
                variant,
            } => commands::cart::remove_one(&state, &product_id, variant.as_deref()).await?,
            CartAction::RemoveLine {
                product_id,
                variant,
            } => commands::cart::remove_line(&state, &product_id, variant.as_deref()).await?,
            CartAction::Clear => commands::cart::clear(&state).await?,
        },
        Commands::Checkout {
            address,
            payment,
            json,
        } => commands::checkout::checkout(&state, &address, payment, json).await?,
        Commands::BuyNow {
            product_id,
            variant,
            quantity,
            address,
            payment,
            json,
        } => {
            let order = commands::checkout::BuyNow {
                product_id,
                variant,
                quantity,
                address,
                payment,
            };
            commands::checkout::buy_now(&state, order, json).await?;
        }
    }
    Ok(())
}
