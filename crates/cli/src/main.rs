//! Loomwise CLI - Cart session and schema tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a product from a catalog export (JSON or YAML)
//! lw-cli add p1 --catalog products.json
//!
//! # Change or drop a line
//! lw-cli update p1 3
//! lw-cli remove p1
//!
//! # Inspect and clear the cart
//! lw-cli show
//! lw-cli empty
//!
//! # Print the product document schema for the CMS
//! lw-cli schema
//! ```
//!
//! # Commands
//!
//! - `add`, `remove`, `update`, `empty`, `show` - Operate on the persisted cart
//! - `schema` - Print the `product` schema as JSON
//!
//! Each cart command is one session: the cart is created, hydrated from
//! storage, changed, and written back. See `loomwise_cart::config` for the
//! environment variables that control storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lw-cli")]
#[command(author, version, about = "Loomwise CLI tools")]
struct Cli {
    /// Directory holding the cart file (overrides `CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Product document ID (`_id`)
        product_id: String,

        /// Catalog file: JSON array or YAML list of products
        #[arg(short, long)]
        catalog: PathBuf,
    },
    /// Remove a product from the cart
    Remove {
        /// Product document ID (`_id`)
        product_id: String,
    },
    /// Set the quantity of a product (zero or less removes it)
    Update {
        /// Product document ID (`_id`)
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every product from the cart
    Empty,
    /// Show the cart contents and totals
    Show,
    /// Print the product document schema
    Schema,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storage_dir = cli.storage_dir;

    match cli.command {
        Commands::Add {
            product_id,
            catalog,
        } => {
            let catalog = commands::catalog::load(&catalog)?;
            commands::cart::add(storage_dir, &product_id, &catalog)?;
        }
        Commands::Remove { product_id } => commands::cart::remove(storage_dir, &product_id)?,
        Commands::Update {
            product_id,
            quantity,
        } => commands::cart::update(storage_dir, &product_id, quantity)?,
        Commands::Empty => commands::cart::empty(storage_dir)?,
        Commands::Show => commands::cart::show(storage_dir)?,
        Commands::Schema => commands::schema::print()?,
    }
    Ok(())
}
