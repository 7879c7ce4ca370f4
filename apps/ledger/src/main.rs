//! # omnilink-ledger
//!
//! Command line front end for the commission ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        omnilink-ledger CLI                              │
//! │                                                                         │
//! │  argv ──► clap ──► LedgerApp ──► SQLite                                │
//! │                        │                                                │
//! │                        ├──► stdout: JSON result (or { code, message }) │
//! │                        └──► stderr: tracing logs (RUST_LOG)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands:
//! - `record-sale` - Record a sale and print its split
//! - `affiliate-ledger` / `affiliate-dashboard` - Affiliate totals
//! - `business-ledger` - Per-product totals
//! - `create-business`, `create-affiliate`, `create-product` - Catalog setup
//! - `list-marketplace`, `list-business-products`, `deactivate-product`
//! - `select-product`, `list-selections`, `track-click` - Attribution

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use omnilink_core::{Money, NewProduct, RecordSale};
use omnilink_ledger::{LedgerApp, LedgerConfig, ServiceError};

/// OmniLink commission ledger
#[derive(Parser)]
#[command(name = "omnilink-ledger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a business
    CreateBusiness {
        #[arg(long)]
        name: String,
        #[arg(long)]
        website_url: Option<String>,
    },

    /// Register an affiliate
    CreateAffiliate {
        #[arg(long)]
        name: String,
    },

    /// List a product for a business
    CreateProduct {
        #[arg(long)]
        business_id: String,
        #[arg(long)]
        name: String,
        /// Unit price, e.g. 19.99
        #[arg(long)]
        price: Money,
        #[arg(long)]
        sales_page_url: String,
        /// Affiliate commission, 0 to 100
        #[arg(long)]
        commission_percent: Decimal,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Active products, newest first
    ListMarketplace,

    /// All products of a business
    ListBusinessProducts {
        #[arg(long)]
        business_id: String,
    },

    /// Take a product off the marketplace
    DeactivateProduct {
        #[arg(long)]
        product_id: String,
    },

    /// Add a product to an affiliate's promoted list
    SelectProduct {
        #[arg(long)]
        affiliate_id: String,
        #[arg(long)]
        product_id: String,
    },

    /// Products an affiliate promotes
    ListSelections {
        #[arg(long)]
        affiliate_id: String,
    },

    /// Log an affiliate link visit and print the redirect
    TrackClick {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        affiliate_id: Option<String>,
        #[arg(long)]
        ip_address: Option<String>,
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Record a sale
    RecordSale {
        #[arg(long)]
        product_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        /// Overrides the product's current price
        #[arg(long)]
        unit_price: Option<Money>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        affiliate_id: Option<String>,
        #[arg(long)]
        external_order_id: Option<String>,
    },

    /// Totals for one affiliate
    AffiliateLedger {
        #[arg(long)]
        affiliate_id: String,
    },

    /// Affiliate totals plus selected product count
    AffiliateDashboard {
        #[arg(long)]
        affiliate_id: String,
    },

    /// Per-product totals, one row per product
    BusinessLedger {
        /// Products to report on, in output order
        #[arg(long = "product-id", conflicts_with = "business_id")]
        product_ids: Vec<String>,
        /// Report on every product of this business instead
        #[arg(long)]
        business_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = LedgerConfig::load()?;
    if let Some(path) = cli.database {
        config = config.with_database_path(path);
    }
    info!(path = %config.database_path.display(), "Configuration loaded");

    let app = LedgerApp::new(config).await?;
    let result = run(&app, cli.command).await;
    app.close().await;

    if let Err(err) = result {
        if let Some(service_err) = err.downcast_ref::<ServiceError>() {
            error!(code = ?service_err.code(), "{}", service_err);
            print_json(&service_err.to_body())?;
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}

async fn run(app: &LedgerApp, command: Commands) -> Result<()> {
    let catalog = app.catalog();

    match command {
        Commands::CreateBusiness { name, website_url } => {
            print_json(&catalog.create_business(&name, website_url).await?)
        }
        Commands::CreateAffiliate { name } => {
            print_json(&catalog.create_affiliate(&name).await?)
        }
        Commands::CreateProduct {
            business_id,
            name,
            price,
            sales_page_url,
            commission_percent,
            description,
            image_url,
        } => {
            let new = NewProduct {
                business_id,
                name,
                description,
                price,
                sales_page_url,
                affiliate_commission_percent: commission_percent,
                image_url,
            };
            print_json(&catalog.create_product(new).await?)
        }
        Commands::ListMarketplace => print_json(&catalog.list_marketplace().await?),
        Commands::ListBusinessProducts { business_id } => {
            print_json(&catalog.list_business_products(&business_id).await?)
        }
        Commands::DeactivateProduct { product_id } => {
            catalog.deactivate_product(&product_id).await?;
            print_json(&serde_json::json!({ "product_id": product_id, "is_active": false }))
        }
        Commands::SelectProduct {
            affiliate_id,
            product_id,
        } => {
            let outcome = catalog.select_product(&affiliate_id, &product_id).await?;
            print_json(&serde_json::json!({ "status": outcome }))
        }
        Commands::ListSelections { affiliate_id } => {
            print_json(&catalog.list_selections(&affiliate_id).await?)
        }
        Commands::TrackClick {
            product_id,
            affiliate_id,
            ip_address,
            user_agent,
        } => {
            let redirect = catalog
                .track_click(&product_id, affiliate_id.as_deref(), ip_address, user_agent)
                .await?;
            print_json(&redirect)
        }
        Commands::RecordSale {
            product_id,
            quantity,
            unit_price,
            currency,
            affiliate_id,
            external_order_id,
        } => {
            let request = RecordSale {
                product_id,
                quantity,
                unit_price,
                currency,
                affiliate_id,
                external_order_id,
            };
            print_json(&app.record_sale(request).await?)
        }
        Commands::AffiliateLedger { affiliate_id } => {
            print_json(&app.affiliate_ledger(&affiliate_id).await?)
        }
        Commands::AffiliateDashboard { affiliate_id } => {
            print_json(&app.ledger().affiliate_dashboard(&affiliate_id).await?)
        }
        Commands::BusinessLedger {
            product_ids,
            business_id,
        } => match business_id {
            Some(business_id) => print_json(&app.ledger().business_ledger_for(&business_id).await?),
            None => print_json(&app.business_ledger(&product_ids).await?),
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record_sale() {
        let cli = Cli::try_parse_from([
            "omnilink-ledger",
            "record-sale",
            "--product-id",
            "p-1",
            "--quantity",
            "3",
            "--unit-price",
            "19.99",
        ])
        .unwrap();

        match cli.command {
            Commands::RecordSale {
                product_id,
                quantity,
                unit_price,
                ..
            } => {
                assert_eq!(product_id, "p-1");
                assert_eq!(quantity, 3);
                assert_eq!(unit_price, Some(Money::from_cents(1999)));
            }
            _ => panic!("expected record-sale"),
        }
    }

    #[test]
    fn test_parse_business_ledger_ids() {
        let cli = Cli::try_parse_from([
            "omnilink-ledger",
            "business-ledger",
            "--product-id",
            "a",
            "--product-id",
            "b",
        ])
        .unwrap();

        match cli.command {
            Commands::BusinessLedger { product_ids, business_id } => {
                assert_eq!(product_ids, vec!["a", "b"]);
                assert!(business_id.is_none());
            }
            _ => panic!("expected business-ledger"),
        }
    }
}
