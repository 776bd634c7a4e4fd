use clap::Args;
use joinery::items::{ItemKind, ItemReference};
use joinery_app::{
    currency::parse_currency,
    database::{self, Db},
    domain::catalog::{CatalogService, PgCatalogService, models::NewCatalogEntry},
};
use rusty_money::Money;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetPriceArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Item kind: product or design
    #[arg(long)]
    kind: ItemKind,

    /// Item UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    /// Display name
    #[arg(long)]
    name: String,

    /// Price in minor units (e.g. paise)
    #[arg(long)]
    price: i64,

    /// ISO 4217 currency code
    #[arg(long, env = "SHOP_CURRENCY", default_value = "INR")]
    currency: String,
}

pub(crate) async fn run(args: SetPriceArgs) -> Result<(), String> {
    if args.price < 0 {
        return Err("price cannot be negative".to_string());
    }

    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let currency = parse_currency(&args.currency)
        .map_err(|error| format!("invalid currency '{}': {error}", args.currency))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCatalogService::new(Db::new(pool));
    let item = ItemReference::from_parts(args.kind, args.uuid.unwrap_or_else(Uuid::now_v7));

    let entry = service
        .set_price(NewCatalogEntry {
            item,
            name: args.name,
            price: Money::from_minor(args.price, currency),
        })
        .await
        .map_err(|error| format!("failed to set price: {error}"))?;

    println!("item_kind: {}", entry.item.kind());
    println!("item_uuid: {}", entry.item.uuid());
    println!("name: {}", entry.name);
    println!("price: {}", entry.price.to_minor_units());
    println!("currency: {}", entry.price.currency().iso_alpha_code);
    println!("updated_at: {}", entry.updated_at);

    Ok(())
}
