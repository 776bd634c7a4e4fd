//! Shop Config

use clap::Args;

/// Storefront settings.
#[derive(Debug, Args)]
pub struct ShopConfig {
    /// ISO 4217 code every price and total is expressed in
    #[arg(long, env = "SHOP_CURRENCY", default_value = "INR")]
    pub currency: String,
}
