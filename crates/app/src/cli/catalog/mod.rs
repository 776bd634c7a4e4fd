use clap::{Args, Subcommand};

mod set_price;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// Create a product or design, or change its name and price
    SetPrice(set_price::SetPriceArgs),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::SetPrice(args) => set_price::run(args).await,
    }
}
