use crate::server;
use clap::{Args, Parser, Subcommand};
use estate_ai::error::AppError;
use estate_ai::workflows::estimation::{formula, mapping};

#[derive(Parser, Debug)]
#[command(
    name = "Estate Lead Orchestrator",
    about = "Run the lead aggregation and price estimation service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a formula estimate offline, without the HTTP service
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Region (prefecture) name, e.g. 東京都
    #[arg(long)]
    region: String,
    /// Land size in square meters
    #[arg(long, value_parser = parse_land_size)]
    land_size: f64,
    /// Optional locality to check for remote inference model availability
    #[arg(long)]
    locality: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
    }
}

fn parse_land_size(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("land size must be positive, got {value}"));
    }
    Ok(value)
}

fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        region,
        land_size,
        locality,
    } = args;

    let unit = formula::unit_price_for(&region);
    let price = formula::estimate(&region, land_size);
    println!("Formula estimate for {region} ({land_size} m2)");
    println!("Unit price: {unit} yen/m2");
    println!("Estimated price: {price} yen");

    if let Some(locality) = locality {
        match mapping::locality_code_for(&locality) {
            Some(code) => {
                println!("Remote inference available for {locality} (city code {code})")
            }
            None => println!("No remote inference model registered for {locality}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_size_parser_rejects_non_positive_values() {
        assert!(parse_land_size("120.5").is_ok());
        assert!(parse_land_size("0").is_err());
        assert!(parse_land_size("-3").is_err());
        assert!(parse_land_size("large").is_err());
    }
}
