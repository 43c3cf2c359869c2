use clap::Parser;

/// Entry point for the Creo Inventory container inventory generator.
///
/// Queries the container runtime once, assigns the running containers to the deployment
/// groups of the catalog and either writes a static inventory or prints a dynamic one.
///
/// # Errors
///
/// Returns an error if the group catalog cannot be loaded or the inventory cannot be
/// written. Finding no containers is not an error.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug cargo run -- --runtime docker --output-dir ./inventory
/// cargo run -- --list
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = creo_inventory::cli::Cli::parse().into();
    creo_inventory::run(config).await?;
    Ok(())
}
