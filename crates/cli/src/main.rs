use anyhow::anyhow;
use clap::Parser;
use merchant_cli::Commands;

#[derive(Parser)]
#[command(name = "merchant")]
#[command(about = "Sign requests and check authentication settings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    merchant_utils::tracing::init().map_err(|e| anyhow!(e))?;

    let output = cli.command.execute()?;
    println!("{output}");
    Ok(())
}
