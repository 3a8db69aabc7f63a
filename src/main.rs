use clap::{Parser, Subcommand};

mod cmd;
mod core;

#[derive(Parser, Debug)]
#[command(
    name = "p9c",
    version,
    about = "Kenya PAYE calculator and KRA P9 end-of-year certificate generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render PAYE end-of-year (P9) certificates
    P9(cmd::p9::P9Command),
    /// Aggregated annual payroll totals per employee
    Summary(cmd::summary::SummaryCommand),
    /// Check a registry for data issues
    Validate(cmd::validate::ValidateCommand),
    /// Print expected registry input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::P9(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
