use crate::report::{run_metrics_report, run_table_report, MetricsArgs, TableArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_dashboard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Dashboard",
    about = "Serve or query hiring-funnel dashboard analytics",
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
    /// Compute dashboard views against a warehouse snapshot
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Print the status cards, vacancy breakdown and monthly hiring times
    Metrics(MetricsArgs),
    /// Print one page of the per-fact table
    Table(TableArgs),
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

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard {
            command: DashboardCommand::Metrics(args),
        } => run_metrics_report(args).await,
        Command::Dashboard {
            command: DashboardCommand::Table(args),
        } => run_table_report(args).await,
    }
}
