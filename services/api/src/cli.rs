use crate::report::{run_overview, run_progress, OverviewArgs, ProgressArgs};
use crate::server;
use campus_insights::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Insights",
    about = "Serve and inspect student record completeness and enrollment analytics",
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
    /// Print the analytics overview for a JSON or CSV dataset
    Overview(OverviewArgs),
    /// Print completion progress for one person bundle
    Progress(ProgressArgs),
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
        Command::Overview(args) => run_overview(args),
        Command::Progress(args) => run_progress(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overview_with_year() {
        let cli = Cli::try_parse_from(["campus-insights", "overview", "--data", "students.csv", "--year", "2023"])
            .expect("arguments parse");
        match cli.command {
            Some(Command::Overview(args)) => {
                assert_eq!(args.data.to_str(), Some("students.csv"));
                assert_eq!(args.year.to_string(), "2023");
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["campus-insights"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
