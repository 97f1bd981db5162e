use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use smartsave::config::AppConfig;
use smartsave::error::AppError;
use smartsave::finance::SerenityEngine;

#[derive(Parser, Debug)]
#[command(
    name = "SmartSave",
    about = "Run the SmartSave personal finance API or score statements from the command line",
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
    /// Compute the Serenity Score for a bank statement CSV
    Score(ScoreArgs),
    /// Print the dashboard, analytics and goals for the sample month
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args, configured_engine()?),
        Command::Demo(args) => run_demo(args, configured_engine()?),
    }
}

fn configured_engine() -> Result<SerenityEngine, AppError> {
    let config = AppConfig::load()?;
    Ok(SerenityEngine::new(config.scoring.engine))
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
    fn score_requires_a_statement() {
        assert!(Cli::try_parse_from(["smartsave", "score"]).is_err());

        let cli = Cli::try_parse_from([
            "smartsave",
            "score",
            "--csv",
            "statement.csv",
            "--budget",
            "1500",
            "--from",
            "2025-09-01",
        ])
        .expect("arguments parse");
        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.budget, Some(1500.0));
                assert_eq!(args.from.map(|date| date.to_string()).as_deref(), Some("2025-09-01"));
                assert!(args.to.is_none());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["smartsave"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
