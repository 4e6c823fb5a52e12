use crate::reports::{
    run_estimate_report, run_prediction_report, run_score_report, EstimateArgs, PredictArgs,
    ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use green_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Green Score API",
    about = "Serve and query sustainability scores for consumption and industry metrics",
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
    /// Score a single consumption reading and list recommendations
    Score(ScoreArgs),
    /// Summarize trend and next-day prediction for a consumption CSV export
    Predict(PredictArgs),
    /// Estimate the feature-based green score for one industry
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Bind host; overrides APP_HOST
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Bind port; overrides APP_PORT
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
        Command::Score(args) => run_score_report(args),
        Command::Predict(args) => run_prediction_report(args),
        Command::Estimate(args) => run_estimate_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["green-score-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_command() {
        let cli = Cli::try_parse_from([
            "green-score-api",
            "score",
            "--energy",
            "420",
            "--water",
            "180.5",
            "--waste",
            "22",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.energy, 420.0);
                assert_eq!(args.water, 180.5);
                assert_eq!(args.waste, 22.0);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["green-score-api", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
