use crate::infra::InMemoryReadingRepository;
use chrono::Utc;
use clap::Args;
use green_score::config::{AppConfig, ScoringConfig};
use green_score::consumption::{
    read_readings_csv, recommend, ConsumptionReading, ConsumptionService, ScoreBreakdown,
    TrendPoint,
};
use green_score::error::AppError;
use green_score::estimator::{
    ArtifactBundle, CsvFeatureStore, GreenScore, GreenScoreEstimator, ScoringPipeline,
};
use green_score::telemetry;
use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Energy consumption for the period
    #[arg(long)]
    pub(crate) energy: f64,
    /// Water consumption for the period
    #[arg(long)]
    pub(crate) water: f64,
    /// Waste produced for the period
    #[arg(long)]
    pub(crate) waste: f64,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Consumption CSV export (timestamp,energy,water,waste)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Trend window in days, ending at the most recent reading
    #[arg(long)]
    pub(crate) window_days: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Industry name; normalized before lookup
    #[arg(long)]
    pub(crate) industry: String,
    /// Artifact bundle (defaults to GREEN_SCORE_ARTIFACTS)
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,
    /// Industry feature CSV (defaults to GREEN_SCORE_FEATURES)
    #[arg(long)]
    pub(crate) features: Option<PathBuf>,
}

pub(crate) fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let reading = ConsumptionReading::new(Utc::now(), args.energy, args.water, args.waste)?;
    print!("{}", render_score_report(&reading.breakdown()));
    Ok(())
}

pub(crate) fn run_prediction_report(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let readings = read_readings_csv(File::open(&args.csv)?)?;
    let window_days = args
        .window_days
        .unwrap_or(config.scoring.trend_window_days);

    let latest = match readings.last() {
        Some(reading) => *reading,
        None => {
            println!("No consumption data available in {}", args.csv.display());
            return Ok(());
        }
    };

    let repository = InMemoryReadingRepository::with_readings(readings);
    let service = ConsumptionService::with_trend_window(Arc::new(repository), window_days);
    let trend = service.trend(latest.timestamp())?;
    let predicted = service.predict()?;

    print!("{}", render_prediction_report(&latest, &trend, predicted, window_days));
    Ok(())
}

pub(crate) fn run_estimate_report(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let (artifacts, features) = resolve_estimator_paths(&args, &config.scoring)?;

    let bundle = ArtifactBundle::from_path(&artifacts)?;
    let store = CsvFeatureStore::from_path(&features)?;
    let estimator = GreenScoreEstimator::new(Arc::new(store), ScoringPipeline::from_bundle(bundle));

    let score = estimator.estimate(&args.industry)?;

    print!("{}", render_estimate_report(&score));
    Ok(())
}

fn resolve_estimator_paths(
    args: &EstimateArgs,
    scoring: &ScoringConfig,
) -> Result<(PathBuf, PathBuf), AppError> {
    let artifacts = match &args.artifacts {
        Some(path) => path.clone(),
        None => scoring.require_artifacts()?.clone(),
    };
    let features = match &args.features {
        Some(path) => path.clone(),
        None => scoring.require_features()?.clone(),
    };
    Ok((artifacts, features))
}

pub(crate) fn render_score_report(breakdown: &ScoreBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Consumption score");
    let _ = writeln!(out, "- Energy: {:.1}", breakdown.energy_score);
    let _ = writeln!(out, "- Water: {:.1}", breakdown.water_score);
    let _ = writeln!(out, "- Waste: {:.1}", breakdown.waste_score);
    let _ = writeln!(out, "- Overall: {:.1}", breakdown.overall_score);

    let _ = writeln!(out, "\nRecommendations");
    for advice in recommend(breakdown) {
        let _ = writeln!(out, "- {advice}");
    }
    out
}

pub(crate) fn render_prediction_report(
    latest: &ConsumptionReading,
    trend: &[TrendPoint],
    predicted: f64,
    window_days: u32,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Latest reading {} (overall {:.1})",
        latest.timestamp().to_rfc3339(),
        latest.breakdown().overall_score
    );

    let _ = writeln!(out, "\nDaily trend ({window_days} days)");
    for point in trend {
        let _ = writeln!(
            out,
            "- {}: energy {:.1}, water {:.1}, waste {:.1}, score {:.1}",
            point.date, point.mean_energy, point.mean_water, point.mean_waste, point.mean_score
        );
    }

    let _ = writeln!(out, "\nPredicted score for the next day: {predicted:.1}");
    out
}

pub(crate) fn render_estimate_report(score: &GreenScore) -> String {
    format!(
        "Green score for {}: {:.2}\n",
        score.industry, score.green_score
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use green_score::consumption::{score, trend};
    use green_score::estimator::IndustryId;

    #[test]
    fn score_report_lists_breakdown_and_advice() {
        let report = render_score_report(&score(800.0, 100.0, 10.0));

        assert!(report.contains("- Energy: 20.0"));
        assert!(report.contains("- Overall: 63.3"));
        assert!(report.contains("energy-efficient appliances"));
        assert!(!report.contains("water-saving fixtures"));
    }

    #[test]
    fn prediction_report_includes_trend_rows() {
        let at = Utc.with_ymd_and_hms(2025, 9, 2, 12, 0, 0).unwrap();
        let latest = ConsumptionReading::new(at, 250.0, 125.0, 25.0).unwrap();
        let points = trend(&[latest], at, 7).unwrap();

        let report = render_prediction_report(&latest, &points, 74.96, 7);

        assert!(report.contains("- 2025-09-02: energy 250.0, water 125.0, waste 25.0, score 75.0"));
        assert!(report.contains("Predicted score for the next day: 75.0"));
    }

    #[test]
    fn estimate_report_shows_normalized_industry() {
        let report = render_estimate_report(&GreenScore {
            industry: IndustryId::normalize("Heavy Manufacturing"),
            green_score: 71.234,
        });
        assert_eq!(report, "Green score for heavy_manufacturing: 71.23\n");
    }

    #[test]
    fn estimator_paths_prefer_flags_over_config() {
        let args = EstimateArgs {
            industry: "steel".to_string(),
            artifacts: Some(PathBuf::from("flag-artifacts.json")),
            features: None,
        };
        let scoring = ScoringConfig {
            artifacts_path: Some(PathBuf::from("env-artifacts.json")),
            features_path: Some(PathBuf::from("env-features.csv")),
            trend_window_days: 7,
        };

        let (artifacts, features) = resolve_estimator_paths(&args, &scoring).unwrap();
        assert_eq!(artifacts, PathBuf::from("flag-artifacts.json"));
        assert_eq!(features, PathBuf::from("env-features.csv"));

        let unset = ScoringConfig {
            artifacts_path: None,
            features_path: None,
            trend_window_days: 7,
        };
        assert!(matches!(
            resolve_estimator_paths(&args, &unset),
            Err(AppError::Config(_))
        ));
    }
}
