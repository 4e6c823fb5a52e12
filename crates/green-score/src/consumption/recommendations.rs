use super::domain::ScoreBreakdown;

/// Sub-scores strictly below this trigger an advisory.
pub const RECOMMENDATION_THRESHOLD: f64 = 50.0;

pub const ENERGY_ADVICE: &str =
    "Consider reducing energy usage by switching to energy-efficient appliances and lighting.";
pub const WATER_ADVICE: &str =
    "Consider reducing water consumption by fixing leaks and installing water-saving fixtures.";
pub const WASTE_ADVICE: &str =
    "Consider minimizing waste through better recycling practices and reducing single-use items.";
pub const POSITIVE_AFFIRMATION: &str =
    "Your consumption levels are excellent. Keep up the sustainable practices.";

/// Advisory messages for a breakdown, in energy, water, waste order.
pub fn recommend(breakdown: &ScoreBreakdown) -> Vec<&'static str> {
    let mut advice = Vec::new();

    if breakdown.energy_score < RECOMMENDATION_THRESHOLD {
        advice.push(ENERGY_ADVICE);
    }
    if breakdown.water_score < RECOMMENDATION_THRESHOLD {
        advice.push(WATER_ADVICE);
    }
    if breakdown.waste_score < RECOMMENDATION_THRESHOLD {
        advice.push(WASTE_ADVICE);
    }

    if advice.is_empty() {
        advice.push(POSITIVE_AFFIRMATION);
    }

    advice
}
