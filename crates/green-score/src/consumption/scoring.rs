use super::domain::ScoreBreakdown;

pub const ENERGY_SCALE: f64 = 1000.0;
pub const WATER_SCALE: f64 = 500.0;
pub const WASTE_SCALE: f64 = 100.0;

/// Linear decay from 100 at zero consumption down to 0 at `scale`, floored at 0.
pub fn metric_score(value: f64, scale: f64) -> f64 {
    (100.0 - (value / scale) * 100.0).max(0.0)
}

/// Score one reading. Pure and total for finite input.
pub fn score(energy: f64, water: f64, waste: f64) -> ScoreBreakdown {
    let energy_score = metric_score(energy, ENERGY_SCALE);
    let water_score = metric_score(water, WATER_SCALE);
    let waste_score = metric_score(waste, WASTE_SCALE);
    let overall_score = (energy_score + water_score + waste_score) / 3.0;

    ScoreBreakdown {
        energy_score,
        water_score,
        waste_score,
        overall_score,
    }
}
