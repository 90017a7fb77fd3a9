use crate::core::tempo::is_leader;
use crate::models::LeaderSample;

/// Calculate a horse's start score from its leader samples
///
/// Scoring formula:
/// score = sum over samples where the horse led of
///     historical_start_number / qualifying_races
///
/// `qualifying_races` is the number of qualifying historical races, fixed
/// before any race-day lookup, so samples that produced no tempo text still
/// dilute the score. Samples with empty or unparsable tempo text contribute 0.
pub fn start_score(horse_name: &str, samples: &[LeaderSample], qualifying_races: usize) -> f64 {
    if qualifying_races == 0 {
        return 0.0;
    }

    let n = qualifying_races as f64;

    samples
        .iter()
        .filter(|sample| !sample.tempo_text.is_empty())
        .map(|sample| leader_contribution(sample, horse_name, n))
        .sum()
}

#[inline]
fn leader_contribution(sample: &LeaderSample, horse_name: &str, n: f64) -> f64 {
    if is_leader(&sample.tempo_text, horse_name) {
        sample.horse_start_number as f64 / n
    } else {
        0.0
    }
}
