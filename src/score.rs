//! Pain score calculation
//!
//! Only declines hurt: a rising or flat period contributes nothing. The weighted
//! decline is scaled, a sharp 24h drop earns escalation bonuses, and the result is
//! floored and capped at [`MAX_PAIN_SCORE`].

use crate::{
    constants::{
        CAPITULATION_BONUS, CAPITULATION_THRESHOLD_24H, CRASH_BONUS, CRASH_THRESHOLD_24H,
        MAX_PAIN_SCORE, SCORE_SCALE, WEIGHT_24H, WEIGHT_30D, WEIGHT_7D,
    },
    types::Quote,
};

/// Magnitude of a decline; gains and NaN count as no pain
fn decline(change: f64) -> f64 {
    (-change).max(0.0)
}

/// Computes the pain score of a quote, always in `0..=100`
pub fn pain_score(quote: &Quote) -> u8 {
    let pain_24h = decline(quote.percent_change_24h);
    let pain_7d = decline(quote.percent_change_7d);
    let pain_30d = decline(quote.percent_change_30d);

    let weighted = WEIGHT_24H * pain_24h + WEIGHT_7D * pain_7d + WEIGHT_30D * pain_30d;
    let mut score = weighted * SCORE_SCALE;

    if pain_24h > CRASH_THRESHOLD_24H {
        score += CRASH_BONUS;
    }
    if pain_24h > CAPITULATION_THRESHOLD_24H {
        score += CAPITULATION_BONUS;
    }

    score.floor().min(MAX_PAIN_SCORE as f64) as u8
}
