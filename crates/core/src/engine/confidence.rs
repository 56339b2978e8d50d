use crate::domain::factors::{OfferFactors, SellerMotivation};
use crate::domain::strategy::{MAX_CONFIDENCE, MIN_CONFIDENCE};

/// How favorable the buyer's position looks, on the 20..=95 band.
/// Starts at 50 and moves on seller urgency, market time, price cuts,
/// and inventory; clamped once at the end.
pub fn calculate_confidence(factors: &OfferFactors) -> i32 {
    let mut score: i64 = 50;

    score += match factors.seller_motivation {
        SellerMotivation::ExtremelyMotivated => 25,
        SellerMotivation::Motivated => 15,
        SellerMotivation::SomewhatMotivated => 5,
        SellerMotivation::NotMotivated | SellerMotivation::TestingMarket => 0,
    };

    score += match factors.days_on_market {
        d if d > 90 => 15,
        d if d > 60 => 10,
        d if d > 30 => 5,
        _ => 0,
    };

    // One bump per cut; the clamp below bounds the total.
    score += 8 * i64::from(factors.price_reductions);

    let inventory = factors.market_data.inventory;
    if inventory > 6.0 {
        score += 10;
    } else if inventory < 2.0 {
        score -= 15;
    }

    score.clamp(i64::from(MIN_CONFIDENCE), i64::from(MAX_CONFIDENCE)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::baseline_factors;

    #[test]
    fn neutral_factors_stay_near_base() {
        // somewhat_motivated (+5) is the only adjustment in the baseline.
        assert_eq!(calculate_confidence(&baseline_factors()), 55);
    }

    #[test]
    fn stacked_positives_clamp_at_the_ceiling() {
        let mut factors = baseline_factors();
        factors.seller_motivation = SellerMotivation::ExtremelyMotivated;
        factors.days_on_market = 120;
        factors.price_reductions = 2;
        factors.market_data.inventory = 8.0;
        // 50 + 25 + 15 + 16 + 10 = 116 before the clamp.
        assert_eq!(calculate_confidence(&factors), MAX_CONFIDENCE);
    }

    #[test]
    fn tight_inventory_pulls_the_score_down() {
        let mut factors = baseline_factors();
        factors.seller_motivation = SellerMotivation::NotMotivated;
        factors.market_data.inventory = 1.5;
        assert_eq!(calculate_confidence(&factors), 35);
    }

    #[test]
    fn days_on_market_bands_are_exclusive() {
        let mut factors = baseline_factors();
        factors.seller_motivation = SellerMotivation::NotMotivated;
        for (days_on_market, expected) in [(30, 50), (31, 55), (61, 60), (91, 65)] {
            factors.days_on_market = days_on_market;
            assert_eq!(
                calculate_confidence(&factors),
                expected,
                "days_on_market={days_on_market}"
            );
        }
    }

    #[test]
    fn many_price_cuts_only_hit_the_clamp() {
        let mut factors = baseline_factors();
        factors.price_reductions = 40;
        assert_eq!(calculate_confidence(&factors), MAX_CONFIDENCE);
    }
}
