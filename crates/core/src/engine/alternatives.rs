use crate::domain::factors::OfferFactors;
use crate::domain::strategy::{OfferStrategy, StrategyKind, MAX_CONFIDENCE, MIN_CONFIDENCE};
use crate::engine::fmt_usd;

/// Bracket the primary with one stronger and one softer play,
/// aggressive first.
pub fn alternative_strategies(
    primary: &OfferStrategy,
    factors: &OfferFactors,
) -> Vec<OfferStrategy> {
    vec![
        aggressive_variant(primary, factors),
        conservative_variant(primary, factors),
    ]
}

fn aggressive_variant(primary: &OfferStrategy, factors: &OfferFactors) -> OfferStrategy {
    let recommended = (primary.recommended_offer * 1.02).round();

    let mut out = primary.clone();
    out.recommended_offer = recommended;
    out.offer_percentage = recommended / factors.listing_price * 100.0;
    out.strategy = StrategyKind::Aggressive;
    out.confidence = (primary.confidence + 10).min(MAX_CONFIDENCE);
    out.terms.inspection_period = primary.terms.inspection_period.saturating_sub(3).max(5);
    out.terms.financing_contingency = primary.terms.financing_contingency.saturating_sub(7).max(14);
    out.reasoning = format!(
        "Win-the-house variant: {} -- 2% over the primary number with inspection tightened to {} days and financing to {} days. Worth it when {} competition or a standout property argues against losing the deal over the margin.",
        fmt_usd(recommended),
        out.terms.inspection_period,
        out.terms.financing_contingency,
        factors.competition_level.label(),
    );
    out
}

fn conservative_variant(primary: &OfferStrategy, factors: &OfferFactors) -> OfferStrategy {
    let recommended = (primary.recommended_offer * 0.97).round();

    let mut out = primary.clone();
    out.recommended_offer = recommended;
    out.offer_percentage = recommended / factors.listing_price * 100.0;
    out.strategy = StrategyKind::Conservative;
    out.confidence = (primary.confidence - 15).max(MIN_CONFIDENCE);
    out.terms.inspection_period = primary.terms.inspection_period + 7;
    out.terms.financing_contingency = primary.terms.financing_contingency + 7;
    out.reasoning = format!(
        "Protect-the-downside variant: {} -- 3% under the primary number with inspection widened to {} days and financing to {} days. The play when a {} seller at {} days on market can be waited out.",
        fmt_usd(recommended),
        out.terms.inspection_period,
        out.terms.financing_contingency,
        factors.seller_motivation.label(),
        factors.days_on_market,
    );
    out
}
