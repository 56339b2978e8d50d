use crate::domain::factors::{
    CompetitionLevel, OfferFactors, PropertyCondition, SellerMotivation, Timeframe,
};
use crate::domain::strategy::{
    ContractTerms, EscalationClause, Milestone, MilestoneImportance, OfferStrategy, OfferTimeline,
    StrategyKind,
};
use crate::engine::confidence::calculate_confidence;
use crate::engine::fmt_usd;

/// Offers never drop below 85% of list, whatever the discounts stack to.
pub const MIN_OFFER_MULTIPLIER: f64 = 0.85;

/// Rule-based recommendation for one factor set.
pub fn primary_strategy(factors: &OfferFactors) -> OfferStrategy {
    let listing = factors.listing_price;
    let recommended = match factors.buyer_proposed_offer() {
        // The buyer already picked a number; respect it.
        Some(offer) => offer,
        None => (listing * offer_multiplier(factors)).round(),
    };

    let ratio = recommended / listing;
    let strategy = StrategyKind::from_offer_ratio(ratio);
    let terms = contract_terms(factors, strategy, recommended, listing);
    let timeline = offer_timeline(factors, &terms);

    OfferStrategy {
        recommended_offer: recommended,
        offer_percentage: ratio * 100.0,
        confidence: calculate_confidence(factors),
        strategy,
        reasoning: reasoning(factors, strategy, recommended),
        terms,
        negotiation_tips: negotiation_tips(factors, strategy),
        risk_factors: risk_factors(factors, ratio),
        strengths: strengths(factors),
        timeline,
    }
}

/// Discount multiplier against list price when the buyer has not picked
/// a number. Motivation sets the anchor; market time, price cuts, and
/// condition each pull it down; floored at MIN_OFFER_MULTIPLIER.
fn offer_multiplier(factors: &OfferFactors) -> f64 {
    let mut multiplier = match factors.seller_motivation {
        SellerMotivation::ExtremelyMotivated => 0.90,
        SellerMotivation::Motivated => 0.93,
        SellerMotivation::SomewhatMotivated => 0.96,
        SellerMotivation::NotMotivated => 0.98,
        SellerMotivation::TestingMarket => 0.95,
    };

    multiplier -= match factors.days_on_market {
        d if d > 90 => 0.03,
        d if d > 60 => 0.02,
        d if d > 30 => 0.01,
        _ => 0.0,
    };

    multiplier -= 0.01 * f64::from(factors.price_reductions);

    multiplier -= match factors.property_condition {
        PropertyCondition::NeedsWork => 0.05,
        PropertyCondition::FixerUpper => 0.08,
        PropertyCondition::Fair => 0.02,
        PropertyCondition::Excellent | PropertyCondition::Good => 0.0,
    };

    multiplier.max(MIN_OFFER_MULTIPLIER)
}

fn contract_terms(
    factors: &OfferFactors,
    strategy: StrategyKind,
    recommended: f64,
    listing: f64,
) -> ContractTerms {
    let inspection_period = match factors.property_condition {
        PropertyCondition::Excellent => 7,
        PropertyCondition::Good => 10,
        _ => 14,
    };

    let financing_contingency = if factors.buyer_timeframe == Timeframe::Asap {
        18
    } else {
        21
    };

    // Escalation only makes sense when the offer is already near list.
    let escalation_clause = matches!(
        strategy,
        StrategyKind::Competitive | StrategyKind::Aggressive
    )
    .then(|| EscalationClause {
        max_price: (recommended * 1.03).round(),
        increment: (listing * 0.005).round(),
    });

    ContractTerms {
        inspection_period,
        financing_contingency,
        appraisal_contingency: true,
        escalation_clause,
    }
}

pub(crate) fn offer_timeline(factors: &OfferFactors, terms: &ContractTerms) -> OfferTimeline {
    let response_deadline = if factors.competition_level == CompetitionLevel::High {
        "24 hours"
    } else {
        "48 hours"
    }
    .to_string();

    let close_date = match factors.buyer_timeframe {
        Timeframe::Asap => "21 days",
        Timeframe::Days30 => "30 days",
        _ => "45 days",
    }
    .to_string();

    let key_milestones = vec![
        Milestone {
            milestone: "Initial seller response".to_string(),
            date: response_deadline.clone(),
            importance: MilestoneImportance::Critical,
        },
        Milestone {
            milestone: "Inspection completed".to_string(),
            date: format!("{} days", terms.inspection_period),
            importance: MilestoneImportance::Critical,
        },
        Milestone {
            milestone: "Financing approved".to_string(),
            date: format!("{} days", terms.financing_contingency),
            importance: MilestoneImportance::Important,
        },
        Milestone {
            milestone: "Final walkthrough".to_string(),
            date: "1 day before close".to_string(),
            importance: MilestoneImportance::Important,
        },
    ];

    OfferTimeline {
        response_deadline,
        close_date,
        key_milestones,
    }
}

fn reasoning(factors: &OfferFactors, strategy: StrategyKind, recommended: f64) -> String {
    let pct = recommended / factors.listing_price * 100.0;
    let mut out = format!(
        "A {} offer: {} ({:.1}% of list). The seller reads as {} with the home at {} days on market",
        strategy.label(),
        fmt_usd(recommended),
        pct,
        factors.seller_motivation.label(),
        factors.days_on_market,
    );
    let area_days = factors.market_data.days_on_market;
    if factors.days_on_market > area_days {
        out.push_str(&format!(" against an area average of {area_days}"));
    }
    out.push('.');

    if factors.price_reductions > 0 {
        out.push_str(&format!(
            " {} price reduction{} already on record say the ask has room in it.",
            factors.price_reductions,
            plural(factors.price_reductions),
        ));
    }

    out.push_str(&format!(
        " Condition is rated {}, which the number and the inspection window both account for.",
        factors.property_condition.label(),
    ));
    out
}

fn negotiation_tips(factors: &OfferFactors, strategy: StrategyKind) -> Vec<String> {
    let mut tips = Vec::new();

    tips.push(match factors.competition_level {
        CompetitionLevel::High => {
            "Submit with a 24-hour response deadline so the listing agent cannot shop the offer around."
                .to_string()
        }
        _ => "Give the seller a 48-hour response window; enough pressure to answer, not enough to offend."
            .to_string(),
    });

    if matches!(
        factors.seller_motivation,
        SellerMotivation::ExtremelyMotivated | SellerMotivation::Motivated
    ) {
        tips.push(format!(
            "Lead with certainty of close: a {} seller on a {} timeframe usually values a clean contract over the last few thousand dollars.",
            factors.seller_motivation.label(),
            factors.seller_timeframe.label(),
        ));
    }

    if factors.days_on_market > 60 {
        tips.push(format!(
            "Mention the {} days on market when the number is presented; it frames the offer as market feedback rather than a lowball.",
            factors.days_on_market
        ));
    }

    if matches!(
        factors.property_condition,
        PropertyCondition::NeedsWork | PropertyCondition::FixerUpper
    ) {
        tips.push(
            "Price the known repair items into the offer now instead of re-trading after inspection."
                .to_string(),
        );
    }

    if matches!(
        strategy,
        StrategyKind::Competitive | StrategyKind::Aggressive
    ) {
        tips.push(
            "Keep the escalation cap to yourself; disclose it and it becomes the price.".to_string(),
        );
    }

    if let Some(concessions) = &factors.concessions {
        tips.push(format!(
            "Hold the requested concessions ({concessions}) in reserve; trade them away before moving on price."
        ));
    }

    tips
}

fn risk_factors(factors: &OfferFactors, ratio: f64) -> Vec<String> {
    let mut risks = Vec::new();

    if factors.competition_level == CompetitionLevel::High {
        risks.push(
            "Competing offers are likely; a slow or heavily conditioned offer can lose the property outright."
                .to_string(),
        );
    }

    if ratio <= 0.90 {
        risks.push(
            "An offer this far under list can be dismissed without a counter if the seller is not in a hurry."
                .to_string(),
        );
    }

    if matches!(
        factors.property_condition,
        PropertyCondition::NeedsWork | PropertyCondition::FixerUpper
    ) {
        let mut risk = format!(
            "A {} property can hide scope: inspection findings may reopen the price discussion",
            factors.property_condition.label()
        );
        if let Some(repairs) = &factors.repair_needs {
            risk.push_str(&format!(" (known items: {repairs})"));
        }
        risk.push('.');
        risks.push(risk);
    }

    if factors.market_data.inventory < 2.0 {
        risks.push(format!(
            "At {:.1} months of inventory the seller has the stronger hand in any counter.",
            factors.market_data.inventory
        ));
    }

    if factors.market_data.price_change > 5.0 {
        risks.push(
            "Prices are rising fast enough that the appraisal may lag the contract price.".to_string(),
        );
    }

    if risks.is_empty() {
        risks.push(
            "The seller may counter above the recommended figure; fix a walk-away number before responding."
                .to_string(),
        );
    }

    risks
}

fn strengths(factors: &OfferFactors) -> Vec<String> {
    let mut strengths = Vec::new();

    if matches!(
        factors.seller_motivation,
        SellerMotivation::ExtremelyMotivated | SellerMotivation::Motivated
    ) {
        strengths.push(format!(
            "A {} seller gives the buyer real leverage on both price and terms.",
            factors.seller_motivation.label()
        ));
    }

    if factors.days_on_market > 60 {
        strengths.push(format!(
            "{} days on market is stale for the area and weakens the seller's pricing position.",
            factors.days_on_market
        ));
    }

    if factors.price_reductions > 0 {
        strengths.push(format!(
            "{} price reduction{} show the seller already negotiating against the ask.",
            factors.price_reductions,
            plural(factors.price_reductions)
        ));
    }

    if factors.market_data.inventory > 6.0 {
        strengths.push(format!(
            "{:.1} months of inventory means credible alternatives if this one falls through.",
            factors.market_data.inventory
        ));
    }

    if strengths.is_empty() {
        strengths.push(
            "A complete offer with standard contingencies and a firm timeline stands out even below list."
                .to_string(),
        );
    }

    strengths
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::baseline_factors;

    #[test]
    fn baseline_uses_the_motivation_anchor() {
        let strategy = primary_strategy(&baseline_factors());
        // somewhat_motivated anchors at 0.96 and nothing else applies.
        assert_eq!(strategy.recommended_offer, 384_000.0);
        assert_eq!(strategy.strategy, StrategyKind::Competitive);
        assert!((strategy.offer_percentage - 96.0).abs() < 1e-9);
    }

    #[test]
    fn heavily_discounted_listing_floors_at_85_percent() {
        let mut factors = baseline_factors();
        factors.listing_price = 500_000.0;
        factors.proposed_offer = Some(0.0); // zero means "engine decides"
        factors.seller_motivation = SellerMotivation::ExtremelyMotivated;
        factors.days_on_market = 120;
        factors.price_reductions = 2;
        factors.property_condition = PropertyCondition::FixerUpper;
        factors.market_data.inventory = 8.0;

        let strategy = primary_strategy(&factors);
        // 0.90 - 0.03 - 0.02 - 0.08 = 0.77, floored at 0.85.
        assert_eq!(strategy.recommended_offer, 425_000.0);
        assert_eq!(strategy.strategy, StrategyKind::Conservative);
        assert_eq!(strategy.confidence, 95);
        assert!((strategy.offer_percentage - 85.0).abs() < 1e-9);
        assert!(strategy.terms.escalation_clause.is_none());
        assert_eq!(strategy.terms.inspection_period, 14);

        for needle in ["conservative", "extremely motivated", "120", "fixer-upper"] {
            assert!(
                strategy.reasoning.contains(needle),
                "missing {needle:?} in reasoning: {}",
                strategy.reasoning
            );
        }
    }

    #[test]
    fn buyer_supplied_offer_is_used_verbatim() {
        let mut factors = baseline_factors();
        factors.listing_price = 300_000.0;
        factors.proposed_offer = Some(295_000.0);

        let strategy = primary_strategy(&factors);
        assert_eq!(strategy.recommended_offer, 295_000.0);
        let derived = 295_000.0 / 300_000.0 * 100.0;
        assert!((strategy.offer_percentage - derived).abs() < 1e-9);
        // 98.33% of list sits above the strict 98% boundary.
        assert_eq!(strategy.strategy, StrategyKind::Aggressive);

        let clause = strategy
            .terms
            .escalation_clause
            .expect("near-list offers carry an escalation clause");
        assert_eq!(clause.max_price, (295_000.0f64 * 1.03).round());
        assert_eq!(clause.increment, 1_500.0);
    }

    #[test]
    fn contingency_windows_follow_condition_and_timeframe() {
        let mut factors = baseline_factors();
        factors.property_condition = PropertyCondition::Excellent;
        factors.buyer_timeframe = Timeframe::Asap;
        let strategy = primary_strategy(&factors);
        assert_eq!(strategy.terms.inspection_period, 7);
        assert_eq!(strategy.terms.financing_contingency, 18);
        assert!(strategy.terms.appraisal_contingency);
        assert_eq!(strategy.timeline.close_date, "21 days");

        factors.property_condition = PropertyCondition::Good;
        factors.buyer_timeframe = Timeframe::Flexible;
        let strategy = primary_strategy(&factors);
        assert_eq!(strategy.terms.inspection_period, 10);
        assert_eq!(strategy.terms.financing_contingency, 21);
        assert_eq!(strategy.timeline.close_date, "45 days");

        factors.property_condition = PropertyCondition::Fair;
        factors.buyer_timeframe = Timeframe::Days30;
        let strategy = primary_strategy(&factors);
        assert_eq!(strategy.terms.inspection_period, 14);
        assert_eq!(strategy.timeline.close_date, "30 days");
    }

    #[test]
    fn response_deadline_tracks_competition_level() {
        let mut factors = baseline_factors();
        factors.competition_level = CompetitionLevel::High;
        assert_eq!(primary_strategy(&factors).timeline.response_deadline, "24 hours");

        factors.competition_level = CompetitionLevel::Medium;
        assert_eq!(primary_strategy(&factors).timeline.response_deadline, "48 hours");

        factors.competition_level = CompetitionLevel::Low;
        assert_eq!(primary_strategy(&factors).timeline.response_deadline, "48 hours");
    }

    #[test]
    fn milestones_are_ordered_and_anchored_to_terms() {
        let strategy = primary_strategy(&baseline_factors());
        let milestones = &strategy.timeline.key_milestones;

        assert_eq!(milestones.len(), 4);
        assert_eq!(milestones[0].milestone, "Initial seller response");
        assert_eq!(milestones[0].date, strategy.timeline.response_deadline);
        assert_eq!(milestones[0].importance, MilestoneImportance::Critical);
        assert_eq!(
            milestones[1].date,
            format!("{} days", strategy.terms.inspection_period)
        );
        assert_eq!(milestones[1].importance, MilestoneImportance::Critical);
        assert_eq!(
            milestones[2].date,
            format!("{} days", strategy.terms.financing_contingency)
        );
        assert_eq!(milestones[2].importance, MilestoneImportance::Important);
        assert_eq!(milestones[3].date, "1 day before close");
        assert_eq!(milestones[3].importance, MilestoneImportance::Important);
    }
}
