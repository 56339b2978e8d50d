use crate::domain::factors::OfferFactors;
use crate::engine::fmt_usd;

/// System + user halves of one strategy request. A pure function of the
/// factors, kept apart from the transport so the exact text can be
/// asserted in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(factors: &OfferFactors) -> StrategyPrompt {
    StrategyPrompt {
        system: system_prompt(),
        user: user_prompt(factors),
    }
}

fn system_prompt() -> String {
    // Keep strict: JSON only, no prose.
    [
        "You are an offer-strategy advisor for residential real-estate buyers.",
        "Return ONLY valid JSON. Do not wrap in markdown. Do not include any extra keys.",
        "No trailing commas. No comments. Use double quotes for all JSON strings.",
        "Output schema:",
        "{",
        "  \"primaryStrategy\": <strategy>,",
        "  \"alternativeStrategies\": [<strategy>, <strategy>],",
        "  \"marketSummary\": \"...\",",
        "  \"competitiveAnalysis\": \"...\",",
        "  \"recommendedApproach\": \"...\"",
        "}",
        "where <strategy> is:",
        "{",
        "  \"recommendedOffer\": 425000,",
        "  \"offerPercentage\": 98.3,",
        "  \"confidence\": 72,",
        "  \"strategy\": \"aggressive|competitive|balanced|conservative\",",
        "  \"reasoning\": \"...\",",
        "  \"terms\": {",
        "    \"inspectionPeriod\": 10,",
        "    \"financingContingency\": 21,",
        "    \"appraisalContingency\": true,",
        "    \"escalationClause\": {\"maxPrice\": 437750, \"increment\": 2125}",
        "  },",
        "  \"negotiationTips\": [\"...\"],",
        "  \"riskFactors\": [\"...\"],",
        "  \"strengths\": [\"...\"],",
        "  \"timeline\": {",
        "    \"responseDeadline\": \"24 hours\",",
        "    \"closeDate\": \"30 days\",",
        "    \"keyMilestones\": [{\"milestone\": \"...\", \"date\": \"...\", \"importance\": \"critical|important|flexible\"}]",
        "  }",
        "}",
        "Rules:",
        "- confidence is an integer between 20 and 95",
        "- offerPercentage = recommendedOffer / listing price * 100",
        "- alternativeStrategies has exactly 2 entries: one above and one below the primary offer",
        "- escalationClause may be null when the strategy does not call for one",
        "- inspectionPeriod and financingContingency are whole days",
    ]
    .join("\n")
}

fn user_prompt(factors: &OfferFactors) -> String {
    let market = &factors.market_data;

    let mut lines = vec![
        "Recommend a purchase offer strategy for the following situation.".to_string(),
        String::new(),
        "Property:".to_string(),
        format!("- listing price: {}", fmt_usd(factors.listing_price)),
        match factors.buyer_proposed_offer() {
            Some(offer) => format!("- buyer's proposed offer: {}", fmt_usd(offer)),
            None => "- buyer's proposed offer: none; choose the number".to_string(),
        },
        format!("- condition: {}", factors.property_condition.label()),
        format!("- type: {}", factors.property_type),
        format!("- location: {}", factors.location),
    ];
    if let Some(features) = &factors.unique_features {
        lines.push(format!("- unique features: {features}"));
    }
    if let Some(repairs) = &factors.repair_needs {
        lines.push(format!("- repair needs: {repairs}"));
    }

    lines.extend([
        String::new(),
        "Seller:".to_string(),
        format!("- motivation: {}", factors.seller_motivation.label()),
        format!("- days on market: {}", factors.days_on_market),
        format!("- price reductions so far: {}", factors.price_reductions),
        format!("- reason for selling: {}", factors.reason_for_selling.label()),
        format!("- seller timeframe: {}", factors.seller_timeframe.label()),
        String::new(),
        "Buyer:".to_string(),
        format!("- buyer timeframe: {}", factors.buyer_timeframe.label()),
    ]);
    if let Some(close) = factors.desired_close_date {
        lines.push(format!("- desired close date: {close}"));
    }
    if let Some(concessions) = &factors.concessions {
        lines.push(format!("- requested concessions: {concessions}"));
    }

    lines.extend([
        String::new(),
        format!("Market ({}):", market.location),
        format!("- average days on market: {}", market.days_on_market),
        format!("- price change year over year: {:+.1}%", market.price_change),
        format!("- inventory: {:.1} months", market.inventory),
        format!(
            "- median {} price: {}",
            market.property_type,
            fmt_usd(market.median_price)
        ),
        format!("- sales volume: {} recent sales", market.sales_volume),
    ]);
    if let Some(score) = market.competitive_score {
        lines.push(format!("- competitiveness score: {score:.1}/10"));
    }
    if let Some(price_per_sq_ft) = market.price_per_sq_ft {
        lines.push(format!(
            "- price per square foot: {}",
            fmt_usd(price_per_sq_ft)
        ));
    }
    lines.extend([
        format!(
            "- competition for this listing: {}",
            factors.competition_level.label()
        ),
        format!("- seasonal timing: {}", factors.seasonal_timing.label()),
    ]);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::baseline_factors;
    use chrono::NaiveDate;

    #[test]
    fn user_prompt_embeds_every_factor() {
        let mut factors = baseline_factors();
        factors.proposed_offer = Some(395_000.0);
        factors.unique_features = Some("corner lot, new roof".to_string());
        factors.repair_needs = Some("furnace nearing end of life".to_string());
        factors.desired_close_date = NaiveDate::from_ymd_opt(2026, 4, 15);
        factors.concessions = Some("seller-paid closing costs".to_string());

        let prompt = build_prompt(&factors);
        for needle in [
            "$400,000",
            "$395,000",
            "condition: good",
            "single_family",
            "Maple Grove, MN",
            "corner lot, new roof",
            "furnace nearing end of life",
            "somewhat motivated",
            "days on market: 25",
            "price reductions so far: 0",
            "relocation",
            "within 60 days",
            "within 30 days",
            "2026-04-15",
            "seller-paid closing costs",
            "+2.4%",
            "3.8 months",
            "$415,000",
            "118 recent sales",
            "6.5/10",
            "$231",
            "competition for this listing: medium",
            "seasonal timing: average",
        ] {
            assert!(
                prompt.user.contains(needle),
                "missing {needle:?} in prompt:\n{}",
                prompt.user
            );
        }
    }

    #[test]
    fn system_prompt_pins_the_json_contract() {
        let prompt = build_prompt(&baseline_factors());
        assert!(prompt.system.contains("ONLY valid JSON"));
        for field in [
            "primaryStrategy",
            "alternativeStrategies",
            "marketSummary",
            "competitiveAnalysis",
            "recommendedApproach",
        ] {
            assert!(prompt.system.contains(field), "missing {field}");
        }
        assert!(prompt.system.contains("between 20 and 95"));
    }

    #[test]
    fn prompt_is_a_pure_function_of_the_factors() {
        let factors = baseline_factors();
        assert_eq!(build_prompt(&factors), build_prompt(&factors));
    }
}
