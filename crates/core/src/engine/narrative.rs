use crate::domain::factors::{CompetitionLevel, OfferFactors, SeasonalTiming, SellerMotivation};
use crate::engine::fmt_usd;

pub fn market_condition_label(inventory_months: f64) -> &'static str {
    if inventory_months < 3.0 {
        "seller's market"
    } else if inventory_months > 6.0 {
        "buyer's market"
    } else {
        "balanced market"
    }
}

pub fn price_trend_label(price_change_pct: f64) -> &'static str {
    if price_change_pct > 5.0 {
        "rapidly appreciating"
    } else if price_change_pct > 0.0 {
        "moderately appreciating"
    } else if price_change_pct < -5.0 {
        "declining"
    } else {
        "stable"
    }
}

pub fn market_summary(factors: &OfferFactors) -> String {
    let market = &factors.market_data;
    let mut out = format!(
        "{} is a {} right now: {:.1} months of inventory, {} prices ({:+.1}% year over year), and a median {} sale of {}.",
        market.location,
        market_condition_label(market.inventory),
        market.inventory,
        price_trend_label(market.price_change),
        market.price_change,
        market.property_type,
        fmt_usd(market.median_price),
    );
    out.push_str(&format!(
        " Typical listings go under contract in about {} days; this one has been listed for {}.",
        market.days_on_market, factors.days_on_market
    ));
    out.push_str(seasonal_note(factors.seasonal_timing));
    out
}

fn seasonal_note(timing: SeasonalTiming) -> &'static str {
    match timing {
        SeasonalTiming::Peak => " Peak-season demand keeps sellers confident.",
        SeasonalTiming::Good => " Seasonal demand is still healthy.",
        SeasonalTiming::Average => " Seasonal demand cuts neither way.",
        SeasonalTiming::Slow => " A slow-season listing adds quiet pressure on the seller.",
    }
}

pub fn competitive_analysis(factors: &OfferFactors) -> String {
    let mut out = match factors.competition_level {
        CompetitionLevel::High => {
            "Expect other offers on the table; terms and response speed will matter as much as price."
                .to_string()
        }
        CompetitionLevel::Medium => {
            "Some buyer interest is likely but not a feeding frenzy; a sharp, complete offer should lead."
                .to_string()
        }
        CompetitionLevel::Low => {
            "Little competing interest is visible, which leaves room to negotiate from the first number."
                .to_string()
        }
    };

    if factors.days_on_market > 60 {
        out.push_str(&format!(
            " {} days on market without a contract has already cost the seller leverage.",
            factors.days_on_market
        ));
    }

    if factors.price_reductions > 0 {
        let n = factors.price_reductions;
        out.push_str(&format!(
            " {} cut{} to the ask confirm{} the original pricing missed the market.",
            n,
            if n == 1 { "" } else { "s" },
            if n == 1 { "s" } else { "" },
        ));
    }

    if matches!(
        factors.seller_motivation,
        SellerMotivation::ExtremelyMotivated | SellerMotivation::Motivated
    ) {
        out.push_str(&format!(
            " A {} seller narrows the gap between asking and accepting.",
            factors.seller_motivation.label()
        ));
    }

    if let Some(score) = factors.market_data.competitive_score {
        out.push_str(&format!(" Area competitiveness scores {score:.0}/10."));
    }

    out
}

pub fn recommended_approach(factors: &OfferFactors) -> String {
    let stance = match factors.competition_level {
        CompetitionLevel::High => "competitive to aggressive",
        CompetitionLevel::Medium => "balanced",
        CompetitionLevel::Low => "conservative",
    };

    let timing = if factors.days_on_market > 60 {
        format!(
            "The {} days on market are a negotiation opportunity; the seller has had time to get realistic.",
            factors.days_on_market
        )
    } else if factors.days_on_market < 15 {
        "The listing is fresh, so move quickly and make the first offer count.".to_string()
    } else {
        "Standard timing applies; respond to counters within a business day and keep momentum."
            .to_string()
    };

    format!("Take a {stance} posture. {timing}")
}
