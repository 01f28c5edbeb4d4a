//! # Pricing Tests
//!
//! Every priced order pair, and the fallback for pairs the table lacks.

use telecom_manager_bot::pricing::{
    cost_for, lookup, CostBreakdown, CONNECTION_REQUEST, DEFAULT_COST, TECHNICAL_SERVICE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_technical_problem_price() {
        let expected = [
            ("no_internet", (50_000, 100_000, 0), 150_000),
            ("slow_speed", (50_000, 150_000, 50_000), 250_000),
            ("equipment_failure", (50_000, 100_000, 200_000), 350_000),
            ("cable_damage", (50_000, 200_000, 150_000), 400_000),
            ("tv_no_signal", (50_000, 80_000, 0), 130_000),
            ("phone_no_dialtone", (50_000, 60_000, 0), 110_000),
        ];
        for (problem, (visit, repair, parts), total) in expected {
            let cost = cost_for(TECHNICAL_SERVICE, problem);
            assert_eq!(cost, CostBreakdown::new(visit, repair, parts), "{}", problem);
            assert_eq!(cost.total(), total, "{}", problem);
        }
    }

    #[test]
    fn test_every_connection_tariff_price() {
        let expected = [
            ("home_50", (0, 100_000, 150_000), 250_000),
            ("home_100", (0, 100_000, 200_000), 300_000),
            ("home_200", (0, 150_000, 250_000), 400_000),
            ("business_300", (50_000, 300_000, 400_000), 750_000),
            ("business_1000", (50_000, 500_000, 600_000), 1_150_000),
        ];
        for (tariff, (visit, repair, parts), total) in expected {
            let cost = cost_for(CONNECTION_REQUEST, tariff);
            assert_eq!(cost, CostBreakdown::new(visit, repair, parts), "{}", tariff);
            assert_eq!(cost.total(), total, "{}", tariff);
        }
    }

    #[test]
    fn test_unknown_pairs_fall_back_to_default() {
        assert_eq!(DEFAULT_COST, CostBreakdown::new(50_000, 100_000, 0));

        assert_eq!(lookup(TECHNICAL_SERVICE, "water_leak"), None);
        assert_eq!(cost_for(TECHNICAL_SERVICE, "water_leak"), DEFAULT_COST);

        // Sub-types only price under their own order type
        assert_eq!(lookup(CONNECTION_REQUEST, "slow_speed"), None);
        assert_eq!(cost_for(CONNECTION_REQUEST, "slow_speed"), DEFAULT_COST);
        assert_eq!(cost_for(TECHNICAL_SERVICE, "home_50"), DEFAULT_COST);

        assert_eq!(cost_for("call_center", "no_internet"), DEFAULT_COST);
        assert_eq!(cost_for("", "").total(), 150_000);
    }
}
