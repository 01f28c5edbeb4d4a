//! Static cost table for wizard orders.
//!
//! Keyed by order type code and sub-type (tariff for connections, problem for
//! technical service). Unknown pairs fall back to [`DEFAULT_COST`].

use serde::{Deserialize, Serialize};

/// Cost components in so'm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub visit_fee: u64,
    pub repair_fee: u64,
    pub parts_fee: u64,
}

impl CostBreakdown {
    pub const fn new(visit_fee: u64, repair_fee: u64, parts_fee: u64) -> Self {
        Self {
            visit_fee,
            repair_fee,
            parts_fee,
        }
    }

    pub fn total(&self) -> u64 {
        self.visit_fee + self.repair_fee + self.parts_fee
    }
}

pub const DEFAULT_COST: CostBreakdown = CostBreakdown::new(50_000, 100_000, 0);

pub const TECHNICAL_SERVICE: &str = "technical_service";
pub const CONNECTION_REQUEST: &str = "connection_request";

const COST_TABLE: &[(&str, &str, CostBreakdown)] = &[
    (TECHNICAL_SERVICE, "no_internet", CostBreakdown::new(50_000, 100_000, 0)),
    (TECHNICAL_SERVICE, "slow_speed", CostBreakdown::new(50_000, 150_000, 50_000)),
    (TECHNICAL_SERVICE, "equipment_failure", CostBreakdown::new(50_000, 100_000, 200_000)),
    (TECHNICAL_SERVICE, "cable_damage", CostBreakdown::new(50_000, 200_000, 150_000)),
    (TECHNICAL_SERVICE, "tv_no_signal", CostBreakdown::new(50_000, 80_000, 0)),
    (TECHNICAL_SERVICE, "phone_no_dialtone", CostBreakdown::new(50_000, 60_000, 0)),
    (CONNECTION_REQUEST, "home_50", CostBreakdown::new(0, 100_000, 150_000)),
    (CONNECTION_REQUEST, "home_100", CostBreakdown::new(0, 100_000, 200_000)),
    (CONNECTION_REQUEST, "home_200", CostBreakdown::new(0, 150_000, 250_000)),
    (CONNECTION_REQUEST, "business_300", CostBreakdown::new(50_000, 300_000, 400_000)),
    (CONNECTION_REQUEST, "business_1000", CostBreakdown::new(50_000, 500_000, 600_000)),
];

/// Exact table entry for a pair, if any
pub fn lookup(order_type: &str, sub_type: &str) -> Option<CostBreakdown> {
    COST_TABLE
        .iter()
        .find(|(kind, sub, _)| *kind == order_type && *sub == sub_type)
        .map(|(_, _, cost)| *cost)
}

/// Table entry for a pair, or the default when the pair is unknown
pub fn cost_for(order_type: &str, sub_type: &str) -> CostBreakdown {
    lookup(order_type, sub_type).unwrap_or(DEFAULT_COST)
}

/// Formats an amount with space thousand separators: `250000` -> `250 000`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1 000");
        assert_eq!(format_amount(250_000), "250 000");
        assert_eq!(format_amount(1_150_000), "1 150 000");
    }
}
