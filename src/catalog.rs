//! Static choice lists offered by the order wizards.
//!
//! Codes travel inside callback payloads, so they must stay short and must not
//! contain `:`.

/// One selectable option: payload code, localization key of its label, emoji
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub label_key: &'static str,
    pub emoji: &'static str,
}

const fn entry(code: &'static str, label_key: &'static str, emoji: &'static str) -> CatalogEntry {
    CatalogEntry {
        code,
        label_key,
        emoji,
    }
}

pub const REGIONS: &[CatalogEntry] = &[
    entry("toshkent", "region-toshkent", "🏙"),
    entry("samarqand", "region-samarqand", "🕌"),
    entry("buxoro", "region-buxoro", "🏛"),
    entry("andijon", "region-andijon", "🏞"),
    entry("fargona", "region-fargona", "🌄"),
    entry("namangan", "region-namangan", "🌳"),
    entry("xorazm", "region-xorazm", "🏜"),
    entry("qashqadaryo", "region-qashqadaryo", "⛰"),
];

/// Connection kinds for a new line
pub const CONNECTION_TYPES: &[CatalogEntry] = &[
    entry("b2c", "connection-type-b2c", "🏠"),
    entry("b2b", "connection-type-b2b", "🏢"),
];

pub const TARIFFS_B2C: &[CatalogEntry] = &[
    entry("home_50", "tariff-home-50", "📶"),
    entry("home_100", "tariff-home-100", "📶"),
    entry("home_200", "tariff-home-200", "🚀"),
];

pub const TARIFFS_B2B: &[CatalogEntry] = &[
    entry("business_300", "tariff-business-300", "💼"),
    entry("business_1000", "tariff-business-1000", "🏭"),
];

/// Services a technical ticket can be about
pub const SERVICE_TYPES: &[CatalogEntry] = &[
    entry("internet", "service-type-internet", "🌐"),
    entry("tv", "service-type-tv", "📺"),
    entry("phone", "service-type-phone", "☎️"),
];

pub const PROBLEMS_INTERNET: &[CatalogEntry] = &[
    entry("no_internet", "problem-no-internet", "🚫"),
    entry("slow_speed", "problem-slow-speed", "🐌"),
    entry("equipment_failure", "problem-equipment-failure", "📟"),
    entry("cable_damage", "problem-cable-damage", "✂️"),
];

pub const PROBLEMS_TV: &[CatalogEntry] = &[
    entry("tv_no_signal", "problem-tv-no-signal", "📡"),
    entry("equipment_failure", "problem-equipment-failure", "📟"),
    entry("cable_damage", "problem-cable-damage", "✂️"),
];

pub const PROBLEMS_PHONE: &[CatalogEntry] = &[
    entry("phone_no_dialtone", "problem-phone-no-dialtone", "🔇"),
    entry("cable_damage", "problem-cable-damage", "✂️"),
];

/// Tariffs offered for a connection type
pub fn tariffs_for(connection_type: &str) -> &'static [CatalogEntry] {
    match connection_type {
        "b2c" => TARIFFS_B2C,
        "b2b" => TARIFFS_B2B,
        _ => &[],
    }
}

/// Problem kinds offered for a service type
pub fn problems_for(service_type: &str) -> &'static [CatalogEntry] {
    match service_type {
        "internet" => PROBLEMS_INTERNET,
        "tv" => PROBLEMS_TV,
        "phone" => PROBLEMS_PHONE,
        _ => &[],
    }
}

pub fn find(entries: &'static [CatalogEntry], code: &str) -> Option<&'static CatalogEntry> {
    entries.iter().find(|e| e.code == code)
}

/// Label key for a region code, falling back to the raw code for unknown regions
pub fn region_label_key(code: &str) -> Option<&'static str> {
    find(REGIONS, code).map(|e| e.label_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_fit_callback_payloads() {
        let all = [
            REGIONS,
            CONNECTION_TYPES,
            TARIFFS_B2C,
            TARIFFS_B2B,
            SERVICE_TYPES,
            PROBLEMS_INTERNET,
            PROBLEMS_TV,
            PROBLEMS_PHONE,
        ];
        for list in all {
            for e in list {
                assert!(!e.code.contains(':'));
                assert!(e.code.len() <= 24);
            }
        }
    }

    #[test]
    fn test_lookup_by_parent_code() {
        assert_eq!(tariffs_for("b2b").len(), 2);
        assert!(find(problems_for("internet"), "slow_speed").is_some());
        assert!(problems_for("radio").is_empty());
    }
}
