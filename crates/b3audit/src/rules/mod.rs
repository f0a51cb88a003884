use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{InstrumentRecord, SecurityType};

pub const FUTURE_MARKET: &str = "FUTURE";
pub const EQUITY_DERIVATE_MARKET: &str = "EQUITY-DERIVATE";
pub const OPTIONS_ON_FUTURE_MARKET: &str = "OPTIONS ON FUTURE";
pub const OPTIONS_ON_SPOT_MARKET: &str = "OPTIONS ON SPOT";
pub const OPTION_ON_EQUITIES_CATEGORY: &str = "OPTION ON EQUITIES";
pub const OPTION_ON_INDEX_CATEGORY: &str = "OPTION ON INDEX";
pub const SHARES_CATEGORY: &str = "SHARES";
pub const BDR_CATEGORY: &str = "BDR";
pub const ETF_CATEGORIES: &[&str] = &["ETF EQUITIES", "ETF FOREIGN INDEX"];
pub const FUNDS_CATEGORY: &str = "FUNDS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleKey {
    Futures,
    EquityOptions,
    IndexAndFutureOptions,
    Shares,
    Bdrs,
    Etfs,
    Funds,
    Reits,
}

#[must_use]
pub const fn rule_key_name(key: RuleKey) -> &'static str {
    match key {
        RuleKey::Futures => "futures",
        RuleKey::EquityOptions => "equity_options",
        RuleKey::IndexAndFutureOptions => "index_and_future_options",
        RuleKey::Shares => "shares",
        RuleKey::Bdrs => "bdrs",
        RuleKey::Etfs => "etfs",
        RuleKey::Funds => "funds",
        RuleKey::Reits => "reits",
    }
}

/// One entry of the declarative classification table. The predicate selects
/// records; conformance compares the assigned code against `expected`.
pub struct ClassificationRule {
    pub key: RuleKey,
    pub summary: &'static str,
    pub expected: &'static [SecurityType],
    predicate: fn(&InstrumentRecord) -> bool,
}

impl ClassificationRule {
    #[must_use]
    pub fn matches(&self, record: &InstrumentRecord) -> bool {
        (self.predicate)(record)
    }

    /// True when the assigned code is one of the rule's expected types.
    /// NULL and unmapped codes are never conformant.
    #[must_use]
    pub fn allows(&self, security_type_id: Option<i64>) -> bool {
        security_type_id
            .and_then(SecurityType::from_code)
            .is_some_and(|security_type| self.expected.contains(&security_type))
    }

    #[must_use]
    pub fn expected_labels(&self) -> String {
        self.expected
            .iter()
            .map(|security_type| security_type.label())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

const RULE_CATALOG: &[ClassificationRule] = &[
    ClassificationRule {
        key: RuleKey::Futures,
        summary: "MktNm='FUTURE'",
        expected: &[SecurityType::Future],
        predicate: matches_futures,
    },
    ClassificationRule {
        key: RuleKey::EquityOptions,
        summary: "MktNm='EQUITY-DERIVATE' and SctyCtgyNm='OPTION ON EQUITIES'",
        expected: &[SecurityType::OptionOnEquity],
        predicate: matches_equity_options,
    },
    ClassificationRule {
        key: RuleKey::IndexAndFutureOptions,
        summary: "(MktNm='EQUITY-DERIVATE' and SctyCtgyNm='OPTION ON INDEX') \
                  or MktNm in ('OPTIONS ON FUTURE', 'OPTIONS ON SPOT')",
        expected: &[SecurityType::OptionOnFuture],
        predicate: matches_index_and_future_options,
    },
    ClassificationRule {
        key: RuleKey::Shares,
        summary: "SctyCtgyNm='SHARES'",
        expected: &[SecurityType::Equity],
        predicate: matches_shares,
    },
    ClassificationRule {
        key: RuleKey::Bdrs,
        summary: "SctyCtgyNm='BDR'",
        expected: &[SecurityType::Receipt],
        predicate: matches_bdrs,
    },
    ClassificationRule {
        key: RuleKey::Etfs,
        summary: "SctyCtgyNm in ('ETF EQUITIES', 'ETF FOREIGN INDEX')",
        expected: &[SecurityType::Etf],
        predicate: matches_etfs,
    },
    ClassificationRule {
        key: RuleKey::Funds,
        summary: "SctyCtgyNm='FUNDS'",
        expected: &[SecurityType::Reit, SecurityType::Fund],
        predicate: matches_funds,
    },
    ClassificationRule {
        key: RuleKey::Reits,
        summary: "SctyCtgyNm='FUNDS' and CrpnNm matches IMOB/FII",
        expected: &[SecurityType::Reit],
        predicate: matches_reits,
    },
];

/// The fixed, ordered rule table. Rules are evaluated independently and are
/// not mutually exclusive: `reits` refines `funds`.
#[must_use]
pub fn rule_catalog() -> &'static [ClassificationRule] {
    RULE_CATALOG
}

fn matches_futures(record: &InstrumentRecord) -> bool {
    record.market_name == FUTURE_MARKET
}

fn matches_equity_options(record: &InstrumentRecord) -> bool {
    record.market_name == EQUITY_DERIVATE_MARKET
        && record.security_category_name == OPTION_ON_EQUITIES_CATEGORY
}

// Grouped as `(A and B) or C or D`: only the equity-derivate disjunct checks
// the category; the two option markets select on market name alone. The
// assigned-code comparison happens uniformly in `evaluate_rules`, never
// inside the predicate.
fn matches_index_and_future_options(record: &InstrumentRecord) -> bool {
    (record.market_name == EQUITY_DERIVATE_MARKET
        && record.security_category_name == OPTION_ON_INDEX_CATEGORY)
        || record.market_name == OPTIONS_ON_FUTURE_MARKET
        || record.market_name == OPTIONS_ON_SPOT_MARKET
}

fn matches_shares(record: &InstrumentRecord) -> bool {
    record.security_category_name == SHARES_CATEGORY
}

fn matches_bdrs(record: &InstrumentRecord) -> bool {
    record.security_category_name == BDR_CATEGORY
}

fn matches_etfs(record: &InstrumentRecord) -> bool {
    ETF_CATEGORIES
        .iter()
        .any(|category| record.security_category_name == *category)
}

fn matches_funds(record: &InstrumentRecord) -> bool {
    record.security_category_name == FUNDS_CATEGORY
}

fn matches_reits(record: &InstrumentRecord) -> bool {
    record.security_category_name == FUNDS_CATEGORY
        && record
            .corporate_name
            .as_deref()
            .is_some_and(is_reit_corporate_name)
}

fn reit_corporate_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)IMOB|FII").expect("REIT corporate-name pattern should compile")
    })
}

/// Case-insensitive substring check for the FUNDS→REIT refinement.
#[must_use]
pub fn is_reit_corporate_name(corporate_name: &str) -> bool {
    reit_corporate_name_regex().is_match(corporate_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleMismatch {
    pub ticker: String,
    pub market_name: String,
    pub security_category_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_security_type_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConformance {
    pub key: RuleKey,
    pub expected: Vec<SecurityType>,
    pub matched_records: usize,
    pub conformant_records: usize,
    pub mismatches: Vec<RuleMismatch>,
}

/// Walk the rule table over the full snapshot and report per-rule counts.
/// A mismatch is a selected record whose assigned code is outside the
/// expected set; NULL assignments count as mismatches and additionally
/// surface in the unmapped-categories report section.
#[must_use]
pub fn evaluate_rules(records: &[InstrumentRecord]) -> Vec<RuleConformance> {
    rule_catalog()
        .iter()
        .map(|rule| evaluate_rule(rule, records))
        .collect()
}

fn evaluate_rule(rule: &ClassificationRule, records: &[InstrumentRecord]) -> RuleConformance {
    let mut matched_records = 0usize;
    let mut conformant_records = 0usize;
    let mut mismatches = Vec::new();

    for record in records {
        if !rule.matches(record) {
            continue;
        }

        matched_records += 1;
        if rule.allows(record.security_type_id) {
            conformant_records += 1;
        } else {
            mismatches.push(RuleMismatch {
                ticker: record.ticker.clone(),
                market_name: record.market_name.clone(),
                security_category_name: record.security_category_name.clone(),
                actual_security_type_id: record.security_type_id,
            });
        }
    }

    mismatches.sort_by(|left, right| left.ticker.cmp(&right.ticker));

    RuleConformance {
        key: rule.key,
        expected: rule.expected.to_vec(),
        matched_records,
        conformant_records,
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::{RuleKey, is_reit_corporate_name, rule_catalog};
    use crate::models::InstrumentRecord;

    fn record(market_name: &str, security_category_name: &str) -> InstrumentRecord {
        InstrumentRecord {
            ticker: "TEST11".to_string(),
            market_name: market_name.to_string(),
            security_category_name: security_category_name.to_string(),
            corporate_name: None,
            instrument_name: None,
            security_type_id: None,
        }
    }

    fn rule(key: RuleKey) -> &'static super::ClassificationRule {
        rule_catalog()
            .iter()
            .find(|rule| rule.key == key)
            .expect("rule key should exist in the catalog")
    }

    #[test]
    fn options_rule_checks_category_only_for_equity_derivate() {
        let options_rule = rule(RuleKey::IndexAndFutureOptions);

        assert!(options_rule.matches(&record("EQUITY-DERIVATE", "OPTION ON INDEX")));
        assert!(!options_rule.matches(&record("EQUITY-DERIVATE", "OPTION ON EQUITIES")));
        assert!(options_rule.matches(&record("OPTIONS ON FUTURE", "anything")));
        assert!(options_rule.matches(&record("OPTIONS ON SPOT", "anything")));
        assert!(!options_rule.matches(&record("FUTURE", "OPTION ON INDEX")));
    }

    #[test]
    fn reit_matcher_is_case_insensitive_substring() {
        assert!(is_reit_corporate_name("FII BTG PACTUAL"));
        assert!(is_reit_corporate_name("Fundo Imobiliario XP"));
        assert!(is_reit_corporate_name("fdo inv imob kinea"));
        assert!(!is_reit_corporate_name("BANCO DO BRASIL S.A."));
    }

    #[test]
    fn reits_rule_requires_funds_category_and_corporate_match() {
        let reits_rule = rule(RuleKey::Reits);

        let mut reit = record("EQUITY CASH", "FUNDS");
        reit.corporate_name = Some("FII KINEA RENDA".to_string());
        assert!(reits_rule.matches(&reit));

        let mut wrong_category = reit.clone();
        wrong_category.security_category_name = "SHARES".to_string();
        assert!(!reits_rule.matches(&wrong_category));

        let mut no_corporate = record("EQUITY CASH", "FUNDS");
        no_corporate.corporate_name = None;
        assert!(!reits_rule.matches(&no_corporate));
    }

    #[test]
    fn catalog_order_is_stable() {
        let keys = rule_catalog()
            .iter()
            .map(|rule| rule.key)
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                RuleKey::Futures,
                RuleKey::EquityOptions,
                RuleKey::IndexAndFutureOptions,
                RuleKey::Shares,
                RuleKey::Bdrs,
                RuleKey::Etfs,
                RuleKey::Funds,
                RuleKey::Reits,
            ]
        );
    }
}
