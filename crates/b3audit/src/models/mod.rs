use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: &str = "b3audit.report.v1";

/// Label reported for NULL assignments and for codes the catalog does not map.
pub const UNMAPPED_TYPE_LABEL: &str = "NULL/Unknown";

/// Fixed security-type catalog. Code 5 is intentionally absent; it reports as
/// `NULL/Unknown` like any other unmapped value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SecurityType {
    Equity,
    Bond,
    Cash,
    MoneyMarket,
    Etf,
    Reit,
    Derivative,
    Hybrid,
    Future,
    OptionOnEquity,
    OptionOnFuture,
    Forward,
    Fund,
    Receipt,
    Fx,
    Commodity,
    Index,
}

impl SecurityType {
    /// Every catalog entry in ascending code order.
    pub const ALL: [Self; 17] = [
        Self::Equity,
        Self::Bond,
        Self::Cash,
        Self::MoneyMarket,
        Self::Etf,
        Self::Reit,
        Self::Derivative,
        Self::Hybrid,
        Self::Future,
        Self::OptionOnEquity,
        Self::OptionOnFuture,
        Self::Forward,
        Self::Fund,
        Self::Receipt,
        Self::Fx,
        Self::Commodity,
        Self::Index,
    ];

    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Equity => 1,
            Self::Bond => 2,
            Self::Cash => 3,
            Self::MoneyMarket => 4,
            Self::Etf => 6,
            Self::Reit => 7,
            Self::Derivative => 8,
            Self::Hybrid => 9,
            Self::Future => 10,
            Self::OptionOnEquity => 11,
            Self::OptionOnFuture => 12,
            Self::Forward => 13,
            Self::Fund => 14,
            Self::Receipt => 15,
            Self::Fx => 16,
            Self::Commodity => 17,
            Self::Index => 18,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Equity),
            2 => Some(Self::Bond),
            3 => Some(Self::Cash),
            4 => Some(Self::MoneyMarket),
            6 => Some(Self::Etf),
            7 => Some(Self::Reit),
            8 => Some(Self::Derivative),
            9 => Some(Self::Hybrid),
            10 => Some(Self::Future),
            11 => Some(Self::OptionOnEquity),
            12 => Some(Self::OptionOnFuture),
            13 => Some(Self::Forward),
            14 => Some(Self::Fund),
            15 => Some(Self::Receipt),
            16 => Some(Self::Fx),
            17 => Some(Self::Commodity),
            18 => Some(Self::Index),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equity => "Equity",
            Self::Bond => "Bond",
            Self::Cash => "Cash",
            Self::MoneyMarket => "MoneyMarket",
            Self::Etf => "ETF",
            Self::Reit => "REIT",
            Self::Derivative => "Derivative",
            Self::Hybrid => "Hybrid",
            Self::Future => "Future",
            Self::OptionOnEquity => "OptionOnEquity",
            Self::OptionOnFuture => "OptionOnFuture",
            Self::Forward => "Forward",
            Self::Fund => "Fund",
            Self::Receipt => "Receipt",
            Self::Fx => "FX",
            Self::Commodity => "Commodity",
            Self::Index => "Index",
        }
    }
}

/// Total lookup over assigned codes: NULL and unmapped codes share one label.
#[must_use]
pub const fn label_for_code(code: Option<i64>) -> &'static str {
    match code {
        Some(code) => match SecurityType::from_code(code) {
            Some(security_type) => security_type.label(),
            None => UNMAPPED_TYPE_LABEL,
        },
        None => UNMAPPED_TYPE_LABEL,
    }
}

/// One row of the enriched instruments table, as loaded for an audit run.
/// Immutable snapshot data; nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InstrumentRecord {
    pub ticker: String,
    pub market_name: String,
    pub security_category_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporate_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_type_id: Option<i64>,
}
