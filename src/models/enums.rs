use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(SourceTier {
    Cache => "cache",
    Curated => "curated",
    Heuristic => "heuristic",
});

str_enum!(PgxAction {
    Avoid => "avoid",
    AdjustDose => "adjust_dose",
    UseAlternative => "use_alternative",
    Monitor => "monitor",
    NoAction => "no_action",
});

str_enum!(Phenotype {
    PoorMetabolizer => "poor-metabolizer",
    IntermediateMetabolizer => "intermediate-metabolizer",
    NormalMetabolizer => "normal-metabolizer",
    RapidMetabolizer => "rapid-metabolizer",
    UltrarapidMetabolizer => "ultrarapid-metabolizer",
});

str_enum!(FormularyStatus {
    LikelyCovered => "likely-covered",
    PriorAuthorization => "prior-authorization",
    CoverageUnknown => "coverage-unknown",
});

// ---------------------------------------------------------------------------
// Ordered clinical enums
// ---------------------------------------------------------------------------
// Variant order IS the clinical order; severity comparison always goes
// through Ord, never through the string forms.

/// Clinical impact of a drug-drug interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Contraindicated,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
            Self::Contraindicated => "contraindicated",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "moderate" => Ok(Self::Moderate),
            "major" => Ok(Self::Major),
            "contraindicated" => Ok(Self::Contraindicated),
            _ => Err(StoreError::InvalidEnum {
                field: "Severity".into(),
                value: s.into(),
            }),
        }
    }
}

/// Overall risk level reported for a medication list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// How much trust to place in a resolved result.
/// Reflects evidence availability, not risk magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl SourceTier {
    /// Confidence carried by a record resolved at this tier.
    /// Lower tiers never yield higher confidence than upper ones.
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Cache => Confidence::High,
            Self::Curated => Confidence::Medium,
            Self::Heuristic => Confidence::Low,
        }
    }
}
