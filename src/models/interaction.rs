use serde::{Deserialize, Serialize};

use super::enums::{Confidence, Severity, SourceTier};
use super::medication::NormalizedDrug;

// ---------------------------------------------------------------------------
// DrugPair
// ---------------------------------------------------------------------------

/// An unordered pair of normalized drugs. `(A,B)` and `(B,A)` are the same
/// pair; identity goes through `key()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugPair {
    pub a: NormalizedDrug,
    pub b: NormalizedDrug,
}

impl DrugPair {
    pub fn new(a: NormalizedDrug, b: NormalizedDrug) -> Self {
        Self { a, b }
    }

    /// Symmetric identity: canonical names in lexicographic order.
    pub fn key(&self) -> (String, String) {
        let x = self.a.canonical_name.to_lowercase();
        let y = self.b.canonical_name.to_lowercase();
        if x <= y {
            (x, y)
        } else {
            (y, x)
        }
    }

    /// The pair's members in `key()` order.
    pub fn ordered(&self) -> (&NormalizedDrug, &NormalizedDrug) {
        if self.a.canonical_name.to_lowercase() <= self.b.canonical_name.to_lowercase() {
            (&self.a, &self.b)
        } else {
            (&self.b, &self.a)
        }
    }

    pub fn display(&self) -> String {
        let (first, second) = self.ordered();
        format!("{} + {}", first.canonical_name, second.canonical_name)
    }
}

// ---------------------------------------------------------------------------
// InteractionRecord
// ---------------------------------------------------------------------------

/// A resolved drug-drug interaction. `drug_a`/`drug_b` are always emitted
/// in the pair's symmetric key order, so resolving `(A,B)` and `(B,A)`
/// yields identical records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: Severity,
    pub mechanism: Option<String>,
    pub recommendation: Option<String>,
    pub evidence_level: String,
    pub citations: Vec<String>,
    pub source_tier: SourceTier,
    pub confidence: Confidence,
}

impl InteractionRecord {
    /// Whether this record concerns the given drug (either side).
    pub fn involves(&self, canonical_name: &str) -> bool {
        self.drug_a.eq_ignore_ascii_case(canonical_name)
            || self.drug_b.eq_ignore_ascii_case(canonical_name)
    }
}
