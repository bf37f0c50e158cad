use serde::{Deserialize, Serialize};

/// A medication as supplied by the caller. Input-only; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationReference {
    pub name: String,
    pub dose: Option<String>,
    pub route: Option<String>,
    pub frequency: Option<String>,
    pub indication: Option<String>,
}

impl MedicationReference {
    /// Name-only reference, the common case in analysis requests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dose: None,
            route: None,
            frequency: None,
            indication: None,
        }
    }
}

/// A medication reference resolved to its canonical identity.
/// `canonical_code` is present only when the drug directory had a match;
/// otherwise `canonical_name` falls back to the lowercase-trimmed input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDrug {
    pub original: MedicationReference,
    pub canonical_name: String,
    pub canonical_code: Option<String>,
}

impl NormalizedDrug {
    /// Name to show a clinician: the caller's spelling, canonical identity
    /// in parentheses when they differ.
    pub fn display_name(&self) -> String {
        let given = self.original.name.trim();
        if given.eq_ignore_ascii_case(&self.canonical_name) {
            self.canonical_name.clone()
        } else {
            format!("{} ({})", given, self.canonical_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_shows_canonical_when_aliased() {
        let drug = NormalizedDrug {
            original: MedicationReference::named("Tylenol"),
            canonical_name: "acetaminophen".into(),
            canonical_code: Some("161".into()),
        };
        assert_eq!(drug.display_name(), "Tylenol (acetaminophen)");
    }

    #[test]
    fn display_name_collapses_when_already_canonical() {
        let drug = NormalizedDrug {
            original: MedicationReference::named("Warfarin"),
            canonical_name: "warfarin".into(),
            canonical_code: None,
        };
        assert_eq!(drug.display_name(), "warfarin");
    }
}
