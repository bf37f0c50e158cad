use crate::config::MAX_PLAUSIBLE_AGE;
use crate::models::{AllergyEntry, Demographics, LabValue};

use super::types::QualityFinding;

fn finding(domain: &str, detail: impl Into<String>) -> QualityFinding {
    QualityFinding {
        domain: domain.into(),
        detail: detail.into(),
    }
}

/// Completeness and plausibility checks over the demographics domain.
pub fn check_demographics(demographics: &Demographics) -> Vec<QualityFinding> {
    let mut findings = Vec::new();

    match demographics.age {
        None => findings.push(finding("demographics", "age is missing")),
        Some(age) if age > MAX_PLAUSIBLE_AGE => {
            findings.push(finding("demographics", format!("age {age} is implausible")))
        }
        Some(_) => {}
    }
    if demographics.sex.as_deref().map_or(true, |s| s.trim().is_empty()) {
        findings.push(finding("demographics", "sex is missing"));
    }
    if demographics.weight_kg.is_none() {
        findings.push(finding(
            "demographics",
            "weight is missing; dose checks will be limited",
        ));
    }

    findings
}

/// Completeness checks over reported lab values.
pub fn check_labs(labs: &[LabValue]) -> Vec<QualityFinding> {
    let mut findings = Vec::new();

    for lab in labs {
        let name = lab.test_name.trim();
        if name.is_empty() {
            findings.push(finding("labs", "lab result without a test name"));
            continue;
        }
        match lab.value {
            None => findings.push(finding("labs", format!("{name}: no numeric value recorded"))),
            Some(value) => {
                if lab.unit.as_deref().map_or(true, |u| u.trim().is_empty()) {
                    findings.push(finding("labs", format!("{name}: value {value} has no unit")));
                }
                if let (Some(low), Some(high)) = (lab.reference_low, lab.reference_high) {
                    if value < low || value > high {
                        findings.push(finding(
                            "labs",
                            format!("{name}: {value} is outside the reference range {low}-{high}"),
                        ));
                    }
                }
            }
        }
    }

    findings
}

/// Completeness checks over reported allergies.
pub fn check_allergies(allergies: &[AllergyEntry]) -> Vec<QualityFinding> {
    let mut findings = Vec::new();

    for allergy in allergies {
        let allergen = allergy.allergen.trim();
        if allergen.is_empty() {
            findings.push(finding("allergies", "allergy entry without an allergen"));
            continue;
        }
        if !allergy.verified {
            findings.push(finding(
                "allergies",
                format!("{allergen}: allergy is unverified"),
            ));
        }
        if allergy.reaction.as_deref().map_or(true, |r| r.trim().is_empty()) {
            findings.push(finding(
                "allergies",
                format!("{allergen}: no reaction documented"),
            ));
        }
    }

    findings
}
