use crate::models::{Confidence, InteractionRecord, RiskLevel, Severity};

/// Reduction of the resolved interaction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub overall_risk_level: RiskLevel,
    pub worst_severity: Option<Severity>,
    pub confidence: Confidence,
}

/// Reduce resolved records to an overall assessment. Worst case dominates:
/// the reported risk is never lower than the highest resolved severity.
/// Confidence reflects evidence availability (best tier that answered),
/// not risk magnitude.
pub fn aggregate(records: &[InteractionRecord]) -> Aggregate {
    let worst_severity = records.iter().map(|r| r.severity).max();

    let overall_risk_level = match worst_severity {
        Some(Severity::Major) | Some(Severity::Contraindicated) => RiskLevel::High,
        Some(Severity::Moderate) => RiskLevel::Moderate,
        Some(Severity::Minor) | None => RiskLevel::Low,
    };

    let confidence = records
        .iter()
        .map(|r| r.confidence)
        .max()
        .unwrap_or(Confidence::Low);

    Aggregate {
        overall_risk_level,
        worst_severity,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceTier;

    fn record(severity: Severity, tier: SourceTier) -> InteractionRecord {
        InteractionRecord {
            drug_a: "a".into(),
            drug_b: "b".into(),
            severity,
            mechanism: None,
            recommendation: None,
            evidence_level: "established".into(),
            citations: vec![],
            source_tier: tier,
            confidence: tier.confidence(),
        }
    }

    #[test]
    fn empty_set_is_low_risk_low_confidence() {
        let result = aggregate(&[]);
        assert_eq!(result.overall_risk_level, RiskLevel::Low);
        assert_eq!(result.worst_severity, None);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn worst_severity_dominates() {
        let records = vec![
            record(Severity::Minor, SourceTier::Curated),
            record(Severity::Major, SourceTier::Curated),
            record(Severity::Moderate, SourceTier::Curated),
        ];
        let result = aggregate(&records);
        assert_eq!(result.worst_severity, Some(Severity::Major));
        assert_eq!(result.overall_risk_level, RiskLevel::High);
    }

    #[test]
    fn risk_mapping_per_severity() {
        for (severity, expected) in [
            (Severity::Minor, RiskLevel::Low),
            (Severity::Moderate, RiskLevel::Moderate),
            (Severity::Major, RiskLevel::High),
            (Severity::Contraindicated, RiskLevel::High),
        ] {
            let result = aggregate(&[record(severity, SourceTier::Curated)]);
            assert_eq!(result.overall_risk_level, expected, "for {severity:?}");
        }
    }

    #[test]
    fn heuristic_only_evidence_keeps_confidence_low() {
        let result = aggregate(&[record(Severity::Major, SourceTier::Heuristic)]);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.overall_risk_level, RiskLevel::High);
    }

    #[test]
    fn best_tier_drives_confidence() {
        let records = vec![
            record(Severity::Minor, SourceTier::Heuristic),
            record(Severity::Moderate, SourceTier::Cache),
        ];
        assert_eq!(aggregate(&records).confidence, Confidence::High);
    }

    /// Adding records never lowers the reported risk (monotonicity).
    #[test]
    fn aggregation_is_monotone_over_supersets() {
        let base = vec![record(Severity::Moderate, SourceTier::Curated)];
        let superset = {
            let mut s = base.clone();
            s.push(record(Severity::Minor, SourceTier::Heuristic));
            s.push(record(Severity::Contraindicated, SourceTier::Curated));
            s
        };
        assert!(
            aggregate(&superset).overall_risk_level >= aggregate(&base).overall_risk_level
        );

        // And over every prefix of the superset.
        for n in 0..=superset.len() {
            let sub = aggregate(&superset[..n]);
            let full = aggregate(&superset);
            assert!(full.overall_risk_level >= sub.overall_risk_level);
        }
    }
}
