use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{FormularyStatus, GenePhenotype, Phenotype, PgxAction, Severity};

use super::types::AnalysisError;

/// One entry of the last-resort interaction table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicInteraction {
    pub drugs: [String; 2],
    pub severity: Severity,
    pub mechanism: String,
    pub effect: Option<String>,
    pub management: String,
    pub evidence_level: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HeuristicTableFile {
    version: String,
    interactions: Vec<HeuristicInteraction>,
}

/// Deterministic genotype → phenotype inference rule.
#[derive(Debug, Clone)]
pub struct PhenotypeRule {
    pub gene: String,
    /// Normalized diplotypes (alleles sorted) this rule covers.
    pub genotypes: Vec<String>,
    pub phenotype: Phenotype,
}

/// Actionable (drug, gene, phenotype) combination.
#[derive(Debug, Clone)]
pub struct PgxDrugRule {
    pub drug: String,
    pub gene: String,
    pub phenotype: Phenotype,
    pub action: PgxAction,
    pub rationale: String,
    pub citations: Vec<String>,
}

/// A substitute-therapy catalog entry for one flagged drug.
#[derive(Debug, Clone)]
pub struct AlternativeCandidate {
    pub for_drug: String,
    pub name: String,
    pub drug_class: String,
    pub safety_score: u8,
    pub efficacy_score: u8,
    pub formulary: FormularyStatus,
    /// Phenotypes for which this candidate is itself contraindicated.
    pub avoid_phenotypes: Vec<GenePhenotype>,
}

// ---------------------------------------------------------------------------
// ReferenceData
// ---------------------------------------------------------------------------

/// Immutable reference data injected into the analysis service at
/// construction. The heuristic interaction table is a versioned JSON asset;
/// the rule tables are curated in code alongside their citations.
pub struct ReferenceData {
    pub version: String,
    heuristic_interactions: Vec<HeuristicInteraction>,
    phenotype_rules: Vec<PhenotypeRule>,
    pgx_drug_rules: Vec<PgxDrugRule>,
    alternatives: Vec<AlternativeCandidate>,
}

impl ReferenceData {
    /// Reference data with the bundled interaction table.
    pub fn bundled() -> Result<Self, AnalysisError> {
        Self::from_json(
            include_str!("../../resources/known_interactions.json"),
            "bundled known_interactions.json",
        )
    }

    /// Reference data with a replacement interaction table from disk.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::ReferenceDataLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&raw, &path.display().to_string())
    }

    fn from_json(raw: &str, origin: &str) -> Result<Self, AnalysisError> {
        let table: HeuristicTableFile = serde_json::from_str(raw)
            .map_err(|e| AnalysisError::ReferenceDataParse(origin.into(), e.to_string()))?;

        Ok(Self {
            version: table.version,
            heuristic_interactions: table.interactions,
            phenotype_rules: builtin_phenotype_rules(),
            pgx_drug_rules: builtin_pgx_drug_rules(),
            alternatives: builtin_alternatives(),
        })
    }

    /// Look up the heuristic table for a pair, both orders, ignoring case,
    /// whitespace and punctuation ("contrast media" matches "contrastmedia").
    pub fn lookup_heuristic(&self, name_a: &str, name_b: &str) -> Option<&HeuristicInteraction> {
        let a = fold_name(name_a);
        let b = fold_name(name_b);
        self.heuristic_interactions.iter().find(|entry| {
            let x = fold_name(&entry.drugs[0]);
            let y = fold_name(&entry.drugs[1]);
            (a == x && b == y) || (a == y && b == x)
        })
    }

    /// Infer a phenotype from a genotype string when a rule exists.
    pub fn infer_phenotype(&self, gene: &str, genotype: &str) -> Option<Phenotype> {
        let normalized = normalize_genotype(genotype);
        self.phenotype_rules
            .iter()
            .find(|rule| {
                rule.gene.eq_ignore_ascii_case(gene)
                    && rule.genotypes.iter().any(|g| *g == normalized)
            })
            .map(|rule| rule.phenotype)
    }

    /// The actionable rule for a (drug, gene, phenotype) combination, if any.
    pub fn pgx_rule(
        &self,
        drug: &str,
        gene: &str,
        phenotype: Phenotype,
    ) -> Option<&PgxDrugRule> {
        self.pgx_drug_rules.iter().find(|rule| {
            rule.drug.eq_ignore_ascii_case(drug)
                && rule.gene.eq_ignore_ascii_case(gene)
                && rule.phenotype == phenotype
        })
    }

    /// Catalog candidates for a flagged drug.
    pub fn alternatives_for(&self, drug: &str) -> Vec<&AlternativeCandidate> {
        self.alternatives
            .iter()
            .filter(|c| c.for_drug.eq_ignore_ascii_case(drug))
            .collect()
    }
}

/// Collapse a drug name to its comparable form.
fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Normalize a diplotype for rule matching: alleles uppercased and sorted,
/// so `*4/*1` and `*1/*4` are the same observation.
pub fn normalize_genotype(genotype: &str) -> String {
    let mut alleles: Vec<String> = genotype
        .split('/')
        .map(|a| a.trim().to_uppercase())
        .filter(|a| !a.is_empty())
        .collect();
    alleles.sort();
    alleles.join("/")
}

// ---------------------------------------------------------------------------
// Curated rule tables
// ---------------------------------------------------------------------------

fn phenotype_rule(gene: &str, genotypes: &[&str], phenotype: Phenotype) -> PhenotypeRule {
    PhenotypeRule {
        gene: gene.into(),
        genotypes: genotypes.iter().map(|g| normalize_genotype(g)).collect(),
        phenotype,
    }
}

fn builtin_phenotype_rules() -> Vec<PhenotypeRule> {
    use Phenotype::*;
    vec![
        phenotype_rule(
            "CYP2D6",
            &["*3/*3", "*3/*4", "*4/*4", "*4/*5", "*5/*5", "*4/*6"],
            PoorMetabolizer,
        ),
        phenotype_rule("CYP2D6", &["*1/*4", "*1/*5", "*2/*4", "*10/*10"], IntermediateMetabolizer),
        phenotype_rule("CYP2D6", &["*1/*1", "*1/*2", "*2/*2"], NormalMetabolizer),
        phenotype_rule("CYP2D6", &["*1/*1xN", "*2/*2xN"], UltrarapidMetabolizer),
        phenotype_rule("CYP2C19", &["*2/*2", "*2/*3", "*3/*3"], PoorMetabolizer),
        phenotype_rule("CYP2C19", &["*1/*2", "*1/*3", "*2/*17"], IntermediateMetabolizer),
        phenotype_rule("CYP2C19", &["*1/*1"], NormalMetabolizer),
        phenotype_rule("CYP2C19", &["*1/*17"], RapidMetabolizer),
        phenotype_rule("CYP2C19", &["*17/*17"], UltrarapidMetabolizer),
        phenotype_rule("DPYD", &["*2A/*2A", "*13/*13", "*2A/*13"], PoorMetabolizer),
        phenotype_rule("DPYD", &["*1/*2A", "*1/*13"], IntermediateMetabolizer),
        phenotype_rule("DPYD", &["*1/*1"], NormalMetabolizer),
        phenotype_rule("TPMT", &["*2/*3A", "*3A/*3A", "*3A/*3C", "*3C/*3C"], PoorMetabolizer),
        phenotype_rule("TPMT", &["*1/*2", "*1/*3A", "*1/*3C"], IntermediateMetabolizer),
        phenotype_rule("TPMT", &["*1/*1"], NormalMetabolizer),
        phenotype_rule("UGT1A1", &["*28/*28"], PoorMetabolizer),
        phenotype_rule("UGT1A1", &["*1/*28"], IntermediateMetabolizer),
        phenotype_rule("UGT1A1", &["*1/*1"], NormalMetabolizer),
    ]
}

fn pgx_rule(
    drug: &str,
    gene: &str,
    phenotype: Phenotype,
    action: PgxAction,
    rationale: &str,
    citations: &[&str],
) -> PgxDrugRule {
    PgxDrugRule {
        drug: drug.into(),
        gene: gene.into(),
        phenotype,
        action,
        rationale: rationale.into(),
        citations: citations.iter().map(|c| c.to_string()).collect(),
    }
}

fn builtin_pgx_drug_rules() -> Vec<PgxDrugRule> {
    use Phenotype::*;
    use PgxAction::*;

    const CPIC_CODEINE: &str =
        "CPIC Guideline for Codeine and CYP2D6 (Crews KR et al., Clin Pharmacol Ther. 2021)";
    const CPIC_TAMOXIFEN: &str =
        "CPIC Guideline for Tamoxifen and CYP2D6 (Goetz MP et al., Clin Pharmacol Ther. 2018)";
    const CPIC_FLUOROPYRIMIDINES: &str =
        "CPIC Guideline for Fluoropyrimidines and DPYD (Amstutz U et al., Clin Pharmacol Ther. 2018)";
    const CPIC_THIOPURINES: &str =
        "CPIC Guideline for Thiopurines and TPMT/NUDT15 (Relling MV et al., Clin Pharmacol Ther. 2019)";
    const CPIC_CLOPIDOGREL: &str =
        "CPIC Guideline for Clopidogrel and CYP2C19 (Lee CR et al., Clin Pharmacol Ther. 2022)";
    const CPIC_ONDANSETRON: &str =
        "CPIC Guideline for Ondansetron and CYP2D6 (Bell GC et al., Clin Pharmacol Ther. 2017)";
    const FDA_IRINOTECAN: &str =
        "Camptosar (irinotecan) US prescribing information, UGT1A1*28 dosing section";

    vec![
        pgx_rule(
            "codeine",
            "CYP2D6",
            PoorMetabolizer,
            Avoid,
            "poor metabolizers cannot convert codeine to morphine; analgesia will be inadequate",
            &[CPIC_CODEINE],
        ),
        pgx_rule(
            "codeine",
            "CYP2D6",
            UltrarapidMetabolizer,
            Avoid,
            "ultrarapid conversion to morphine risks life-threatening toxicity",
            &[CPIC_CODEINE],
        ),
        pgx_rule(
            "tamoxifen",
            "CYP2D6",
            PoorMetabolizer,
            UseAlternative,
            "endoxifen exposure is substantially reduced; consider an aromatase inhibitor",
            &[CPIC_TAMOXIFEN],
        ),
        pgx_rule(
            "tamoxifen",
            "CYP2D6",
            IntermediateMetabolizer,
            Monitor,
            "endoxifen exposure may be reduced; avoid concurrent CYP2D6 inhibitors",
            &[CPIC_TAMOXIFEN],
        ),
        pgx_rule(
            "capecitabine",
            "DPYD",
            PoorMetabolizer,
            Avoid,
            "DPD deficiency causes severe, potentially fatal fluoropyrimidine toxicity",
            &[CPIC_FLUOROPYRIMIDINES],
        ),
        pgx_rule(
            "capecitabine",
            "DPYD",
            IntermediateMetabolizer,
            AdjustDose,
            "reduce starting dose by 50% and titrate by toxicity",
            &[CPIC_FLUOROPYRIMIDINES],
        ),
        pgx_rule(
            "fluorouracil",
            "DPYD",
            PoorMetabolizer,
            Avoid,
            "DPD deficiency causes severe, potentially fatal fluoropyrimidine toxicity",
            &[CPIC_FLUOROPYRIMIDINES],
        ),
        pgx_rule(
            "fluorouracil",
            "DPYD",
            IntermediateMetabolizer,
            AdjustDose,
            "reduce starting dose by 50% and titrate by toxicity",
            &[CPIC_FLUOROPYRIMIDINES],
        ),
        pgx_rule(
            "mercaptopurine",
            "TPMT",
            PoorMetabolizer,
            AdjustDose,
            "reduce to 10% of the usual dose, given thrice weekly, to avoid severe myelosuppression",
            &[CPIC_THIOPURINES],
        ),
        pgx_rule(
            "mercaptopurine",
            "TPMT",
            IntermediateMetabolizer,
            AdjustDose,
            "start at 30-80% of the usual dose and adjust by blood counts",
            &[CPIC_THIOPURINES],
        ),
        pgx_rule(
            "clopidogrel",
            "CYP2C19",
            PoorMetabolizer,
            UseAlternative,
            "loss-of-function alleles prevent activation; prasugrel or ticagrelor preferred",
            &[CPIC_CLOPIDOGREL],
        ),
        pgx_rule(
            "clopidogrel",
            "CYP2C19",
            IntermediateMetabolizer,
            Monitor,
            "reduced platelet inhibition expected; consider an alternative where indicated",
            &[CPIC_CLOPIDOGREL],
        ),
        pgx_rule(
            "irinotecan",
            "UGT1A1",
            PoorMetabolizer,
            AdjustDose,
            "homozygous *28 carriers clear SN-38 slowly; reduce starting dose by at least one level",
            &[FDA_IRINOTECAN],
        ),
        pgx_rule(
            "ondansetron",
            "CYP2D6",
            UltrarapidMetabolizer,
            UseAlternative,
            "rapid clearance reduces antiemetic efficacy; granisetron is not CYP2D6-dependent",
            &[CPIC_ONDANSETRON],
        ),
    ]
}

fn candidate(
    for_drug: &str,
    name: &str,
    drug_class: &str,
    safety_score: u8,
    efficacy_score: u8,
    formulary: FormularyStatus,
    avoid_phenotypes: &[(&str, Phenotype)],
) -> AlternativeCandidate {
    AlternativeCandidate {
        for_drug: for_drug.into(),
        name: name.into(),
        drug_class: drug_class.into(),
        safety_score,
        efficacy_score,
        formulary,
        avoid_phenotypes: avoid_phenotypes
            .iter()
            .map(|(gene, phenotype)| GenePhenotype {
                gene: (*gene).into(),
                phenotype: *phenotype,
            })
            .collect(),
    }
}

fn builtin_alternatives() -> Vec<AlternativeCandidate> {
    use FormularyStatus::*;
    use Phenotype::*;

    vec![
        candidate("warfarin", "apixaban", "direct factor Xa inhibitor", 94, 92, LikelyCovered, &[]),
        candidate("warfarin", "rivaroxaban", "direct factor Xa inhibitor", 89, 91, LikelyCovered, &[]),
        candidate("warfarin", "dalteparin", "low molecular weight heparin", 91, 87, PriorAuthorization, &[]),
        candidate(
            "aspirin",
            "clopidogrel",
            "P2Y12 inhibitor",
            91,
            93,
            LikelyCovered,
            &[("CYP2C19", PoorMetabolizer)],
        ),
        candidate("aspirin", "acetaminophen", "non-opioid analgesic", 96, 74, LikelyCovered, &[]),
        candidate("aspirin", "celecoxib", "COX-2 selective NSAID", 82, 88, CoverageUnknown, &[]),
        candidate("codeine", "morphine", "opioid analgesic", 88, 95, LikelyCovered, &[]),
        candidate("codeine", "hydromorphone", "opioid analgesic", 86, 94, LikelyCovered, &[]),
        candidate(
            "codeine",
            "tramadol",
            "opioid analgesic",
            84,
            85,
            LikelyCovered,
            &[("CYP2D6", PoorMetabolizer), ("CYP2D6", UltrarapidMetabolizer)],
        ),
        candidate("codeine", "acetaminophen", "non-opioid analgesic", 96, 70, LikelyCovered, &[]),
        candidate("tamoxifen", "anastrozole", "aromatase inhibitor", 92, 94, LikelyCovered, &[]),
        candidate("tamoxifen", "letrozole", "aromatase inhibitor", 91, 93, LikelyCovered, &[]),
        candidate("tamoxifen", "exemestane", "aromatase inhibitor", 90, 91, CoverageUnknown, &[]),
        candidate("ondansetron", "granisetron", "5-HT3 antagonist", 93, 92, LikelyCovered, &[]),
        candidate("ibuprofen", "acetaminophen", "non-opioid analgesic", 96, 74, LikelyCovered, &[]),
        candidate("ibuprofen", "celecoxib", "COX-2 selective NSAID", 82, 88, CoverageUnknown, &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_parses_and_is_versioned() {
        let reference = ReferenceData::bundled().unwrap();
        assert!(!reference.version.is_empty());
        assert!(reference.heuristic_interactions.len() >= 6);
    }

    #[test]
    fn heuristic_lookup_matches_both_orders() {
        let reference = ReferenceData::bundled().unwrap();
        let ab = reference.lookup_heuristic("warfarin", "aspirin").unwrap();
        let ba = reference.lookup_heuristic("aspirin", "warfarin").unwrap();
        assert_eq!(ab.severity, Severity::Major);
        assert_eq!(ab.drugs, ba.drugs);
    }

    #[test]
    fn heuristic_lookup_ignores_spacing_and_case() {
        let reference = ReferenceData::bundled().unwrap();
        let hit = reference.lookup_heuristic("Metformin", "contrastmedia");
        assert!(hit.is_some(), "folded name should match 'contrast media'");
    }

    #[test]
    fn heuristic_lookup_misses_unknown_pair() {
        let reference = ReferenceData::bundled().unwrap();
        assert!(reference
            .lookup_heuristic("acetaminophen", "lisinopril")
            .is_none());
    }

    #[test]
    fn genotype_normalization_sorts_alleles() {
        assert_eq!(normalize_genotype("*4/*1"), "*1/*4");
        assert_eq!(normalize_genotype(" *2a / *3A "), "*2A/*3A");
    }

    #[test]
    fn phenotype_inference_cyp2d6_poor() {
        let reference = ReferenceData::bundled().unwrap();
        assert_eq!(
            reference.infer_phenotype("CYP2D6", "*4/*4"),
            Some(Phenotype::PoorMetabolizer)
        );
        assert_eq!(
            reference.infer_phenotype("cyp2d6", "*4/*1"),
            Some(Phenotype::IntermediateMetabolizer)
        );
        assert_eq!(reference.infer_phenotype("CYP2D6", "*99/*99"), None);
    }

    #[test]
    fn every_pgx_rule_carries_a_citation() {
        for rule in builtin_pgx_drug_rules() {
            assert!(
                !rule.citations.is_empty(),
                "rule for {} / {} has no citation",
                rule.drug,
                rule.gene
            );
        }
    }

    #[test]
    fn no_conflicting_rules_for_same_drug_gene_phenotype() {
        let rules = builtin_pgx_drug_rules();
        for (i, a) in rules.iter().enumerate() {
            for b in rules.iter().skip(i + 1) {
                let same_key = a.drug.eq_ignore_ascii_case(&b.drug)
                    && a.gene.eq_ignore_ascii_case(&b.gene)
                    && a.phenotype == b.phenotype;
                assert!(!same_key, "duplicate rule for {} / {}", a.drug, a.gene);
            }
        }
    }

    #[test]
    fn codeine_rule_recommends_avoid_for_poor_metabolizer() {
        let reference = ReferenceData::bundled().unwrap();
        let rule = reference
            .pgx_rule("codeine", "CYP2D6", Phenotype::PoorMetabolizer)
            .unwrap();
        assert_eq!(rule.action, PgxAction::Avoid);
        assert!(rule.citations[0].contains("CPIC"));
    }

    #[test]
    fn alternatives_catalog_covers_flagged_drugs() {
        let reference = ReferenceData::bundled().unwrap();
        assert!(!reference.alternatives_for("warfarin").is_empty());
        assert!(!reference.alternatives_for("Aspirin").is_empty());
        assert!(reference.alternatives_for("unknown-drug").is_empty());
    }
}
