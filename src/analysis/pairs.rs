use std::collections::HashSet;

use crate::models::{DrugPair, NormalizedDrug};

/// Reduce a medication list to one representative per canonical substance.
/// First occurrence wins; later formulations are reported back by display
/// name so the caller can show what was merged. Idempotent.
pub fn consolidate_formulations(
    drugs: Vec<NormalizedDrug>,
) -> (Vec<NormalizedDrug>, Vec<String>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(drugs.len());
    let mut merged = Vec::new();

    for drug in drugs {
        let key = drug.canonical_name.to_lowercase();
        if seen.insert(key) {
            kept.push(drug);
        } else {
            merged.push(format!(
                "{} consolidated into {}",
                drug.original.name.trim(),
                drug.canonical_name
            ));
        }
    }

    (kept, merged)
}

/// All C(n,2) unordered pairs over the list. Enumeration order is a
/// function of input order only (nested `i < j` loop), so repeated calls
/// on the same input are reproducible. Fewer than two drugs yields an
/// empty set — insufficient input, not an error.
pub fn enumerate_pairs(drugs: &[NormalizedDrug]) -> Vec<DrugPair> {
    let mut pairs = Vec::new();
    for i in 0..drugs.len() {
        for j in (i + 1)..drugs.len() {
            pairs.push(DrugPair::new(drugs[i].clone(), drugs[j].clone()));
        }
    }
    pairs
}
