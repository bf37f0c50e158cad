//! Data model for the analysis core.
//!
//! Everything here is created per-request and discarded with the response;
//! the only persistent entities (alias directory, interaction tables) live
//! behind the `db` collaborator seam.

pub mod alternative;
pub mod enums;
pub mod interaction;
pub mod medication;
pub mod pgx;
pub mod quality;

pub use alternative::{AlternativeSuggestion, PatientContext};
pub use enums::{
    Confidence, FormularyStatus, PgxAction, Phenotype, RiskLevel, Severity, SourceTier,
};
pub use interaction::{DrugPair, InteractionRecord};
pub use medication::{MedicationReference, NormalizedDrug};
pub use pgx::{GenePhenotype, GenotypeResult, PgxOverview, PgxRecommendation};
pub use quality::{AllergyEntry, Demographics, LabValue};
