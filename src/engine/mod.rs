pub mod aggregate;
pub mod load;
pub mod normalize;
pub mod rules;
pub mod schema;
pub mod verdict;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::config::GateConfig;
use crate::domain::record::{Dataset, REQUIRED_FIELDS};
use crate::domain::verdict::Verdict;

use self::rules::RuleEngine;

/// Runs schema validation, every enabled rule, aggregation and status derivation over one
/// dataset. `now` stamps the verdict and fixes the processing date for future-date checks.
pub fn run_gate(dataset: &Dataset, config: &GateConfig, now: DateTime<Utc>) -> Verdict {
    let missing = schema::missing_fields(dataset, &REQUIRED_FIELDS);
    if !missing.is_empty() {
        warn!(missing = ?missing, "required columns missing; skipping rule evaluation");
        return verdict::schema_failure_verdict(dataset, &missing, now);
    }

    let engine = RuleEngine::new(config.clone());
    let hits = engine.evaluate(dataset, now.date_naive());
    let aggregation = aggregate::aggregate(dataset, hits, config.evidence_sample_cap);
    verdict::build_verdict(dataset, aggregation, now)
}
