//! Models grouped by primary and indexed by target.

use std::collections::BTreeMap;
use std::sync::Arc;

use evgen_core::{InteractionRecord, ParticleType};
use tracing::debug;

use crate::model::InteractionModel;

/// All interaction models available to one primary type.
///
/// The target index is built once in [`InteractionCollection::new`]; a
/// collection is never mutated afterwards.
#[derive(Debug, Clone)]
pub struct InteractionCollection {
    primary: ParticleType,
    models: Vec<Arc<dyn InteractionModel>>,
    by_target: BTreeMap<ParticleType, Vec<Arc<dyn InteractionModel>>>,
    targets: Vec<ParticleType>,
}

impl InteractionCollection {
    /// Indexes `models` by the targets each supports for `primary`.
    pub fn new(primary: ParticleType, models: Vec<Arc<dyn InteractionModel>>) -> Self {
        let mut by_target: BTreeMap<ParticleType, Vec<Arc<dyn InteractionModel>>> =
            BTreeMap::new();
        for model in &models {
            for &target in model.possible_targets_from_primary(primary) {
                by_target.entry(target).or_default().push(Arc::clone(model));
            }
        }
        let targets: Vec<ParticleType> = by_target.keys().copied().collect();
        debug!(
            %primary,
            models = models.len(),
            targets = targets.len(),
            "built interaction collection"
        );
        Self {
            primary,
            models,
            by_target,
            targets,
        }
    }

    /// Models able to interact with `target`; empty for unknown targets.
    pub fn cross_sections_for_target(&self, target: ParticleType) -> &[Arc<dyn InteractionModel>] {
        self.by_target
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every model, in construction order.
    pub fn cross_sections(&self) -> &[Arc<dyn InteractionModel>] {
        &self.models
    }

    /// The full target index.
    pub fn cross_sections_by_target(&self) -> &BTreeMap<ParticleType, Vec<Arc<dyn InteractionModel>>> {
        &self.by_target
    }

    /// Targets with at least one model, sorted.
    pub fn target_types(&self) -> &[ParticleType] {
        &self.targets
    }

    /// Primary this collection serves.
    pub fn primary_type(&self) -> ParticleType {
        self.primary
    }

    /// Whether `record` has this collection's primary.
    pub fn matches_primary(&self, record: &InteractionRecord) -> bool {
        record.signature.primary_type == self.primary
    }

    /// Sum of the total cross sections of every model for the record's target.
    pub fn total_cross_section(&self, record: &InteractionRecord) -> f64 {
        self.cross_sections_for_target(record.signature.target_type)
            .iter()
            .map(|model| model.total_cross_section(record))
            .sum()
    }

    /// Sum of the total cross sections at a rest-frame energy.
    pub fn total_cross_section_for(&self, energy: f64, target: ParticleType) -> f64 {
        self.cross_sections_for_target(target)
            .iter()
            .map(|model| model.total_cross_section_for(self.primary, energy, target))
            .sum()
    }
}
