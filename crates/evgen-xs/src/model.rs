//! The interaction model contract shared by every cross-section implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use evgen_core::{EvgenError, InteractionRecord, InteractionSignature, ParticleType, RngHandle};

/// Channels a model supports, indexed once at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureCache {
    signatures: Vec<InteractionSignature>,
    primaries: Vec<ParticleType>,
    targets: Vec<ParticleType>,
    targets_by_primary: BTreeMap<ParticleType, Vec<ParticleType>>,
    by_parents: BTreeMap<(ParticleType, ParticleType), Vec<InteractionSignature>>,
}

impl SignatureCache {
    /// Indexes `signatures` by primary and by (primary, target) pair.
    pub fn new(signatures: Vec<InteractionSignature>) -> Self {
        let mut primaries = BTreeSet::new();
        let mut targets = BTreeSet::new();
        let mut targets_by_primary: BTreeMap<ParticleType, BTreeSet<ParticleType>> =
            BTreeMap::new();
        let mut by_parents: BTreeMap<_, Vec<InteractionSignature>> = BTreeMap::new();
        for signature in &signatures {
            primaries.insert(signature.primary_type);
            targets.insert(signature.target_type);
            targets_by_primary
                .entry(signature.primary_type)
                .or_default()
                .insert(signature.target_type);
            by_parents
                .entry((signature.primary_type, signature.target_type))
                .or_default()
                .push(signature.clone());
        }
        Self {
            signatures,
            primaries: primaries.into_iter().collect(),
            targets: targets.into_iter().collect(),
            targets_by_primary: targets_by_primary
                .into_iter()
                .map(|(primary, targets)| (primary, targets.into_iter().collect()))
                .collect(),
            by_parents,
        }
    }

    /// All signatures, in construction order.
    pub fn signatures(&self) -> &[InteractionSignature] {
        &self.signatures
    }

    /// Distinct primaries, sorted.
    pub fn primaries(&self) -> &[ParticleType] {
        &self.primaries
    }

    /// Distinct targets, sorted.
    pub fn targets(&self) -> &[ParticleType] {
        &self.targets
    }

    /// Targets reachable from `primary`, sorted; empty when unsupported.
    pub fn targets_from_primary(&self, primary: ParticleType) -> &[ParticleType] {
        self.targets_by_primary
            .get(&primary)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Signatures for a (primary, target) pair; empty when unsupported.
    pub fn from_parents(&self, primary: ParticleType, target: ParticleType) -> &[InteractionSignature] {
        self.by_parents
            .get(&(primary, target))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `primary` appears in any signature.
    pub fn has_primary(&self, primary: ParticleType) -> bool {
        self.primaries.binary_search(&primary).is_ok()
    }

    /// Whether `target` appears in any signature.
    pub fn has_target(&self, target: ParticleType) -> bool {
        self.targets.binary_search(&target).is_ok()
    }
}

/// A cross-section implementation for one family of interaction channels.
///
/// Models are immutable once built and shared as `Arc<dyn InteractionModel>`.
/// Every energy argument is the primary energy in the target rest frame.
/// Queries outside a model's validity range return zero.
pub trait InteractionModel: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Supported channels.
    fn signature_cache(&self) -> &SignatureCache;

    /// Total cross section in cm^2 for the record's primary, energy and target.
    fn total_cross_section(&self, record: &InteractionRecord) -> f64;

    /// Total cross section in cm^2 at a rest-frame primary energy.
    fn total_cross_section_for(
        &self,
        primary: ParticleType,
        energy: f64,
        target: ParticleType,
    ) -> f64;

    /// Differential cross section at the kinematics recorded in `record`.
    fn differential_cross_section(&self, record: &InteractionRecord) -> f64;

    /// Lowest rest-frame primary energy at which the channel is open.
    fn interaction_threshold(&self, record: &InteractionRecord) -> f64;

    /// Samples outgoing kinematics into `record`.
    ///
    /// Fills the secondary masses, momenta, helicities and
    /// `interaction_parameters`. On error the record is left untouched.
    fn sample_final_state(
        &self,
        record: &mut InteractionRecord,
        rng: &mut RngHandle,
    ) -> Result<(), EvgenError>;

    /// Names of the sampled variables stored after the rest-frame energy in
    /// `interaction_parameters`.
    fn density_variables(&self) -> Vec<String>;

    /// Differential over total cross section; zero when the differential is
    /// zero or the total is not positive.
    fn final_state_probability(&self, record: &InteractionRecord) -> f64 {
        let dxs = self.differential_cross_section(record);
        if dxs == 0.0 {
            return 0.0;
        }
        let txs = self.total_cross_section(record);
        if txs > 0.0 && dxs.is_finite() {
            (dxs / txs).max(0.0)
        } else {
            0.0
        }
    }

    /// Distinct targets over all channels.
    fn possible_targets(&self) -> &[ParticleType] {
        self.signature_cache().targets()
    }

    /// Targets reachable from `primary`.
    fn possible_targets_from_primary(&self, primary: ParticleType) -> &[ParticleType] {
        self.signature_cache().targets_from_primary(primary)
    }

    /// Distinct primaries over all channels.
    fn possible_primaries(&self) -> &[ParticleType] {
        self.signature_cache().primaries()
    }

    /// Every supported channel.
    fn possible_signatures(&self) -> &[InteractionSignature] {
        self.signature_cache().signatures()
    }

    /// Channels for a given primary and target.
    fn possible_signatures_from_parents(
        &self,
        primary: ParticleType,
        target: ParticleType,
    ) -> &[InteractionSignature] {
        self.signature_cache().from_parents(primary, target)
    }
}

/// Checks that `record` has the secondary layout a model is about to fill.
pub(crate) fn expect_secondaries(
    model: &str,
    record: &InteractionRecord,
    expected: usize,
) -> Result<(), EvgenError> {
    let found = record.signature.secondary_types.len();
    if found == expected {
        return Ok(());
    }
    Err(EvgenError::Model(
        evgen_core::ErrorInfo::new("signature-mismatch", "record has the wrong number of secondaries")
            .with_context("model", model)
            .with_context("expected", expected)
            .with_context("found", found)
            .with_context("signature", &record.signature),
    ))
}

/// Error for an exhausted rejection budget.
pub(crate) fn budget_exhausted(model: &str, record: &InteractionRecord, trials: usize) -> EvgenError {
    tracing::warn!(
        model,
        signature = %record.signature,
        trials,
        "sampling budget exhausted"
    );
    EvgenError::Sampling(
        evgen_core::ErrorInfo::new("budget-exhausted", "no kinematic point accepted within budget")
            .with_context("model", model)
            .with_context("trials", trials)
            .with_context("signature", &record.signature)
            .with_hint("retry with a fresh random stream or skip the event"),
    )
}
