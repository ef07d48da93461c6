//! Deterministic parallel final-state sampling.

use evgen_core::{EvgenError, InteractionRecord, RngHandle};
use rayon::prelude::*;

use crate::model::InteractionModel;

/// Samples every record in parallel with `model`.
///
/// Record `i` draws from substream `i` of `master_seed`, so the output does
/// not depend on the number of worker threads. One result is returned per
/// record; a failed record keeps its previous contents.
pub fn sample_final_states(
    model: &dyn InteractionModel,
    records: &mut [InteractionRecord],
    master_seed: u64,
) -> Vec<Result<(), EvgenError>> {
    records
        .par_iter_mut()
        .enumerate()
        .map(|(index, record)| {
            let mut rng = RngHandle::from_substream(master_seed, index as u64);
            model.sample_final_state(record, &mut rng)
        })
        .collect()
}
