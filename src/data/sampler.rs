// ============================================================
// Sampling Helpers
// ============================================================
// The random index and subset decisions shared by the adapters:
//
//   downsampled_len / downsample_index
//       Shrink a table by a ratio while still visiting every
//       row over many epochs. Index i maps to a random row in
//       the block [ratio*i, ratio*i + ratio), wrapped around
//       the table. The same index can return different rows.
//
//   cap_images
//       Keep a uniform random subset when a case has more
//       images than the model accepts.
//
//   fork_rng
//       Adapters are shared across loader workers, so their
//       generator sits behind a Mutex. Each fetch takes one
//       draw from it to seed a private StdRng and releases the
//       lock before any decoding starts.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

/// `ceil(rows / ratio)`; a ratio of 0 is treated as 1.
pub fn downsampled_len(rows: usize, ratio: usize) -> usize {
    rows.div_ceil(ratio.max(1))
}

/// Row for downsampled `index`, or None for an empty table.
pub fn downsample_index<R: Rng + ?Sized>(
    index: usize,
    ratio: usize,
    rows:  usize,
    rng:   &mut R,
) -> Option<usize> {
    if rows == 0 {
        return None;
    }
    let ratio = ratio.max(1);
    let offset = rng.gen_range(0..ratio);
    let block = index.checked_mul(ratio)?.checked_add(offset)?;
    Some(block % rows)
}

/// Keep at most `max` items, chosen uniformly without replacement.
pub fn cap_images<T, R: Rng + ?Sized>(mut items: Vec<T>, max: usize, rng: &mut R) -> Vec<T> {
    if items.len() > max {
        items.shuffle(rng);
        items.truncate(max);
    }
    items
}

/// A private per-call generator seeded from the shared one.
pub fn fork_rng<R: RngCore>(shared: &Mutex<R>) -> StdRng {
    // A panic elsewhere cannot leave a generator half-updated,
    // so a poisoned lock is still usable.
    let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
    StdRng::seed_from_u64(guard.next_u64())
}
