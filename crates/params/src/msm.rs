//! Tuning constants for scalar multiplication and pairing batches

/// Smallest supported window for precomputed-table multiplication
pub const MIN_TABLE_WINDOW: usize = 2;

/// Largest supported window for precomputed-table multiplication
pub const MAX_TABLE_WINDOW: usize = 14;

/// Window used by variable-base single-point multiplication
pub const SINGLE_MULT_WINDOW: usize = 5;

/// Window used for small multi-point inputs handled by the table method
pub const SMALL_MSM_WINDOW: usize = 5;

/// Below this many G1 points MSM uses the windowed table method
pub const MSM_WINDOWED_THRESHOLD_G1: usize = 64;

/// Below this many G2 points MSM uses the windowed table method
pub const MSM_WINDOWED_THRESHOLD_G2: usize = 32;

/// Largest Pippenger window
pub const MAX_PIPPENGER_WINDOW: usize = 16;

/// Most points processed by one Pippenger pass before chunking
pub const MSM_CHUNK_POINTS: usize = 1 << 16;

/// Bulk accumulation stops pairing points below this many
pub const BULK_ACCUMULATE_CUTOFF: usize = 16;

/// Pairs interleaved in one Miller-loop batch
pub const MILLER_BATCH_LIMIT: usize = 8;
