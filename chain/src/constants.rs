/// Setting nSequence to this value for every input in a transaction disables nLockTime.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Largest sequence number that still enforces the transaction lock time.
pub const MAX_SEQUENCE_NONFINAL: u32 = SEQUENCE_FINAL - 1;

/// Threshold for `nLockTime`: below this value it is interpreted as block number,
/// otherwise as UNIX timestamp.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000; // Tue Nov  5 00:53:20 1985 UTC

/// Size of a serialized block header.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Number of weight units per byte of non-witness data.
pub const WITNESS_SCALE_FACTOR: usize = 4;
