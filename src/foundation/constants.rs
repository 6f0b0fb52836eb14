//! System-wide constants for covault threshold authorization.

/// Nanoseconds per second (10^9).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Ed25519 seed size in bytes.
pub const SEED_SIZE: usize = 32;

/// Ed25519 signature size in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Blake3 hash size in bytes (32 bytes).
pub const HASH_SIZE: usize = 32;

/// Human-readable prefix for derived account addresses.
pub const ADDRESS_PREFIX: &str = "cv";

/// Maximum number of members a group may be created with.
///
/// Matches the on-chain multisig pallet limit; larger sets would be rejected
/// at submission time anyway, so we fail at creation.
pub const MAX_GROUP_MEMBERS: usize = 100;

/// Maximum length of a member display name.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 128;

/// Default bound on a single sign-and-submit round trip, in seconds.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding wall-clock time in tests.
pub const TEST_NOW_NANOS_ENV_VAR: &str = "COVAULT_TEST_NOW_NANOS";
