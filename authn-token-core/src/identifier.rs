//! Time-ordered token identifiers.
//!
//! An identifier is a version-1 [`Uuid`]: its leading 60 bits encode a clock
//! reading, which lets us recover the millisecond timestamp a token (or its
//! underlying record) was created at without a side-table lookup.

use ring::rand::{SecureRandom, SystemRandom};
use uuid::{Context, Timestamp, Uuid};

/// Generates time-ordered identifiers.
///
/// Holds a random, per-process 6-byte "node id" and a monotonic clock
/// sequence so that two identifiers allocated in the same millisecond never
/// collide. Cheap to construct; a service typically builds one and shares it
/// behind an `Arc` (or simply clones it — generation is entirely stateless
/// modulo the atomic clock sequence).
#[derive(Clone)]
pub struct IdAllocator {
    node_id: [u8; 6],
    context: std::sync::Arc<Context>,
}

impl IdAllocator {
    /// Build a new allocator with a fresh random node id.
    pub fn new() -> Self {
        let rng = SystemRandom::new();
        let mut node_id = [0u8; 6];
        rng.fill(&mut node_id)
            .expect("system RNG unavailable while allocating node id");
        Self {
            node_id,
            context: std::sync::Arc::new(Context::new(rand_u16(&rng))),
        }
    }

    /// Allocate a new identifier whose embedded clock reading is `now_ms`
    /// (milliseconds since the Unix epoch).
    pub fn alloc(&self, now_ms: i64) -> Uuid {
        let (secs, nanos) = ms_to_unix(now_ms);
        let timestamp = Timestamp::from_unix(&*self.context, secs, nanos);
        Uuid::new_v1(timestamp, &self.node_id)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn rand_u16(rng: &SystemRandom) -> u16 {
    let mut buf = [0u8; 2];
    // A fixed seed is fine here too (the `Context` counter still makes
    // same-millisecond ids distinct); randomizing just avoids a predictable
    // starting sequence across process restarts.
    let _ = rng.fill(&mut buf);
    u16::from_be_bytes(buf)
}

fn ms_to_unix(ms: i64) -> (u64, u32) {
    let secs = ms.div_euclid(1000);
    let millis_rem = ms.rem_euclid(1000);
    (secs as u64, (millis_rem as u32) * 1_000_000)
}

fn unix_to_ms(secs: u64, nanos: u32) -> i64 {
    (secs as i64) * 1000 + (nanos as i64) / 1_000_000
}

/// Extract the millisecond timestamp embedded in a previously allocated
/// identifier. Works on any identifier this crate produced, regardless of
/// which [`IdAllocator`] instance produced it — unlike [`IdAllocator::alloc`]
/// this does not require allocator state, since the embedded clock reading
/// was baked into the `uuid`'s bytes at allocation time.
///
/// This is also called on uuids decoded from caller-supplied tokens, which
/// are signature-verified but not otherwise trusted to be version-1 — so it
/// must be total rather than panicking. A uuid with no embedded timestamp
/// (wrong version, or simply not one this crate minted) reads back as `0`.
pub fn timestamp_ms(uuid: Uuid) -> i64 {
    match uuid.get_timestamp() {
        Some(timestamp) => {
            let (secs, nanos) = timestamp.to_unix();
            unix_to_ms(secs, nanos)
        }
        None => 0,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_timestamp() {
        let allocator = IdAllocator::new();
        let now_ms = 1_700_000_000_123;
        let id = allocator.alloc(now_ms);
        assert_eq!(timestamp_ms(id), now_ms);
    }

    #[test]
    fn same_millisecond_ids_are_distinct() {
        let allocator = IdAllocator::new();
        let now_ms = 0;
        let a = allocator.alloc(now_ms);
        let b = allocator.alloc(now_ms);
        assert_ne!(a, b);
        assert_eq!(timestamp_ms(a), timestamp_ms(b));
    }

    #[test]
    fn zero_timestamp_round_trips() {
        let allocator = IdAllocator::new();
        let id = allocator.alloc(0);
        assert_eq!(timestamp_ms(id), 0);
    }

    #[test]
    fn non_version_1_uuid_reads_as_zero_instead_of_panicking() {
        assert_eq!(timestamp_ms(Uuid::new_v4()), 0);
        assert_eq!(timestamp_ms(Uuid::nil()), 0);
    }
}
