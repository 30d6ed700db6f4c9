use crate::value::Value;
use xxhash_rust::xxh3::Xxh3;

///
/// StableHash
///
/// Fixed-width hash identifier used by grouping and distinct key paths.
/// Grouping-equal values always share a hash; the converse is checked by
/// equality inside each hash bucket.
///

pub type StableHash = u64;

/// Stable XXH3 seed used by canonical value hashing.
pub(crate) const VALUE_HASH_SEED: u64 = 0;

const TAG_NULL: u8 = 0x00;
const TAG_BOOLEAN: u8 = 0x01;
const TAG_NUMERIC: u8 = 0x02;
const TAG_TEXT: u8 = 0x03;
const TAG_TIMESTAMP: u8 = 0x04;

#[cfg(test)]
thread_local! {
    static TEST_HASH_OVERRIDE: std::cell::Cell<Option<StableHash>> =
        const { std::cell::Cell::new(None) };
}

// Execute one closure with a thread-local test hash override and always restore
// the previous override state, even if the closure panics.
#[cfg(test)]
pub(crate) fn with_test_hash_override<T>(
    override_hash: StableHash,
    f: impl FnOnce() -> T + std::panic::UnwindSafe,
) -> T {
    let previous = TEST_HASH_OVERRIDE.with(|cell| cell.replace(Some(override_hash)));
    let result = std::panic::catch_unwind(f);
    TEST_HASH_OVERRIDE.with(|cell| cell.set(previous));
    match result {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Hash one value under the grouping-equality contract.
#[must_use]
pub fn stable_hash_value(value: &Value) -> StableHash {
    stable_hash_values(std::slice::from_ref(value))
}

/// Hash an ordered value tuple under the grouping-equality contract.
#[must_use]
pub fn stable_hash_values(values: &[Value]) -> StableHash {
    #[cfg(test)]
    if let Some(hash) = TEST_HASH_OVERRIDE.with(std::cell::Cell::get) {
        return hash;
    }

    let mut h = Xxh3::with_seed(VALUE_HASH_SEED);
    h.update(&(values.len() as u64).to_be_bytes());
    for value in values {
        write_to_hasher(value, &mut h);
    }

    h.digest()
}

#[expect(clippy::cast_possible_truncation)]
fn write_to_hasher(value: &Value, h: &mut Xxh3) {
    match value {
        Value::Null => h.update(&[TAG_NULL]),
        Value::Boolean(b) => h.update(&[TAG_BOOLEAN, u8::from(*b)]),
        Value::Integer(_) | Value::Decimal(_) => {
            // Integer and Decimal group together, so both hash the normalized
            // decimal form: (mantissa, scale) with the sign in the mantissa.
            let normalized = value.as_decimal().unwrap_or_default().normalize();
            h.update(&[TAG_NUMERIC]);
            h.update(&normalized.mantissa().to_be_bytes());
            h.update(&normalized.scale().to_be_bytes());
        }
        Value::Text(s) => {
            h.update(&[TAG_TEXT]);
            h.update(&(s.len() as u32).to_be_bytes());
            h.update(s.as_bytes());
        }
        Value::Timestamp(ts) => {
            h.update(&[TAG_TIMESTAMP]);
            h.update(&ts.get().to_be_bytes());
        }
    }
}
