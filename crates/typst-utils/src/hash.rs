use std::hash::{Hash, Hasher};

use siphasher::sip128::{Hasher128, SipHasher13};

/// Produce a 128-bit hash of a value using a fixed, portable hasher.
///
/// Used wherever realization needs stable, collision-resistant identifiers
/// derived from content (e.g. `Location`), since `DefaultHasher` gives no
/// cross-run stability guarantee.
#[inline]
pub fn hash128<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}

/// Combine two already-computed hashes into one.
///
/// `Location` uses this to fold a disambiguator into a base hash without
/// re-hashing the underlying value.
#[inline]
pub fn hash_combine(a: u128, b: u128) -> u128 {
    let mut state = SipHasher13::new();
    a.hash(&mut state);
    b.hash(&mut state);
    state.finish128().as_u128()
}
