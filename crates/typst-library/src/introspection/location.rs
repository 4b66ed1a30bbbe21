/// A stable identifier for a single, specific element in the document.
///
/// Locations are minted once per element that can be introspected and must
/// stay stable across incremental reruns; they are derived from a hash of
/// the element's content plus enough disambiguating context (its position
/// among siblings that hash identically) to guarantee uniqueness within one
/// realization.
///
/// Alongside identity, a location also carries the monotonic sequence
/// number it was minted at. Real document position (page and offset) is
/// only known after layout and is out of scope here; `seq` exists purely so
/// that the `before`/`after` selectors have a deterministic, cheaply
/// available ordering during a single realization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    hash: u128,
    disambiguator: u32,
    seq: u64,
}

impl Location {
    pub(crate) fn new(hash: u128, disambiguator: u32, seq: u64) -> Self {
        Self { hash, disambiguator, seq }
    }

    /// A combined 128-bit hash uniquely identifying this location.
    pub fn hash128(&self) -> u128 {
        typst_utils::hash_combine(self.hash, self.disambiguator as u128)
    }

    /// The order this location was minted in, relative to other locations
    /// minted during the same realization.
    pub fn sequence(&self) -> u64 {
        self.seq
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seq.cmp(&other.seq)
    }
}
