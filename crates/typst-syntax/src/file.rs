use std::sync::Mutex;

use ecow::EcoString;
use rustc_hash::FxHashMap;

/// Identifies a source file uniquely across a realization run.
///
/// Files are interned globally: equal paths always produce the same id, so
/// [`FileId`] can be compared and hashed cheaply and is used by [`Route`] to
/// detect recursive inclusion cycles.
///
/// [`Route`]: typst_library::engine::Route
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FileId(u16);

struct Interner {
    to_id: FxHashMap<EcoString, u16>,
    from_id: Vec<EcoString>,
}

static INTERNER: Mutex<Option<Interner>> = Mutex::new(None);

impl FileId {
    /// Intern a virtual path, returning a stable id for it.
    pub fn new(path: &str) -> Self {
        let mut guard = INTERNER.lock().unwrap();
        let interner = guard.get_or_insert_with(|| Interner {
            to_id: FxHashMap::default(),
            from_id: Vec::new(),
        });
        if let Some(&id) = interner.to_id.get(path) {
            return Self(id);
        }
        let id = interner.from_id.len() as u16;
        interner.from_id.push(path.into());
        interner.to_id.insert(path.into(), id);
        Self(id)
    }

    /// The path this id was interned from.
    pub fn path(self) -> EcoString {
        let guard = INTERNER.lock().unwrap();
        guard.as_ref().unwrap().from_id[self.0 as usize].clone()
    }

    /// The raw 16-bit id, used by [`Span`](crate::Span) to pack a file
    /// reference alongside a node number.
    pub(crate) const fn into_raw(self) -> u16 {
        self.0
    }

    /// Reconstruct a `FileId` from a raw id previously produced by
    /// [`into_raw`](Self::into_raw).
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }
}

impl std::fmt::Debug for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.path())
    }
}
