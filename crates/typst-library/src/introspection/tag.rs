use super::Location;
use crate::foundations::Content;

/// A boundary marker emitted into the realized output so that later passes
/// can recover which locatable element a run of flat content came from,
/// without needing to keep the original tree around.
#[derive(Debug, Clone)]
pub enum Tag {
    /// Marks the start of a locatable element. Carries the (unrealized)
    /// element itself so that layout can still query its fields.
    Start(Content),
    /// Marks the end of the element started by the `Start` tag with the
    /// same location.
    End(Location),
}

impl Tag {
    /// The location this tag's boundary belongs to, if it is a start tag
    /// for a located element.
    pub fn start_location(&self) -> Option<Location> {
        match self {
            Tag::Start(content) => content.location(),
            Tag::End(_) => None,
        }
    }

    pub fn end_location(&self) -> Option<Location> {
        match self {
            Tag::Start(_) => None,
            Tag::End(loc) => Some(*loc),
        }
    }
}
