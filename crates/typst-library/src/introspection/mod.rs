//! Stable identities for elements and the start/end boundary tags used to
//! recover them from flattened, realized content.

mod location;
mod locator;
mod tag;

pub use location::Location;
pub use locator::SplitLocator;
pub use tag::Tag;
