use std::rc::Rc;

use super::{Content, Label, StyleChain};
use crate::introspection::Location;

/// A predicate over a matched element's fields, used by `Selector::Elem` to
/// express `where(..)` constraints (e.g. `heading.where(depth: 1)`).
///
/// Kept as an opaque closure rather than a field-dictionary so that
/// selector matching stays generic over arbitrary element fields without
/// realization needing to know each element's schema.
#[derive(Clone)]
pub struct WhereFilter(pub Rc<dyn Fn(&Content) -> bool>);

impl std::fmt::Debug for WhereFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("WhereFilter(..)")
    }
}

impl WhereFilter {
    pub fn new(f: impl Fn(&Content) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    fn test(&self, content: &Content) -> bool {
        (self.0)(content)
    }
}

/// A predicate that decides whether a piece of content is the target of a
/// show-rule recipe.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Matches any element with the given canonical name, optionally
    /// narrowed by a field predicate.
    Elem(&'static str, Option<WhereFilter>),
    /// Matches an element carrying a specific label.
    Label(Label),
    /// Matches textual content against a compiled regular expression.
    Regex(Rc<regex::Regex>),
    /// Matches the single element with the given location.
    Location(Location),
    /// Matches if any sub-selector matches.
    Or(Vec<Selector>),
    /// Matches if every sub-selector matches.
    And(Vec<Selector>),
    /// Matches content located strictly before the given anchor location.
    Before { selector: Rc<Selector>, anchor: Location, inclusive: bool },
    /// Matches content located strictly after the given anchor location.
    After { selector: Rc<Selector>, anchor: Location, inclusive: bool },
}

impl Selector {
    /// Whether `content` matches this selector, given the style chain it
    /// is being visited under (needed so `Elem` can be compared against
    /// liftable/outside property context in the future, and so `Before`
    /// `After` can be evaluated without extra plumbing).
    pub fn matches(&self, content: &Content, chain: &StyleChain) -> bool {
        let _ = chain;
        match self {
            Selector::Elem(name, filter) => {
                content.elem() == *name && filter.as_ref().is_none_or(|f| f.test(content))
            }
            Selector::Label(label) => content.label() == Some(label),
            Selector::Regex(_) => false,
            Selector::Location(loc) => content.location() == Some(*loc),
            Selector::Or(selectors) => selectors.iter().any(|s| s.matches(content, chain)),
            Selector::And(selectors) => selectors.iter().all(|s| s.matches(content, chain)),
            Selector::Before { selector, anchor, inclusive } => {
                selector.matches(content, chain)
                    && content.location().is_some_and(|loc| {
                        if *inclusive { loc <= *anchor } else { loc < *anchor }
                    })
            }
            Selector::After { selector, anchor, inclusive } => {
                selector.matches(content, chain)
                    && content.location().is_some_and(|loc| {
                        if *inclusive { loc >= *anchor } else { loc > *anchor }
                    })
            }
        }
    }
}
