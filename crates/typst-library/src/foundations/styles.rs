use std::rc::Rc;

use ecow::{EcoString, EcoVec};
use typst_syntax::Span;

use super::{Content, Selector, Value};

/// An index into the ordered list of recipes observed so far during a single
/// realization, used to guard against a recipe re-applying to its own
/// output and to record textual-pass revocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecipeIndex(pub usize);

/// What a recipe rewrites matched content into.
#[derive(Clone)]
pub enum Transformation {
    /// Apply a style map to the match (a `set` rule recipe).
    Styles(Styles),
    /// Call a function with the match, producing new content.
    Func(Rc<dyn Fn(Content) -> Content>),
    /// Replace the match outright with fixed content.
    Content(Content),
    /// Remove the match entirely.
    None,
}

impl std::fmt::Debug for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Transformation::Styles(s) => f.debug_tuple("Styles").field(s).finish(),
            Transformation::Func(_) => f.write_str("Func(..)"),
            Transformation::Content(c) => f.debug_tuple("Content").field(c).finish(),
            Transformation::None => f.write_str("None"),
        }
    }
}

impl Transformation {
    /// Applies this transformation to matched content, producing its
    /// replacement.
    pub fn apply(&self, matched: Content) -> Content {
        match self {
            Transformation::Styles(styles) => matched.styled_with_map(styles.clone()),
            Transformation::Func(f) => f(matched),
            Transformation::Content(c) => c.clone(),
            Transformation::None => Content::empty(),
        }
    }
}

/// A show rule recipe: rewrite content matching `selector` (or everything,
/// for an unconditional `show` on the base case) via `transform`.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub selector: Option<Selector>,
    pub transform: Transformation,
    pub span: Span,
    /// Whether this recipe was defined outside the current "direct content"
    /// region, used to compute whether realization is still working on
    /// directly-authored content or on show-rule output.
    pub outside: bool,
}

impl Recipe {
    /// Applies the recipe's transform to content already confirmed to match
    /// its selector.
    pub fn apply(&self, matched: Content) -> Content {
        self.transform.apply(matched)
    }
}

/// A single property assignment from a `set` rule.
#[derive(Debug, Clone)]
pub struct Property {
    pub element_name: &'static str,
    pub name: &'static str,
    pub value: Value,
    pub span: Span,
    /// Whether this property can be lifted above a barrier at a semantic
    /// boundary (e.g. a paragraph break) without changing behavior.
    pub liftable: bool,
    pub outside: bool,
}

/// A single link in the style chain.
#[derive(Debug, Clone)]
pub enum Style {
    Property(Property),
    Recipe(Recipe),
    /// Marks a recipe index as revoked for the remainder of this chain,
    /// preventing the textual regex pass from re-matching content it just
    /// produced.
    Revocation(RecipeIndex),
}

/// An immutable list of style entries, cheaply cloneable and typically
/// produced by a single `set`/`show` statement.
#[derive(Debug, Clone, Default)]
pub struct Styles(pub EcoVec<Style>);

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_style(style: Style) -> Self {
        Self(EcoVec::from([style]))
    }

    /// Appends another style map's entries as more-inner than this one's.
    pub fn extend_from(&mut self, other: &Styles) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl From<Style> for Styles {
    fn from(style: Style) -> Self {
        Self::from_style(style)
    }
}

impl FromIterator<Style> for Styles {
    fn from_iter<T: IntoIterator<Item = Style>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One link of the style chain: a contiguous run of styles sharing a single
/// owning `EcoVec` buffer (so that links coming from the same `styled`
/// wrapper compare equal by pointer), plus the rest of the chain.
#[derive(Debug, Clone)]
struct Link {
    head: EcoVec<Style>,
    tail: StyleChain,
}

/// A singly-linked, immutable cascading style environment.
///
/// Property lookups walk innermost-to-outermost (the first matching
/// property found nearest the queried content wins); recipe lookups walk
/// outermost-to-innermost, since show rules are meant to be applied in the
/// order they were nested from the document root inward.
#[derive(Debug, Clone, Default)]
pub struct StyleChain(Option<Rc<Link>>);

impl StyleChain {
    /// The empty chain.
    pub fn new() -> Self {
        Self(None)
    }

    /// Prepends `styles` as a new innermost link.
    pub fn chain(&self, styles: &Styles) -> Self {
        if styles.is_empty() {
            return self.clone();
        }
        Self(Some(Rc::new(Link { head: styles.0.clone(), tail: self.clone() })))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Iterates all style entries, innermost first.
    pub fn entries(&self) -> impl Iterator<Item = &Style> {
        self.links().flat_map(|link| link.head.iter().rev())
    }

    /// Iterates the chain's links, innermost first.
    fn links(&self) -> Links<'_> {
        Links { cur: self.0.as_deref() }
    }

    /// Looks up the innermost value of a property, if set anywhere on the
    /// chain.
    pub fn get<'a>(&'a self, element_name: &'static str, name: &'static str) -> Option<&'a Value> {
        self.entries().find_map(|style| match style {
            Style::Property(p) if p.element_name == element_name && p.name == name => {
                Some(&p.value)
            }
            _ => None,
        })
    }

    /// Like [`get`](Self::get) but with a default value.
    pub fn get_with_default<'a>(
        &'a self,
        element_name: &'static str,
        name: &'static str,
        default: &'a Value,
    ) -> &'a Value {
        self.get(element_name, name).unwrap_or(default)
    }

    /// Iterates recipes outermost-first, the order show rules must be tried
    /// in.
    ///
    /// The yielded [`RecipeIndex`] numbers recipes by distance from the
    /// outermost end of the chain (`0` is outermost), stable for as long as
    /// the chain's set of recipes doesn't change — which is exactly the
    /// guarantee content guards and textual-pass revocations rely on.
    pub fn recipes(&self) -> impl Iterator<Item = (RecipeIndex, &Recipe)> {
        let all: Vec<_> = self
            .entries()
            .filter_map(|style| match style {
                Style::Recipe(r) => Some(r),
                _ => None,
            })
            .collect();
        all.into_iter().rev().enumerate().map(|(i, r)| (RecipeIndex(i), r))
    }

    /// The total number of recipes on this chain, i.e. the value `recipes`
    /// would yield `RecipeIndex`es up to (exclusive).
    pub fn recipe_count(&self) -> usize {
        self.entries().filter(|s| matches!(s, Style::Recipe(_))).count()
    }

    /// Whether recipe `index` has been revoked anywhere innermost-of (i.e.
    /// inside) the current position.
    pub fn is_revoked(&self, index: RecipeIndex) -> bool {
        self.entries().any(|style| matches!(style, Style::Revocation(r) if *r == index))
    }

    /// Returns a chain containing only the outermost `len` links of `self`,
    /// i.e. strips the `skip` innermost links. Used together with
    /// [`trunk`](Self::trunk) to factor shared ancestor styles out of a set
    /// of sibling chains.
    pub fn suffix(&self, skip: usize) -> Self {
        let mut chain = self.clone();
        for _ in 0..skip {
            chain = match chain.0 {
                Some(link) => link.tail.clone(),
                None => return Self::new(),
            };
        }
        chain
    }

    /// The style entries that `self` carries beyond `base`, assuming `base`
    /// is a true suffix of `self` (as produced by [`trunk`](Self::trunk)).
    /// Used to re-wrap a grouped item with only the styles local to it once
    /// the styles shared with its siblings have been factored out onto the
    /// group's own chain.
    pub fn local(&self, base: &StyleChain) -> Styles {
        let mut out: Vec<Style> = Vec::new();
        let mut cur = self.clone();
        loop {
            let same = match (&cur.0, &base.0) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if same {
                break;
            }
            let Some(link) = cur.0.clone() else { break };
            out.extend(link.head.iter().rev().cloned());
            cur = link.tail.clone();
        }
        Styles(out.into_iter().rev().collect())
    }

    /// Finds the number of links shared, as a common root-ward tail, by
    /// every chain in `iter`. Chains are compared for shared ancestry by
    /// pointer equality of their link buffers, not deep equality, since a
    /// common ancestor is always reached by literally sharing the same
    /// `Rc`/`EcoVec` allocation.
    pub fn trunk<'a>(mut iter: impl Iterator<Item = &'a StyleChain>) -> Self {
        let Some(first) = iter.next() else { return Self::new() };
        let mut common: Vec<*const Style> = first.links().map(|l| l.head.as_ptr()).collect();

        for chain in iter {
            let theirs: Vec<*const Style> = chain.links().map(|l| l.head.as_ptr()).collect();
            // Align both link-pointer lists at their roots (ends) and keep
            // only the longest common tail.
            let n = common.len().min(theirs.len());
            let shared = (1..=n)
                .take_while(|&k| {
                    common[common.len() - k] == theirs[theirs.len() - k]
                })
                .last()
                .unwrap_or(0);
            common = common[common.len() - shared..].to_vec();
        }

        // Rebuild a chain from the shared pointer suffix by walking `first`
        // down to the link whose buffer starts the shared region.
        let skip = first.links().count().saturating_sub(common.len());
        first.suffix(skip)
    }
}

struct Links<'a> {
    cur: Option<&'a Link>,
}

impl<'a> Iterator for Links<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.cur?;
        self.cur = link.tail.0.as_deref();
        Some(link)
    }
}
