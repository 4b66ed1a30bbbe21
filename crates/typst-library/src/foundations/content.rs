use std::rc::Rc;

use typst_syntax::Span;
use typst_utils::SmallBitSet;

use super::{RecipeIndex, Styles};
use crate::introspection::{Location, Tag};
use crate::layout::{AlignElem, BoxElem, HElem, InlineElem, PageElem, PagebreakElem, VElem};
use crate::math::{
    MathAccentElem, MathAlignPointElem, MathAttachElem, MathDelimitedElem,
    MathFracElem, MathLimitsElem, MathRootElem,
};
use crate::model::{
    BlockElem, CiteElem, CiteGroup, EnumElem, EnumItem, HeadingElem, LinkElem, ListElem,
    ListItem, ParElem, ParbreakElem, RefElem, TermItem, TermsElem,
};
use crate::text::{
    EmphElem, LinebreakElem, RawElem, SmartQuoteElem, SpaceElem, StrongElem, SymbolElem,
    TextElem,
};

/// A piece of content being realized, paired with the style content local to
/// its own construction (for `styled` wrappers) or with a synthesized
/// container (for `sequence`).
#[derive(Debug, Clone)]
pub struct StyledElem {
    pub child: Content,
    pub styles: Styles,
}

/// The equation wrapper produced for math-only content that appears outside
/// of a math context, or visited directly in math mode.
#[derive(Debug, Clone)]
pub struct EquationElem {
    pub body: Content,
    pub block: bool,
}

/// An image reference, opaque beyond its role as a locatable element.
#[derive(Debug, Clone, Default)]
pub struct ImageElem {
    pub source: ecow::EcoString,
}

/// A start or end tag, wrapping an [`introspection::Tag`](Tag).
#[derive(Debug, Clone)]
pub struct TagElem {
    pub tag: Tag,
}

impl TagElem {
    /// Wraps a tag into packed content, consistent with how every other
    /// tagged/locatable element is prepared.
    pub fn packed(tag: Tag) -> Content {
        TagElem { tag }.pack()
    }
}

/// Every content element kind realization knows about. This is a closed sum:
/// nothing outside this list can appear in a [`Content`] value.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Text(TextElem),
    Space(SpaceElem),
    Linebreak(LinebreakElem),
    Parbreak(ParbreakElem),
    SmartQuote(SmartQuoteElem),
    Strong(StrongElem),
    Emph(EmphElem),
    Raw(RawElem),
    Link(LinkElem),
    Ref(RefElem),
    Heading(HeadingElem),
    ListItem(ListItem),
    EnumItem(EnumItem),
    TermItem(TermItem),
    List(ListElem),
    Enum(EnumElem),
    Terms(TermsElem),
    Par(ParElem),
    Block(BlockElem),
    Align(AlignElem),
    Page(PageElem),
    Pagebreak(PagebreakElem),
    HSpace(HElem),
    VSpace(VElem),
    Box(BoxElem),
    Inline(InlineElem),
    Equation(EquationElem),
    Image(ImageElem),
    Cite(CiteElem),
    CiteGroup(CiteGroup),
    Sequence(Vec<Content>),
    Styled(Box<StyledElem>),
    Tag(TagElem),
    Symbol(SymbolElem),
    MathFrac(MathFracElem),
    MathRoot(MathRootElem),
    MathAttach(MathAttachElem),
    MathDelimited(MathDelimitedElem),
    MathAlignPoint(MathAlignPointElem),
    MathLimits(MathLimitsElem),
    MathAccent(MathAccentElem),
}

impl ElementKind {
    /// The canonical, stable name of this element kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Space(_) => "space",
            ElementKind::Linebreak(_) => "linebreak",
            ElementKind::Parbreak(_) => "parbreak",
            ElementKind::SmartQuote(_) => "smartquote",
            ElementKind::Strong(_) => "strong",
            ElementKind::Emph(_) => "emph",
            ElementKind::Raw(_) => "raw",
            ElementKind::Link(_) => "link",
            ElementKind::Ref(_) => "ref",
            ElementKind::Heading(_) => "heading",
            ElementKind::ListItem(_) => "list.item",
            ElementKind::EnumItem(_) => "enum.item",
            ElementKind::TermItem(_) => "terms.item",
            ElementKind::List(_) => "list",
            ElementKind::Enum(_) => "enum",
            ElementKind::Terms(_) => "terms",
            ElementKind::Par(_) => "par",
            ElementKind::Block(_) => "block",
            ElementKind::Align(_) => "align",
            ElementKind::Page(_) => "page",
            ElementKind::Pagebreak(_) => "pagebreak",
            ElementKind::HSpace(_) => "h",
            ElementKind::VSpace(_) => "v",
            ElementKind::Box(_) => "box",
            ElementKind::Inline(_) => "inline",
            ElementKind::Equation(_) => "equation",
            ElementKind::Image(_) => "image",
            ElementKind::Cite(_) => "cite",
            ElementKind::CiteGroup(_) => "citation-group",
            ElementKind::Sequence(_) => "sequence",
            ElementKind::Styled(_) => "styled",
            ElementKind::Tag(_) => "tag",
            ElementKind::Symbol(_) => "symbol",
            ElementKind::MathFrac(_) => "math.frac",
            ElementKind::MathRoot(_) => "math.root",
            ElementKind::MathAttach(_) => "math.attach",
            ElementKind::MathDelimited(_) => "math.delimited",
            ElementKind::MathAlignPoint(_) => "math.align-point",
            ElementKind::MathLimits(_) => "math.limits",
            ElementKind::MathAccent(_) => "math.accent",
        }
    }
}

/// The shared representation behind a [`Content`] handle.
#[derive(Debug, Clone)]
struct Repr {
    kind: ElementKind,
    span: Span,
    label: Option<super::Label>,
    location: Option<Location>,
    prepared: bool,
    guards: SmallBitSet,
}

/// A content element together with its metadata.
///
/// `Content` is a cheap-to-clone handle (an `Rc`) around a closed
/// [`ElementKind`] sum. Mutating methods use copy-on-write: if the handle is
/// uniquely owned they mutate in place, otherwise they clone the
/// representation first, mirroring the "cloned on recipe rewrite boundaries
/// as needed" aliasing rule for content.
#[derive(Debug, Clone)]
pub struct Content(Rc<Repr>);

impl Content {
    /// Wraps an element kind into content with default (empty) metadata.
    pub fn new(kind: ElementKind) -> Self {
        Self(Rc::new(Repr {
            kind,
            span: Span::detached(),
            label: None,
            location: None,
            prepared: false,
            guards: SmallBitSet::new(),
        }))
    }

    /// An empty sequence, used as a unit-like placeholder.
    pub fn empty() -> Self {
        Self::sequence(std::iter::empty())
    }

    /// Builds a (possibly collapsed) sequence from children.
    ///
    /// A single child is returned as-is rather than wrapped, matching the
    /// teacher's own flattening behavior for joined content.
    pub fn sequence(children: impl IntoIterator<Item = Content>) -> Self {
        let mut vec: Vec<Content> = children.into_iter().collect();
        if vec.len() == 1 {
            return vec.pop().unwrap();
        }
        Self::new(ElementKind::Sequence(vec))
    }

    /// Wraps content in a styles map, producing a `styled` element. If the
    /// styles are empty, returns the content unchanged.
    pub fn styled_with_map(self, styles: Styles) -> Self {
        if styles.is_empty() {
            return self;
        }
        Self::new(ElementKind::Styled(Box::new(StyledElem { child: self, styles })))
    }

    fn repr(&self) -> &Repr {
        &self.0
    }

    fn to_mut(&mut self) -> &mut Repr {
        Rc::make_mut(&mut self.0)
    }

    /// The element kind this content wraps.
    pub fn kind(&self) -> &ElementKind {
        &self.repr().kind
    }

    /// The canonical element name.
    pub fn elem(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether this content is of element kind `T`.
    pub fn is<T: Elem>(&self) -> bool {
        T::unpack(self.kind()).is_some()
    }

    /// Accesses this content as element kind `T`, if it is one.
    pub fn to_packed<T: Elem>(&self) -> Option<&T> {
        T::unpack(self.kind())
    }

    /// The source span this content was produced from.
    pub fn span(&self) -> Span {
        self.repr().span
    }

    /// Returns this content with a span attached, if it doesn't have one.
    pub fn spanned(mut self, span: Span) -> Self {
        if self.repr().span.is_detached() {
            self.to_mut().span = span;
        }
        self
    }

    /// The element's label, if any.
    pub fn label(&self) -> Option<&super::Label> {
        self.repr().label.as_ref()
    }

    /// Attaches a label to this content.
    pub fn set_label(&mut self, label: super::Label) {
        self.to_mut().label = Some(label);
    }

    /// The element's minted location, if any.
    pub fn location(&self) -> Option<Location> {
        self.repr().location
    }

    /// Assigns a location to this content.
    pub fn set_location(&mut self, location: Location) {
        self.to_mut().location = Some(location);
    }

    /// Whether this element has already run through `prepare`.
    pub fn is_prepared(&self) -> bool {
        self.repr().prepared
    }

    /// Marks this element as prepared, so later visits skip `prepare`.
    pub fn mark_prepared(&mut self) {
        self.to_mut().prepared = true;
    }

    /// Whether a show rule with the given recipe index has already been
    /// applied to this exact element, guarding against infinite recursion
    /// when a recipe's output still matches its own selector.
    pub fn is_guarded(&self, index: RecipeIndex) -> bool {
        self.repr().guards.contains(index.0)
    }

    /// Returns this content guarded against re-application of `index`.
    pub fn guarded(mut self, index: RecipeIndex) -> Self {
        self.to_mut().guards.insert(index.0);
        self
    }

    /// Structural equality good enough for `Value` comparisons: same
    /// element kind and same identity for deeply nested content is not
    /// attempted here, since realization never needs to compare arbitrary
    /// content for equality beyond this.
    pub fn repr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Implemented by every concrete element payload type so that [`Content`]
/// can offer a generic `is`/`to_packed` surface without runtime reflection.
///
/// This plays the role the original implementation filled with a
/// declarative per-element metadata table populated once at process start;
/// here the table is just the match arms the [`elem!`](crate::elem) macro
/// generates, resolved at compile time.
pub trait Elem: Sized {
    /// The canonical element name.
    const NAME: &'static str;

    /// Extracts a reference to `Self` from an element kind, if it matches.
    fn unpack(kind: &ElementKind) -> Option<&Self>;
}

/// Implemented by every concrete element payload type to wrap itself into
/// [`Content`].
pub trait IntoContent {
    fn pack(self) -> Content;
}

/// Registers a concrete element payload type as an [`ElementKind`] variant,
/// generating its [`Elem`] and [`IntoContent`] impls.
#[macro_export]
macro_rules! elem {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl $crate::foundations::Elem for $ty {
            const NAME: &'static str = $name;
            fn unpack(kind: &$crate::foundations::ElementKind) -> Option<&Self> {
                match kind {
                    $crate::foundations::ElementKind::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl $crate::foundations::IntoContent for $ty {
            fn pack(self) -> $crate::foundations::Content {
                $crate::foundations::Content::new(
                    $crate::foundations::ElementKind::$variant(self),
                )
            }
        }
    };
}

// Element payload types that live outside this module (text, model,
// layout, math) register themselves with this macro from their own file.
// Only the kinds actually defined in this module are registered here.
elem!(EquationElem, Equation, "equation");
elem!(ImageElem, Image, "image");
elem!(TagElem, Tag, "tag");
