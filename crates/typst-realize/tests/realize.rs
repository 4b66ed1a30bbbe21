//! Integration tests exercising the realizer end to end: a content tree in,
//! a flat sequence of `(Content, StyleChain)` pairs out.

use std::cell::Cell;
use std::rc::Rc;

use typst_library::engine::Engine;
use typst_library::foundations::{
    Content, ElementKind, IntoContent, Recipe, Selector, Style, Styles, StyleChain,
    Transformation,
};
use typst_library::introspection::SplitLocator;
use typst_library::model::{CiteElem, DocumentInfo, HeadingElem, ListItem};
use typst_library::routines::{FragmentKind, Pair, RealizationKind};
use typst_library::text::{SpaceElem, TextElem};
use typst_syntax::Span;
use typst_realize::realize;

fn run(kind: RealizationKind<'_>, content: Content, styles: StyleChain) -> Vec<Pair> {
    let mut engine = Engine::new();
    let locator = SplitLocator::new();
    realize(kind, &mut engine, &locator, content, styles).expect("realization should succeed")
}

fn doc(content: Content, styles: StyleChain) -> Vec<Pair> {
    let info = Cell::new(DocumentInfo::default());
    run(RealizationKind::LayoutDocument { info: &info }, content, styles)
}

fn text(s: &str) -> Content {
    TextElem::new(s).pack()
}

fn space() -> Content {
    SpaceElem::default().pack()
}

fn names(pairs: &[Pair]) -> Vec<&'static str> {
    pairs.iter().map(|(c, _)| c.elem()).collect()
}

/// Plain inline text separated by an ordinary space collapses into a single
/// paragraph; no tags appear since a paragraph is not locatable.
#[test]
fn adjacent_text_and_space_become_one_paragraph() {
    let content = Content::sequence([text("A"), space(), text("B")]);
    let pairs = doc(content, StyleChain::new());

    assert_eq!(names(&pairs), ["par"]);
    let (par, _) = &pairs[0];
    let body = &par.to_packed::<typst_library::model::ParElem>().unwrap().body;
    match body.kind() {
        ElementKind::Sequence(children) => {
            assert_eq!(children.len(), 3);
            assert_eq!(children[0].to_packed::<TextElem>().unwrap().text, "A");
            assert!(children[1].is::<SpaceElem>());
            assert_eq!(children[2].to_packed::<TextElem>().unwrap().text, "B");
        }
        other => panic!("expected a sequence body, got {other:?}"),
    }
}

/// A paragraph break splits inline content into two separate paragraphs
/// with the break itself passed through untouched between them.
#[test]
fn parbreak_splits_into_two_paragraphs() {
    let content = Content::sequence([
        text("First"),
        typst_library::model::ParbreakElem.pack(),
        text("Second"),
    ]);
    let pairs = doc(content, StyleChain::new());

    assert_eq!(names(&pairs), ["par", "parbreak", "par"]);
}

/// Consecutive list items group into a single tight list; content that
/// follows outside the grouping run starts its own paragraph.
#[test]
fn list_items_group_then_trailing_text_is_its_own_paragraph() {
    let content = Content::sequence([
        ListItem { body: text("a") }.pack(),
        ListItem { body: text("b") }.pack(),
        text("after"),
    ]);
    let pairs = doc(content, StyleChain::new());

    assert_eq!(names(&pairs), ["list", "par"]);
    let (list, _) = &pairs[0];
    let list = list.to_packed::<typst_library::model::ListElem>().unwrap();
    assert!(list.tight);
    assert_eq!(list.children.len(), 2);
}

/// Adjacent citations group into a single citation-group; trailing text
/// again starts its own paragraph.
#[test]
fn citations_group_then_trailing_text_is_its_own_paragraph() {
    let content = Content::sequence([
        CiteElem { key: "x".into(), supplement: None }.pack(),
        CiteElem { key: "y".into(), supplement: None }.pack(),
        text(" trailing"),
    ]);
    let pairs = doc(content, StyleChain::new());

    assert_eq!(names(&pairs), ["citation-group", "par"]);
    let (group, _) = &pairs[0];
    let group = group.to_packed::<typst_library::model::CiteGroup>().unwrap();
    assert_eq!(group.children.len(), 2);
}

/// A regex show rule rewriting "foo" to "FOO" rewrites every non-overlapping
/// occurrence within a single text element and terminates: each rewritten
/// occurrence is tagged with a revocation of its own recipe so the textual
/// pass never re-matches content it just produced.
#[test]
fn regex_recipe_rewrites_every_match_without_looping() {
    let recipe = Recipe {
        selector: Some(Selector::Regex(Rc::new(regex::Regex::new("foo").unwrap()))),
        transform: Transformation::Content(text("FOO")),
        span: Span::detached(),
        outside: false,
    };
    let styles = StyleChain::new().chain(&Styles::from_style(Style::Recipe(recipe)));

    let content = text("a foo bar foo");
    let pairs = run(RealizationKind::LayoutPar, content, styles);

    let texts: Vec<&str> = pairs
        .iter()
        .map(|(c, _)| c.to_packed::<TextElem>().unwrap().text.as_str())
        .collect();
    assert_eq!(texts, ["a ", "FOO", " bar ", "FOO"]);
}

/// A heading is locatable: realizing it produces a start tag, the heading
/// itself (now carrying a minted location), and an end tag, in that order,
/// around the heading and not around the plain paragraph that follows.
#[test]
fn heading_is_bracketed_by_tags_but_trailing_paragraph_is_not() {
    let heading =
        HeadingElem { depth: std::num::NonZeroU8::new(1).unwrap(), body: text("T") }.pack();
    let content = Content::sequence([heading, text("p")]);
    let pairs = doc(content, StyleChain::new());

    assert_eq!(names(&pairs), ["tag", "heading", "tag", "par"]);

    let (start, _) = &pairs[0];
    let (heading, _) = &pairs[1];
    let (end, _) = &pairs[2];
    assert!(heading.location().is_some());
    assert_eq!(
        start.to_packed::<typst_library::foundations::TagElem>().unwrap().tag.start_location(),
        heading.location()
    );
    assert_eq!(
        end.to_packed::<typst_library::foundations::TagElem>().unwrap().tag.end_location(),
        heading.location()
    );
}

/// Realizing a layout fragment whose content is entirely inline leaves the
/// outstanding paragraph grouping unwrapped and reports `FragmentKind::Inline`,
/// rather than forcing the caller's inline request to block level.
#[test]
fn fully_inline_fragment_is_left_unwrapped() {
    let kind_out = Cell::new(None);
    let content = Content::sequence([text("A"), space(), text("B")]);
    let pairs = run(
        RealizationKind::LayoutFragment { kind_out: &kind_out },
        content,
        StyleChain::new(),
    );

    assert_eq!(names(&pairs), ["text", "space", "text"]);
    assert_eq!(kind_out.get(), Some(FragmentKind::Inline));
}

/// A document-level set rule's `document(title: ..)` property is collected
/// into the `DocumentInfo` cell passed to `LayoutDocument`, even though the
/// styled content it decorates produces no visible output of its own.
#[test]
fn document_info_is_collected_from_a_styled_wrapper() {
    let mut map = Styles::new();
    map.0.push(Style::Property(typst_library::foundations::Property {
        element_name: "document",
        name: "title",
        value: typst_library::foundations::Value::Str("Report".into()),
        span: Span::detached(),
        liftable: false,
        outside: false,
    }));

    let content = text("body").styled_with_map(map);
    let info = Cell::new(DocumentInfo::default());
    let _ = run(RealizationKind::LayoutDocument { info: &info }, content, StyleChain::new());

    assert_eq!(info.into_inner().title.as_deref(), Some("Report"));
}
