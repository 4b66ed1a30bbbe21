//! Typst's realization subsystem.
//!
//! *Realization* is the process of recursively applying styling and, in
//! particular, show rules, flattening a content tree into a linear sequence
//! of `(Content, StyleChain)` pairs ready for layout. Along the way it also
//! classifies and collapses runs of spaces, and groups adjacent inline
//! content into the structural containers layout expects: paragraphs,
//! citation groups, lists.

mod spaces;

use typst_library::bail;
use typst_library::diag::SourceResult;
use typst_library::engine::{Engine, MAX_SHOW_RULE_DEPTH};
use typst_library::foundations::{
    Content, ElementKind, EquationElem, IntoContent, Recipe, RecipeIndex, Selector, Style,
    StyleChain, Styles, TagElem, Transformation, Value,
};
use typst_library::introspection::{SplitLocator, Tag};
use typst_library::layout::{BoxElem, HElem, InlineElem, VElem};
use typst_library::model::{
    CiteElem, CiteGroup, DocumentInfo, EnumElem, EnumItem, ListElem, ListItem, ParElem,
    ParbreakElem, TermItem, TermsElem,
};
use typst_library::routines::{FragmentKind, Pair, RealizationKind};
use typst_library::text::{LinebreakElem, SmartQuoteElem, SpaceElem, SymbolElem, TextElem};

use crate::spaces::collapse_spaces;

/// How many times [`visit_grouping_rules`] may retry the same piece of
/// content against a shrinking grouping stack before giving up. Real
/// documents never come close to this; it turns a logic bug into a
/// diagnostic instead of a silent infinite loop.
const MAX_GROUPING_RETRIES: usize = 512;

/// Whether a piece of content is a boundary tag, which every grouping rule
/// treats as transparent: always a pass-through member of whatever grouping
/// is currently active.
pub(crate) fn is_tag(content: &Content) -> bool {
    content.is::<TagElem>()
}

/// Flattens `content` under `styles` into a realized sequence of pairs.
pub fn realize(
    kind: RealizationKind<'_>,
    engine: &mut Engine,
    locator: &SplitLocator,
    content: Content,
    styles: StyleChain,
) -> SourceResult<Vec<Pair>> {
    typst_timing::timed!("realize", {
        let rules: &'static [&'static GroupingRule] = match kind {
            RealizationKind::LayoutDocument { .. }
            | RealizationKind::LayoutFragment { .. }
            | RealizationKind::HtmlDocument { .. }
            | RealizationKind::HtmlFragment { .. } => LAYOUT_RULES,
            RealizationKind::LayoutPar => LAYOUT_PAR_RULES,
            RealizationKind::Math => MATH_RULES,
        };

        let mut s = State { kind, engine, locator, sink: Vec::new(), rules, groupings: None };

        visit(&mut s, content, styles)?;
        finish(&mut s)?;

        match &s.kind {
            RealizationKind::LayoutFragment { kind_out }
            | RealizationKind::HtmlFragment { kind_out } => {
                let fragment =
                    if is_fully_inline(&s.sink) { FragmentKind::Inline } else { FragmentKind::Block };
                kind_out.set(Some(fragment));
            }
            _ => {}
        }

        Ok(s.sink)
    })
}

/// The state threaded through a single realization.
struct State<'e, 'l, 'k> {
    kind: RealizationKind<'k>,
    engine: &'e mut Engine,
    locator: &'l SplitLocator,
    /// The flat output built up so far. Also doubles as scratch space for
    /// in-progress groupings: an active grouping's members live at
    /// `sink[grouping.start..]` until its rule's `finish` callback drains
    /// and replaces them.
    sink: Vec<Pair>,
    rules: &'static [&'static GroupingRule],
    /// At most one grouping is ever active at a time: a rule's trigger and
    /// the currently active rule are mutually exclusive, so an unmatching
    /// trigger always finishes the active grouping before anything new
    /// starts (see [`visit_grouping_rules`]).
    groupings: Option<Grouping>,
}

/// A grouping rule: recognizes a run of related inline content and folds it
/// into a single structural container once the run ends.
struct GroupingRule {
    /// Whether this content starts (or continues) a grouping of this rule.
    trigger: fn(&Content) -> bool,
    /// Whether this content is a transparent member of an active grouping
    /// of this rule (kept, but doesn't itself retrigger or interrupt it).
    inner: fn(&Content) -> bool,
    /// Drains `sink[start..]`, builds the grouped container, and re-visits
    /// it (and any tags pulled out of the buffer) against what remains of
    /// the grouping stack.
    finish: fn(&mut State, usize) -> SourceResult<()>,
}

/// A grouping in progress: `sink[start..]` are its members so far.
struct Grouping {
    start: usize,
    rule: &'static GroupingRule,
}

/// Visits a single piece of content: kind-specific rewriting, show rules,
/// structural recursion (sequences, styled wrappers), and finally grouping.
fn visit(s: &mut State, content: Content, styles: StyleChain) -> SourceResult<()> {
    if let Some(rewritten) = apply_kind_rules(&s.kind, &content, &styles) {
        return visit(s, rewritten, styles);
    }

    if visit_show_rules(s, &content, &styles)? {
        return Ok(());
    }

    match content.kind() {
        ElementKind::Sequence(children) => {
            for child in children.clone() {
                visit(s, child, styles.clone())?;
            }
            Ok(())
        }
        ElementKind::Styled(styled) => {
            let child = styled.child.clone();
            let map = styled.styles.clone();
            visit_styled(s, child, map, styles)
        }
        _ => visit_grouping_rules(s, content, styles),
    }
}

/// Chains `map` onto `styles`, merges any document metadata it carries, and
/// re-visits `content` under the combined chain.
fn visit_styled(s: &mut State, content: Content, map: Styles, styles: StyleChain) -> SourceResult<()> {
    apply_document_info(&s.kind, &map);
    let chained = styles.chain(&map);
    visit(s, content, chained)
}

/// Folds a `set document(..)` property observed in a style map into the
/// document info cell this realization is collecting metadata into, if any.
fn apply_document_info(kind: &RealizationKind<'_>, map: &Styles) {
    let cell = match kind {
        RealizationKind::LayoutDocument { info } | RealizationKind::HtmlDocument { info } => *info,
        _ => return,
    };
    if map.is_empty() {
        return;
    }

    let mut info: DocumentInfo = cell.take();
    for style in &map.0 {
        let Style::Property(p) = style else { continue };
        if p.element_name != "document" {
            continue;
        }
        match (p.name, &p.value) {
            ("title", Value::Str(v)) => info.title = Some(v.clone()),
            ("author", Value::Str(v)) => info.author.push(v.clone()),
            _ => {}
        }
    }
    cell.set(info);
}

/// Whether an element kind belongs to math content that should be
/// auto-wrapped in an equation when it shows up outside of math.
fn is_mathy(content: &Content) -> bool {
    matches!(
        content.kind(),
        ElementKind::MathFrac(_)
            | ElementKind::MathRoot(_)
            | ElementKind::MathAttach(_)
            | ElementKind::MathDelimited(_)
            | ElementKind::MathAlignPoint(_)
            | ElementKind::MathLimits(_)
            | ElementKind::MathAccent(_)
    )
}

/// Rewrites `content` before show rules run, for the handful of kinds
/// realization treats specially rather than through the recipe machinery:
///
/// - In math mode, an equation visited directly is unwrapped to its body,
///   and the textual regex pass runs against a single text element's
///   content directly, since math has no paragraph buffer to run it over.
/// - Outside math mode, math-only content is auto-wrapped into an inline
///   equation, and symbol references are converted to plain text.
fn apply_kind_rules(kind: &RealizationKind<'_>, content: &Content, styles: &StyleChain) -> Option<Content> {
    if kind.is_math() {
        if let Some(eq) = content.to_packed::<EquationElem>() {
            return Some(eq.body.clone());
        }
        if let Some(text) = content.to_packed::<TextElem>() {
            if let Some((start, end, recipe, index)) = find_regex_match_in_str(&text.text, styles) {
                return Some(split_and_apply_regex_match(content, &text.text, start, end, recipe, index));
            }
        }
        return None;
    }

    if content.is::<EquationElem>() {
        return None;
    }
    if is_mathy(content) {
        let span = content.span();
        return Some(EquationElem { body: content.clone(), block: false }.pack().spanned(span));
    }
    if let Some(sym) = content.to_packed::<SymbolElem>() {
        let span = content.span();
        return Some(TextElem::new(sym.text.clone()).pack().spanned(span));
    }

    None
}

/// Whether `content`'s kind is locatable (eligible for introspection
/// queries) or carries accessibility tagging, the union of which decides
/// whether [`verdict`] mints it a location even absent a matching recipe.
///
/// Collapses the teacher's separate locatable/tagged flags into this one
/// predicate, since realization itself only needs to know whether *a*
/// location is required, not which of the two reasons required it. Scoped
/// to elements that stay individually addressable once realized: a
/// paragraph, list, or citation group is itself just a structural
/// container assembled from already-tagged (or untagged) members, so it is
/// left out here even though its members may carry their own locations.
fn is_locatable(content: &Content) -> bool {
    matches!(
        content.kind(),
        ElementKind::Heading(_)
            | ElementKind::Image(_)
            | ElementKind::Equation(_)
            | ElementKind::Ref(_)
            | ElementKind::Link(_)
            | ElementKind::Strong(_)
            | ElementKind::Emph(_)
    )
}

/// The show-set properties and (at most one) show-rule recipe that apply
/// to a piece of content under a style chain.
struct Verdict {
    prepared: bool,
    map: Styles,
    step: Option<(Recipe, RecipeIndex)>,
}

/// Finds the show-set properties and show-rule recipe that apply to `elem`
/// under `styles`. Returns `None` if nothing at all needs doing: no
/// properties, no recipe, and the element either is already prepared or
/// was never going to need a location minted for it.
fn verdict(elem: &Content, styles: &StyleChain) -> Option<Verdict> {
    let prepared = elem.is_prepared();
    let mut map = Styles::new();
    let mut step: Option<(Recipe, RecipeIndex)> = None;

    for (index, recipe) in styles.recipes() {
        let matches = match &recipe.selector {
            Some(selector) => selector.matches(elem, styles),
            None => true,
        };
        if !matches {
            continue;
        }

        if let Transformation::Styles(transform) = &recipe.transform {
            if !prepared {
                map.extend_from(transform);
            }
            continue;
        }

        if step.is_some() || elem.is_guarded(index) {
            continue;
        }
        step = Some((recipe.clone(), index));
    }

    let needs_location = !prepared && (elem.label().is_some() || is_locatable(elem));
    if step.is_none() && map.is_empty() && !needs_location {
        return None;
    }

    Some(Verdict { prepared, map, step })
}

/// Mints a location for `elem` and marks it prepared, returning the start
/// and end boundary tags that should wrap its (possibly show-rule-rewritten)
/// output in the realized sequence.
fn prepare(locator: &SplitLocator, elem: &mut Content) -> (Tag, Tag) {
    let location = locator.locate_hashed(&(elem.elem(), elem.span()), 0);
    elem.set_location(location);
    elem.mark_prepared();
    (Tag::Start(elem.clone()), Tag::End(location))
}

/// Applies show-set styles and at most one show-rule recipe to `content`,
/// bracketing its (rewritten) output with start/end tags the first time it
/// is prepared. Returns whether this handled `content` at all; if not, the
/// caller continues with its own structural/grouping handling.
fn visit_show_rules(s: &mut State, content: &Content, styles: &StyleChain) -> SourceResult<bool> {
    let Some(Verdict { prepared, map, step }) = verdict(content, styles) else {
        return Ok(false);
    };

    let mut output = content.clone();
    let tags = if prepared { None } else { Some(prepare(s.locator, &mut output)) };

    if let Some((recipe, index)) = step {
        output = recipe.apply(output).guarded(index);
    }

    if let Some((start, _)) = &tags {
        visit(s, TagElem::packed(start.clone()), styles.clone())?;
    }

    if s.engine.route.show_rule_depth() >= MAX_SHOW_RULE_DEPTH {
        bail!(content.span(), "maximum show rule depth exceeded");
    }
    s.engine.route.enter_show_rule();
    let result = visit_styled(s, output, map, styles.clone());
    s.engine.route.exit_show_rule();
    result?;

    if let Some((_, end)) = &tags {
        visit(s, TagElem::packed(end.clone()), styles.clone())?;
    }

    Ok(true)
}

/// Classifies `content` against the active grouping rules for this
/// realization kind, starting, continuing, or finishing groupings as
/// needed, and finally pushing ungrouped content to the sink.
///
/// Groupings never nest: a rule other than the one currently active always
/// finishes the active grouping first and retries, rather than starting a
/// second grouping on top of it. This keeps the state machine a simple flat
/// stack of at most one entry and, in particular, keeps the textual regex
/// pass (merged into `finish_par`'s own buffer for document/fragment
/// realization; see [`finish_par`]) from ever competing with the paragraph
/// rule that would otherwise host it.
fn visit_grouping_rules(s: &mut State, content: Content, styles: StyleChain) -> SourceResult<()> {
    for _ in 0..MAX_GROUPING_RETRIES {
        if let Some(rule) = s.rules.iter().copied().find(|r| (r.trigger)(&content)) {
            match &s.groupings {
                Some(g) if std::ptr::eq(g.rule, rule) => {
                    s.sink.push((content, styles));
                    return Ok(());
                }
                Some(_) => {
                    finish_innermost_grouping(s)?;
                    continue;
                }
                None => {
                    s.groupings = Some(Grouping { start: s.sink.len(), rule });
                    s.sink.push((content, styles));
                    return Ok(());
                }
            }
        }

        if let Some(g) = &s.groupings {
            if is_tag(&content) || (g.rule.inner)(&content) {
                s.sink.push((content, styles));
                return Ok(());
            }
            finish_innermost_grouping(s)?;
            continue;
        }

        return visit_filter_rules(s, content, styles);
    }

    bail!(content.span(), "maximum grouping depth exceeded")
}

/// Last-resort handling once no grouping rule wants this content: drops
/// top-level spaces and a leading weak vertical spacer that would
/// otherwise show up as a meaningless gap outside of any paragraph, and
/// pushes everything else straight to the sink. A top-level paragraph
/// break is itself kept: it's the separator between two sibling
/// paragraphs and surfaces in the realized sequence between them, rather
/// than being consumed the way it is when it interrupts an in-progress
/// paragraph grouping.
fn visit_filter_rules(s: &mut State, content: Content, styles: StyleChain) -> SourceResult<()> {
    if s.kind.grounds_text() {
        if content.is::<SpaceElem>() {
            return Ok(());
        }
        if let Some(elem) = content.to_packed::<VElem>() {
            if elem.weak && s.sink.is_empty() {
                return Ok(());
            }
        }
    }

    s.sink.push((content, styles));
    Ok(())
}

fn finish_innermost_grouping(s: &mut State) -> SourceResult<()> {
    let g = s.groupings.take().expect("finish_innermost_grouping called with no active grouping");
    (g.rule.finish)(s, g.start)
}

/// Flushes the grouping still open, if any, once the whole input tree has
/// been visited. A lone outstanding paragraph grouping whose contents turn
/// out to be fully inline is left unwrapped when realizing a layout/HTML
/// fragment (rather than a whole document): the caller asked for inline
/// content, and wrapping it in a paragraph would force it to block level.
/// The regex pass and space collapsing still run over it either way, since
/// those aren't tied to whether the paragraph container itself gets built.
fn finish(s: &mut State) -> SourceResult<()> {
    if let Some(g) = &s.groupings {
        if std::ptr::eq(g.rule, &PAR) {
            let start = g.start;
            apply_regex_rewrites(&mut s.sink, start);
            collapse_spaces(&mut s.sink, start);
            let skip = matches!(
                s.kind,
                RealizationKind::LayoutFragment { .. } | RealizationKind::HtmlFragment { .. }
            ) && is_fully_inline(&s.sink[start..]);
            if skip {
                s.groupings = None;
                return Ok(());
            }
        }
    }

    while s.groupings.is_some() {
        finish_innermost_grouping(s)?;
    }
    Ok(())
}

/// Whether every element in `pairs` participates in inline flow, used to
/// decide a realized fragment's [`FragmentKind`] and whether a trailing
/// paragraph grouping should be left unwrapped.
fn is_fully_inline(pairs: &[Pair]) -> bool {
    pairs.iter().all(|(c, _)| {
        is_tag(c)
            || c.is::<TextElem>()
            || c.is::<SpaceElem>()
            || c.is::<LinebreakElem>()
            || c.is::<SmartQuoteElem>()
            || c.is::<HElem>()
            || c.is::<InlineElem>()
            || c.is::<BoxElem>()
            || c.to_packed::<EquationElem>().is_some_and(|e| !e.block)
    })
}

/// Groups a flat slice of pairs back into owned content plus the style
/// chain common to all of them, factoring shared ancestor styles out onto
/// the chain and re-wrapping each element with only its local remainder.
fn repack(pairs: &[Pair]) -> (Content, StyleChain) {
    if pairs.is_empty() {
        return (Content::empty(), StyleChain::new());
    }
    let trunk = StyleChain::trunk(pairs.iter().map(|(_, st)| st));
    let children: Vec<Content> =
        pairs.iter().map(|(c, st)| c.clone().styled_with_map(st.local(&trunk))).collect();
    (Content::sequence(children), trunk)
}

/// Repeatedly rewrites the leftmost active regex-recipe match found among
/// `buf[start..]`'s text elements, splicing each rewrite's pieces directly
/// into the buffer in place of the matched element, until none remain.
///
/// Works on the buffer directly rather than by re-dispatching through
/// [`visit`]: every element here already passed through show rules once,
/// when it was first visited into whatever grouping is finishing now, and
/// a `Regex` selector never matches through the generic selector path (see
/// `Selector::matches`), so a revisit would do nothing beyond this scan.
/// Doing it in place also sidesteps a loop that revisiting would otherwise
/// risk: unmatched, unchanged content re-dispatched through `visit` would
/// just re-trigger the same grouping rule and finish again, forever. The
/// scan position is held steady (not advanced) across a splice so the
/// freshly inserted unmatched prefix and suffix pieces get scanned too —
/// the suffix in particular may still contain further matches.
fn apply_regex_rewrites(buf: &mut Vec<Pair>, start: usize) {
    let mut i = start;
    while i < buf.len() {
        let (content, styles) = buf[i].clone();
        let Some(elem) = content.to_packed::<TextElem>() else {
            i += 1;
            continue;
        };
        let Some((byte_start, byte_end, recipe, index)) =
            find_regex_match_in_str(&elem.text, &styles)
        else {
            i += 1;
            continue;
        };

        let replacement =
            split_and_apply_regex_match(&content, &elem.text, byte_start, byte_end, recipe, index);
        let pieces = flatten_regex_replacement(replacement, &styles);
        buf.splice(i..=i, pieces);
    }
}

/// Breaks a regex replacement's sequence (unmatched prefix, matched/applied
/// middle, unmatched suffix) back into individual sink pairs.
fn flatten_regex_replacement(content: Content, styles: &StyleChain) -> Vec<Pair> {
    match content.kind() {
        ElementKind::Sequence(children) => {
            children.clone().into_iter().map(|c| attach_local_styles(c, styles)).collect()
        }
        _ => vec![attach_local_styles(content, styles)],
    }
}

/// Unwraps a `Styled` part of a regex replacement (the revocation wrapper
/// around the matched-and-applied middle) onto the enclosing chain; leaves
/// any other part (the unmatched prefix/suffix) under the chain as-is.
fn attach_local_styles(content: Content, styles: &StyleChain) -> Pair {
    match content.kind() {
        ElementKind::Styled(styled) => {
            let child = styled.child.clone();
            let chained = styles.chain(&styled.styles);
            (child, chained)
        }
        _ => (content, styles.clone()),
    }
}

// --- Textual grouping: adjacent text/linebreak/smartquote runs -------------
//
// Used only where there is no paragraph rule to host the regex pass
// instead: inside an already-formed paragraph's own body
// (`LAYOUT_PAR_RULES`) and nowhere in math (`apply_kind_rules` runs the
// regex pass per-element there instead, since math has no text flow to
// buffer). Under document/fragment realization the pass runs as part of
// `finish_par` directly; see its doc comment.

fn trigger_textual(c: &Content) -> bool {
    c.is::<TextElem>() || c.is::<LinebreakElem>() || c.is::<SmartQuoteElem>()
}

fn inner_textual(c: &Content) -> bool {
    c.is::<SpaceElem>()
}

/// Finishes a textual run in isolation (no enclosing paragraph exists to
/// absorb it): rewrites regex matches and collapses spaces, leaving the
/// result as the run's final, ungrouped sink entries.
fn finish_textual(s: &mut State, start: usize) -> SourceResult<()> {
    apply_regex_rewrites(&mut s.sink, start);
    collapse_spaces(&mut s.sink, start);
    Ok(())
}

/// Finds the leftmost match, across every active (non-revoked) regex
/// recipe on `styles`, within `text`.
fn find_regex_match_in_str(
    text: &str,
    styles: &StyleChain,
) -> Option<(usize, usize, Recipe, RecipeIndex)> {
    let mut best: Option<(usize, usize, Recipe, RecipeIndex)> = None;
    for (index, recipe) in styles.recipes() {
        let Some(Selector::Regex(re)) = &recipe.selector else { continue };
        if styles.is_revoked(index) {
            continue;
        }
        let Some(m) = re.find(text) else { continue };
        if best.as_ref().is_none_or(|(bs, ..)| m.start() < *bs) {
            best = Some((m.start(), m.end(), recipe.clone(), index));
        }
    }
    best
}

/// Splits `text` around a regex match, applies the matching recipe to the
/// matched portion, and tags that portion's output with a revocation of
/// the match's recipe so it can't be rematched by the same pass.
fn split_and_apply_regex_match(
    content: &Content,
    text: &str,
    byte_start: usize,
    byte_end: usize,
    recipe: Recipe,
    index: RecipeIndex,
) -> Content {
    let span = content.span();
    let mut parts = Vec::new();

    if byte_start > 0 {
        parts.push(TextElem::new(&text[..byte_start]).pack().spanned(span));
    }

    let matched = TextElem::new(&text[byte_start..byte_end]).pack().spanned(span);
    let output = recipe.apply(matched);
    parts.push(output.styled_with_map(Styles::from_style(Style::Revocation(index))));

    if byte_end < text.len() {
        parts.push(TextElem::new(&text[byte_end..]).pack().spanned(span));
    }

    Content::sequence(parts)
}

// --- Paragraph grouping -----------------------------------------------------

fn trigger_par(c: &Content) -> bool {
    c.is::<TextElem>()
        || c.is::<LinebreakElem>()
        || c.is::<SmartQuoteElem>()
        || c.is::<HElem>()
        || c.is::<InlineElem>()
        || c.is::<BoxElem>()
        || c.to_packed::<EquationElem>().is_some_and(|e| !e.block)
}

fn inner_par(c: &Content) -> bool {
    c.is::<SpaceElem>()
}

/// Finishes a paragraph run: runs the same regex-rewrite-then-collapse pass
/// [`finish_textual`] runs in isolation, then packs the result into a
/// `ParElem`. A raw, not-yet-grouped citation/list/enum/terms container
/// that closes out a paragraph (e.g. a citation or list starting right
/// after running text) is realized as its own sibling rather than folded
/// back into this paragraph, since none of those item triggers overlap
/// this rule's own trigger.
fn finish_par(s: &mut State, start: usize) -> SourceResult<()> {
    let mut buf = s.sink.split_off(start);
    apply_regex_rewrites(&mut buf, 0);
    collapse_spaces(&mut buf, 0);
    let (body, trunk) = repack(&buf);
    visit(s, ParElem { body }.pack(), trunk)
}

// --- Citation grouping -------------------------------------------------------

fn trigger_cites(c: &Content) -> bool {
    c.is::<CiteElem>()
}

fn inner_cites(c: &Content) -> bool {
    c.is::<SpaceElem>()
}

fn finish_cites(s: &mut State, start: usize) -> SourceResult<()> {
    let buf = s.sink.split_off(start);
    let trunk = StyleChain::trunk(buf.iter().filter(|(c, _)| c.is::<CiteElem>()).map(|(_, st)| st));

    let mut tags = Vec::new();
    let mut children = Vec::new();
    for (c, st) in &buf {
        if is_tag(c) {
            tags.push((c.clone(), st.clone()));
        } else if c.is::<CiteElem>() {
            children.push(c.clone().styled_with_map(st.local(&trunk)));
        }
    }

    for (c, st) in tags {
        visit(s, c, st)?;
    }
    visit(s, CiteGroup { children }.pack(), trunk)
}

// --- List-like groupings: list, enum, terms ---------------------------------

fn trigger_list(c: &Content) -> bool {
    c.is::<ListItem>()
}
fn inner_list(c: &Content) -> bool {
    c.is::<SpaceElem>() || c.is::<ParbreakElem>()
}

fn finish_list(s: &mut State, start: usize) -> SourceResult<()> {
    let buf = s.sink.split_off(start);
    let tight = !buf.iter().any(|(c, _)| c.is::<ParbreakElem>());
    let trunk = StyleChain::trunk(buf.iter().filter(|(c, _)| c.is::<ListItem>()).map(|(_, st)| st));

    let mut tags = Vec::new();
    let mut children = Vec::new();
    for (c, st) in &buf {
        if is_tag(c) {
            tags.push((c.clone(), st.clone()));
        } else if let Some(item) = c.to_packed::<ListItem>() {
            let body = item.body.clone().styled_with_map(st.local(&trunk));
            children.push(ListItem { body }.pack());
        }
    }

    for (c, st) in tags {
        visit(s, c, st)?;
    }
    visit(s, ListElem { tight, children }.pack(), trunk)
}

fn trigger_enum(c: &Content) -> bool {
    c.is::<EnumItem>()
}
fn inner_enum(c: &Content) -> bool {
    c.is::<SpaceElem>() || c.is::<ParbreakElem>()
}

fn finish_enum(s: &mut State, start: usize) -> SourceResult<()> {
    let buf = s.sink.split_off(start);
    let tight = !buf.iter().any(|(c, _)| c.is::<ParbreakElem>());
    let trunk = StyleChain::trunk(buf.iter().filter(|(c, _)| c.is::<EnumItem>()).map(|(_, st)| st));

    let mut tags = Vec::new();
    let mut children = Vec::new();
    for (c, st) in &buf {
        if is_tag(c) {
            tags.push((c.clone(), st.clone()));
        } else if let Some(item) = c.to_packed::<EnumItem>() {
            let body = item.body.clone().styled_with_map(st.local(&trunk));
            children.push(EnumItem { number: item.number, body }.pack());
        }
    }

    for (c, st) in tags {
        visit(s, c, st)?;
    }
    visit(s, EnumElem { tight, children }.pack(), trunk)
}

fn trigger_terms(c: &Content) -> bool {
    c.is::<TermItem>()
}
fn inner_terms(c: &Content) -> bool {
    c.is::<SpaceElem>() || c.is::<ParbreakElem>()
}

fn finish_terms(s: &mut State, start: usize) -> SourceResult<()> {
    let buf = s.sink.split_off(start);
    let tight = !buf.iter().any(|(c, _)| c.is::<ParbreakElem>());
    let trunk = StyleChain::trunk(buf.iter().filter(|(c, _)| c.is::<TermItem>()).map(|(_, st)| st));

    let mut tags = Vec::new();
    let mut children = Vec::new();
    for (c, st) in &buf {
        if is_tag(c) {
            tags.push((c.clone(), st.clone()));
        } else if let Some(item) = c.to_packed::<TermItem>() {
            let local = st.local(&trunk);
            let term = item.term.clone().styled_with_map(local.clone());
            let description = item.description.clone().styled_with_map(local);
            children.push(TermItem { term, description }.pack());
        }
    }

    for (c, st) in tags {
        visit(s, c, st)?;
    }
    visit(s, TermsElem { tight, children }.pack(), trunk)
}

static TEXTUAL: GroupingRule =
    GroupingRule { trigger: trigger_textual, inner: inner_textual, finish: finish_textual };
static PAR: GroupingRule = GroupingRule { trigger: trigger_par, inner: inner_par, finish: finish_par };
static CITES: GroupingRule =
    GroupingRule { trigger: trigger_cites, inner: inner_cites, finish: finish_cites };
static LIST: GroupingRule =
    GroupingRule { trigger: trigger_list, inner: inner_list, finish: finish_list };
static ENUM: GroupingRule =
    GroupingRule { trigger: trigger_enum, inner: inner_enum, finish: finish_enum };
static TERMS: GroupingRule =
    GroupingRule { trigger: trigger_terms, inner: inner_terms, finish: finish_terms };

/// Grouping rules for a whole document or a layout/HTML fragment: a
/// paragraph (which also performs the textual regex pass directly; see
/// `finish_par`), citations, and the three list-like containers.
static LAYOUT_RULES: &[&GroupingRule] = &[&PAR, &CITES, &LIST, &ENUM, &TERMS];

/// Grouping rules inside a single paragraph: everything except `PAR`
/// itself, since a paragraph cannot contain another paragraph — the
/// textual rule takes over running the regex pass here instead.
static LAYOUT_PAR_RULES: &[&GroupingRule] = &[&TEXTUAL, &CITES, &LIST, &ENUM, &TERMS];

/// Grouping rules in math mode: citations and the list-likes still group,
/// but there is no text flow to paragraph, and the textual regex pass runs
/// per-element instead (see [`apply_kind_rules`]).
static MATH_RULES: &[&GroupingRule] = &[&CITES, &LIST, &ENUM, &TERMS];
