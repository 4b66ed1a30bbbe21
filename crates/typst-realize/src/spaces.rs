//! The space collapsing and discarding infrastructure for realization.

use typst_library::foundations::Content;
use typst_library::layout::HElem;
use typst_library::routines::Pair;
use typst_library::text::{LinebreakElem, SpaceElem, TextElem};

use crate::is_tag;

/// State kept for space collapsing/discarding.
///
/// We store the string of preceding text elements to delay the expensive
/// [`is_space_discarding`] check until we encounter a newline space.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SpaceState<'a> {
    /// When destructive, we skip any future spaces.
    Destructive,
    /// When supportive, we usually keep future spaces, but we will skip
    /// newline spaces if our text ends in a space-discarding character.
    Supportive { text: Option<&'a str> },
    /// A current space that did not have a newline and remembers the
    /// preceding element's text to check if it was space-discarding.
    ///
    /// Skips future spaces and may itself be discarded if followed by a
    /// destructive element or followed by a newline space when the
    /// previous text ended space-discarding.
    Space { prev_text: Option<&'a str> },
    /// A current space that did have a newline.
    ///
    /// Does not need to store the preceding element's text, as this would
    /// have been skipped if that text ended as space-discarding.
    SpaceWithNewline,
}

/// What action to take for space collapsing, in addition to updating the
/// `SpaceState` itself, which is necessary even when the action is `Skip`.
#[derive(Debug, Copy, Clone)]
pub(crate) enum SpaceAction {
    /// Invisible elements are themselves kept, but neither contain text nor
    /// affect the space collapsing state.
    Invisible,
    /// Avoid adding the current space element.
    Skip,
    /// Discard the preceding space, but keep the current element.
    Discard,
    /// Discard the preceding space and skip the current space element.
    DiscardAndSkip,
    /// Keep the current element and don't change any preceding spaces.
    Keep,
}

fn is_space(state: SpaceState) -> bool {
    matches!(state, SpaceState::Space { .. } | SpaceState::SpaceWithNewline)
}

/// Run the space collapsing algorithm on `buf[start..]`. This discards space
/// elements that are at the edges of the range or in the vicinity of
/// destructive elements and collapses adjacent spaces into one with the
/// styles of the first space.
///
/// Rebuilds the tail of the buffer into a fresh vector rather than shifting
/// elements in place: `Pair` here owns an `Rc`-backed `Content` and
/// `StyleChain`, neither of which is `Copy`, so the original's
/// `copy_within`-based in-place shift isn't available without unsafe code.
/// A single extra allocation per grouping finish is a fine trade for that.
pub(crate) fn collapse_spaces(buf: &mut Vec<Pair>, start: usize) {
    let mut out: Vec<Pair> = Vec::with_capacity(buf.len() - start);
    let mut state = SpaceState::Destructive;

    for i in start..buf.len() {
        let (content, _) = &buf[i];
        let (action, next) = collapse_transition(state, content);
        state = next;
        match action {
            SpaceAction::Invisible => out.push(buf[i].clone()),
            SpaceAction::Skip => {}
            SpaceAction::Discard => {
                out.pop();
                out.push(buf[i].clone());
            }
            SpaceAction::DiscardAndSkip => {
                out.pop();
            }
            SpaceAction::Keep => out.push(buf[i].clone()),
        }
    }

    if is_space(state) {
        out.pop();
    }

    buf.truncate(start);
    buf.extend(out);
}

/// How to transition state for the space collapsing algorithm.
pub(crate) fn collapse_transition<'a>(
    state: SpaceState<'a>,
    content: &'a Content,
) -> (SpaceAction, SpaceState<'a>) {
    if is_tag(content) {
        (SpaceAction::Invisible, state)
    } else if let Some(elem) = content.to_packed::<HElem>() {
        if elem.amount.is_fractional() || elem.weak {
            if is_space(state) {
                (SpaceAction::Discard, SpaceState::Destructive)
            } else {
                (SpaceAction::Keep, SpaceState::Destructive)
            }
        } else {
            (SpaceAction::Invisible, state)
        }
    } else if content.is::<LinebreakElem>() {
        if is_space(state) {
            (SpaceAction::Discard, SpaceState::Destructive)
        } else {
            (SpaceAction::Keep, SpaceState::Destructive)
        }
    } else if let Some(elem) = content.to_packed::<SpaceElem>() {
        for_space(state, elem.had_newline)
    } else if let Some(elem) = content.to_packed::<TextElem>() {
        for_text(state, &elem.text)
    } else {
        (SpaceAction::Keep, SpaceState::Supportive { text: None })
    }
}

/// The state transition for a text element.
fn for_text<'a>(state: SpaceState<'_>, text: &'a str) -> (SpaceAction, SpaceState<'a>) {
    if state == SpaceState::SpaceWithNewline
        && text.chars().next().is_some_and(is_space_discarding)
    {
        (SpaceAction::Discard, SpaceState::Supportive { text: Some(text) })
    } else {
        (SpaceAction::Keep, SpaceState::Supportive { text: Some(text) })
    }
}

/// The state transition for a space element.
///
/// Note that if any space in a group of spaces had a newline, we treat all
/// spaces in that group as having a newline.
fn for_space(state: SpaceState, had_nl: bool) -> (SpaceAction, SpaceState) {
    match state {
        SpaceState::Destructive => (SpaceAction::Skip, SpaceState::Destructive),
        SpaceState::Supportive { text: Some(text) }
            if had_nl && text.chars().next_back().is_some_and(is_space_discarding) =>
        {
            (SpaceAction::Skip, SpaceState::Destructive)
        }
        SpaceState::Supportive { .. } if had_nl => {
            (SpaceAction::Keep, SpaceState::SpaceWithNewline)
        }
        SpaceState::Supportive { text: prev_text } => {
            (SpaceAction::Keep, SpaceState::Space { prev_text })
        }
        SpaceState::Space { prev_text: Some(text), .. }
            if had_nl && text.chars().next_back().is_some_and(is_space_discarding) =>
        {
            (SpaceAction::DiscardAndSkip, SpaceState::Destructive)
        }
        SpaceState::Space { .. } if had_nl => {
            (SpaceAction::Skip, SpaceState::SpaceWithNewline)
        }
        space @ (SpaceState::Space { .. } | SpaceState::SpaceWithNewline) => {
            (SpaceAction::Skip, space)
        }
    }
}

/// Whether a character is part of the space-discarding set for Typst. These
/// characters discard adjacent spaces caused by newlines and allow Chinese
/// and Japanese text to be broken across lines in markup without producing
/// spaces.
///
/// This checks the Han, Hiragana, and Katakana scripts, plus the East Asian
/// fullwidth punctuation and forms blocks, which covers the overwhelming
/// majority of real-world CJK text; the original's additional per-codepoint
/// East Asian Width/emoji refinement over the `Common` script is not
/// reproduced here.
pub(crate) fn is_space_discarding(c: char) -> bool {
    use unicode_script::{Script, UnicodeScript};

    match c.script() {
        Script::Han | Script::Hiragana | Script::Katakana => true,
        _ => matches!(c as u32, 0x3000..=0x303F | 0xFF00..=0xFFEF),
    }
}
