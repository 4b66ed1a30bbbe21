//! Math-mode elements. Realization visits these in math mode, applying the
//! same recipe/show-rule machinery as text but skipping the space
//! classifier and textual regex pass, which are defined only over text
//! flow.

use crate::foundations::Content;

#[derive(Debug, Clone)]
pub struct MathFracElem {
    pub num: Content,
    pub denom: Content,
}

#[derive(Debug, Clone)]
pub struct MathRootElem {
    pub index: Option<Content>,
    pub radicand: Content,
}

#[derive(Debug, Clone)]
pub struct MathAttachElem {
    pub base: Content,
    pub top: Option<Content>,
    pub bottom: Option<Content>,
}

#[derive(Debug, Clone)]
pub struct MathDelimitedElem {
    pub open: Content,
    pub body: Content,
    pub close: Content,
}

/// An alignment point (`&`) inside a math alignment group.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathAlignPointElem;

#[derive(Debug, Clone, Copy)]
pub struct MathLimitsElem {
    pub body_is_limits: bool,
}

#[derive(Debug, Clone)]
pub struct MathAccentElem {
    pub base: Content,
    pub accent: char,
}

crate::elem!(MathFracElem, MathFrac, "math.frac");
crate::elem!(MathRootElem, MathRoot, "math.root");
crate::elem!(MathAttachElem, MathAttach, "math.attach");
crate::elem!(MathDelimitedElem, MathDelimited, "math.delimited");
crate::elem!(MathAlignPointElem, MathAlignPoint, "math.align-point");
crate::elem!(MathLimitsElem, MathLimits, "math.limits");
crate::elem!(MathAccentElem, MathAccent, "math.accent");
