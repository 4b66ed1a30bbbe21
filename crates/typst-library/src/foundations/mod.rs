//! The content model: values, content elements, and the cascading style
//! chain that governs how content is realized.

mod collections;
mod content;
mod selector;
mod styles;
mod value;

pub use collections::{Array, Dict};
pub use content::{
    Content, Elem, ElementKind, EquationElem, ImageElem, IntoContent, StyledElem, TagElem,
};
pub use selector::{Selector, WhereFilter};
pub use styles::{Property, Recipe, RecipeIndex, Style, StyleChain, Styles, Transformation};
pub use value::{
    Angle, Args, Color, Datetime, Decimal, Duration, Dynamic, Fraction, Func, Gradient, Label,
    Length, Ratio, Relative, Symbol, Tiling, Type, Value, Version,
};
