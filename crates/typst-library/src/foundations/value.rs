use std::rc::Rc;

use ecow::{EcoString, EcoVec};

use super::{Array, Content, Dict, Styles};

/// A computational value.
///
/// This is a closed sum of every runtime value kind the library knows about.
/// Full arithmetic and coercion dispatch over this type (the "calc"
/// standard library) is treated as an external collaborator and is not
/// reimplemented here; realization only needs `Value` for style properties
/// and selector predicates, so this type focuses on identity, equality, and
/// cheap cloning.
#[derive(Debug, Clone)]
pub enum Value {
    /// The value that indicates the absence of any other value.
    None,
    /// A value that indicates a smart default.
    Auto,
    /// A boolean: `true`, `false`.
    Bool(bool),
    /// A 64-bit integer: `120`.
    Int(i64),
    /// A 64-bit float: `1.2`, `10e-4`.
    Float(f64),
    /// A length: `12pt`, `3cm`.
    Length(Length),
    /// An angle: `90deg`.
    Angle(Angle),
    /// A ratio: `50%`.
    Ratio(Ratio),
    /// A relative length, combining a length with a ratio: `40% + 2pt`.
    Relative(Relative),
    /// A fraction: `1fr`.
    Fraction(Fraction),
    /// A string: `"hello"`.
    Str(EcoString),
    /// A sequence of bytes.
    Bytes(Rc<Vec<u8>>),
    /// A label: `<intro>`.
    Label(Label),
    /// A point in time: `datetime(year: 2024, month: 1, day: 1)`.
    Datetime(Datetime),
    /// A duration: `duration(seconds: 2)`.
    Duration(Duration),
    /// An arbitrary-precision decimal number: `decimal("3.14")`.
    Decimal(Decimal),
    /// A color in one of several color spaces: `rgb("#34ebb4")`.
    Color(Color),
    /// A gradient between colors.
    Gradient(Gradient),
    /// A repeating pattern fill.
    Tiling(Tiling),
    /// A symbol: `sym.arrow.r`.
    Symbol(Symbol),
    /// A piece of content.
    Content(Content),
    /// A sequence of values: `(1, "hi", 12pt)`.
    Array(Array),
    /// An insertion-ordered string-keyed map: `(key: "value")`.
    Dict(Dict),
    /// A function.
    Func(Func),
    /// Captured arguments to a function.
    Args(Args),
    /// A type, for instance `int` or `str`.
    Type(Type),
    /// A parsed module.
    Module(EcoString),
    /// A style map.
    Styles(Styles),
    /// A version: `version(0, 1, 2)`.
    Version(Version),
    /// A dynamic value coming from outside the closed type set.
    Dynamic(Dynamic),
}

impl Value {
    /// The name of the value's type, used in diagnostics and type predicates.
    pub fn ty(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Auto => "auto",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Length(_) => "length",
            Value::Angle(_) => "angle",
            Value::Ratio(_) => "ratio",
            Value::Relative(_) => "relative length",
            Value::Fraction(_) => "fraction",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Label(_) => "label",
            Value::Datetime(_) => "datetime",
            Value::Duration(_) => "duration",
            Value::Decimal(_) => "decimal",
            Value::Color(_) => "color",
            Value::Gradient(_) => "gradient",
            Value::Tiling(_) => "tiling",
            Value::Symbol(_) => "symbol",
            Value::Content(_) => "content",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Func(_) => "function",
            Value::Args(_) => "arguments",
            Value::Type(_) => "type",
            Value::Module(_) => "module",
            Value::Styles(_) => "styles",
            Value::Version(_) => "version",
            Value::Dynamic(_) => "dynamic",
        }
    }

    /// Cast to a boolean, typed convenience for style lookups.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Cast to a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Cast to a float, accepting both floats and integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (None, None) | (Auto, Auto) => true,
            (Bool(a), Bool(b)) => a == b,
            // Integers compare equal to floats with identical numeric value.
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => *a as f64 == *b,
            (Str(a), Str(b)) => a == b,
            (Label(a), Label(b)) => a == b,
            (Content(a), Content(b)) => a.repr_eq(b),
            (Array(a), Array(b)) => a == b,
            // Dictionary key order is insertion order but does not affect
            // equality.
            (Dict(a), Dict(b)) => a == b,
            (Version(a), Version(b)) => a == b,
            _ => false,
        }
    }
}

/// An absolute or relative (to font size) length placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

/// An angle, stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(pub f64);

/// A ratio of a whole, stored as a fraction (`1.0` == 100%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio(pub f64);

/// A length plus a ratio: `40% + 2pt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relative {
    pub length: Length,
    pub ratio: Ratio,
}

/// A fraction of remaining space: `1fr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fraction(pub f64);

/// A label identifying an element: `<intro>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub EcoString);

/// A point in time, with a bitmask of which components are set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datetime {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

/// A signed duration with second resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duration(pub i64);

/// An arbitrary-precision decimal number, stored as its canonical string form.
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal(pub EcoString);

/// A color in one of several supported spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Luma(f32),
    Rgb([f32; 4]),
    Cmyk([f32; 4]),
    Hsl([f32; 4]),
    Hsv([f32; 4]),
    LinearRgb([f32; 4]),
    Oklab([f32; 4]),
    Oklch([f32; 4]),
}

/// A gradient between colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient(pub EcoVec<Color>);

/// A repeating pattern fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiling(pub Content);

/// A named symbol with optional modifier variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(pub EcoString);

/// A function value, backed by an opaque callback.
#[derive(Clone)]
pub struct Func(pub Rc<dyn Fn(Args) -> Result<Value, EcoString>>);

impl std::fmt::Debug for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("Func(..)")
    }
}

/// Captured positional and named arguments for a function call.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub span: typst_syntax::Span,
    pub items: Vec<(Option<EcoString>, Value)>,
}

/// A type value, e.g. `int` or `str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Type(pub &'static str);

/// A semantic version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version(pub u32, pub u32, pub u32);

/// A value from outside the closed type set, kept opaque to realization.
#[derive(Clone)]
pub struct Dynamic(pub Rc<dyn std::any::Any>);

impl std::fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("Dynamic(..)")
    }
}
