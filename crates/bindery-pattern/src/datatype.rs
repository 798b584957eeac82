//! Datatype tags shared by pattern identifiers and request tokens.

use strum::{Display, EnumString};

/// Datatype of an identifier element or of a classified request token.
///
/// The ordering of variants is stable so identifier children can be kept in
/// ordered maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Datatype {
    /// A value that parses as a signed 64-bit integer.
    Int,
    /// A finite numeric value that is not an integer.
    Number,
    /// Any other token.
    String,
}

impl Datatype {
    /// All datatypes in declaration order.
    pub const ALL: [Self; 3] = [Self::Int, Self::Number, Self::String];

    /// Infers the datatype of a raw request token.
    ///
    /// Tokens that parse as `i64` are [`Datatype::Int`], tokens that parse as
    /// a finite `f64` are [`Datatype::Number`], and everything else is a
    /// [`Datatype::String`].
    ///
    /// Classification is strict: `1.5` and `1e3` are numbers, not integers,
    /// so they never match an `int` identifier. A leading-digit prefix such
    /// as `12px` is a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_pattern::Datatype;
    ///
    /// assert_eq!(Datatype::classify("42"), Datatype::Int);
    /// assert_eq!(Datatype::classify("4.2"), Datatype::Number);
    /// assert_eq!(Datatype::classify("1e3"), Datatype::Number);
    /// assert_eq!(Datatype::classify("value"), Datatype::String);
    /// ```
    #[must_use]
    pub fn classify(token: &str) -> Self {
        if token.parse::<i64>().is_ok() {
            return Self::Int;
        }
        match token.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number,
            _ => Self::String,
        }
    }

    /// Returns the canonical tag used in pattern text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}
