//! Actions and protocols that index a resolver matrix.

use strum::{Display, EnumString};

/// The verb of an operation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Action {
    /// Read a value.
    #[default]
    Get,
    /// Replace a value.
    Set,
    /// Add a value to a collection.
    Add,
    /// Delete a value.
    Del,
    /// Increase a value.
    Inc,
    /// Decrease a value.
    Dec,
    /// Run the bound function with arguments.
    Run,
}

impl Action {
    /// All actions in matrix order.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Set,
        Self::Add,
        Self::Del,
        Self::Inc,
        Self::Dec,
        Self::Run,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Add => "add",
            Self::Del => "del",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Run => "run",
        }
    }
}

/// The representation requested for a value.
///
/// Request paths select a protocol through their URL scheme, for example
/// `buffer:///files/logo.png`. Paths without a scheme use [`Protocol::Data`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Protocol {
    /// Structured data.
    #[default]
    Data,
    /// Raw bytes held in memory.
    Buffer,
    /// Bytes delivered incrementally.
    Stream,
    /// Change notifications.
    Notify,
}

impl Protocol {
    /// All protocols in matrix order.
    pub const ALL: [Self; 4] = [Self::Data, Self::Buffer, Self::Stream, Self::Notify];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Buffer => "buffer",
            Self::Stream => "stream",
            Self::Notify => "notify",
        }
    }
}
