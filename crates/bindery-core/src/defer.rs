//! Per-action defer flags.
//!
//! A binding that defers an action asks the dispatcher to run the nearest
//! non-deferring ancestor first and hand its result to the binding's own
//! handler through [`Context::deferred`](crate::Context::deferred).

use std::collections::BTreeMap;

use crate::action::Action;

/// Defer declaration as written by the caller.
///
/// `all` sets the default for every action; per-action entries override it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferSpec {
    all: Option<bool>,
    actions: BTreeMap<Action, bool>,
}

impl DeferSpec {
    /// Creates a declaration that defers nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a declaration that defers every action.
    #[must_use]
    pub fn all() -> Self {
        Self::from(true)
    }

    /// Overrides the flag for one action.
    #[must_use]
    pub fn action(mut self, action: Action, defer: bool) -> Self {
        self.actions.insert(action, defer);
        self
    }

    /// Resolves the declaration into one flag per action.
    #[must_use]
    pub fn normalize(&self) -> DeferFlags {
        let default = self.all.unwrap_or(false);
        Action::ALL
            .into_iter()
            .filter(|action| self.actions.get(action).copied().unwrap_or(default))
            .collect()
    }
}

impl From<bool> for DeferSpec {
    fn from(all: bool) -> Self {
        Self {
            all: Some(all),
            actions: BTreeMap::new(),
        }
    }
}

/// Normalized defer flags, one per action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeferFlags {
    bits: u8,
}

impl DeferFlags {
    const fn bit(action: Action) -> u8 {
        match action {
            Action::Get => 1,
            Action::Set => 1 << 1,
            Action::Add => 1 << 2,
            Action::Del => 1 << 3,
            Action::Inc => 1 << 4,
            Action::Dec => 1 << 5,
            Action::Run => 1 << 6,
        }
    }

    /// Returns `true` when `action` is deferred.
    #[must_use]
    pub const fn defers(self, action: Action) -> bool {
        self.bits & Self::bit(action) != 0
    }

    /// Returns `true` when no action is deferred.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl FromIterator<Action> for DeferFlags {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let bits = iter
            .into_iter()
            .fold(0, |bits, action| bits | Self::bit(action));
        Self { bits }
    }
}
