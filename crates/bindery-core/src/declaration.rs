//! Binding declarations and their normalization into flat bindings.
//!
//! Callers may declare bindings one at a time, as lists, or as nested maps.
//! Map keys starting with `/` are patterns whose value is the resolver (or a
//! binding without its own path); any other key names a nested group and is
//! only used in diagnostics. [`flatten`] turns any of these shapes into a
//! list of `(pattern, resolver, defer)` triples before the tree is touched.

use crate::defer::DeferSpec;
use crate::error::BuildError;
use crate::resolver::ResolverSpec;
use crate::tree::SkippedBinding;

const PATTERN_KEY_PREFIX: char = '/';
const NAME_SEPARATOR: char = '.';

/// A single binding declaration.
#[derive(Debug, Clone, Default)]
pub struct BindingDecl {
    path: Option<String>,
    resolver: Option<ResolverSpec>,
    defer: DeferSpec,
}

impl BindingDecl {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pattern text.
    #[must_use]
    pub fn path(mut self, pattern: impl Into<String>) -> Self {
        self.path = Some(pattern.into());
        self
    }

    /// Sets the resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: impl Into<ResolverSpec>) -> Self {
        self.resolver = Some(resolver.into());
        self
    }

    /// Sets the defer declaration.
    #[must_use]
    pub fn defer(mut self, defer: impl Into<DeferSpec>) -> Self {
        self.defer = defer.into();
        self
    }
}

/// Any accepted declaration shape.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// One binding.
    Binding(BindingDecl),
    /// A bare resolver, valid only under a `/`-prefixed map key.
    Resolver(ResolverSpec),
    /// A sequence of declarations.
    List(Vec<Declaration>),
    /// Keyed declarations, kept in declaration order.
    Map(Vec<(String, Declaration)>),
}

impl Declaration {
    /// Declares `pattern` bound to `resolver`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::{Declaration, Handler, Payload};
    ///
    /// let declaration = Declaration::binding(
    ///     "/root/b/id:string",
    ///     Handler::sync(|_, _| Ok(Payload::Empty)),
    /// );
    /// assert!(matches!(declaration, Declaration::Binding(_)));
    /// ```
    pub fn binding(pattern: impl Into<String>, resolver: impl Into<ResolverSpec>) -> Self {
        Self::Binding(BindingDecl::new().path(pattern).resolver(resolver))
    }

    /// Declares `pattern` bound to `resolver` with a defer declaration.
    pub fn deferred(
        pattern: impl Into<String>,
        resolver: impl Into<ResolverSpec>,
        defer: impl Into<DeferSpec>,
    ) -> Self {
        Self::Binding(
            BindingDecl::new()
                .path(pattern)
                .resolver(resolver)
                .defer(defer),
        )
    }

    /// Declares a sequence.
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Declares a keyed map.
    pub fn map<K>(entries: impl IntoIterator<Item = (K, Self)>) -> Self
    where
        K: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }
}

impl From<BindingDecl> for Declaration {
    fn from(binding: BindingDecl) -> Self {
        Self::Binding(binding)
    }
}

impl From<ResolverSpec> for Declaration {
    fn from(resolver: ResolverSpec) -> Self {
        Self::Resolver(resolver)
    }
}

impl From<Vec<Self>> for Declaration {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

/// A normalized binding ready for insertion.
#[derive(Debug, Clone)]
pub(crate) struct FlatBinding {
    pub(crate) name: Option<String>,
    pub(crate) path: String,
    pub(crate) resolver: ResolverSpec,
    pub(crate) defer: DeferSpec,
}

/// Normalizes a declaration into flat bindings, in declaration order.
///
/// Declarations that cannot be normalized are returned as skipped entries in
/// the same sequence.
pub(crate) fn flatten(declaration: Declaration) -> Vec<Result<FlatBinding, SkippedBinding>> {
    let mut out = Vec::new();
    flatten_into(declaration, None, &mut out);
    out
}

fn flatten_into(
    declaration: Declaration,
    name: Option<String>,
    out: &mut Vec<Result<FlatBinding, SkippedBinding>>,
) {
    match declaration {
        Declaration::List(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten_into(item, Some(join_name(name.as_deref(), &index.to_string())), out);
            }
        }
        Declaration::Map(entries) => {
            for (key, value) in entries {
                let entry_name = join_name(name.as_deref(), &key);
                if key.starts_with(PATTERN_KEY_PREFIX) {
                    flatten_pattern_entry(key, value, entry_name, out);
                } else {
                    flatten_into(value, Some(entry_name), out);
                }
            }
        }
        Declaration::Binding(binding) => out.push(normalize(binding, name)),
        Declaration::Resolver(_) => {
            let key = name.clone().unwrap_or_default();
            out.push(Err(SkippedBinding::new(
                name,
                None,
                BuildError::unexpected_resolver(key),
            )));
        }
    }
}

fn flatten_pattern_entry(
    key: String,
    value: Declaration,
    name: String,
    out: &mut Vec<Result<FlatBinding, SkippedBinding>>,
) {
    match value {
        Declaration::Resolver(resolver) => out.push(Ok(FlatBinding {
            name: Some(name),
            path: key,
            resolver,
            defer: DeferSpec::default(),
        })),
        Declaration::Binding(binding) => {
            let keyed = if binding.path.is_some() {
                binding
            } else {
                binding.path(key)
            };
            out.push(normalize(keyed, Some(name)));
        }
        nested @ (Declaration::List(_) | Declaration::Map(_)) => {
            flatten_into(nested, Some(name), out);
        }
    }
}

fn normalize(binding: BindingDecl, name: Option<String>) -> Result<FlatBinding, SkippedBinding> {
    let BindingDecl {
        path,
        resolver,
        defer,
    } = binding;
    let Some(pattern) = path else {
        return Err(SkippedBinding::new(name, None, BuildError::MissingPath));
    };
    let Some(spec) = resolver else {
        let reason = BuildError::missing_resolver(pattern.as_str());
        return Err(SkippedBinding::new(name, Some(pattern), reason));
    };
    Ok(FlatBinding {
        name,
        path: pattern,
        resolver: spec,
        defer,
    })
}

fn join_name(parent: Option<&str>, child: &str) -> String {
    parent.map_or_else(
        || child.to_owned(),
        |prefix| format!("{prefix}{NAME_SEPARATOR}{child}"),
    )
}
