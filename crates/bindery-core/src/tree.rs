//! The binding tree and its builder.

use std::collections::BTreeMap;

use bindery_pattern::{Datatype, Element, Pattern, QuerySchema};
use tracing::{debug, error, warn};

use crate::BUILD_TARGET;
use crate::action::Action;
use crate::declaration::{Declaration, FlatBinding, flatten};
use crate::defer::DeferFlags;
use crate::error::BuildError;
use crate::resolver::Resolver;

/// A declared pattern attached to a terminal node.
#[derive(Debug, Clone)]
pub struct Binding {
    name: Option<String>,
    pattern: Pattern,
    defer: DeferFlags,
}

impl Binding {
    /// Returns the declaration name, when the binding was declared in a
    /// named group.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the parsed pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the normalized defer flags.
    #[must_use]
    pub const fn defer(&self) -> DeferFlags {
        self.defer
    }

    /// Returns `true` when the binding defers `action` to an ancestor.
    #[must_use]
    pub const fn defers(&self, action: Action) -> bool {
        self.defer.defers(action)
    }
}

/// One node of the binding tree.
///
/// Literal children are keyed by segment name and identifier children by
/// datatype, in separate maps. An identifier child records the name its
/// matched value is bound under.
#[derive(Debug, Clone, Default)]
pub struct BindingNode {
    children: BTreeMap<String, BindingNode>,
    identifiers: BTreeMap<Datatype, BindingNode>,
    id_name: Option<String>,
    binding: Option<Binding>,
    resolver: Option<Resolver>,
    query: Option<QuerySchema>,
}

impl BindingNode {
    /// Returns the literal child named `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Self> {
        self.children.get(segment)
    }

    /// Returns the identifier child for `datatype`.
    #[must_use]
    pub fn identifier(&self, datatype: Datatype) -> Option<&Self> {
        self.identifiers.get(&datatype)
    }

    /// Iterates over literal children in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.children
            .iter()
            .map(|(segment, node)| (segment.as_str(), node))
    }

    /// Iterates over identifier children in datatype order.
    pub fn identifiers(&self) -> impl Iterator<Item = (Datatype, &Self)> {
        self.identifiers
            .iter()
            .map(|(datatype, node)| (*datatype, node))
    }

    /// Returns the names of the literal children.
    #[must_use]
    pub fn item_names(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    /// Returns the name an identifier node binds its value under.
    #[must_use]
    pub fn id_name(&self) -> Option<&str> {
        self.id_name.as_deref()
    }

    /// Returns the binding of a terminal node.
    #[must_use]
    pub const fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Returns the compiled resolver of a terminal node.
    #[must_use]
    pub const fn resolver(&self) -> Option<&Resolver> {
        self.resolver.as_ref()
    }

    /// Returns the query schema declared by the terminal pattern.
    #[must_use]
    pub const fn query(&self) -> Option<&QuerySchema> {
        self.query.as_ref()
    }

    /// Returns `true` when a binding is attached.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}

/// A declaration dropped while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBinding {
    name: Option<String>,
    pattern: Option<String>,
    reason: BuildError,
}

impl SkippedBinding {
    pub(crate) const fn new(
        name: Option<String>,
        pattern: Option<String>,
        reason: BuildError,
    ) -> Self {
        Self {
            name,
            pattern,
            reason,
        }
    }

    /// Returns the declaration name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the pattern text, if the declaration had one.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns why the declaration was dropped.
    #[must_use]
    pub const fn reason(&self) -> &BuildError {
        &self.reason
    }
}

/// An immutable binding tree.
#[derive(Debug, Clone, Default)]
pub struct BindingTree {
    root: BindingNode,
    skipped: Vec<SkippedBinding>,
}

impl BindingTree {
    /// Starts building a tree.
    #[must_use]
    pub fn builder() -> TreeBuilder {
        TreeBuilder::new()
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> &BindingNode {
        &self.root
    }

    /// Returns the declarations dropped during construction.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedBinding] {
        &self.skipped
    }
}

/// Builds a [`BindingTree`] from declarations.
///
/// Declarations that cannot be bound are logged, recorded as
/// [`SkippedBinding`]s and otherwise ignored; construction never fails.
///
/// # Examples
///
/// ```
/// use bindery_core::{BindingTree, Declaration, Handler, Payload};
///
/// let mut builder = BindingTree::builder();
/// builder.add(Declaration::binding(
///     "/root/a/id:int",
///     Handler::sync(|_, _| Ok(Payload::Empty)),
/// ));
/// let tree = builder.build();
/// assert!(tree.root().child("root").is_some());
/// assert!(tree.skipped().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: BindingNode,
    skipped: Vec<SkippedBinding>,
    strict_identifiers: bool,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects bindings that would rename an existing identifier slot.
    ///
    /// By default the later name wins and a warning is logged.
    #[must_use]
    pub const fn strict_identifiers(mut self, strict: bool) -> Self {
        self.strict_identifiers = strict;
        self
    }

    /// Adds every binding in `declaration`.
    pub fn add(&mut self, declaration: Declaration) -> &mut Self {
        for flattened in flatten(declaration) {
            let outcome = flattened.and_then(|flat| {
                let name = flat.name.clone();
                let pattern = flat.path.clone();
                self.insert(flat)
                    .map_err(|reason| SkippedBinding::new(name, Some(pattern), reason))
            });
            if let Err(skipped) = outcome {
                self.skip(skipped);
            }
        }
        self
    }

    /// Finishes construction.
    #[must_use]
    pub fn build(self) -> BindingTree {
        BindingTree {
            root: self.root,
            skipped: self.skipped,
        }
    }

    fn skip(&mut self, skipped: SkippedBinding) {
        error!(
            target: BUILD_TARGET,
            name = skipped.name().unwrap_or_default(),
            pattern = skipped.pattern().unwrap_or_default(),
            reason = %skipped.reason(),
            "skipping binding"
        );
        self.skipped.push(skipped);
    }

    fn insert(&mut self, flat: FlatBinding) -> Result<(), BuildError> {
        let FlatBinding {
            name,
            path,
            resolver,
            defer,
        } = flat;
        let pattern = Pattern::parse(&path)?;

        for renamed in self.check(&pattern)? {
            warn!(
                target: BUILD_TARGET,
                pattern = %pattern,
                conflict = %renamed,
                "identifier renamed by later binding"
            );
        }

        let node = self.node_mut(&pattern);
        node.resolver = Some(Resolver::compile(resolver));
        node.query = pattern.query().cloned();
        node.binding = Some(Binding {
            name,
            pattern,
            defer: defer.normalize(),
        });
        debug!(target: BUILD_TARGET, pattern = %path, "bound pattern");
        Ok(())
    }

    /// Walks the existing nodes along `pattern` without mutating them.
    ///
    /// Returns the identifier renames the binding would cause.
    fn check(&self, pattern: &Pattern) -> Result<Vec<BuildError>, BuildError> {
        let mut renames = Vec::new();
        let mut current = Some(&self.root);

        for element in pattern.elements() {
            let Some(node) = current else {
                break;
            };
            current = match element {
                Element::Segment { name } => node.child(name),
                Element::Identifier { id, datatype } => {
                    let slot = node.identifier(*datatype);
                    let existing = slot.and_then(BindingNode::id_name);
                    if let Some(previous) = existing.filter(|previous| *previous != id.as_str()) {
                        let conflict = BuildError::conflicting_identifier(
                            pattern.source(),
                            *datatype,
                            previous,
                            id.as_str(),
                        );
                        if self.strict_identifiers {
                            return Err(conflict);
                        }
                        renames.push(conflict);
                    }
                    slot
                }
            };
        }

        if let Some(existing) = current.and_then(BindingNode::binding) {
            return Err(BuildError::duplicate_binding(
                pattern.source(),
                existing.pattern().source(),
            ));
        }
        Ok(renames)
    }

    fn node_mut(&mut self, pattern: &Pattern) -> &mut BindingNode {
        pattern
            .elements()
            .iter()
            .fold(&mut self.root, |node, element| match element {
                Element::Segment { name } => node.children.entry(name.clone()).or_default(),
                Element::Identifier { id, datatype } => {
                    let slot = node.identifiers.entry(*datatype).or_default();
                    slot.id_name = Some(id.clone());
                    slot
                }
            })
    }
}
