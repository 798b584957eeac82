//! Unit and behaviour tests for tree construction and path resolution.

mod dispatch_unit;
mod support;
