//! Unit and behaviour tests for the dispatcher facade.

mod support;
