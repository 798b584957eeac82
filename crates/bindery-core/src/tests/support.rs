//! Shared bindings and helpers for the test suites.

use rstest::fixture;
use serde_json::{Value, json};

use crate::{Action, BindingTree, Context, Declaration, Handler, Payload, ResolverSpec};

/// A handler that always returns `value` as data.
pub(super) fn constant(value: Value) -> Handler {
    Handler::sync(move |_, _| Ok(Payload::Data(value.clone())))
}

/// `/root/a/id:int`: a record carrying the bound id.
fn record() -> Handler {
    Handler::new(|context: Context, _| async move {
        let id = context.get("id").cloned().unwrap_or(Value::Null);
        Ok(Payload::data(json!({ "id": id, "value": "abc" })))
    })
}

/// `/root/a/id:int/property:string`: reads a property of the deferred record.
fn property() -> Handler {
    Handler::sync(|context: Context, _| {
        let name = context.get_str("property").ok_or("property is not bound")?;
        let value = context
            .deferred_data()
            .and_then(|record| record.get(name))
            .cloned()
            .ok_or("deferred record has no such property")?;
        Ok(Payload::Data(value))
    })
}

/// `/root/b/id:string`: echoes the bound id.
fn echo() -> Handler {
    Handler::sync(|context: Context, _| {
        let id = context.get("id").cloned().unwrap_or(Value::Null);
        Ok(Payload::data(json!({ "id": id })))
    })
}

/// `/root/c?orderBy=id`: rows sorted by the requested key.
fn sorted_rows() -> Handler {
    Handler::sync(|context: Context, _| {
        let mut rows: Vec<Value> = [9, 3, 8, 4, 7, 6, 5]
            .into_iter()
            .map(|id| json!({ "id": id }))
            .collect();
        if let Some(key) = context.query_value("orderBy") {
            rows.sort_by_key(|row| row.get(key).and_then(Value::as_i64));
        }
        Ok(Payload::data(rows))
    })
}

/// The declarations shared by most tests.
pub(super) fn sample_declarations() -> Declaration {
    Declaration::list([
        Declaration::binding("/root/a/id:int", record()),
        Declaration::deferred("/root/a/id:int/property:string", property(), true),
        Declaration::binding("/root/b/id:string", echo()),
        Declaration::binding("/root/c?orderBy=id", sorted_rows()),
        Declaration::map([(
            "alternate",
            Declaration::map([
                (
                    "/root/e/f",
                    Declaration::Resolver(ResolverSpec::per_action([(
                        Action::Get,
                        constant(json!("123")),
                    )])),
                ),
                (
                    "/root/e/g",
                    Declaration::Resolver(ResolverSpec::per_action([(
                        Action::Get,
                        constant(json!("321")),
                    )])),
                ),
            ]),
        )]),
    ])
}

/// Builds a tree from `declaration` with default settings.
pub(super) fn build(declaration: Declaration) -> BindingTree {
    let mut builder = BindingTree::builder();
    builder.add(declaration);
    builder.build()
}

#[fixture]
pub(super) fn tree() -> BindingTree {
    build(sample_declarations())
}
