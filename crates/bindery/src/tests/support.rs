//! A bindery wired with in-memory stores.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use rstest::fixture;
use serde_json::{Map, Value, json};

use crate::{
    Action, Bindery, ByteStream, Context, Declaration, Handler, HandlerError, Payload, Protocol,
    ResolverSpec,
};

type Records = Arc<Mutex<Map<String, Value>>>;
type Files = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

fn bound_id(context: &Context, key: &str) -> Result<String, HandlerError> {
    context
        .get_str(key)
        .map(str::to_owned)
        .ok_or_else(|| HandlerError::msg(format!("{key} is not bound")))
}

fn constant(value: Value) -> Handler {
    Handler::sync(move |_, _| Ok(Payload::Data(value.clone())))
}

fn record() -> Handler {
    Handler::new(|context: Context, _| async move {
        let id = context.get("id").cloned().unwrap_or(Value::Null);
        Ok(Payload::data(json!({ "id": id, "value": "abc" })))
    })
}

fn property() -> Handler {
    Handler::sync(|context: Context, _| {
        let name = bound_id(&context, "property")?;
        let value = context
            .deferred_data()
            .and_then(|record| record.get(&name))
            .cloned()
            .ok_or("deferred record has no such property")?;
        Ok(Payload::Data(value))
    })
}

fn echo() -> Handler {
    Handler::sync(|context: Context, _| {
        let id = context.get("id").cloned().unwrap_or(Value::Null);
        Ok(Payload::data(json!({ "id": id })))
    })
}

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

/// `/root/d/id:string`: a keyed record store.
fn records(store: &Records) -> ResolverSpec {
    let reader = Arc::clone(store);
    let writer = Arc::clone(store);
    let remover = Arc::clone(store);
    ResolverSpec::per_action([
        (
            Action::Get,
            Handler::sync(move |context: Context, _| {
                let id = bound_id(&context, "id")?;
                let data = reader.lock().unwrap_or_else(PoisonError::into_inner);
                Ok(Payload::Data(data.get(&id).cloned().unwrap_or(Value::Null)))
            }),
        ),
        (
            Action::Set,
            Handler::sync(move |context: Context, value: Payload| {
                let id = bound_id(&context, "id")?;
                let stored = value.into_data().ok_or("only data can be stored")?;
                writer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(id, stored);
                Ok(Payload::data(true))
            }),
        ),
        (
            Action::Del,
            Handler::sync(move |context: Context, _| {
                let id = bound_id(&context, "id")?;
                let removed = remover
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
                Ok(Payload::data(removed.is_some()))
            }),
        ),
    ])
}

/// `/root/files/name:string`: a byte store served as buffers and streams.
fn files(store: &Files) -> ResolverSpec {
    let buffer_reader = Arc::clone(store);
    let buffer_writer = Arc::clone(store);
    let stream_reader = Arc::clone(store);
    let stream_writer = Arc::clone(store);
    let remover = Arc::clone(store);
    ResolverSpec::per_action_protocol([
        (
            Action::Get,
            Protocol::Buffer,
            Handler::sync(move |context: Context, _| {
                let name = bound_id(&context, "name")?;
                let files = buffer_reader.lock().unwrap_or_else(PoisonError::into_inner);
                let bytes = files.get(&name).cloned().ok_or("no such file")?;
                Ok(Payload::Buffer(bytes))
            }),
        ),
        (
            Action::Set,
            Protocol::Buffer,
            Handler::sync(move |context: Context, value: Payload| {
                let name = bound_id(&context, "name")?;
                let bytes = value.as_buffer().ok_or("expected a buffer")?.to_vec();
                buffer_writer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(name, bytes);
                Ok(Payload::data(true))
            }),
        ),
        (
            Action::Get,
            Protocol::Stream,
            Handler::sync(move |context: Context, _| {
                let name = bound_id(&context, "name")?;
                let files = stream_reader.lock().unwrap_or_else(PoisonError::into_inner);
                let bytes = files.get(&name).ok_or("no such file")?;
                let chunks = bytes.chunks(2).map(<[u8]>::to_vec).collect();
                Ok(Payload::Stream(ByteStream::from_chunks(chunks)))
            }),
        ),
        (
            Action::Set,
            Protocol::Stream,
            Handler::new(move |context: Context, value: Payload| {
                let store = Arc::clone(&stream_writer);
                async move {
                    let name = bound_id(&context, "name")?;
                    let source = value.as_stream().ok_or("expected a stream")?;
                    let bytes = source.read_to_end().await?;
                    store
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(name, bytes);
                    Ok(Payload::data(true))
                }
            }),
        ),
        (
            Action::Del,
            Protocol::Data,
            Handler::sync(move |context: Context, _| {
                let name = bound_id(&context, "name")?;
                let removed = remover
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&name);
                Ok(Payload::data(removed.is_some()))
            }),
        ),
    ])
}

/// `/root/function/value:int`: adds the argument to the bound value.
fn adder() -> ResolverSpec {
    ResolverSpec::per_action([(
        Action::Run,
        Handler::sync(|context: Context, args: Payload| {
            let bound = context.get_i64("value").ok_or("value is not bound")?;
            let operand = args
                .as_data()
                .and_then(Value::as_i64)
                .ok_or("expected an integer argument")?;
            Ok(Payload::data(bound + operand))
        }),
    )])
}

/// Every declaration used by the facade tests, plus the stores behind them.
pub(super) struct Fixture {
    pub(super) bindery: Bindery,
    pub(super) records: Records,
    pub(super) files: Files,
}

pub(super) fn declarations(records_store: &Records, files_store: &Files) -> Declaration {
    Declaration::list([
        Declaration::binding("/root/a/id:int", record()),
        Declaration::deferred("/root/a/id:int/property:string", property(), true),
        Declaration::binding("/root/b/id:string", echo()),
        Declaration::binding("/root/c?orderBy=id", sorted_rows()),
        Declaration::binding("/root/d/id:string", records(records_store)),
        Declaration::binding("/root/files/name:string", files(files_store)),
        Declaration::binding("/root/function/value:int", adder()),
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
                    Declaration::Resolver(ResolverSpec::single(constant(json!("321")))),
                ),
            ]),
        )]),
    ])
}

#[fixture]
pub(super) fn fixture() -> Fixture {
    let mut seed = Map::new();
    seed.insert("a".to_owned(), json!("hello"));
    let records_store: Records = Arc::new(Mutex::new(seed));
    let files_store: Files = Arc::new(Mutex::new(BTreeMap::new()));
    let bindery = Bindery::builder()
        .bind(declarations(&records_store, &files_store))
        .build();
    Fixture {
        bindery,
        records: records_store,
        files: files_store,
    }
}

#[fixture]
pub(super) fn bindery(fixture: Fixture) -> Bindery {
    fixture.bindery
}
