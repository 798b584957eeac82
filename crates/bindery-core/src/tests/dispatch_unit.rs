//! Resolver dispatch and payload tests.

use std::io;

use futures::executor::block_on;
use futures::stream;
use rstest::rstest;
use serde_json::json;

use super::support::{constant, tree};
use crate::{
    Action, BindingTree, ByteStream, Context, Handler, HandlerError, Payload, Protocol, Resolver,
    ResolveError, ResolverSpec,
};

fn read_only() -> Resolver {
    Resolver::compile(ResolverSpec::single(constant(json!("value"))))
}

#[test]
fn dispatch_defaults_to_the_data_protocol() {
    let result = block_on(read_only().dispatch(Action::Get, None, Context::new(), Payload::Empty))
        .expect("dispatch");
    assert_eq!(result, Payload::data("value"));
}

#[test]
fn action_without_handlers_is_undefined() {
    let error = block_on(read_only().dispatch(Action::Add, None, Context::new(), Payload::Empty))
        .expect_err("add is not handled");
    assert!(matches!(
        error,
        ResolveError::UndefinedAction {
            action: Action::Add
        }
    ));
}

#[test]
fn protocol_without_handler_is_undefined() {
    let error = block_on(read_only().dispatch(
        Action::Get,
        Some(Protocol::Buffer),
        Context::new(),
        Payload::Empty,
    ))
    .expect_err("buffer is not handled");
    assert_eq!(error.kind(), "undefined_protocol");
    assert_eq!(error.to_string(), "undefined protocol: buffer for action get");
}

#[test]
fn handler_errors_pass_through_unchanged() {
    let failing = Resolver::compile(ResolverSpec::single(Handler::sync(|_, _| {
        Err(HandlerError::new(io::Error::new(
            io::ErrorKind::NotFound,
            "no such file",
        )))
    })));
    let error = block_on(failing.dispatch(Action::Get, None, Context::new(), Payload::Empty))
        .expect_err("handler fails");

    assert_eq!(error.to_string(), "no such file");
    let ResolveError::Handler(inner) = error else {
        panic!("expected a handler error");
    };
    assert_eq!(
        inner.downcast_ref::<io::Error>().map(io::Error::kind),
        Some(io::ErrorKind::NotFound)
    );
}

#[test]
fn handler_receives_context_and_value() {
    let resolver = Resolver::compile(ResolverSpec::per_action([(
        Action::Run,
        Handler::sync(|context: Context, args: Payload| {
            let bound = context.get_i64("value").ok_or("value is not bound")?;
            let offset = args
                .as_data()
                .and_then(|data| data.get("value"))
                .and_then(serde_json::Value::as_i64)
                .ok_or("missing argument")?;
            Ok(Payload::data(bound + offset))
        }),
    )]));
    let result = block_on(resolver.dispatch(
        Action::Run,
        None,
        Context::new().with_value("value", 5),
        Payload::data(json!({ "value": 5 })),
    ))
    .expect("run");
    assert_eq!(result, Payload::data(10));
}

#[rstest]
fn deferred_ancestor_result_feeds_the_leaf(tree: BindingTree) {
    let resolution = tree
        .resolve("/root/a/1/value", Action::Get, &Context::new())
        .expect("resolve");
    let ancestor = resolution.deferred().expect("deferred candidate");
    let leaf = resolution.resolver().expect("leaf resolver");
    let mut context = resolution.into_context();

    let record = block_on(ancestor.dispatch(Action::Get, None, context.clone(), Payload::Empty))
        .expect("ancestor");
    assert_eq!(record, Payload::data(json!({ "id": 1, "value": "abc" })));

    context.set_deferred(record);
    let value = block_on(leaf.dispatch(Action::Get, None, context, Payload::Empty)).expect("leaf");
    assert_eq!(value, Payload::data("abc"));
}

#[test]
fn byte_stream_is_consumed_once() {
    let handle = ByteStream::from_chunks(vec![b"ab".to_vec(), b"cd".to_vec()]);
    let shared = handle.clone();
    assert!(!shared.is_consumed());

    let bytes = block_on(handle.read_to_end()).expect("read");
    assert_eq!(bytes, b"abcd");
    assert!(shared.is_consumed());
    assert!(block_on(shared.read_to_end()).is_err());
}

#[test]
fn byte_stream_surfaces_chunk_errors() {
    let handle = ByteStream::new(stream::iter(vec![
        Ok(b"ok".to_vec()),
        Err(io::Error::other("broken pipe")),
    ]));
    let error = block_on(handle.read_to_end()).expect_err("chunk error");
    assert_eq!(error.to_string(), "broken pipe");
}

#[test]
fn payload_accessors_match_variants() {
    let handle = ByteStream::from_chunks(Vec::new());
    let streamed = Payload::from(handle.clone());
    assert_eq!(streamed, Payload::Stream(handle));
    assert!(streamed.as_stream().is_some());
    assert_eq!(Payload::from(vec![1, 2]).as_buffer(), Some(&[1_u8, 2][..]));
    assert!(Payload::default().is_empty());
    assert_eq!(Payload::data(3).into_data(), Some(json!(3)));
    assert_ne!(Payload::Buffer(Vec::new()), Payload::Empty);
}
