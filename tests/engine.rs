use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use formulate::{clear_formula_cache, elem, localize, text, Engine, Node, Template};

static BUILDS: AtomicUsize = AtomicUsize::new(0);

struct Counted;

impl Template for Counted {
    type Context = ();

    fn build(&self) -> Node<()> {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        elem("p").child(text("cached")).into()
    }
}

#[test]
fn formula_is_compiled_once_and_cached() {
    let engine = Engine::new();
    let first = engine.render_static(&Counted).unwrap();
    let builds_after_first = BUILDS.load(Ordering::SeqCst);
    let second = engine.render_static(&Counted).unwrap();
    assert_eq!(first, second);
    assert_eq!(BUILDS.load(Ordering::SeqCst), builds_after_first);

    clear_formula_cache();
    engine.render_static(&Counted).unwrap();
    assert!(BUILDS.load(Ordering::SeqCst) > builds_after_first);
}

struct Shared;

impl Template for Shared {
    type Context = u32;

    fn build(&self) -> Node<u32> {
        elem("b")
            .child(formulate::var(&formulate::Path::identity()))
            .into()
    }
}

#[test]
fn concurrent_renders_share_one_formula() {
    let handles: Vec<_> = (0..8)
        .map(|n| {
            thread::spawn(move || Engine::new().render(&Shared, &n).unwrap())
        })
        .collect();
    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("<b>{n}</b>"));
    }
}

struct Failing;

impl Template for Failing {
    type Context = ();

    fn build(&self) -> Node<()> {
        elem("p").child(localize("nope")).into()
    }
}

#[test]
fn render_to_writer_commits_nothing_on_failure() {
    let mut out = Vec::new();
    let err = Engine::new().render_to_writer(&mut out, &Failing, &());
    assert!(err.is_err());
    assert!(out.is_empty());
}

struct Writable;

impl Template for Writable {
    type Context = ();

    fn build(&self) -> Node<()> {
        elem("p").child(text("ok")).into()
    }
}

#[test]
fn render_to_writer_flushes_completed_output() {
    let mut out = Vec::new();
    Engine::new()
        .render_to_writer(&mut out, &Writable, &())
        .unwrap();
    assert_eq!(out, b"<p>ok</p>");
}
