use formulate::{
    elem, localize, localize_record, localize_with, params, path, Catalog, Engine, ErrorKind,
    Node, Path, Template,
};
use serde::Serialize;

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert("en", "title", "The title");
    catalog.insert("en", "greeting", "Hello {name}!");
    catalog.insert("en", "unread", "{name} has {count} unread messages");
    catalog.insert("en", "strong", "<strong>Notice</strong>");
    catalog.insert("sv", "greeting", "Hej {name}!");
    catalog
}

struct Title;

impl Template for Title {
    type Context = ();

    fn build(&self) -> Node<()> {
        elem("h1").child(localize("title")).into()
    }
}

#[test]
fn localize_without_params() {
    let engine = Engine::new().with_localizer(catalog());
    assert_eq!(engine.render_static(&Title).unwrap(), "<h1>The title</h1>");
}

struct LiteralGreeting;

impl Template for LiteralGreeting {
    type Context = ();

    fn build(&self) -> Node<()> {
        localize_with("greeting", params! { name: "Mats" })
    }
}

#[test]
fn localize_with_literal_params() {
    let engine = Engine::new().with_localizer(catalog());
    assert_eq!(engine.render_static(&LiteralGreeting).unwrap(), "Hello Mats!");
}

#[derive(Clone, Serialize)]
struct Inbox {
    name: String,
    count: i64,
}

struct Mailbox {
    inbox: Inbox,
}

struct UnreadLine;

impl Template for UnreadLine {
    type Context = Mailbox;

    fn build(&self) -> Node<Mailbox> {
        localize_record("unread", &path!(Mailbox => inbox))
    }
}

#[test]
fn localize_with_record_params() {
    let engine = Engine::new().with_localizer(catalog());
    let ctx = Mailbox {
        inbox: Inbox {
            name: String::from("Mats"),
            count: 3,
        },
    };
    assert_eq!(
        engine.render(&UnreadLine, &ctx).unwrap(),
        "Mats has 3 unread messages"
    );
}

struct MissingEntry;

impl Template for MissingEntry {
    type Context = ();

    fn build(&self) -> Node<()> {
        localize("no-such-key")
    }
}

#[test]
fn localize_missing_key_aborts_the_render() {
    let engine = Engine::new().with_localizer(catalog());
    let err = engine.render_static(&MissingEntry).unwrap_err();
    assert_eq!(
        *err.kind(),
        ErrorKind::MissingLocalizationKey {
            key: String::from("no-such-key"),
            locale: String::from("en"),
        }
    );
}

#[test]
fn localize_without_resolver_is_a_missing_key() {
    let err = Engine::new().render_static(&Title).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MissingLocalizationKey { .. }
    ));
}

struct TrustedCopy;

impl Template for TrustedCopy {
    type Context = ();

    fn build(&self) -> Node<()> {
        elem("p").child(localize("strong")).into()
    }
}

#[test]
fn localized_copy_is_not_escaped() {
    let engine = Engine::new().with_localizer(catalog());
    assert_eq!(
        engine.render_static(&TrustedCopy).unwrap(),
        "<p><strong>Notice</strong></p>"
    );
}

// A template-declared locale path overrides the engine default.

struct Session {
    lang: String,
}

struct LocalizedGreeting;

impl Template for LocalizedGreeting {
    type Context = Session;

    fn build(&self) -> Node<Session> {
        localize_with("greeting", params! { name: "Mats" })
    }

    fn locale(&self) -> Option<Path<Session, String>> {
        Some(path!(Session => lang))
    }
}

#[test]
fn template_locale_path_overrides_engine_default() {
    let engine = Engine::new().with_localizer(catalog());
    let sv = Session {
        lang: String::from("sv"),
    };
    let en = Session {
        lang: String::from("en"),
    };
    assert_eq!(engine.render(&LocalizedGreeting, &sv).unwrap(), "Hej Mats!");
    assert_eq!(engine.render(&LocalizedGreeting, &en).unwrap(), "Hello Mats!");
}
