use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use formulate::{
    date, each, each_self, elem, fragment, path, raw, text, var, when, Attribute, DateStyle,
    Engine, ErrorKind, Node, Path, Predicate, Style, Template,
};

struct StaticDoc;

impl Template for StaticDoc {
    type Context = ();

    fn build(&self) -> Node<()> {
        elem("div")
            .child(elem("p").child(text("Text")))
            .into()
    }
}

#[test]
fn render_static_document() {
    let html = Engine::new().render_static(&StaticDoc).unwrap();
    assert_eq!(html, "<div><p>Text</p></div>");
}

#[test]
fn render_is_deterministic() {
    let engine = Engine::new();
    let first = engine.render_static(&StaticDoc).unwrap();
    let second = engine.render_static(&StaticDoc).unwrap();
    assert_eq!(first, second);
}

struct Snippet {
    html: String,
}

struct Escaped;

impl Template for Escaped {
    type Context = Snippet;

    fn build(&self) -> Node<Snippet> {
        elem("p").child(var(&path!(Snippet => html))).into()
    }
}

struct Unescaped;

impl Template for Unescaped {
    type Context = Snippet;

    fn build(&self) -> Node<Snippet> {
        elem("p").child(raw(&path!(Snippet => html))).into()
    }
}

#[test]
fn render_variable_escapes_by_default() {
    let ctx = Snippet {
        html: String::from("<b>"),
    };
    let html = Engine::new().render(&Escaped, &ctx).unwrap();
    assert_eq!(html, "<p>&lt;b&gt;</p>");
}

#[test]
fn render_variable_verbatim_when_unsafe() {
    let ctx = Snippet {
        html: String::from("<b>"),
    };
    let html = Engine::new().render(&Unescaped, &ctx).unwrap();
    assert_eq!(html, "<p><b></p>");
}

#[derive(Clone)]
struct Person {
    age: i64,
}

struct AgeCopy;

impl Template for AgeCopy {
    type Context = Person;

    fn build(&self) -> Node<Person> {
        let age = path!(Person => age);
        when(age.less_than(20), vec!["child".into()])
            .else_when(age.greater_than(20), vec!["older".into()])
            .otherwise(vec!["growing".into()])
    }
}

#[test]
fn render_conditional_chain() {
    let engine = Engine::new();
    assert_eq!(engine.render(&AgeCopy, &Person { age: 25 }).unwrap(), "older");
    assert_eq!(engine.render(&AgeCopy, &Person { age: 10 }).unwrap(), "child");
    assert_eq!(engine.render(&AgeCopy, &Person { age: 20 }).unwrap(), "growing");
}

static LATER_ARMS_EVALUATED: AtomicUsize = AtomicUsize::new(0);

struct ShortCircuit;

impl Template for ShortCircuit {
    type Context = ();

    fn build(&self) -> Node<()> {
        let counted = Predicate::new("counted", |_: &()| {
            LATER_ARMS_EVALUATED.fetch_add(1, Ordering::SeqCst);
            true
        });
        when(Predicate::new("yes", |_: &()| true), vec!["first".into()])
            .else_when(counted, vec!["second".into()])
            .otherwise(vec!["third".into()])
    }
}

#[test]
fn render_conditional_short_circuits() {
    let html = Engine::new().render_static(&ShortCircuit).unwrap();
    assert_eq!(html, "first");
    assert_eq!(LATER_ARMS_EVALUATED.load(Ordering::SeqCst), 0);
}

struct NoMatch;

impl Template for NoMatch {
    type Context = ();

    fn build(&self) -> Node<()> {
        elem("div")
            .child(Node::from(when(
                Predicate::new("no", |_: &()| false),
                vec!["body".into()],
            )))
            .into()
    }
}

#[test]
fn render_conditional_without_else_renders_nothing() {
    let html = Engine::new().render_static(&NoMatch).unwrap();
    assert_eq!(html, "<div></div>");
}

#[derive(Clone)]
struct Item {
    name: String,
}

struct Listing {
    items: Vec<Item>,
}

struct ItemList;

impl Template for ItemList {
    type Context = Listing;

    fn build(&self) -> Node<Listing> {
        elem("ul")
            .child(each(
                &path!(Listing => items),
                vec![elem("li").child(var(&path!(Item => name))).into()],
            ))
            .into()
    }
}

#[test]
fn render_loop_over_empty_sequence() {
    let ctx = Listing { items: Vec::new() };
    let html = Engine::new().render(&ItemList, &ctx).unwrap();
    assert_eq!(html, "<ul></ul>");
}

#[test]
fn render_loop_in_source_order() {
    let ctx = Listing {
        items: ["a", "b", "c"]
            .into_iter()
            .map(|name| Item {
                name: String::from(name),
            })
            .collect(),
    };
    let html = Engine::new().render(&ItemList, &ctx).unwrap();
    assert_eq!(html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
}

struct SelfList;

impl Template for SelfList {
    type Context = Vec<String>;

    fn build(&self) -> Node<Vec<String>> {
        each_self(vec![elem("li")
            .child(var(&Path::<String, String>::identity()))
            .into()])
    }
}

#[test]
fn render_self_loop() {
    let ctx = vec![String::from("x"), String::from("y")];
    let html = Engine::new().render(&SelfList, &ctx).unwrap();
    assert_eq!(html, "<li>x</li><li>y</li>");
}

#[derive(Clone)]
struct Field {
    id: String,
    placeholder: Option<String>,
    required: bool,
}

struct Input;

impl Template for Input {
    type Context = Field;

    fn build(&self) -> Node<Field> {
        let placeholder = Path::optional("placeholder", |f: &Field| f.placeholder.clone());
        let required = Path::new("required", |f: &Field| f.required);
        elem("input")
            .attr(Attribute::bound("id", &path!(Field => id)))
            .attr(Attribute::bound_optional("placeholder", &placeholder))
            .attr(Attribute::flag("required").when(required.equals(true)))
            .void()
            .into()
    }
}

#[test]
fn render_attributes_full() {
    let ctx = Field {
        id: String::from("name"),
        placeholder: Some(String::from("Your \"name\"")),
        required: true,
    };
    let html = Engine::new().render(&Input, &ctx).unwrap();
    assert_eq!(
        html,
        "<input id=\"name\" placeholder=\"Your &quot;name&quot;\" required>"
    );
}

#[test]
fn render_attributes_absent_and_false_predicated_are_omitted() {
    let ctx = Field {
        id: String::from("name"),
        placeholder: None,
        required: false,
    };
    let html = Engine::new().render(&Input, &ctx).unwrap();
    assert_eq!(html, "<input id=\"name\">");
}

struct MaybeTitle {
    title: Option<String>,
}

struct ForcedTitle;

impl Template for ForcedTitle {
    type Context = MaybeTitle;

    fn build(&self) -> Node<MaybeTitle> {
        let title = Path::optional("title", |c: &MaybeTitle| c.title.clone());
        elem("h1").child(var(&title)).into()
    }
}

#[test]
fn render_forced_optional_projection_fails() {
    let err = Engine::new()
        .render(&ForcedTitle, &MaybeTitle { title: None })
        .unwrap_err();
    assert_eq!(
        *err.kind(),
        ErrorKind::InvalidPath {
            path: String::from("title")
        }
    );
}

#[derive(Clone)]
struct Event {
    at: DateTime<Utc>,
}

struct EventLine;

impl Template for EventLine {
    type Context = Event;

    fn build(&self) -> Node<Event> {
        fragment(vec![
            date(&path!(Event => at), DateStyle::pattern("%Y-%m-%d")),
            text(" / "),
            date(&path!(Event => at), DateStyle::styled(Style::Medium, Style::None)),
        ])
    }
}

#[test]
fn render_dates() {
    let ctx = Event {
        at: Utc.with_ymd_and_hms(2020, 1, 2, 12, 0, 0).unwrap(),
    };
    let html = Engine::new().render(&EventLine, &ctx).unwrap();
    assert_eq!(html, "2020-01-02 / Jan 2, 2020");
}
