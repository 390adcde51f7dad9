//! Integration tests - Full pipeline from markup to narration
//!
//! Tests the complete workflow: HTML → Document → Snapshot → Cursor → Speech

use std::time::{Duration, Instant};

use auris_a11y::{HighlightRecorder, Politeness, SpeechRecorder, Utterance};
use auris_engine::{Config, Direction, Engine, NarrationKind, Page, Role, Rotor, WatchEvent};

const MS: Duration = Duration::from_millis(1);

const STORE: &str = r#"
    <!DOCTYPE html>
    <html>
        <head><title>Store</title></head>
        <body>
            <nav aria-label="Main"><a href="/">Home</a></nav>
            <main>
                <h1>Products</h1>
                <ul><li>Tea</li><li>Coffee</li></ul>
                <input id="qty" type="number" aria-label="Quantity" value="2">
                <div id="status" role="status"></div>
            </main>
        </body>
    </html>
"#;

fn load(html: &str) -> Page {
    let engine = Engine::new(Config::default()).expect("default config is valid");
    let mut page = engine.load_html(html).expect("markup parses");
    page.enable();
    page
}

// ============================================================================
// FULL PIPELINE TESTS
// ============================================================================

#[test]
fn test_html_to_snapshot() {
    let page = load(STORE);
    assert_eq!(page.title(), "Store");
    assert!(page.reader().is_enabled());

    let roles: Vec<Role> = page.snapshot().iter().map(|n| n.role).collect();
    assert_eq!(roles.first(), Some(&Role::Navigation));
    assert!(roles.contains(&Role::Heading));
    assert!(roles.contains(&Role::SpinButton));
    assert_eq!(roles.iter().filter(|r| **r == Role::ListItem).count(), 2);
}

#[test]
fn test_walk_and_seek() {
    let mut page = load(STORE);
    assert!(page.seek(Direction::Next, Rotor::Headings));
    assert_eq!(page.last_spoken(), Some("\"Products\", heading level 1"));

    assert!(page.seek(Direction::Previous, Rotor::Links));
    assert_eq!(page.last_spoken(), Some("\"Home\", link"));

    assert!(!page.seek(Direction::Previous, Rotor::Tables));
    assert_eq!(page.last_spoken(), Some("no previous table"));
    assert_eq!(page.log().latest().map(|e| e.kind), Some(NarrationKind::Hint));
}

#[test]
fn test_snapshot_json() {
    let page = load(STORE);
    let json: serde_json::Value = serde_json::from_str(&page.snapshot_json().unwrap()).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), page.snapshot().len());
    assert!(nodes.iter().any(|n| n["role"] == "heading" && n["name"] == "Products"));
}

// ============================================================================
// PAGE INTERACTION TESTS
// ============================================================================

#[test]
fn test_page_script_feeds_live_region() {
    let mut page = load(STORE);
    let status = page.element_by_id("status").unwrap();
    let start = Instant::now();

    page.mutate(start, |doc| doc.set_text_content(status, "Added to cart")).unwrap();
    assert!(page.poll(start + 50 * MS).is_empty());

    let events = page.poll(start + 150 * MS);
    assert!(events.contains(&WatchEvent::Alert {
        region: status,
        text: "Added to cart".to_string(),
        politeness: Politeness::Polite,
    }));
    assert_eq!(page.last_spoken(), Some("Added to cart"));
}

#[test]
fn test_typing_echo() {
    let mut page = load(STORE);
    let qty = page.element_by_id("qty").unwrap();
    let start = Instant::now();

    page.type_text(qty, "5", start).unwrap();
    page.poll(start + 100 * MS);
    assert_ne!(page.last_spoken(), Some("5"));
    page.poll(start + 800 * MS);
    assert_eq!(page.last_spoken(), Some("5"));
}

#[test]
fn test_native_focus_follows() {
    let mut page = load(STORE);
    let qty = page.element_by_id("qty").unwrap();
    assert!(page.focus(qty));
    assert_eq!(page.reader().current().map(|n| n.element), Some(qty));
    assert_eq!(page.last_spoken(), Some("\"Quantity\", spin button, 2"));
}

#[test]
fn test_script_focus_moves_cursor() {
    let mut page = load(STORE);
    let qty = page.element_by_id("qty").unwrap();
    let start = Instant::now();
    page.first();

    assert!(page.mutate(start, |doc| doc.focus(qty)));
    page.poll(start + 2000 * MS);
    let expected = page.snapshot().index_of(qty);
    assert!(expected.is_some());
    assert_eq!(page.reader().cursor(), expected);
    assert_eq!(page.last_spoken(), Some("\"Quantity\", spin button, 2"));
}

#[test]
fn test_sinks_receive_output() {
    let speech = SpeechRecorder::new();
    let highlight = HighlightRecorder::new();
    let engine = Engine::new(Config::default()).unwrap();
    let mut page = engine
        .load_html_with_sinks(STORE, Box::new(speech.clone()), Box::new(highlight.clone()))
        .unwrap();
    page.enable();
    page.first();

    assert_eq!(speech.spoken(), vec!["\"Main\", navigation landmark".to_string()]);
    assert_eq!(highlight.current(), page.reader().highlighted());

    page.disable();
    assert_eq!(speech.utterances().last(), Some(&Utterance::Cancelled));
    assert_eq!(highlight.current(), None);
}

// ============================================================================
// CONFIGURATION TESTS
// ============================================================================

#[test]
fn test_config_reaches_reader() {
    let engine = Engine::new(Config::new().with_separator(" | ").with_log_capacity(2)).unwrap();
    let mut page = engine.load_html(STORE).unwrap();
    page.enable();
    page.seek(Direction::Next, Rotor::Headings);
    assert_eq!(page.last_spoken(), Some("\"Products\" | heading level 1"));

    page.next();
    page.next();
    assert_eq!(page.log().len(), 2);
}
