//! Classification and snapshot tests for auris-a11y
//!
//! Runs the classifier and tree builder over parsed markup.

use auris_a11y::{build_tree, Classifier, Coords, Formatter, Role, Snapshot, State};
use auris_dom::{Document, NodeId, ShadowRootMode};

fn parse(html: &str) -> Document {
    auris_html::parse(html).expect("markup parses")
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap_or_else(|| panic!("no element #{id}"))
}

fn node_for<'a>(snapshot: &'a Snapshot, doc: &Document, id: &str) -> &'a auris_a11y::AccessibleNode {
    let el = by_id(doc, id);
    snapshot.iter().find(|n| n.element == el).unwrap_or_else(|| panic!("#{id} not in snapshot"))
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_aria_label_takes_precedence() {
    let doc = parse(r#"
        <span id="other">Referenced</span>
        <button id="b" aria-label="  Close dialog  ">X <img src="x.png" alt="icon"></button>
        <a id="a" href="/" aria-label="Home" aria-labelledby="other">Start page</a>
        <h2 id="h" aria-label="Overview">Chapter 1</h2>
        <input id="i" title="Tip" placeholder="Type" aria-label="Query">
    "#);
    let classifier = Classifier::default();
    for (id, expected) in [("b", "Close dialog"), ("a", "Home"), ("h", "Overview"), ("i", "Query")] {
        assert_eq!(classifier.classify(&doc, by_id(&doc, id)).name, expected, "#{id}");
    }
}

#[test]
fn test_generic_elements_take_explicit_names() {
    let doc = parse(r#"
        <span id="lbl">Volume</span>
        <div id="close" tabindex="0" aria-label="Close">X</div>
        <div id="vol" aria-labelledby="lbl"></div>
        <div id="drag" tabindex="0" title="Drag handle"></div>
        <div id="tip" title="Tip"></div>
    "#);
    let classifier = Classifier::default();
    for (id, expected) in [("close", "Close"), ("vol", "Volume"), ("drag", "Drag handle"), ("tip", "")] {
        assert_eq!(classifier.classify(&doc, by_id(&doc, id)).name, expected, "#{id}");
    }

    let snapshot = build_tree(&doc);
    let close = node_for(&snapshot, &doc, "close");
    assert_eq!(close.name, "Close");
}

#[test]
fn test_name_sources_in_order() {
    let doc = parse(r#"
        <p id="l1">Billing</p><p id="l2">address</p>
        <input id="by-ref" aria-labelledby="l1 missing l2">
        <label for="by-label">Full name</label><input id="by-label">
        <label>Age <input id="wrapped" type="number"></label>
        <img id="alt" src="cat.png" alt="A cat">
        <button id="content">Save <img src="disk.png" alt="to disk"></button>
        <input id="placeholder" placeholder="Search the site">
        <div id="titled" role="note" title="Remember this"></div>
        <input id="submit" type="submit">
    "#);
    let classifier = Classifier::default();
    for (id, expected) in [
        ("by-ref", "Billing address"),
        ("by-label", "Full name"),
        ("wrapped", "Age"),
        ("alt", "A cat"),
        ("content", "Save to disk"),
        ("placeholder", "Search the site"),
        ("titled", "Remember this"),
        ("submit", "Submit"),
    ] {
        assert_eq!(classifier.classify(&doc, by_id(&doc, id)).name, expected, "#{id}");
    }
}

#[test]
fn test_content_name_skips_hidden_and_script() {
    let doc = parse(r#"
        <a id="a" href="/x">Visible <span hidden>secret</span><span style="display: none">gone</span><script>var x;</script>text</a>
    "#);
    let node = Classifier::default().classify(&doc, by_id(&doc, "a"));
    assert_eq!(node.name, "Visible text");
}

#[test]
fn test_long_names_truncated() {
    let long = "word ".repeat(40);
    let doc = parse(&format!(r#"<button id="b">{long}</button>"#));
    let name = Classifier::default().classify(&doc, by_id(&doc, "b")).name;
    assert_eq!(name.chars().count(), 141);
    assert!(name.ends_with('…'));

    let short = Classifier::new(10).classify(&doc, by_id(&doc, "b")).name;
    assert_eq!(short, "word word …");
}

#[test]
fn test_description_sources() {
    let doc = parse(r#"
        <span id="hint">Eight characters minimum</span>
        <input id="pw" type="password" aria-label="Password" aria-describedby="hint">
        <button id="t" title="Opens in a new window">Help</button>
        <button id="same" title="Print">Print</button>
    "#);
    let classifier = Classifier::default();
    assert_eq!(classifier.classify(&doc, by_id(&doc, "pw")).description.as_deref(), Some("Eight characters minimum"));
    assert_eq!(classifier.classify(&doc, by_id(&doc, "t")).description.as_deref(), Some("Opens in a new window"));
    assert_eq!(classifier.classify(&doc, by_id(&doc, "same")).description, None);
}

// ============================================================================
// States and values
// ============================================================================

#[test]
fn test_checked_controls_never_unchecked() {
    let doc = parse(r#"
        <input id="cb" type="checkbox" checked>
        <input id="radio" type="radio" name="r" checked>
        <input id="switch" type="checkbox" switch checked>
    "#);
    let classifier = Classifier::default();
    for id in ["cb", "radio", "switch"] {
        let node = classifier.classify(&doc, by_id(&doc, id));
        assert!(node.role.voices_unchecked(), "#{id}");
        assert!(node.states.contains(State::Checked), "#{id}");
        assert!(!node.states.contains(State::Unchecked), "#{id}");
    }
}

#[test]
fn test_heading_levels_from_tags() {
    let doc = parse(r#"<h1 id="h1">A</h1><h3 id="h3">B</h3><div id="aria" role="heading">C</div>"#);
    let classifier = Classifier::default();
    let h3 = classifier.classify(&doc, by_id(&doc, "h3"));
    assert!(h3.states.labels().contains(&"level 3".to_string()));
    assert_eq!(classifier.classify(&doc, by_id(&doc, "h1")).states.level(), Some(1));
    assert_eq!(classifier.classify(&doc, by_id(&doc, "aria")).states.level(), Some(2));
}

#[test]
fn test_expanded_and_disabled() {
    let doc = parse(r#"
        <details id="d"><summary id="s">More</summary><p>Body</p></details>
        <fieldset disabled><input id="inside"></fieldset>
        <button id="menu" aria-expanded="true" aria-haspopup="menu">Menu</button>
    "#);
    let classifier = Classifier::default();
    assert_eq!(classifier.classify(&doc, by_id(&doc, "s")).states.labels(), vec!["collapsed"]);
    assert!(classifier.classify(&doc, by_id(&doc, "inside")).states.contains(State::Disabled));
    assert_eq!(classifier.classify(&doc, by_id(&doc, "menu")).states.labels(), vec!["expanded"]);
}

#[test]
fn test_range_values() {
    let doc = parse(r#"
        <div id="slider" role="slider" aria-valuenow="7" aria-valuemin="0" aria-valuemax="10"></div>
        <div id="bar" role="progressbar" aria-valuenow="30" aria-valuemin="20" aria-valuemax="40"></div>
        <div id="bad" role="progressbar" aria-valuenow="5" aria-valuemin="10" aria-valuemax="10"></div>
        <input id="range" type="range" min="0" max="10" value="4">
    "#);
    let classifier = Classifier::default();
    let value = |id: &str| classifier.classify(&doc, by_id(&doc, id)).value;
    assert_eq!(value("slider").as_deref(), Some("7"));
    assert_eq!(value("bar").as_deref(), Some("50%"));
    // an empty range falls back to the bare number
    assert_eq!(value("bad").as_deref(), Some("5"));
    assert_eq!(value("range").as_deref(), Some("4"));
}

// ============================================================================
// Snapshot shape
// ============================================================================

#[test]
fn test_label_deduplicated() {
    let doc = parse(r#"
        <div>
            <label id="lbl" for="email">Email address</label>
            <input id="email" type="email">
        </div>
        <label id="wrap">Nickname <input id="nick"></label>
    "#);
    let snapshot = build_tree(&doc);
    assert_eq!(node_for(&snapshot, &doc, "email").name, "Email address");
    assert_eq!(node_for(&snapshot, &doc, "nick").name, "Nickname");
    assert_eq!(snapshot.index_of(by_id(&doc, "lbl")), None);
    assert_eq!(snapshot.index_of(by_id(&doc, "wrap")), None);
    assert_eq!(snapshot.len(), 2);
}

#[test]
fn test_unpaired_label_kept() {
    let doc = parse(r#"<label id="lbl" for="nowhere">Orphan</label>"#);
    let snapshot = build_tree(&doc);
    assert_eq!(snapshot.index_of(by_id(&doc, "lbl")), Some(0));
    assert_eq!(snapshot.nodes()[0].role, Role::StaticText);
}

#[test]
fn test_hidden_subtrees_absent() {
    let doc = parse(r#"
        <div id="hidden" aria-hidden="true"><button id="b1">Hidden</button><p>Text</p></div>
        <div inert><button id="b2">Inert</button></div>
        <style>.gone { display: none }</style>
        <section class="gone"><button id="b3">Styled away</button></section>
        <div style="visibility: hidden"><a id="b4" href="/">Invisible</a></div>
        <button id="shown">Shown</button>
    "#);
    let snapshot = build_tree(&doc);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.nodes()[0].name, "Shown");
    for id in ["hidden", "b1", "b2", "b3", "b4"] {
        assert_eq!(snapshot.index_of(by_id(&doc, id)), None, "#{id}");
    }
}

#[test]
fn test_table_coordinates() {
    let doc = parse(r#"
        <table>
            <tr><td>A</td><td>B</td></tr>
            <tr><td>C</td><td id="d">D</td></tr>
        </table>
    "#);
    let snapshot = build_tree(&doc);
    let d = node_for(&snapshot, &doc, "d");
    assert_eq!(d.role, Role::Cell);
    assert_eq!(d.coords, Some(Coords { row: 2, col: 2 }));
}

#[test]
fn test_table_coordinates_with_spans_and_overrides() {
    let doc = parse(r#"
        <table>
            <thead><tr><th>Name</th><th>Qty</th><th>Price</th></tr></thead>
            <tbody>
                <tr><td colspan="2">Widget</td><td id="price">3</td></tr>
                <tr aria-rowindex="10"><td id="far">x</td></tr>
            </tbody>
        </table>
    "#);
    let classifier = Classifier::default();
    assert_eq!(classifier.classify(&doc, by_id(&doc, "price")).coords, Some(Coords { row: 2, col: 3 }));
    assert_eq!(classifier.classify(&doc, by_id(&doc, "far")).coords, Some(Coords { row: 10, col: 1 }));
}

#[test]
fn test_shadow_content_traversed() {
    let mut doc = parse(r#"<p>Before</p><div id="host"></div><p>After</p>"#);
    let host = by_id(&doc, "host");
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    let label = doc.create_element("span");
    doc.append_child(shadow, label).unwrap();
    doc.set_attribute(label, "id", "inner-label").unwrap();
    let text = doc.create_text("Inner");
    doc.append_child(label, text).unwrap();
    let button = doc.create_element("button");
    doc.append_child(shadow, button).unwrap();
    doc.set_attribute(button, "aria-labelledby", "inner-label").unwrap();

    let snapshot = build_tree(&doc);
    let names: Vec<&str> = snapshot.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Before", "Inner", "Inner", "After"]);
    assert_eq!(snapshot.nodes()[2].role, Role::Button);
}

#[test]
fn test_static_text_keeps_wrapper_text() {
    let doc = parse(r#"<div><div id="t">Only text here</div></div>"#);
    let snapshot = build_tree(&doc);
    let node = node_for(&snapshot, &doc, "t");
    assert_eq!(node.role, Role::StaticText);
    assert_eq!(Formatter::default().format(&doc, node).to_string(), "\"Only text here\"");
}

#[test]
fn test_wrapped_text_inside_named_controls_spoken_once() {
    let doc = parse(r#"<a href="/"><span>Home</span></a><button><span>Save</span></button><h2><span>Intro</span></h2>"#);
    let snapshot = build_tree(&doc);
    let formatter = Formatter::default();
    let phrases: Vec<String> = snapshot.iter().map(|n| formatter.format(&doc, n).to_string()).collect();
    assert_eq!(phrases, vec!["\"Home\", link", "\"Save\", button", "\"Intro\", heading level 2"]);
}

#[test]
fn test_named_ancestor_keeps_interactive_and_unspoken_content() {
    let doc = parse(r#"
        <ul><li id="item"><span>Read</span> <a id="more" href="/more">more</a></li></ul>
        <button aria-label="Close"><span>X</span></button>
        <h3 aria-label="Summary"><span id="extra">Chapter one</span></h3>
    "#);
    let snapshot = build_tree(&doc);
    assert_eq!(node_for(&snapshot, &doc, "item").name, "Read more");
    assert_eq!(node_for(&snapshot, &doc, "more").role, Role::Link);
    assert!(!snapshot.iter().any(|n| n.name == "X"), "button content is presentational");
    // heading text that its label does not speak stays reachable
    assert_eq!(node_for(&snapshot, &doc, "extra").role, Role::StaticText);
    assert_eq!(snapshot.iter().filter(|n| n.role == Role::StaticText).count(), 1);
}

#[test]
fn test_list_positions() {
    let doc = parse(r#"<ul><li>A</li><li id="b">B</li><li hidden>C</li></ul>"#);
    let snapshot = build_tree(&doc);
    let b = node_for(&snapshot, &doc, "b");
    assert_eq!(Formatter::default().format(&doc, b).to_string(), "\"B\", list item, 2 of 2");
}

// ============================================================================
// Consistency
// ============================================================================

const RICH_PAGE: &str = r#"
    <header><h1>Shop</h1><nav aria-label="Primary"><a href="/">Home</a><a href="/cart">Cart</a></nav></header>
    <main>
        <h2>Checkout</h2>
        <form aria-label="Checkout">
            <label for="name">Name</label><input id="name" required>
            <label><input type="checkbox" checked> Gift wrap</label>
            <select aria-label="Country"><option>France</option><option selected>Spain</option></select>
            <input type="password" aria-label="PIN" value="1234">
            <progress value="3" max="4" aria-label="Step"></progress>
            <button>Pay</button>
        </form>
        <table><tr><th>Item</th><th>Price</th></tr><tr><td>Tea</td><td>4</td></tr></table>
        <ul><li>One</li><li>Two</li></ul>
        <img src="logo.png" alt="Logo"><hr>
    </main>
    <footer>Contact</footer>
"#;

#[test]
fn test_round_trip_matches_direct_classification() {
    let doc = parse(RICH_PAGE);
    let snapshot = build_tree(&doc);
    assert!(snapshot.len() > 15);
    let classifier = Classifier::default();
    for node in snapshot.iter() {
        assert_eq!(&classifier.classify(&doc, node.element), node);
    }
}

#[test]
fn test_build_is_idempotent() {
    let doc = parse(RICH_PAGE);
    let first = build_tree(&doc);
    let second = build_tree(&doc);
    assert_eq!(first.nodes(), second.nodes());
}

#[test]
fn test_snapshot_serializes() {
    let doc = parse(RICH_PAGE);
    let json = serde_json::to_value(build_tree(&doc)).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    let pin = nodes.iter().find(|n| n["name"] == "PIN").unwrap();
    assert_eq!(pin["role"], "textbox");
    assert_eq!(pin["value"], auris_a11y::PASSWORD_MASK);
    let step = nodes.iter().find(|n| n["name"] == "Step").unwrap();
    assert_eq!(step["value"], "75%");
}
