//! Walk a page with the virtual cursor and print what would be spoken.
//!
//! Usage: `cargo run -p auris-engine --example walkthrough [page.html]`
//! Set `RUST_LOG=auris_a11y=debug` to watch snapshot builds.

use std::time::Instant;

use anyhow::Context;
use auris_engine::{Config, Direction, Engine, Page, Role, Rotor};
use tracing_subscriber::EnvFilter;

const DEMO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Checkout</title></head>
<body>
  <nav aria-label="Main"><a href="/">Home</a> <a href="/cart">Cart</a></nav>
  <main>
    <h1>Checkout</h1>
    <form>
      <label for="email">Email</label>
      <input id="email" type="email" required>
      <label><input type="checkbox" checked> Send receipts</label>
      <select aria-label="Shipping"><option>Standard</option><option selected>Express</option></select>
      <button type="submit">Place order</button>
    </form>
    <progress value="3" max="4" aria-label="Steps"></progress>
    <div role="status"></div>
  </main>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let html = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEMO_PAGE.to_string(),
    };

    let engine = Engine::new(Config::default())?;
    let mut page = engine.load_html(&html)?;
    page.enable();

    println!("# {}", page.title());
    println!("{}", page.snapshot_json()?);

    println!("\n# Linear walk");
    for _ in 0..page.snapshot().len() {
        page.next();
        print_last(&page);
    }

    println!("\n# Headings");
    page.first();
    if page.reader().current().is_some_and(|n| n.role == Role::Heading) {
        print_last(&page);
    }
    while page.seek(Direction::Next, Rotor::Headings) {
        print_last(&page);
    }
    // the "no next heading" hint
    print_last(&page);

    // Activate the submit button to hear validation feedback
    page.first();
    if page.seek(Direction::Next, Rotor::Buttons) {
        page.activate(Instant::now());
        println!("\n# Activate");
        for entry in page.log().iter().take(2).collect::<Vec<_>>().into_iter().rev() {
            println!("  {}", entry.text);
        }
    }

    Ok(())
}

fn print_last(page: &Page) {
    if let Some(text) = page.last_spoken() {
        println!("  {text}");
    }
}
