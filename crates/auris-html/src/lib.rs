//! Auris HTML Parser
//!
//! HTML5 front end built on html5ever. Produces an `auris_dom::Document`
//! with author `<style>` rules loaded and declarative shadow roots attached.

mod parser;

pub use parser::HtmlParser;

use auris_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
