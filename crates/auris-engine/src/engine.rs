//! Engine - Main entry point

use auris_a11y::{HighlightSink, ScreenReader, SpeechSink};
use auris_html::HtmlParser;

use crate::config::ConfigError;
use crate::{Config, Page};

/// The Auris screen reader engine
#[derive(Debug)]
pub struct Engine {
    config: Config,
    parser: HtmlParser,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        tracing::info!("Auris {} initialized", crate::VERSION);
        Ok(Self { config, parser: HtmlParser::new() })
    }

    /// Parse markup into a page at the configured base URL
    pub fn load_html(&self, html: &str) -> Result<Page, EngineError> {
        self.load_html_with_url(html, &self.config.base_url)
    }

    /// Parse markup into a page at `url`
    pub fn load_html_with_url(&self, html: &str, url: &str) -> Result<Page, EngineError> {
        tracing::info!("Loading: {}", url);
        let document = self.parser.parse_with_url(html, url)?;
        Ok(Page::new(document, self.reader()))
    }

    /// Parse markup and attach speech and highlight collaborators to the page's reader
    pub fn load_html_with_sinks(
        &self,
        html: &str,
        speech: Box<dyn SpeechSink>,
        highlight: Box<dyn HighlightSink>,
    ) -> Result<Page, EngineError> {
        let document = self.parser.parse_with_url(html, &self.config.base_url)?;
        let reader = self.reader().with_speech(speech).with_highlight(highlight);
        Ok(Page::new(document, reader))
    }

    /// Get engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn reader(&self) -> ScreenReader {
        ScreenReader::new(self.config.reader_config())
    }
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Parse error: {0}")]
    Parse(#[from] auris_html::ParseError),

    #[error("DOM error: {0}")]
    Dom(#[from] auris_dom::DomError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
