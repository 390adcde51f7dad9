//! Computed Style (subset)
//!
//! Only the two properties that decide whether content is rendered at all:
//! `display` and `visibility`. Sources, lowest precedence first: tag
//! defaults, the `hidden` attribute, then the cascade of author rules and
//! the inline `style` attribute (importance, inline, specificity, order).

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute, StyleSheet as CssStyleSheet};
use lightningcss::traits::ToCss;

use crate::{Document, NodeId};

/// Display value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inline,
    Block,
    InlineBlock,
    Flex,
    Grid,
    Table,
    Contents,
    None,
}

impl Display {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Self::Inline,
            "block" | "list-item" | "flow-root" => Self::Block,
            "inline-block" => Self::InlineBlock,
            "flex" | "inline-flex" => Self::Flex,
            "grid" | "inline-grid" => Self::Grid,
            "table" | "inline-table" | "table-row" | "table-cell" | "table-row-group"
            | "table-header-group" | "table-footer-group" => Self::Table,
            "contents" => Self::Contents,
            "none" => Self::None,
            _ => return None,
        })
    }
}

/// Visibility value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "visible" => Self::Visible,
            "hidden" => Self::Hidden,
            "collapse" => Self::Collapse,
            _ => return None,
        })
    }
}

/// Computed style subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
}

impl ComputedStyle {
    /// Whether the element itself renders
    pub fn is_rendered(&self) -> bool {
        self.display != Display::None && self.visibility == Visibility::Visible
    }
}

/// A declared `display` or `visibility` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    Display(Display),
    Visibility(Visibility),
}

/// A declaration with its `!important` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declared {
    pub declaration: Declaration,
    pub important: bool,
}

/// A style rule reduced to compound selectors and the declarations we track
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<CompoundSelector>,
    pub declarations: Vec<Declared>,
}

/// Compound selector of an optional tag, an optional `#id` and any
/// number of `.class`es, e.g. `div.card#main`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

/// (ids, classes, tags)
pub type Specificity = (u32, u32, u32);

impl CompoundSelector {
    /// Parse one serialized selector; combinators, attribute selectors,
    /// pseudo-classes and `*` are not supported
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let valid = |name: &str| !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        let mut selector = Self::default();
        let tag_end = s.find(['.', '#']).unwrap_or(s.len());
        let tag = &s[..tag_end];
        if !tag.is_empty() {
            if !valid(tag) {
                return None;
            }
            selector.tag = Some(tag.to_ascii_lowercase());
        }

        let mut rest = &s[tag_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if !valid(name) {
                return None;
            }
            if marker == '#' {
                if selector.id.is_some() {
                    return None;
                }
                selector.id = Some(name.to_string());
            } else {
                selector.classes.push(name.to_string());
            }
            rest = &body[end..];
        }
        Some(selector)
    }

    pub fn specificity(&self) -> Specificity {
        (
            u32::from(self.id.is_some()),
            self.classes.len() as u32,
            u32::from(self.tag.is_some()),
        )
    }
}

/// Author stylesheet, parsed with lightningcss
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `<style>` block and append the rules that set `display` or
    /// `visibility`. `@media` blocks that always match are flattened, other
    /// conditional blocks are skipped. Returns the number of rules added.
    pub fn add_css(&mut self, css: &str) -> usize {
        let options = ParserOptions { error_recovery: true, ..ParserOptions::default() };
        let sheet = match CssStyleSheet::parse(css, options) {
            Ok(sheet) => sheet,
            Err(error) => {
                tracing::warn!(%error, "stylesheet ignored");
                return 0;
            }
        };
        let before = self.rules.len();
        self.collect(&sheet.rules.0);
        self.rules.len() - before
    }

    fn collect(&mut self, rules: &[CssRule<'_>]) {
        for rule in rules {
            match rule {
                CssRule::Style(style) => {
                    let declarations = declarations(&style.declarations);
                    if declarations.is_empty() {
                        continue;
                    }
                    let selectors: Vec<CompoundSelector> = style.selectors.0.iter()
                        .filter_map(|selector| selector.to_css_string(PrinterOptions::default()).ok())
                        .filter_map(|text| CompoundSelector::parse(&text))
                        .collect();
                    if !selectors.is_empty() {
                        self.rules.push(StyleRule { selectors, declarations });
                    }
                }
                CssRule::Media(media) if media.query.always_matches() => self.collect(&media.rules.0),
                CssRule::Supports(supports) => self.collect(&supports.rules.0),
                _ => {}
            }
        }
    }

    /// Add a single rule
    pub fn add_rule(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// `display` / `visibility` declarations of a block, important ones flagged
fn declarations(block: &DeclarationBlock<'_>) -> Vec<Declared> {
    let normal = block.declarations.iter().map(|p| (p, false));
    let important = block.important_declarations.iter().map(|p| (p, true));
    normal.chain(important)
        .filter_map(|(property, important)| {
            let declaration = match property {
                Property::Display(display) => display.to_css_string(PrinterOptions::default()).ok()
                    .and_then(|text| Display::parse(&text))
                    .map(Declaration::Display),
                Property::Visibility(visibility) => visibility.to_css_string(PrinterOptions::default()).ok()
                    .and_then(|text| Visibility::parse(&text))
                    .map(Declaration::Visibility),
                _ => None,
            }?;
            Some(Declared { declaration, important })
        })
        .collect()
}

/// Parse an inline `style` attribute; unparsable attributes declare nothing
pub fn parse_inline_style(style: &str) -> Vec<Declared> {
    let options = ParserOptions { error_recovery: true, ..ParserOptions::default() };
    match StyleAttribute::parse(style, options) {
        Ok(attribute) => declarations(&attribute.declarations),
        Err(_) => Vec::new(),
    }
}

/// Cascade key: importance, then inline over sheet, then specificity,
/// then source order
type CascadeKey = (bool, bool, Specificity, usize);

#[derive(Default)]
struct Cascade {
    display: Option<(CascadeKey, Display)>,
    visibility: Option<(CascadeKey, Visibility)>,
}

impl Cascade {
    fn apply(&mut self, declared: &Declared, inline: bool, specificity: Specificity, order: usize) {
        let key = (declared.important, inline, specificity, order);
        match declared.declaration {
            Declaration::Display(value) => {
                if self.display.is_none_or(|(current, _)| key >= current) {
                    self.display = Some((key, value));
                }
            }
            Declaration::Visibility(value) => {
                if self.visibility.is_none_or(|(current, _)| key >= current) {
                    self.visibility = Some((key, value));
                }
            }
        }
    }
}

/// Tags never rendered
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "base",
    "noscript", "datalist", "param", "source", "track",
];

impl Document {
    /// Compute display / visibility for an element
    pub fn computed_style(&self, id: NodeId) -> ComputedStyle {
        let Some(elem) = self.element(id) else {
            return ComputedStyle::default();
        };

        let mut display = default_display(&elem.name);
        if elem.name == "dialog" && !elem.has_attr("open") {
            display = Display::None;
        }
        if self.is_hidden_by_closed_details(id) {
            display = Display::None;
        }
        if elem.has_attr("hidden") {
            display = Display::None;
        }

        let mut cascade = Cascade::default();
        for (order, rule) in self.stylesheet.rules.iter().enumerate() {
            let matched = rule.selectors.iter()
                .filter(|s| self.matches_selector(id, s))
                .map(CompoundSelector::specificity)
                .max();
            if let Some(specificity) = matched {
                for declared in &rule.declarations {
                    cascade.apply(declared, false, specificity, order);
                }
            }
        }
        if let Some(style) = elem.get_attr("style") {
            for declared in parse_inline_style(style) {
                cascade.apply(&declared, true, (0, 0, 0), 0);
            }
        }

        let display = cascade.display.map_or(display, |(_, d)| d);
        let visibility = cascade.visibility.map(|(_, v)| v);

        // visibility inherits
        let visibility = match visibility {
            Some(v) => v,
            None => self.parent_element(id)
                .map(|p| self.computed_style(p).visibility)
                .unwrap_or_default(),
        };

        ComputedStyle { display, visibility }
    }

    fn matches_selector(&self, id: NodeId, selector: &CompoundSelector) -> bool {
        let Some(elem) = self.element(id) else {
            return false;
        };
        selector.tag.as_ref().is_none_or(|tag| elem.name == *tag)
            && selector.id.as_ref().is_none_or(|ident| elem.id() == Some(ident.as_str()))
            && selector.classes.iter().all(|class| elem.has_class(class))
    }

    /// Content of a closed <details> other than its first <summary>
    fn is_hidden_by_closed_details(&self, id: NodeId) -> bool {
        let parent = self.tree.get(id).map_or(NodeId::NONE, |n| n.parent);
        if self.tag_name(parent) != Some("details") || self.has_attr(parent, "open") {
            return false;
        }
        let first_summary = self.tree.element_children(parent)
            .find(|&c| self.tag_name(c) == Some("summary"));
        first_summary != Some(id)
    }
}

fn default_display(tag: &str) -> Display {
    if NON_RENDERED_TAGS.contains(&tag) {
        return Display::None;
    }
    match tag {
        "div" | "p" | "section" | "article" | "aside" | "nav" | "main" | "header"
        | "footer" | "ul" | "ol" | "li" | "form" | "fieldset" | "h1" | "h2" | "h3"
        | "h4" | "h5" | "h6" | "figure" | "dialog" | "details" | "summary" | "body"
        | "html" | "hr" | "blockquote" | "pre" | "address" | "dl" | "dt" | "dd" => Display::Block,
        "table" | "tr" | "td" | "th" | "thead" | "tbody" | "tfoot" | "caption" => Display::Table,
        "button" | "input" | "select" | "textarea" | "img" | "progress" | "meter" => Display::InlineBlock,
        _ => Display::Inline,
    }
}
