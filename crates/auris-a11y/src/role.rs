//! Roles
//!
//! The role vocabulary exposed in snapshots, its spoken labels, and the
//! capability tag the classifier dispatches on.

use serde::{Deserialize, Serialize};

/// Semantic role of a reportable node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    // === Landmarks ===
    Banner,
    Complementary,
    ContentInfo,
    Form,
    Main,
    Navigation,
    Region,
    Search,

    // === Widgets ===
    Button,
    Checkbox,
    Combobox,
    Grid,
    GridCell,
    Link,
    ListBox,
    Menu,
    MenuBar,
    MenuItem,
    MenuItemCheckbox,
    MenuItemRadio,
    Option,
    ProgressBar,
    Radio,
    RadioGroup,
    ScrollBar,
    SearchBox,
    Slider,
    SpinButton,
    Switch,
    Tab,
    TabList,
    TabPanel,
    TextBox,
    Tree,
    TreeGrid,
    TreeItem,
    Meter,

    // === Document structure ===
    Article,
    Cell,
    ColumnHeader,
    Figure,
    Generic,
    Group,
    Heading,
    Img,
    List,
    ListItem,
    Note,
    Presentation,
    Row,
    RowGroup,
    RowHeader,
    Separator,
    StaticText,
    Table,
    Toolbar,
    Tooltip,

    // === Live regions ===
    Alert,
    Log,
    Marquee,
    Status,
    Timer,

    // === Windows ===
    AlertDialog,
    Dialog,
}

/// Live region politeness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    Off,
    Polite,
    Assertive,
}

impl Politeness {
    /// Parse an `aria-live` value; unknown values mean off
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "polite" => Self::Polite,
            "assertive" => Self::Assertive,
            _ => Self::Off,
        }
    }
}

impl Role {
    /// Parse one token of a `role` attribute
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "banner" => Self::Banner,
            "complementary" => Self::Complementary,
            "contentinfo" => Self::ContentInfo,
            "form" => Self::Form,
            "main" => Self::Main,
            "navigation" => Self::Navigation,
            "region" => Self::Region,
            "search" => Self::Search,

            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "combobox" => Self::Combobox,
            "grid" => Self::Grid,
            "gridcell" => Self::GridCell,
            "link" => Self::Link,
            "listbox" => Self::ListBox,
            "menu" => Self::Menu,
            "menubar" => Self::MenuBar,
            "menuitem" => Self::MenuItem,
            "menuitemcheckbox" => Self::MenuItemCheckbox,
            "menuitemradio" => Self::MenuItemRadio,
            "option" => Self::Option,
            "progressbar" => Self::ProgressBar,
            "radio" => Self::Radio,
            "radiogroup" => Self::RadioGroup,
            "scrollbar" => Self::ScrollBar,
            "searchbox" => Self::SearchBox,
            "slider" => Self::Slider,
            "spinbutton" => Self::SpinButton,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "textbox" => Self::TextBox,
            "tree" => Self::Tree,
            "treegrid" => Self::TreeGrid,
            "treeitem" => Self::TreeItem,
            "meter" => Self::Meter,

            "article" => Self::Article,
            "cell" => Self::Cell,
            "columnheader" => Self::ColumnHeader,
            "figure" => Self::Figure,
            "generic" => Self::Generic,
            "group" => Self::Group,
            "heading" => Self::Heading,
            "img" | "image" => Self::Img,
            "list" => Self::List,
            "listitem" => Self::ListItem,
            "note" => Self::Note,
            "none" | "presentation" => Self::Presentation,
            "row" => Self::Row,
            "rowgroup" => Self::RowGroup,
            "rowheader" => Self::RowHeader,
            "separator" => Self::Separator,
            "table" => Self::Table,
            "toolbar" => Self::Toolbar,
            "tooltip" => Self::Tooltip,

            "alert" => Self::Alert,
            "log" => Self::Log,
            "marquee" => Self::Marquee,
            "status" => Self::Status,
            "timer" => Self::Timer,

            "alertdialog" => Self::AlertDialog,
            "dialog" => Self::Dialog,

            _ => return None,
        })
    }

    /// Vocabulary string, as authored in a `role` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Complementary => "complementary",
            Self::ContentInfo => "contentinfo",
            Self::Form => "form",
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Region => "region",
            Self::Search => "search",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Combobox => "combobox",
            Self::Grid => "grid",
            Self::GridCell => "gridcell",
            Self::Link => "link",
            Self::ListBox => "listbox",
            Self::Menu => "menu",
            Self::MenuBar => "menubar",
            Self::MenuItem => "menuitem",
            Self::MenuItemCheckbox => "menuitemcheckbox",
            Self::MenuItemRadio => "menuitemradio",
            Self::Option => "option",
            Self::ProgressBar => "progressbar",
            Self::Radio => "radio",
            Self::RadioGroup => "radiogroup",
            Self::ScrollBar => "scrollbar",
            Self::SearchBox => "searchbox",
            Self::Slider => "slider",
            Self::SpinButton => "spinbutton",
            Self::Switch => "switch",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::TextBox => "textbox",
            Self::Tree => "tree",
            Self::TreeGrid => "treegrid",
            Self::TreeItem => "treeitem",
            Self::Meter => "meter",
            Self::Article => "article",
            Self::Cell => "cell",
            Self::ColumnHeader => "columnheader",
            Self::Figure => "figure",
            Self::Generic => "generic",
            Self::Group => "group",
            Self::Heading => "heading",
            Self::Img => "img",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Note => "note",
            Self::Presentation => "presentation",
            Self::Row => "row",
            Self::RowGroup => "rowgroup",
            Self::RowHeader => "rowheader",
            Self::Separator => "separator",
            Self::StaticText => "statictext",
            Self::Table => "table",
            Self::Toolbar => "toolbar",
            Self::Tooltip => "tooltip",
            Self::Alert => "alert",
            Self::Log => "log",
            Self::Marquee => "marquee",
            Self::Status => "status",
            Self::Timer => "timer",
            Self::AlertDialog => "alertdialog",
            Self::Dialog => "dialog",
        }
    }

    /// Spoken label. `None` for roles that are never voiced.
    pub fn label(&self) -> Option<&'static str> {
        Some(match self {
            Self::Banner => "banner landmark",
            Self::Complementary => "complementary landmark",
            Self::ContentInfo => "content information landmark",
            Self::Form => "form landmark",
            Self::Main => "main landmark",
            Self::Navigation => "navigation landmark",
            Self::Region => "region landmark",
            Self::Search => "search landmark",
            Self::Checkbox => "checkbox",
            Self::Combobox => "combo box",
            Self::GridCell | Self::Cell => "cell",
            Self::ListBox => "list box",
            Self::MenuBar => "menu bar",
            Self::MenuItem => "menu item",
            Self::MenuItemCheckbox => "menu item checkbox",
            Self::MenuItemRadio => "menu item radio",
            Self::ProgressBar => "progress bar",
            Self::Radio => "radio button",
            Self::RadioGroup => "radio group",
            Self::ScrollBar => "scroll bar",
            Self::SearchBox => "search edit text",
            Self::SpinButton => "spin button",
            Self::TabList => "tab list",
            Self::TabPanel => "tab panel",
            Self::TextBox => "edit text",
            Self::TreeGrid => "tree grid",
            Self::TreeItem => "tree item",
            Self::ColumnHeader => "column header",
            Self::RowHeader => "row header",
            Self::RowGroup => "row group",
            Self::Img => "image",
            Self::ListItem => "list item",
            Self::AlertDialog => "alert dialog",
            Self::Generic | Self::Presentation | Self::StaticText => return None,
            other => other.as_str(),
        })
    }

    /// Landmark roles
    pub fn is_landmark(&self) -> bool {
        matches!(self,
            Self::Banner | Self::Complementary | Self::ContentInfo |
            Self::Form | Self::Main | Self::Navigation | Self::Region | Self::Search
        )
    }

    /// Interactive widget roles
    pub fn is_widget(&self) -> bool {
        matches!(self,
            Self::Button | Self::Checkbox | Self::Combobox | Self::Grid |
            Self::GridCell | Self::Link | Self::ListBox | Self::Menu |
            Self::MenuBar | Self::MenuItem | Self::MenuItemCheckbox |
            Self::MenuItemRadio | Self::Option | Self::ProgressBar |
            Self::Radio | Self::RadioGroup | Self::ScrollBar | Self::SearchBox |
            Self::Slider | Self::SpinButton | Self::Switch | Self::Tab |
            Self::TabList | Self::TabPanel | Self::TextBox | Self::Tree |
            Self::TreeGrid | Self::TreeItem | Self::Meter
        )
    }

    /// Roles carrying a tri-state checked value
    pub fn is_checkable(&self) -> bool {
        matches!(self,
            Self::Checkbox | Self::Radio | Self::Switch |
            Self::MenuItemCheckbox | Self::MenuItemRadio
        )
    }

    /// Roles for which "unchecked" is voiced
    pub fn voices_unchecked(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio | Self::Switch)
    }

    /// Roles whose checked or selected state is spoken before the name
    pub fn leads_with_state(&self) -> bool {
        self.is_checkable() || matches!(self, Self::Option | Self::Tab)
    }

    /// Text-entry roles
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::TextBox | Self::SearchBox | Self::SpinButton)
    }

    /// Roles that are meaningful even without a name
    pub fn is_self_contained(&self) -> bool {
        matches!(self, Self::Img | Self::Figure | Self::Separator)
    }

    /// Roles without semantics of their own
    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic | Self::Presentation)
    }

    /// Roles whose descendants are presentational: their text only ever
    /// feeds the element's own name
    pub fn children_presentational(&self) -> bool {
        matches!(self,
            Self::Button | Self::Link | Self::Checkbox | Self::Radio | Self::Switch |
            Self::Tab | Self::MenuItemCheckbox | Self::MenuItemRadio | Self::Option |
            Self::Img | Self::ProgressBar | Self::Meter | Self::Slider | Self::Separator
        )
    }

    /// Text inside a named node of this role is spoken as part of that name.
    /// Live and dialog containers keep their inner text as separate nodes.
    pub fn absorbs_text(&self) -> bool {
        self.names_from_content()
            && !matches!(self, Self::Dialog | Self::AlertDialog | Self::Status | Self::Alert)
    }

    /// Roles whose name may be computed from descendant content
    pub fn names_from_content(&self) -> bool {
        matches!(self,
            Self::Button | Self::Link | Self::Heading | Self::ListItem |
            Self::Cell | Self::GridCell | Self::ColumnHeader | Self::RowHeader |
            Self::Tab | Self::Dialog | Self::AlertDialog | Self::Status |
            Self::Alert | Self::Checkbox | Self::Radio | Self::Switch |
            Self::MenuItem | Self::MenuItemCheckbox | Self::MenuItemRadio |
            Self::Option | Self::TreeItem | Self::Tooltip
        )
    }

    /// Roles that take part in sibling set positions
    pub fn has_set_position(&self) -> bool {
        matches!(self,
            Self::ListItem | Self::Option | Self::MenuItem | Self::MenuItemCheckbox |
            Self::MenuItemRadio | Self::Tab | Self::TreeItem
        )
    }

    /// Table cell roles
    pub fn is_cell(&self) -> bool {
        matches!(self, Self::Cell | Self::GridCell | Self::ColumnHeader | Self::RowHeader)
    }

    /// Table-like container roles
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Grid | Self::TreeGrid)
    }

    /// Roles that take a range value (aria-valuenow/min/max)
    pub fn is_range(&self) -> bool {
        matches!(self,
            Self::ProgressBar | Self::Meter | Self::Slider | Self::SpinButton | Self::ScrollBar
        )
    }

    /// Implicit live region politeness for live roles
    pub fn implicit_live_region(&self) -> Option<Politeness> {
        match self {
            Self::Alert => Some(Politeness::Assertive),
            Self::Log | Self::Status => Some(Politeness::Polite),
            Self::Marquee | Self::Timer => Some(Politeness::Off),
            _ => None,
        }
    }

    /// Roles that announce their changes without an `aria-live` attribute
    pub fn is_live_by_default(&self) -> bool {
        matches!(self.implicit_live_region(), Some(Politeness::Polite | Politeness::Assertive))
    }
}

/// Capability tag computed before any role-specific work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Widgets and anything focusable
    Interactive,
    /// Text carriers: headings, static text, list items, cells
    TextLike,
    /// Containers without text of their own
    Structural,
    /// Images, figures and embedded media
    Media,
    /// Landmark regions
    Landmark,
}

impl NodeKind {
    /// Tag a node from its resolved role, tag and focusability
    pub fn of(role: Role, tag: &str, focusable: bool) -> Self {
        if role.is_landmark() {
            Self::Landmark
        } else if matches!(role, Role::Img | Role::Figure)
            || matches!(tag, "img" | "video" | "audio" | "canvas" | "svg" | "picture")
        {
            Self::Media
        } else if role.is_widget() || focusable {
            Self::Interactive
        } else if role.names_from_content() || matches!(role, Role::StaticText | Role::Note) {
            Self::TextLike
        } else {
            Self::Structural
        }
    }
}
