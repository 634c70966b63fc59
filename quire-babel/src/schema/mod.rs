//! Node schema registry
//!
//! Every node and mark type of a quire document is declared here, once, as a
//! closed enum. Each tag resolves (by a plain `match`) to a static [`NodeSpec`]
//! describing its group, content constraint, `defining` flag and attribute
//! contract. There is no runtime registration: the schema is read-only data.
//!
//! Attribute values never reach a [`Node`](crate::model::Node) unnormalized.
//! [`normalize_attrs`] is the single entry point used by the HTML parser, the
//! JSON format and the programmatic builders:
//!
//! | Attribute           | Rule                                                        |
//! |---------------------|-------------------------------------------------------------|
//! | `callout.type`      | empty → default; outside the domain → `info`                |
//! | `heading.level`     | integer 1..=6, otherwise default                            |
//! | `tab.title`         | empty → `"New Tab"`                                         |
//! | `codeBlock.title`   | empty → `""`                                                |
//! | `codeBlock.language`| empty → unset (`null`, auto-detect downstream)              |

pub mod callout;
pub mod content;
pub mod languages;

pub use callout::CalloutType;
pub use content::{validate, ContentConstraint, SchemaError};
pub use languages::LanguageTable;

use crate::model::Attrs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Coarse classification used by content constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGroup {
    Block,
    Inline,
    /// Nodes that only appear inside a specific parent (list items, rows, ...)
    Structural,
}

/// Every node type a document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Doc,
    Paragraph,
    Text,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    TaskList,
    TaskItem,
    CodeBlock,
    HorizontalRule,
    HardBreak,
    Callout,
    Tabs,
    Tab,
    Details,
    DetailsSummary,
    DetailsContent,
    MathInline,
    MathBlock,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    Image,
    Video,
    Attachment,
    Embed,
    Drawio,
    Excalidraw,
    Youtube,
}

/// Every mark type. Declaration order is the nesting rank: earlier marks wrap later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkType {
    Link,
    Comment,
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Highlight,
    TextStyle,
    Subscript,
    Superscript,
}

/// How an attribute value is typed once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Str,
    Int,
    Bool,
}

/// Default value of an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrDefault {
    Null,
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl AttrDefault {
    pub fn to_value(self) -> Value {
        match self {
            AttrDefault::Null => Value::Null,
            AttrDefault::Str(s) => Value::String(s.to_string()),
            AttrDefault::Int(i) => Value::from(i),
            AttrDefault::Bool(b) => Value::Bool(b),
        }
    }
}

/// Where an attribute lives in the HTML contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlAttr {
    /// A regular attribute on the node's outer element
    Attr(&'static str),
    /// A boolean attribute whose presence means `true` (e.g. `open`)
    Flag(&'static str),
    /// Rendered and parsed by type-specific code (inner elements, text, tag name)
    Custom,
}

/// Declaration of one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub kind: AttrKind,
    pub default: AttrDefault,
    pub html: HtmlAttr,
}

const fn attr(
    name: &'static str,
    kind: AttrKind,
    default: AttrDefault,
    html: HtmlAttr,
) -> AttrSpec {
    AttrSpec {
        name,
        kind,
        default,
        html,
    }
}

/// Static description of a node type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSpec {
    pub group: NodeGroup,
    pub content: ContentConstraint,
    /// Boundary is opaque to generic join/flatten operations
    pub defining: bool,
    /// Leaf node edited as a unit
    pub atom: bool,
    pub attrs: &'static [AttrSpec],
}

const fn spec(
    group: NodeGroup,
    content: ContentConstraint,
    defining: bool,
    attrs: &'static [AttrSpec],
) -> NodeSpec {
    NodeSpec {
        group,
        content,
        defining,
        atom: false,
        attrs,
    }
}

const fn atom(group: NodeGroup, attrs: &'static [AttrSpec]) -> NodeSpec {
    NodeSpec {
        group,
        content: ContentConstraint::Leaf,
        defining: false,
        atom: true,
        attrs,
    }
}

use AttrDefault as D;
use AttrKind::{Bool, Int, Str};
use ContentConstraint as C;
use HtmlAttr::{Attr, Custom, Flag};
use NodeGroup::{Block, Inline, Structural};

const NO_ATTRS: &[AttrSpec] = &[];

const HEADING_ATTRS: &[AttrSpec] = &[attr("level", Int, D::Int(1), Custom)];
const ORDERED_LIST_ATTRS: &[AttrSpec] = &[attr("start", Int, D::Int(1), Attr("start"))];
const TASK_ITEM_ATTRS: &[AttrSpec] =
    &[attr("checked", Bool, D::Bool(false), Attr("data-checked"))];
const CODE_BLOCK_ATTRS: &[AttrSpec] = &[
    attr("language", Str, D::Null, Custom),
    attr("title", Str, D::Str(""), Custom),
];
const CALLOUT_ATTRS: &[AttrSpec] =
    &[attr("type", Str, D::Str("info"), Attr("data-callout-type"))];
const TAB_ATTRS: &[AttrSpec] = &[attr("title", Str, D::Str("New Tab"), Attr("data-tab-title"))];
const DETAILS_ATTRS: &[AttrSpec] = &[attr("open", Bool, D::Bool(false), Flag("open"))];
const MATH_ATTRS: &[AttrSpec] = &[attr("text", Str, D::Str(""), Custom)];
const CELL_ATTRS: &[AttrSpec] = &[
    attr("colspan", Int, D::Int(1), Attr("colspan")),
    attr("rowspan", Int, D::Int(1), Attr("rowspan")),
];
const IMAGE_ATTRS: &[AttrSpec] = &[
    attr("src", Str, D::Null, Attr("src")),
    attr("alt", Str, D::Null, Attr("alt")),
    attr("title", Str, D::Null, Attr("title")),
    attr("width", Str, D::Null, Attr("width")),
    attr("align", Str, D::Null, Attr("data-align")),
    attr("attachmentId", Str, D::Null, Attr("data-attachment-id")),
];
const VIDEO_ATTRS: &[AttrSpec] = &[
    attr("src", Str, D::Null, Attr("src")),
    attr("width", Str, D::Null, Attr("width")),
    attr("align", Str, D::Null, Attr("data-align")),
    attr("attachmentId", Str, D::Null, Attr("data-attachment-id")),
];
const ATTACHMENT_ATTRS: &[AttrSpec] = &[
    attr("url", Str, D::Null, Attr("data-attachment-url")),
    attr("name", Str, D::Null, Attr("data-attachment-name")),
    attr("mime", Str, D::Null, Attr("data-attachment-mime")),
    attr("size", Int, D::Null, Attr("data-attachment-size")),
    attr("attachmentId", Str, D::Null, Attr("data-attachment-id")),
];
const EMBED_ATTRS: &[AttrSpec] = &[
    attr("src", Str, D::Null, Attr("data-src")),
    attr("provider", Str, D::Null, Attr("data-provider")),
    attr("align", Str, D::Null, Attr("data-align")),
    attr("width", Str, D::Null, Attr("data-width")),
    attr("height", Str, D::Null, Attr("data-height")),
];
const DIAGRAM_ATTRS: &[AttrSpec] = &[
    attr("src", Str, D::Null, Attr("data-src")),
    attr("title", Str, D::Null, Attr("data-title")),
    attr("width", Str, D::Null, Attr("data-width")),
    attr("align", Str, D::Null, Attr("data-align")),
    attr("attachmentId", Str, D::Null, Attr("data-attachment-id")),
];
const YOUTUBE_ATTRS: &[AttrSpec] = &[
    attr("src", Str, D::Null, Custom),
    attr("width", Str, D::Null, Custom),
    attr("height", Str, D::Null, Custom),
];

const LINK_ATTRS: &[AttrSpec] = &[
    attr("href", Str, D::Null, Attr("href")),
    attr("target", Str, D::Str("_blank"), Attr("target")),
];
const COLOR_ATTRS: &[AttrSpec] = &[attr("color", Str, D::Null, Attr("data-color"))];
const TEXT_STYLE_ATTRS: &[AttrSpec] = &[attr("color", Str, D::Null, Custom)];
const COMMENT_ATTRS: &[AttrSpec] =
    &[attr("commentId", Str, D::Null, Attr("data-comment-id"))];

static DOC: NodeSpec = spec(Structural, C::Blocks, false, NO_ATTRS);
static PARAGRAPH: NodeSpec = spec(Block, C::Inline, false, NO_ATTRS);
static TEXT: NodeSpec = spec(Inline, C::Leaf, false, NO_ATTRS);
static HEADING: NodeSpec = spec(Block, C::Inline, true, HEADING_ATTRS);
static BLOCKQUOTE: NodeSpec = spec(Block, C::Blocks, true, NO_ATTRS);
static BULLET_LIST: NodeSpec = spec(Block, C::OneOrMore(&[NodeType::ListItem]), false, NO_ATTRS);
static ORDERED_LIST: NodeSpec = spec(
    Block,
    C::OneOrMore(&[NodeType::ListItem]),
    false,
    ORDERED_LIST_ATTRS,
);
static LIST_ITEM: NodeSpec = spec(Structural, C::ParagraphThenBlocks, true, NO_ATTRS);
static TASK_LIST: NodeSpec = spec(Block, C::OneOrMore(&[NodeType::TaskItem]), false, NO_ATTRS);
static TASK_ITEM: NodeSpec = spec(Structural, C::ParagraphThenBlocks, true, TASK_ITEM_ATTRS);
static CODE_BLOCK: NodeSpec = spec(Block, C::Text, true, CODE_BLOCK_ATTRS);
static HORIZONTAL_RULE: NodeSpec = spec(Block, C::Leaf, false, NO_ATTRS);
static HARD_BREAK: NodeSpec = spec(Inline, C::Leaf, false, NO_ATTRS);
static CALLOUT: NodeSpec = spec(Block, C::Blocks, true, CALLOUT_ATTRS);
static TABS: NodeSpec = spec(Block, C::OneOrMore(&[NodeType::Tab]), true, NO_ATTRS);
static TAB: NodeSpec = spec(Block, C::Blocks, true, TAB_ATTRS);
static DETAILS: NodeSpec = spec(
    Block,
    C::Sequence(&[NodeType::DetailsSummary, NodeType::DetailsContent]),
    true,
    DETAILS_ATTRS,
);
static DETAILS_SUMMARY: NodeSpec = spec(Structural, C::Inline, true, NO_ATTRS);
static DETAILS_CONTENT: NodeSpec = spec(Structural, C::Blocks, true, NO_ATTRS);
static MATH_INLINE: NodeSpec = atom(Inline, MATH_ATTRS);
static MATH_BLOCK: NodeSpec = atom(Block, MATH_ATTRS);
static TABLE: NodeSpec = spec(Block, C::OneOrMore(&[NodeType::TableRow]), false, NO_ATTRS);
static TABLE_ROW: NodeSpec = spec(
    Structural,
    C::OneOrMore(&[NodeType::TableCell, NodeType::TableHeader]),
    false,
    NO_ATTRS,
);
static TABLE_HEADER: NodeSpec = spec(Structural, C::Blocks, false, CELL_ATTRS);
static TABLE_CELL: NodeSpec = spec(Structural, C::Blocks, false, CELL_ATTRS);
static IMAGE: NodeSpec = atom(Block, IMAGE_ATTRS);
static VIDEO: NodeSpec = atom(Block, VIDEO_ATTRS);
static ATTACHMENT: NodeSpec = atom(Block, ATTACHMENT_ATTRS);
static EMBED: NodeSpec = atom(Block, EMBED_ATTRS);
static DRAWIO: NodeSpec = atom(Block, DIAGRAM_ATTRS);
static EXCALIDRAW: NodeSpec = atom(Block, DIAGRAM_ATTRS);
static YOUTUBE: NodeSpec = atom(Block, YOUTUBE_ATTRS);

impl NodeType {
    pub const ALL: &'static [NodeType] = &[
        NodeType::Doc,
        NodeType::Paragraph,
        NodeType::Text,
        NodeType::Heading,
        NodeType::Blockquote,
        NodeType::BulletList,
        NodeType::OrderedList,
        NodeType::ListItem,
        NodeType::TaskList,
        NodeType::TaskItem,
        NodeType::CodeBlock,
        NodeType::HorizontalRule,
        NodeType::HardBreak,
        NodeType::Callout,
        NodeType::Tabs,
        NodeType::Tab,
        NodeType::Details,
        NodeType::DetailsSummary,
        NodeType::DetailsContent,
        NodeType::MathInline,
        NodeType::MathBlock,
        NodeType::Table,
        NodeType::TableRow,
        NodeType::TableHeader,
        NodeType::TableCell,
        NodeType::Image,
        NodeType::Video,
        NodeType::Attachment,
        NodeType::Embed,
        NodeType::Drawio,
        NodeType::Excalidraw,
        NodeType::Youtube,
    ];

    /// The type tag as it appears in JSON and in `data-type` attributes.
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Text => "text",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::BulletList => "bulletList",
            NodeType::OrderedList => "orderedList",
            NodeType::ListItem => "listItem",
            NodeType::TaskList => "taskList",
            NodeType::TaskItem => "taskItem",
            NodeType::CodeBlock => "codeBlock",
            NodeType::HorizontalRule => "horizontalRule",
            NodeType::HardBreak => "hardBreak",
            NodeType::Callout => "callout",
            NodeType::Tabs => "tabs",
            NodeType::Tab => "tab",
            NodeType::Details => "details",
            NodeType::DetailsSummary => "detailsSummary",
            NodeType::DetailsContent => "detailsContent",
            NodeType::MathInline => "mathInline",
            NodeType::MathBlock => "mathBlock",
            NodeType::Table => "table",
            NodeType::TableRow => "tableRow",
            NodeType::TableHeader => "tableHeader",
            NodeType::TableCell => "tableCell",
            NodeType::Image => "image",
            NodeType::Video => "video",
            NodeType::Attachment => "attachment",
            NodeType::Embed => "embed",
            NodeType::Drawio => "drawio",
            NodeType::Excalidraw => "excalidraw",
            NodeType::Youtube => "youtube",
        }
    }

    pub fn from_name(name: &str) -> Option<NodeType> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn spec(self) -> &'static NodeSpec {
        match self {
            NodeType::Doc => &DOC,
            NodeType::Paragraph => &PARAGRAPH,
            NodeType::Text => &TEXT,
            NodeType::Heading => &HEADING,
            NodeType::Blockquote => &BLOCKQUOTE,
            NodeType::BulletList => &BULLET_LIST,
            NodeType::OrderedList => &ORDERED_LIST,
            NodeType::ListItem => &LIST_ITEM,
            NodeType::TaskList => &TASK_LIST,
            NodeType::TaskItem => &TASK_ITEM,
            NodeType::CodeBlock => &CODE_BLOCK,
            NodeType::HorizontalRule => &HORIZONTAL_RULE,
            NodeType::HardBreak => &HARD_BREAK,
            NodeType::Callout => &CALLOUT,
            NodeType::Tabs => &TABS,
            NodeType::Tab => &TAB,
            NodeType::Details => &DETAILS,
            NodeType::DetailsSummary => &DETAILS_SUMMARY,
            NodeType::DetailsContent => &DETAILS_CONTENT,
            NodeType::MathInline => &MATH_INLINE,
            NodeType::MathBlock => &MATH_BLOCK,
            NodeType::Table => &TABLE,
            NodeType::TableRow => &TABLE_ROW,
            NodeType::TableHeader => &TABLE_HEADER,
            NodeType::TableCell => &TABLE_CELL,
            NodeType::Image => &IMAGE,
            NodeType::Video => &VIDEO,
            NodeType::Attachment => &ATTACHMENT,
            NodeType::Embed => &EMBED,
            NodeType::Drawio => &DRAWIO,
            NodeType::Excalidraw => &EXCALIDRAW,
            NodeType::Youtube => &YOUTUBE,
        }
    }

    pub fn is_block(self) -> bool {
        self.spec().group == NodeGroup::Block
    }

    pub fn is_inline(self) -> bool {
        self.spec().group == NodeGroup::Inline
    }

    /// Blocks whose content is inline (or raw text): the places a cursor can sit.
    pub fn is_textblock(self) -> bool {
        matches!(
            self.spec().content,
            ContentConstraint::Inline | ContentConstraint::Text
        )
    }

    pub fn is_leaf(self) -> bool {
        self.spec().content == ContentConstraint::Leaf
    }

    pub fn is_defining(self) -> bool {
        self.spec().defining
    }

    pub fn is_atom(self) -> bool {
        self.spec().atom
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl MarkType {
    pub const ALL: &'static [MarkType] = &[
        MarkType::Link,
        MarkType::Comment,
        MarkType::Bold,
        MarkType::Italic,
        MarkType::Underline,
        MarkType::Strike,
        MarkType::Code,
        MarkType::Highlight,
        MarkType::TextStyle,
        MarkType::Subscript,
        MarkType::Superscript,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MarkType::Link => "link",
            MarkType::Comment => "comment",
            MarkType::Bold => "bold",
            MarkType::Italic => "italic",
            MarkType::Underline => "underline",
            MarkType::Strike => "strike",
            MarkType::Code => "code",
            MarkType::Highlight => "highlight",
            MarkType::TextStyle => "textStyle",
            MarkType::Subscript => "subscript",
            MarkType::Superscript => "superscript",
        }
    }

    pub fn attrs(self) -> &'static [AttrSpec] {
        match self {
            MarkType::Link => LINK_ATTRS,
            MarkType::Comment => COMMENT_ATTRS,
            MarkType::Highlight => COLOR_ATTRS,
            MarkType::TextStyle => TEXT_STYLE_ATTRS,
            _ => NO_ATTRS,
        }
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fully defaulted attribute map of a node type.
pub fn default_attrs(node_type: NodeType) -> Attrs {
    normalize_attrs(node_type, &Attrs::new())
}

/// Normalize raw attribute values for `node_type`.
///
/// Unknown keys are dropped, every declared attribute is present in the
/// result, and invalid values are coerced to their fallback.
pub fn normalize_attrs(node_type: NodeType, raw: &Attrs) -> Attrs {
    normalize_with(node_type.spec().attrs, raw, |name, value| {
        refine(node_type, name, value)
    })
}

/// Normalize raw attribute values for a mark.
pub fn normalize_mark_attrs(mark_type: MarkType, raw: &Attrs) -> Attrs {
    normalize_with(mark_type.attrs(), raw, |_, value| Some(value))
}

fn normalize_with(
    specs: &[AttrSpec],
    raw: &Attrs,
    refine: impl Fn(&str, Value) -> Option<Value>,
) -> Attrs {
    specs
        .iter()
        .map(|spec| {
            let value = raw
                .get(spec.name)
                .and_then(|value| coerce(spec.kind, value))
                .and_then(|value| refine(spec.name, value))
                .unwrap_or_else(|| spec.default.to_value());
            (spec.name.to_string(), value)
        })
        .collect()
}

/// Coerce a raw value to the attribute's kind. `None` means "no value".
fn coerce(kind: AttrKind, value: &Value) -> Option<Value> {
    match (kind, value) {
        (AttrKind::Str, Value::String(s)) if !s.is_empty() => Some(value.clone()),
        (AttrKind::Str, Value::Number(n)) => Some(Value::String(n.to_string())),
        (AttrKind::Str, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (AttrKind::Int, Value::Number(n)) => n.as_i64().map(Value::from),
        (AttrKind::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        (AttrKind::Bool, Value::Bool(_)) => Some(value.clone()),
        (AttrKind::Bool, Value::String(s)) => match s.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Type-specific fallback rules applied after coercion.
fn refine(node_type: NodeType, name: &str, value: Value) -> Option<Value> {
    match (node_type, name) {
        (NodeType::Callout, "type") => value
            .as_str()
            .and_then(callout::normalize_callout_type)
            .map(|t| Value::String(t.as_str().to_string())),
        (NodeType::Heading, "level") => value
            .as_i64()
            .filter(|level| (1..=6).contains(level))
            .map(Value::from),
        _ => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, Value)]) -> Attrs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_names_round_trip() {
        for node_type in NodeType::ALL {
            assert_eq!(NodeType::from_name(node_type.name()), Some(*node_type));
        }
        assert_eq!(NodeType::from_name("nope"), None);
    }

    #[test]
    fn test_serde_names_match_tags() {
        for node_type in NodeType::ALL {
            let encoded = serde_json::to_value(node_type).unwrap();
            assert_eq!(encoded, json!(node_type.name()));
        }
    }

    #[test]
    fn test_defining_containers() {
        for node_type in [
            NodeType::Tab,
            NodeType::Tabs,
            NodeType::Callout,
            NodeType::Details,
            NodeType::DetailsSummary,
            NodeType::DetailsContent,
        ] {
            assert!(node_type.is_defining(), "{node_type} should be defining");
        }
        assert!(!NodeType::Paragraph.is_defining());
    }

    #[test]
    fn test_textblocks() {
        assert!(NodeType::Paragraph.is_textblock());
        assert!(NodeType::Heading.is_textblock());
        assert!(NodeType::CodeBlock.is_textblock());
        assert!(!NodeType::Tab.is_textblock());
        assert!(!NodeType::Text.is_textblock());
    }

    #[test]
    fn test_default_attrs() {
        let tab = default_attrs(NodeType::Tab);
        assert_eq!(tab.get("title"), Some(&json!("New Tab")));

        let code = default_attrs(NodeType::CodeBlock);
        assert_eq!(code.get("title"), Some(&json!("")));
        assert_eq!(code.get("language"), Some(&Value::Null));

        let callout = default_attrs(NodeType::Callout);
        assert_eq!(callout.get("type"), Some(&json!("info")));
    }

    #[test]
    fn test_unknown_attrs_are_dropped() {
        let attrs = normalize_attrs(NodeType::Tab, &raw(&[("bogus", json!(1))]));
        assert!(!attrs.contains_key("bogus"));
    }

    #[test]
    fn test_callout_type_fallback() {
        let attrs = normalize_attrs(NodeType::Callout, &raw(&[("type", json!("shouting"))]));
        assert_eq!(attrs.get("type"), Some(&json!("info")));

        let attrs = normalize_attrs(NodeType::Callout, &raw(&[("type", json!("tip"))]));
        assert_eq!(attrs.get("type"), Some(&json!("tip")));
    }

    #[test]
    fn test_empty_titles_use_defaults() {
        let tab = normalize_attrs(NodeType::Tab, &raw(&[("title", json!(""))]));
        assert_eq!(tab.get("title"), Some(&json!("New Tab")));

        let code = normalize_attrs(NodeType::CodeBlock, &raw(&[("title", Value::Null)]));
        assert_eq!(code.get("title"), Some(&json!("")));
    }

    #[test]
    fn test_heading_level_is_clamped_to_default() {
        let attrs = normalize_attrs(NodeType::Heading, &raw(&[("level", json!(9))]));
        assert_eq!(attrs.get("level"), Some(&json!(1)));

        let attrs = normalize_attrs(NodeType::Heading, &raw(&[("level", json!("3"))]));
        assert_eq!(attrs.get("level"), Some(&json!(3)));
    }

    #[test]
    fn test_bool_coercion() {
        let attrs = normalize_attrs(NodeType::TaskItem, &raw(&[("checked", json!("true"))]));
        assert_eq!(attrs.get("checked"), Some(&json!(true)));

        let attrs = normalize_attrs(NodeType::TaskItem, &raw(&[("checked", json!("maybe"))]));
        assert_eq!(attrs.get("checked"), Some(&json!(false)));
    }

    #[test]
    fn test_mark_attrs_defaults() {
        let link = normalize_mark_attrs(MarkType::Link, &raw(&[("href", json!("https://x"))]));
        assert_eq!(link.get("href"), Some(&json!("https://x")));
        assert_eq!(link.get("target"), Some(&json!("_blank")));
    }
}
