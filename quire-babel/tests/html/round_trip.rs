//! Every node and mark type survives render → parse unchanged

use crate::common::{callout, heading, setup_page};
use quire_babel::{parse_html, render_html, Mark, MarkType, Node, NodeType};
use std::collections::HashSet;

fn paragraph(content: Vec<Node>) -> Node {
    Node::new(NodeType::Paragraph).with_content(content)
}

fn marked(text: &str, mark: Mark) -> Node {
    paragraph(vec![Node::text(text).with_marks(vec![mark])])
}

fn item(node_type: NodeType, text: &str) -> Node {
    Node::new(node_type).with_content(vec![Node::paragraph(text)])
}

fn cell(node_type: NodeType, text: &str, colspan: i64) -> Node {
    Node::new(node_type)
        .with_attr("colspan", colspan)
        .with_content(vec![Node::paragraph(text)])
}

fn cases() -> Vec<(&'static str, Node)> {
    vec![
        ("page", setup_page()),
        ("heading levels", Node::doc((1..=6).map(|l| heading(l, "H")).collect())),
        (
            "lists",
            Node::doc(vec![
                Node::new(NodeType::BulletList).with_content(vec![
                    item(NodeType::ListItem, "one"),
                    item(NodeType::ListItem, "two"),
                ]),
                Node::new(NodeType::OrderedList)
                    .with_attr("start", 3)
                    .with_content(vec![item(NodeType::ListItem, "three")]),
            ]),
        ),
        (
            "blockquote and rule",
            Node::doc(vec![
                Node::new(NodeType::Blockquote).with_content(vec![Node::paragraph("quoted")]),
                Node::new(NodeType::HorizontalRule),
                callout("danger", &["Stop", "Think"]),
            ]),
        ),
        (
            "hard break",
            Node::doc(vec![paragraph(vec![
                Node::text("line one"),
                Node::new(NodeType::HardBreak),
                Node::text("line two"),
            ])]),
        ),
        (
            "code block with title",
            Node::doc(vec![Node::new(NodeType::CodeBlock)
                .with_attr("language", "python")
                .with_attr("title", "setup.py")
                .with_content(vec![Node::text("if a < b:\n    print(\"&\")")])]),
        ),
        (
            "details",
            Node::doc(vec![Node::new(NodeType::Details)
                .with_attr("open", true)
                .with_content(vec![
                    Node::new(NodeType::DetailsSummary).with_content(vec![Node::text("More")]),
                    Node::new(NodeType::DetailsContent)
                        .with_content(vec![Node::paragraph("Hidden")]),
                ])]),
        ),
        (
            "math",
            Node::doc(vec![
                paragraph(vec![
                    Node::text("Area "),
                    Node::new(NodeType::MathInline).with_attr("text", "\\pi r^2"),
                ]),
                Node::new(NodeType::MathBlock).with_attr("text", "a < b \\land c > d"),
            ]),
        ),
        (
            "table with spans",
            Node::doc(vec![Node::new(NodeType::Table).with_content(vec![
                Node::new(NodeType::TableRow).with_content(vec![cell(
                    NodeType::TableHeader,
                    "Both",
                    2,
                )]),
                Node::new(NodeType::TableRow).with_content(vec![
                    cell(NodeType::TableCell, "a", 1),
                    cell(NodeType::TableCell, "b", 1),
                ]),
            ])]),
        ),
        (
            "media",
            Node::doc(vec![
                Node::new(NodeType::Image)
                    .with_attr("src", "/files/diagram.png")
                    .with_attr("alt", "Diagram")
                    .with_attr("title", "Overview")
                    .with_attr("width", "480")
                    .with_attr("align", "center")
                    .with_attr("attachmentId", "img-1"),
                Node::new(NodeType::Video)
                    .with_attr("src", "/files/demo.mp4")
                    .with_attr("width", "640")
                    .with_attr("attachmentId", "vid-1"),
                Node::new(NodeType::Attachment)
                    .with_attr("url", "/files/report.pdf")
                    .with_attr("name", "report.pdf")
                    .with_attr("mime", "application/pdf")
                    .with_attr("size", 20480)
                    .with_attr("attachmentId", "att-1"),
                Node::new(NodeType::Embed)
                    .with_attr("src", "https://www.figma.com/file/abc")
                    .with_attr("provider", "figma")
                    .with_attr("height", "400"),
                Node::new(NodeType::Drawio)
                    .with_attr("src", "/files/flow.drawio.svg")
                    .with_attr("title", "Flow")
                    .with_attr("attachmentId", "dio-1"),
                Node::new(NodeType::Excalidraw)
                    .with_attr("src", "/files/sketch.svg")
                    .with_attr("width", "300"),
                Node::new(NodeType::Youtube)
                    .with_attr("src", "https://www.youtube.com/embed/dQw4w9WgXcQ")
                    .with_attr("width", "640")
                    .with_attr("height", "360"),
            ]),
        ),
        (
            "plain marks",
            Node::doc(vec![
                marked("bold", Mark::new(MarkType::Bold)),
                marked("italic", Mark::new(MarkType::Italic)),
                marked("underline", Mark::new(MarkType::Underline)),
                marked("strike", Mark::new(MarkType::Strike)),
                marked("code", Mark::new(MarkType::Code)),
                marked("sub", Mark::new(MarkType::Subscript)),
                marked("sup", Mark::new(MarkType::Superscript)),
            ]),
        ),
        (
            "marks with attributes",
            Node::doc(vec![
                marked(
                    "site",
                    Mark::new(MarkType::Link)
                        .with_attr("href", "https://example.com/a?b=1&c=2")
                        .with_attr("target", "_self"),
                ),
                marked("plain highlight", Mark::new(MarkType::Highlight)),
                marked(
                    "highlight",
                    Mark::new(MarkType::Highlight).with_attr("color", "#ffc078"),
                ),
                marked(
                    "purple",
                    Mark::new(MarkType::TextStyle).with_attr("color", "#958df1"),
                ),
                marked(
                    "discussed",
                    Mark::new(MarkType::Comment).with_attr("commentId", "c-42"),
                ),
            ]),
        ),
        (
            "stacked marks",
            Node::doc(vec![paragraph(vec![
                Node::text("a "),
                Node::text("b").with_marks(vec![
                    Mark::new(MarkType::Bold),
                    Mark::new(MarkType::Italic),
                    Mark::new(MarkType::Link).with_attr("href", "/b"),
                ]),
                Node::text(" c"),
            ])]),
        ),
    ]
}

fn collect(node: &Node, types: &mut HashSet<NodeType>, marks: &mut HashSet<MarkType>) {
    types.insert(node.node_type);
    marks.extend(node.marks.iter().map(|m| m.mark_type));
    for child in &node.content {
        collect(child, types, marks);
    }
}

#[test]
fn test_every_case_round_trips() {
    for (name, doc) in cases() {
        let html = render_html(&doc).unwrap();
        let parsed = parse_html(&html).unwrap();
        assert_eq!(parsed, doc, "{name} did not round trip through {html}");
    }
}

#[test]
fn test_cases_cover_every_type() {
    let mut types = HashSet::new();
    let mut marks = HashSet::new();
    for (_, doc) in cases() {
        collect(&doc, &mut types, &mut marks);
    }
    for node_type in NodeType::ALL {
        assert!(types.contains(node_type), "no case uses {node_type}");
    }
    for mark_type in MarkType::ALL {
        assert!(marks.contains(mark_type), "no case uses {mark_type}");
    }
}
