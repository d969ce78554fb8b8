//! Template parsing tests for weft-html

use weft_dom::Document;
use weft_html::{TemplateError, TemplateParser, parse_template};

#[test]
fn test_nested_template() {
    let mut doc = Document::new();
    let host = doc.create_element("weft-card");

    let nodes = parse_template(
        &mut doc,
        host,
        "<header><h2 class=\"title\">Card</h2></header>\n<section data-slot=\"body\"><p>Text</p></section>",
    )
    .unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(doc.tag_name(nodes[0]), Some("header"));
    assert_eq!(doc.get_attribute(nodes[1], "data-slot").as_deref(), Some("body"));
    let title = doc.find_by_tag(host, "h2").unwrap();
    assert!(doc.class_list(title).unwrap().contains("title"));
    assert_eq!(doc.tree().text_content(host), "CardText");
}

#[test]
fn test_whitespace_template_is_noop() {
    let mut doc = Document::new();
    let host = doc.create_element("div");
    let nodes = TemplateParser::new().parse_into(&mut doc, host, "  \n\t ").unwrap();
    assert!(nodes.is_empty());
    assert!(doc.element_children(host).is_empty());
}

#[test]
fn test_text_parent_rejected() {
    let mut doc = Document::new();
    let text = doc.create_text("x");
    assert!(matches!(
        parse_template(&mut doc, text, "<b>bold</b>"),
        Err(TemplateError::InvalidParent(id)) if id == text
    ));
}

#[test]
fn test_comment_kept() {
    let mut doc = Document::new();
    let host = doc.create_element("div");
    let nodes = parse_template(&mut doc, host, "<span>x</span><!-- slot -->").unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(doc.element_children(host).len(), 1);
}
