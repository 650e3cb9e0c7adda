/**
 * Markup Parser Tests
 *
 * Element trees, attributes, entities and diagnostics
 */

#[cfg(test)]
mod tests {
    use trellis_compiler::ml_parser::{parse, Element, Node};
    use trellis_compiler::CompileError;

    fn parse_ok(source: &str) -> Vec<Node> {
        parse(source).unwrap_or_else(|e| panic!("{} should parse: {}", source, e))
    }

    fn element(node: &Node) -> &Element {
        match node {
            Node::Element(element) => element,
            Node::Text(text) => panic!("expected element, got text {:?}", text.value),
        }
    }

    fn text(node: &Node) -> &str {
        match node {
            Node::Text(text) => &text.value,
            Node::Element(element) => panic!("expected text, got <{}>", element.name),
        }
    }

    fn error_message(source: &str) -> (String, String) {
        match parse(source) {
            Err(CompileError::Markup { message, location }) => (message, location),
            other => panic!("expected markup error, got {:?}", other),
        }
    }

    #[test]
    fn should_parse_nested_elements() {
        let nodes = parse_ok("<comp>Text node<li a='1' b=\"2\">2</li></comp>");
        assert_eq!(nodes.len(), 1);
        let comp = element(&nodes[0]);
        assert_eq!(comp.name, "comp");
        assert_eq!(comp.children.len(), 2);
        assert_eq!(text(&comp.children[0]), "Text node");
        let li = element(&comp.children[1]);
        assert_eq!(li.attr("a"), Some("1"));
        assert_eq!(li.attr("b"), Some("2"));
        assert_eq!(text(&li.children[0]), "2");
    }

    #[test]
    fn should_parse_valueless_and_unquoted_attributes() {
        let nodes = parse_ok("<input disabled value=3>");
        let input = element(&nodes[0]);
        assert_eq!(input.attr("disabled"), Some(""));
        assert_eq!(input.attr("value"), Some("3"));
    }

    #[test]
    fn should_not_expect_close_tags_for_void_elements() {
        let nodes = parse_ok("<p>a<br>b<img src='x'></p>");
        let p = element(&nodes[0]);
        assert_eq!(p.children.len(), 4);
        assert_eq!(element(&p.children[1]).name, "br");
        assert!(element(&p.children[3]).children.is_empty());
    }

    #[test]
    fn should_support_self_closing_tags() {
        let nodes = parse_ok("<ul><item/><item /></ul>");
        assert_eq!(element(&nodes[0]).children.len(), 2);
    }

    #[test]
    fn should_skip_comments_and_doctype() {
        let nodes = parse_ok("<!DOCTYPE html><!-- note --><div><!--x-->y</div>");
        assert_eq!(nodes.len(), 1);
        let div = element(&nodes[0]);
        assert_eq!(div.children.len(), 1);
        assert_eq!(text(&div.children[0]), "y");
    }

    #[test]
    fn should_decode_entities_in_text_and_attributes() {
        let nodes = parse_ok("<a title='&lt;b&gt;'>Tom &amp; Jerry&#33;</a>");
        let a = element(&nodes[0]);
        assert_eq!(a.attr("title"), Some("<b>"));
        assert_eq!(text(&a.children[0]), "Tom & Jerry!");
    }

    #[test]
    fn should_keep_raw_text_elements_verbatim() {
        let nodes = parse_ok("<style>a > b { color: red }</style>");
        let style = element(&nodes[0]);
        assert_eq!(text(&style.children[0]), "a > b { color: red }");
    }

    #[test]
    fn should_match_close_tags_case_insensitively() {
        let nodes = parse_ok("<Hello></hello>");
        assert_eq!(element(&nodes[0]).name, "Hello");
    }

    #[test]
    fn should_report_mismatched_close_tag_with_location() {
        let (message, location) = error_message("<div>\n  <span></div>");
        assert!(message.contains("Unexpected closing tag </div>"), "{}", message);
        assert_eq!(location, "2:9");
    }

    #[test]
    fn should_report_unclosed_elements() {
        let (message, _) = error_message("<div><span></span>");
        assert_eq!(message, "Unclosed element <div>");
    }

    #[test]
    fn should_report_close_tags_for_void_elements() {
        let (message, _) = error_message("<br></br>");
        assert!(message.contains("does not have a close tag"));
    }

    #[test]
    fn should_report_unterminated_comments() {
        let (message, location) = error_message("<a></a><!-- open");
        assert_eq!(message, "Unterminated comment");
        assert_eq!(location, "1:8");
    }
}
