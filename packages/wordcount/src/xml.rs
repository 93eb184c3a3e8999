//! Helpers for navigating parsed title documents.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ecfr_wordcount::xml::get_tag_name;
///
/// let doc = Document::parse(r#"<DIV3 N="I" TYPE="CHAPTER"/>"#).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "DIV3");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with the given tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// All descendant elements with the given tag, in document order.
///
/// The starting node itself is not included.
pub fn find_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| has_tag(*n, tag))
}

/// First descendant element with the given tag, in document order.
pub fn find_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &'a str) -> Option<Node<'a, 'input>> {
    find_descendants(node, tag).next()
}

/// Concatenated visible text of a node and everything beneath it.
///
/// Text inside inline markup (`<I>`, `<E>`, ...) is included; comments and
/// processing instructions are not. No whitespace is inserted between
/// adjacent text nodes.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ecfr_wordcount::xml::visible_text;
///
/// let doc = Document::parse("<P>Scope of <I>this</I> part.</P>").unwrap();
/// assert_eq!(visible_text(doc.root_element()), "Scope of this part.");
/// ```
pub fn visible_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
