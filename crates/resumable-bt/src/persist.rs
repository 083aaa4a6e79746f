//! Conversion between live node trees and the text asset format.
//!
//! Only topology, subtype parameters and layout are written. Cursors,
//! counters, shuffle orders and running flags are not, so a freshly
//! loaded tree always starts idle.

use tracing::debug;

use crate::error::{FormatError, Result};
use crate::format::Element;
use crate::layout::{Layout, NodeLayout, Position};
use crate::node::{BoxedNode, Node};
use crate::registry::NodeRegistry;

/// Tag of the document element wrapping the root node.
pub const TREE_TAG: &str = "Tree";

/// Serializes `node` and its subtree, in child order.
pub fn serialize_node<H>(node: &dyn Node<H>, layout: &Layout) -> Element {
    let (name, position) = match layout.get(node.id()) {
        Some(entry) => (entry.name.as_str(), entry.position),
        None => (node.display_name(), Position::default()),
    };

    let mut element = Element::new(node.type_key())
        .with_attribute("name", name)
        .with_attribute("x", position.x)
        .with_attribute("y", position.y);
    node.write_params(&mut element);
    for child in node.children() {
        element.push_child(serialize_node(child.as_ref(), layout));
    }
    element
}

/// Builds a node and its subtree from `element`, recording layout entries.
pub fn deserialize_node<H: 'static>(
    element: &Element,
    registry: &NodeRegistry<H>,
    layout: &mut Layout,
) -> Result<BoxedNode<H>> {
    let mut node = registry.create(element.tag())?;
    let name = element.required_attribute("name")?.to_owned();
    let position = Position::new(element.parse_attribute("x")?, element.parse_attribute("y")?);
    node.read_params(element)?;
    layout.insert(node.id(), NodeLayout { name, position });

    for child_element in element.children() {
        let child = deserialize_node(child_element, registry, layout)?;
        node.add_child(child)?;
    }
    Ok(node)
}

/// Writes a complete tree document.
pub fn serialize_tree<H>(root: &dyn Node<H>, layout: &Layout) -> String {
    Element::new(TREE_TAG)
        .with_child(serialize_node(root, layout))
        .to_xml()
}

/// A parsed tree document.
pub struct LoadedTree<H> {
    /// `None` for an empty `<Tree />`.
    pub root: Option<BoxedNode<H>>,
    pub layout: Layout,
}

/// Parses a complete tree document.
///
/// Root cardinality is checked before any node is constructed.
pub fn deserialize_tree<H: 'static>(text: &str, registry: &NodeRegistry<H>) -> Result<LoadedTree<H>> {
    let document = Element::parse(text)?;
    if document.tag() != TREE_TAG {
        return Err(FormatError::MissingTreeElement {
            expected: TREE_TAG.to_owned(),
            found: document.tag().to_owned(),
        }
        .into());
    }

    let mut layout = Layout::new();
    let root = match document.children() {
        [] => None,
        [root] => Some(deserialize_node(root, registry, &mut layout)?),
        many => return Err(FormatError::RootCardinality(many.len()).into()),
    };
    debug!(nodes = layout.len(), "deserialized tree");
    Ok(LoadedTree { root, layout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RegistryError, StructureError, TreeError};
    use crate::testing::Probe;
    use crate::Status;

    fn registry() -> NodeRegistry<()> {
        let mut registry = NodeRegistry::with_builtins();
        registry
            .register_leaf("Wait", || Probe::always(Status::Running).0)
            .unwrap();
        registry
    }

    #[test]
    fn two_roots_are_rejected() {
        let text = r#"<Tree>
            <Sequence name="a" x="0" y="0" />
            <Selector name="b" x="0" y="0" />
        </Tree>"#;

        assert!(matches!(
            deserialize_tree(text, &registry()),
            Err(TreeError::Format(FormatError::RootCardinality(2)))
        ));
    }

    #[test]
    fn two_roots_fail_before_unknown_tags_are_seen() {
        let text = r#"<Tree><Nope /><Nope /></Tree>"#;

        assert!(matches!(
            deserialize_tree(text, &registry()),
            Err(TreeError::Format(FormatError::RootCardinality(2)))
        ));
    }

    #[test]
    fn unknown_tag_is_not_registered() {
        let text = r#"<Tree><Patrol name="p" x="0" y="0" /></Tree>"#;

        assert!(matches!(
            deserialize_tree(text, &registry()),
            Err(TreeError::Registry(RegistryError::NotRegistered(key))) if key == "Patrol"
        ));
    }

    #[test]
    fn missing_position_is_fatal() {
        let text = r#"<Tree><Sequence name="s" x="1" /></Tree>"#;

        assert!(matches!(
            deserialize_tree(text, &registry()),
            Err(TreeError::Format(FormatError::MissingAttribute { attribute, .. })) if attribute == "y"
        ));
    }

    #[test]
    fn repeater_requires_loops() {
        let text = r#"<Tree><Repeater name="r" x="0" y="0" /></Tree>"#;

        assert!(matches!(
            deserialize_tree(text, &registry()),
            Err(TreeError::Format(FormatError::MissingAttribute { attribute, .. })) if attribute == "loops"
        ));
    }

    #[test]
    fn leaf_with_children_is_structural_misuse() {
        let text = r#"<Tree>
            <Wait name="w" x="0" y="0">
                <Wait name="inner" x="0" y="0" />
            </Wait>
        </Tree>"#;

        assert!(matches!(
            deserialize_tree(text, &registry()),
            Err(TreeError::Structure(StructureError::LeafChildren(_)))
        ));
    }

    #[test]
    fn wrong_document_element() {
        assert!(matches!(
            deserialize_tree("<Forest />", &registry()),
            Err(TreeError::Format(FormatError::MissingTreeElement { .. }))
        ));
    }

    #[test]
    fn empty_tree_has_no_root() {
        let loaded = deserialize_tree("<Tree />", &registry()).unwrap();

        assert!(loaded.root.is_none());
        assert!(loaded.layout.is_empty());
    }

    #[test]
    fn unsaved_layout_falls_back_to_display_name() {
        let registry = registry();
        let root = registry.create("RepeatUntilFail").unwrap();
        let element = serialize_node(root.as_ref(), &Layout::new());

        assert_eq!(element.attribute("name"), Some("Repeat Until Fail"));
        assert_eq!(element.attribute("x"), Some("0"));
    }
}
