use roxmltree::Node;
use serde::Serialize;

/// Attributes of one XML node, kept verbatim and in document order.
///
/// Keys may repeat; [`Attributes::get`] returns the first match and
/// [`Attributes::get_all`] every match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Harvests every attribute present on `node`.
    pub fn from_node(node: Node) -> Self {
        Self(
            node.attributes()
                .map(|attr| (attr.name().to_owned(), attr.value().to_owned()))
                .collect(),
        )
    }

    /// Appends a pair, keeping any existing values for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value of `key` parsed as `u32`.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// First value of `key` parsed as `i32`.
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// First value of `key` parsed as `f32`.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Number of pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the node had no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key/value pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keeps only the pairs for which `keep` returns true.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|(k, _)| keep(k));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One `<properties>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Attributes of the last `<property>` child of the block.
    pub attributes: Attributes,
    /// Inline text of the `<properties>` node itself.
    pub pc_data: String,
}

impl Property {
    /// Builds a property block from a `<properties>` node.
    ///
    /// Each element child overwrites the attributes of the previous one, so
    /// only the last `<property>` survives.
    pub fn from_node(node: Node) -> Self {
        let mut property = Property::default();
        for child in node.children().filter(Node::is_element) {
            property.attributes = Attributes::from_node(child);
        }
        property.pc_data = inline_text(node).to_owned();
        property
    }

    /// Value of `name`.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name")
    }

    /// Declared `type`, `string` when absent.
    pub fn kind(&self) -> &str {
        self.attributes.get("type").unwrap_or("string")
    }

    /// Value of `value`; multi-line values live in `pc_data` instead.
    pub fn value(&self) -> Option<&str> {
        self.attributes.get("value")
    }
}

/// First text child of `node` that is not just indentation, or `""`.
pub(crate) fn inline_text<'a>(node: Node<'a, '_>) -> &'a str {
    node.children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .find(|text| !text.trim().is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn harvests_attributes_verbatim() {
        let doc = Document::parse(r#"<tile id="3" type="wall" probability=" 0.5"/>"#)
            .expect("xml");
        let attrs = Attributes::from_node(doc.root_element());

        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(
            pairs,
            vec![("id", "3"), ("type", "wall"), ("probability", " 0.5")]
        );
        assert_eq!(attrs.get_u32("id"), Some(3));
        assert_eq!(attrs.get_f32("probability"), Some(0.5));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let mut attrs = Attributes::new();
        attrs.insert("gid", "1");
        attrs.insert("gid", "2");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("gid"), Some("1"));
        assert_eq!(attrs.get_all("gid").collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn last_property_wins() {
        let doc = Document::parse(
            r#"<properties>
                 <property name="speed" type="float" value="1.5"/>
                 <property name="solid" type="bool" value="true"/>
               </properties>"#,
        )
        .expect("xml");
        let property = Property::from_node(doc.root_element());

        assert_eq!(property.name(), Some("solid"));
        assert_eq!(property.kind(), "bool");
        assert_eq!(property.value(), Some("true"));
        assert!(property.pc_data.is_empty());
    }

    #[test]
    fn keeps_inline_text_of_the_block() {
        let doc = Document::parse("<properties>notes<property name=\"a\"/></properties>")
            .expect("xml");
        let property = Property::from_node(doc.root_element());

        assert_eq!(property.pc_data, "notes");
        assert_eq!(property.name(), Some("a"));
        assert_eq!(property.kind(), "string");
    }

    #[test]
    fn finds_text_after_leading_children() {
        let doc = Document::parse(
            "<properties>\n <property name=\"a\" value=\"1\"/>notes\n</properties>",
        )
        .expect("xml");
        let property = Property::from_node(doc.root_element());

        assert_eq!(property.pc_data, "notes\n");
        assert_eq!(property.value(), Some("1"));
    }
}
