// Copyright 2026 The Vellum Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The mutable host tree the engine observes but does not police.
//!
//! [`HostTree`] is a minimal element/text tree standing in for the
//! rendering environment's own node tree. Every mutation — whether made
//! by the engine or by "external" host code — enqueues a
//! [`MutationRecord`], and [`HostTree::take_records`] drains the queue,
//! the way a batched mutation observer would deliver it.
//!
//! String offsets are UTF-16 code units, the host-tree convention.

use std::collections::{BTreeMap, HashMap};

use strum_macros::Display;

/// Stable identity handle for a host node. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// What a change record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MutationKind {
    /// Children were added to or removed from the target.
    ChildList,
    /// An attribute of the target changed.
    Attributes,
    /// The character data of a text target changed.
    CharacterData,
}

/// One observed host-tree change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The node the change happened on (the parent, for child-list
    /// changes).
    pub target: NodeId,
    /// The kind of change.
    pub kind: MutationKind,
    /// Nodes added under `target` (child-list records only).
    pub added_nodes: Vec<NodeId>,
    /// Nodes removed from under `target` (child-list records only).
    pub removed_nodes: Vec<NodeId>,
    /// The sibling preceding the change position, if any.
    pub previous_sibling: Option<NodeId>,
    /// The attribute that changed (attribute records only).
    pub attribute_name: Option<String>,
}

impl MutationRecord {
    /// A child-list record.
    pub fn child_list(
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            target,
            kind: MutationKind::ChildList,
            added_nodes: added,
            removed_nodes: removed,
            previous_sibling,
            attribute_name: None,
        }
    }

    /// An attribute-change record.
    pub fn attributes(target: NodeId, name: &str) -> Self {
        Self {
            target,
            kind: MutationKind::Attributes,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            attribute_name: Some(name.to_string()),
        }
    }

    /// A character-data record.
    pub fn character_data(target: NodeId) -> Self {
        Self {
            target,
            kind: MutationKind::CharacterData,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            attribute_name: None,
        }
    }
}

/// Tags serialized without content or a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

enum Payload {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text {
        data: String,
    },
}

struct HostNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: Payload,
}

/// The host-owned node tree.
///
/// Detached subtrees stay addressable (records may still reference them),
/// so node storage is never freed.
pub struct HostTree {
    nodes: HashMap<NodeId, HostNode>,
    next_id: u64,
    root: NodeId,
    pending: Vec<MutationRecord>,
    generator: Option<Box<dyn FnMut() -> Vec<MutationRecord>>>,
}

impl HostTree {
    /// A fresh tree holding only the root element.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            next_id: 0,
            root: NodeId(0),
            pending: Vec::new(),
            generator: None,
        };
        tree.root = tree.create_element("div");
        tree
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, payload: Payload) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            HostNode {
                parent: None,
                children: Vec::new(),
                payload,
            },
        );
        id
    }

    fn node(&self, id: NodeId) -> &HostNode {
        self.nodes.get(&id).expect("unknown host node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut HostNode {
        self.nodes.get_mut(&id).expect("unknown host node id")
    }

    /// Create a detached element. Creation itself is not a mutation and
    /// enqueues no record.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Payload::Element {
            tag: tag.to_uppercase(),
            attrs: BTreeMap::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(Payload::Text {
            data: data.to_string(),
        })
    }

    /// Shallow-clone an element: same tag and attributes, no children,
    /// detached. Used when splitting parent blots.
    pub fn clone_shallow(&mut self, id: NodeId) -> NodeId {
        match &self.node(id).payload {
            Payload::Element { tag, attrs } => {
                let (tag, attrs) = (tag.clone(), attrs.clone());
                self.alloc(Payload::Element { tag, attrs })
            }
            Payload::Text { data } => {
                let data = data.clone();
                self.create_text(&data)
            }
        }
    }

    // ---- introspection -------------------------------------------------

    /// Whether `id` is an element node.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).payload, Payload::Element { .. })
    }

    /// Whether `id` is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).payload, Payload::Text { .. })
    }

    /// Upper-cased tag name, for elements.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Element { tag, .. } => Some(tag),
            Payload::Text { .. } => None,
        }
    }

    /// Character data, for text nodes.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Text { data } => Some(data),
            Payload::Element { .. } => None,
        }
    }

    /// The parent link, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The child list (empty for text nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child, if any.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    /// Index of `id` within its parent's child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Next sibling, if any.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        self.node(parent).children.get(idx + 1).copied()
    }

    /// Previous sibling, if any.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.index_in_parent(id)?;
        if idx == 0 {
            return None;
        }
        let parent = self.parent(id)?;
        self.node(parent).children.get(idx - 1).copied()
    }

    /// Whether `node` is `ancestor` or sits anywhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Child-index path from the node's topmost ancestor, usable for
    /// document-order comparison between nodes under the same root.
    pub fn position(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            if let Some(idx) = self.index_in_parent(cur) {
                path.push(idx);
            }
            cur = parent;
        }
        path.reverse();
        path
    }

    // ---- structural mutation -------------------------------------------

    /// Insert `node` under `parent` before `reference` (append when
    /// `reference` is `None`). Detaches `node` from any previous parent
    /// first, recording the removal there.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) {
        self.remove(node);
        let idx = match reference {
            Some(r) => self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == r)
                .unwrap_or(self.node(parent).children.len()),
            None => self.node(parent).children.len(),
        };
        self.node_mut(parent).children.insert(idx, node);
        self.node_mut(node).parent = Some(parent);
        let previous = if idx == 0 {
            None
        } else {
            self.node(parent).children.get(idx - 1).copied()
        };
        self.record(MutationRecord::child_list(
            parent,
            vec![node],
            Vec::new(),
            previous,
        ));
    }

    /// Append `node` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        self.insert_before(parent, node, None);
    }

    /// Detach `node` from its parent, if attached. The subtree itself
    /// stays addressable.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let previous = self.prev_sibling(node);
        self.node_mut(parent).children.retain(|&c| c != node);
        self.node_mut(node).parent = None;
        self.record(MutationRecord::child_list(
            parent,
            Vec::new(),
            vec![node],
            previous,
        ));
    }

    // ---- attributes ----------------------------------------------------

    /// Read an attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Element { attrs, .. } => attrs.get(name).map(|s| s.as_str()),
            Payload::Text { .. } => None,
        }
    }

    /// All attribute names present on an element.
    pub fn attribute_names(&self, id: NodeId) -> Vec<String> {
        match &self.node(id).payload {
            Payload::Element { attrs, .. } => attrs.keys().cloned().collect(),
            Payload::Text { .. } => Vec::new(),
        }
    }

    /// Set an attribute, recording the change.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Payload::Element { attrs, .. } = &mut self.node_mut(id).payload {
            attrs.insert(name.to_string(), value.to_string());
            self.record(MutationRecord::attributes(id, name));
        }
    }

    /// Remove an attribute, recording the change if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Payload::Element { attrs, .. } = &mut self.node_mut(id).payload {
            if attrs.remove(name).is_some() {
                self.record(MutationRecord::attributes(id, name));
            }
        }
    }

    // ---- class and style helpers ---------------------------------------

    /// Whitespace-split `class` attribute tokens.
    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.attribute(id, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Add a class token if absent.
    pub fn add_class(&mut self, id: NodeId, token: &str) {
        let mut classes = self.classes(id);
        if classes.iter().any(|c| c == token) {
            return;
        }
        classes.push(token.to_string());
        self.set_attribute(id, "class", &classes.join(" "));
    }

    /// Remove a class token; drops the attribute entirely when the list
    /// empties.
    pub fn remove_class(&mut self, id: NodeId, token: &str) {
        let mut classes = self.classes(id);
        let before = classes.len();
        classes.retain(|c| c != token);
        if classes.len() == before {
            return;
        }
        if classes.is_empty() {
            self.remove_attribute(id, "class");
        } else {
            self.set_attribute(id, "class", &classes.join(" "));
        }
    }

    fn style_entries(&self, id: NodeId) -> Vec<(String, String)> {
        let Some(style) = self.attribute(id, "style") else {
            return Vec::new();
        };
        style
            .split(';')
            .filter_map(|decl| {
                let (key, value) = decl.split_once(':')?;
                let key = key.trim();
                let value = value.trim();
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                Some((camelize(key), value.to_string()))
            })
            .collect()
    }

    fn write_style_entries(&mut self, id: NodeId, entries: &[(String, String)]) {
        if entries.is_empty() {
            self.remove_attribute(id, "style");
            return;
        }
        let text = entries
            .iter()
            .map(|(key, value)| format!("{}: {}", hyphenate(key), value))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(id, "style", &text);
    }

    /// Read one style property by its camel-cased name.
    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        self.style_entries(id)
            .into_iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value)
    }

    /// Camel-cased names of all style properties set on the node.
    pub fn style_properties(&self, id: NodeId) -> Vec<String> {
        self.style_entries(id)
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// Set one style property by its camel-cased name.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let mut entries = self.style_entries(id);
        if let Some(entry) = entries.iter_mut().find(|(key, _)| key == property) {
            entry.1 = value.to_string();
        } else {
            entries.push((property.to_string(), value.to_string()));
        }
        self.write_style_entries(id, &entries);
    }

    /// Remove one style property by its camel-cased name.
    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        let mut entries = self.style_entries(id);
        let before = entries.len();
        entries.retain(|(key, _)| key != property);
        if entries.len() != before {
            self.write_style_entries(id, &entries);
        }
    }

    // ---- character data ------------------------------------------------

    /// Replace a text node's data outright.
    pub fn set_text(&mut self, id: NodeId, data: &str) {
        if let Payload::Text { data: existing } = &mut self.node_mut(id).payload {
            *existing = data.to_string();
            self.record(MutationRecord::character_data(id));
        }
    }

    /// Splice a text node's data at UTF-16 code-unit offsets.
    pub fn splice_text(&mut self, id: NodeId, index: usize, delete: usize, insert: &str) {
        if let Payload::Text { data } = &mut self.node_mut(id).payload {
            let start = utf16_to_byte(data, index);
            let end = utf16_to_byte(data, index + delete);
            data.replace_range(start..end, insert);
            self.record(MutationRecord::character_data(id));
        }
    }

    /// Divide a text node at a UTF-16 offset: the node keeps the left
    /// half, and a new text node carrying the right half is inserted
    /// immediately after it. Returns the new node.
    pub fn split_text(&mut self, id: NodeId, index: usize) -> NodeId {
        let tail = {
            let Payload::Text { data } = &self.node(id).payload else {
                return id;
            };
            let at = utf16_to_byte(data, index);
            data[at..].to_string()
        };
        if let Payload::Text { data } = &mut self.node_mut(id).payload {
            let at = utf16_to_byte(data, index);
            data.truncate(at);
        }
        self.record(MutationRecord::character_data(id));
        let right = self.create_text(&tail);
        if let Some(parent) = self.parent(id) {
            let next = self.next_sibling(id);
            self.insert_before(parent, right, next);
        }
        right
    }

    // ---- change records ------------------------------------------------

    fn record(&mut self, record: MutationRecord) {
        self.pending.push(record);
    }

    /// Enqueue a synthetic record, as an integration delivering its own
    /// batches would.
    pub fn push_record(&mut self, record: MutationRecord) {
        self.pending.push(record);
    }

    /// Whether any records are waiting to be drained.
    pub fn has_pending_records(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drain all pending records, in delivery order. If a record
    /// generator is installed its output is appended to every drain.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        let mut records = std::mem::take(&mut self.pending);
        if let Some(generator) = self.generator.as_mut() {
            records.extend(generator());
        }
        records
    }

    /// Install a generator that synthesizes extra records on every
    /// [`take_records`](Self::take_records) drain. Lets a host
    /// integration (or a convergence test) feed batches into the
    /// reconciliation loop.
    pub fn set_record_generator(
        &mut self,
        generator: impl FnMut() -> Vec<MutationRecord> + 'static,
    ) {
        self.generator = Some(Box::new(generator));
    }

    /// Remove any installed record generator.
    pub fn clear_record_generator(&mut self) {
        self.generator = None;
    }

    // ---- serialization -------------------------------------------------

    /// HTML serialization of the subtree at `id`, for snapshots and
    /// debugging. Attributes come out in sorted order.
    pub fn outer_html(&self, id: NodeId) -> String {
        match &self.node(id).payload {
            Payload::Text { data } => html_escape::encode_text(data).to_string(),
            Payload::Element { tag, attrs } => {
                let tag = tag.to_lowercase();
                let mut out = String::new();
                out.push('<');
                out.push_str(&tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return out;
                }
                for &child in &self.node(id).children {
                    out.push_str(&self.outer_html(child));
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
                out
            }
        }
    }

    /// HTML serialization of the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        self.node(id)
            .children
            .iter()
            .map(|&child| self.outer_html(child))
            .collect()
    }
}

impl Default for HostTree {
    fn default() -> Self {
        Self::new()
    }
}

/// UTF-16 code-unit length of a string.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Byte offset of a UTF-16 code-unit index, clamped to the string end.
pub(crate) fn utf16_to_byte(s: &str, index: usize) -> usize {
    if index == 0 {
        return 0;
    }
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        if units >= index {
            return byte;
        }
        units += ch.len_utf16();
    }
    s.len()
}

/// `font-size` → `fontSize`, the storage-property form of a hyphenated
/// name.
pub(crate) fn camelize(name: &str) -> String {
    let mut parts = name.split('-');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars);
        }
    }
    out
}

/// `fontSize` → `font-size`.
pub(crate) fn hyphenate(name: &str) -> String {
    let mut out = String::new();
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_mutations_emit_child_list_records() {
        let mut tree = HostTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("hello");
        tree.append_child(tree.root(), p);
        tree.append_child(p, text);

        let records = tree.take_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, MutationKind::ChildList);
        assert_eq!(records[0].target, tree.root());
        assert_eq!(records[0].added_nodes, vec![p]);
        assert_eq!(records[1].target, p);
        assert!(!tree.has_pending_records());
    }

    #[test]
    fn moving_a_node_records_removal_then_insertion() {
        let mut tree = HostTree::new();
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        let text = tree.create_text("x");
        tree.append_child(tree.root(), a);
        tree.append_child(tree.root(), b);
        tree.append_child(a, text);
        tree.take_records();

        tree.append_child(b, text);
        let records = tree.take_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target, a);
        assert_eq!(records[0].removed_nodes, vec![text]);
        assert_eq!(records[1].target, b);
        assert_eq!(records[1].added_nodes, vec![text]);
        assert_eq!(tree.parent(text), Some(b));
    }

    #[test]
    fn splice_text_uses_utf16_offsets() {
        let mut tree = HostTree::new();
        let text = tree.create_text("a\u{1F600}b");
        // '😀' is two UTF-16 code units, so 'b' sits at offset 3.
        tree.splice_text(text, 3, 1, "c");
        assert_eq!(tree.text(text), Some("a\u{1F600}c"));
        tree.splice_text(text, 0, 0, "z");
        assert_eq!(tree.text(text), Some("za\u{1F600}c"));
    }

    #[test]
    fn split_text_divides_data_and_inserts_sibling() {
        let mut tree = HostTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("abcd");
        tree.append_child(tree.root(), p);
        tree.append_child(p, text);
        tree.take_records();

        let right = tree.split_text(text, 2);
        assert_eq!(tree.text(text), Some("ab"));
        assert_eq!(tree.text(right), Some("cd"));
        assert_eq!(tree.children(p), &[text, right]);
    }

    #[test]
    fn class_tokens_round_trip_through_the_attribute() {
        let mut tree = HostTree::new();
        let span = tree.create_element("span");
        tree.add_class(span, "note-large");
        tree.add_class(span, "accent");
        assert_eq!(tree.classes(span), vec!["note-large", "accent"]);
        tree.remove_class(span, "note-large");
        assert_eq!(tree.attribute(span, "class"), Some("accent"));
        tree.remove_class(span, "accent");
        assert_eq!(tree.attribute(span, "class"), None);
    }

    #[test]
    fn style_properties_are_camel_cased() {
        let mut tree = HostTree::new();
        let span = tree.create_element("span");
        tree.set_attribute(span, "style", "font-size: 18px; color: red");
        assert_eq!(tree.style(span, "fontSize").as_deref(), Some("18px"));
        assert_eq!(tree.style(span, "color").as_deref(), Some("red"));
        tree.set_style(span, "fontSize", "10px");
        assert_eq!(
            tree.attribute(span, "style"),
            Some("font-size: 10px; color: red")
        );
        tree.remove_style(span, "color");
        tree.remove_style(span, "fontSize");
        assert_eq!(tree.attribute(span, "style"), None);
    }

    #[test]
    fn outer_html_escapes_text_and_sorts_attributes() {
        let mut tree = HostTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("a < b");
        tree.set_attribute(p, "id", "x");
        tree.append_child(tree.root(), p);
        tree.append_child(p, text);
        assert_eq!(tree.outer_html(p), "<p id=\"x\">a &lt; b</p>");
        assert_eq!(tree.inner_html(tree.root()), "<p id=\"x\">a &lt; b</p>");
    }

    #[test]
    fn void_elements_serialize_without_a_closing_tag() {
        let mut tree = HostTree::new();
        let p = tree.create_element("p");
        let img = tree.create_element("img");
        let br = tree.create_element("br");
        tree.set_attribute(img, "src", "pic.png");
        tree.append_child(tree.root(), p);
        tree.append_child(p, img);
        tree.append_child(p, br);
        assert_eq!(tree.outer_html(p), "<p><img src=\"pic.png\"><br></p>");
    }

    #[test]
    fn record_generator_feeds_every_drain() {
        let mut tree = HostTree::new();
        let p = tree.create_element("p");
        tree.append_child(tree.root(), p);
        tree.take_records();
        tree.set_record_generator(move || vec![MutationRecord::character_data(p)]);
        assert_eq!(tree.take_records().len(), 1);
        assert_eq!(tree.take_records().len(), 1);
        tree.clear_record_generator();
        assert!(tree.take_records().is_empty());
    }

    #[test]
    fn camelize_and_hyphenate_are_inverses() {
        assert_eq!(camelize("font-size"), "fontSize");
        assert_eq!(camelize("border-top-width"), "borderTopWidth");
        assert_eq!(hyphenate("fontSize"), "font-size");
        assert_eq!(camelize("color"), "color");
    }
}
