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

//! The document root and the blot tree it owns.
//!
//! [`Scroll`] is the engine's context object: it owns the host tree, the
//! registry, the blot arena, and the identity table mapping host nodes
//! back to blots. Every blot is addressed by a [`BlotId`] into the arena;
//! slots are never reused, so a stale id can only hit an empty slot,
//! never a recycled blot.
//!
//! The `impl` blocks are split by concern: child-list structure in
//! `children`, content operations in `ops`, record folding in `update`,
//! and the convergence loop in `optimize`.

mod children;
mod ops;
mod optimize;
mod update;

use std::collections::HashMap;

use tracing::trace;

use crate::attributor::AttributorStore;
use crate::error::{ModelError, Result};
use crate::host::{HostTree, NodeId};
use crate::registry::{BlotFlavor, Definition, Registry};
use crate::scope::Scope;
use crate::value::Value;

/// Handle to a blot in the scroll's arena. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlotId(pub(crate) usize);

/// Arena slot state for one blot.
pub(crate) struct BlotNode {
    /// Registry index of this blot's definition.
    pub(crate) def: usize,
    /// The host node this blot projects onto.
    pub(crate) node: NodeId,
    pub(crate) parent: Option<BlotId>,
    pub(crate) prev: Option<BlotId>,
    pub(crate) next: Option<BlotId>,
    pub(crate) head: Option<BlotId>,
    pub(crate) tail: Option<BlotId>,
    pub(crate) child_count: usize,
    /// Cached string mirror, text blots only.
    pub(crate) text: String,
    /// Active formatting attributes, inline and block blots only.
    pub(crate) attributes: AttributorStore,
    /// Overlay host child carrying no blot (list markers and the like).
    pub(crate) ui_node: Option<NodeId>,
}

impl BlotNode {
    fn new(def: usize, node: NodeId) -> Self {
        Self {
            def,
            node,
            parent: None,
            prev: None,
            next: None,
            head: None,
            tail: None,
            child_count: 0,
            text: String::new(),
            attributes: AttributorStore::default(),
            ui_node: None,
        }
    }
}

/// The document root: host tree, registry, blot arena, and identity
/// table in one place.
pub struct Scroll {
    pub(crate) host: HostTree,
    pub(crate) registry: Registry,
    pub(crate) arena: Vec<Option<BlotNode>>,
    pub(crate) identity: HashMap<NodeId, BlotId>,
    root: BlotId,
}

impl Scroll {
    /// A scroll over the four core variants.
    pub fn new() -> Self {
        Self::with_registry(Registry::with_defaults())
            .expect("core registry carries a scroll definition")
    }

    /// A scroll over a caller-built registry, which must define a
    /// `scroll` root variant.
    pub fn with_registry(registry: Registry) -> Result<Self> {
        let root_def = registry
            .query("scroll", Scope::ANY)
            .ok_or_else(|| ModelError::UnableToCreate("scroll".to_string()))?;
        let host = HostTree::new();
        let root_node = host.root();
        let mut scroll = Self {
            host,
            registry,
            arena: Vec::new(),
            identity: HashMap::new(),
            root: BlotId(0),
        };
        scroll.root = scroll.alloc_blot(BlotNode::new(root_def, root_node));
        scroll.attach(scroll.root);
        Ok(scroll)
    }

    /// The root blot.
    pub fn root(&self) -> BlotId {
        self.root
    }

    /// The host tree, for reads.
    pub fn host(&self) -> &HostTree {
        &self.host
    }

    /// The host tree, for "external" mutations the engine will later
    /// reconcile.
    pub fn host_mut(&mut self) -> &mut HostTree {
        &mut self.host
    }

    /// The registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a definition on the underlying registry.
    pub fn register(&mut self, definition: Definition) -> Result<usize> {
        self.registry.register(definition)
    }

    /// Resolve a name against the registry.
    pub fn query(&self, name: &str, probe: Scope) -> Option<usize> {
        self.registry.query(name, probe)
    }

    // ---- arena ---------------------------------------------------------

    pub(crate) fn alloc_blot(&mut self, blot: BlotNode) -> BlotId {
        let id = BlotId(self.arena.len());
        self.arena.push(Some(blot));
        id
    }

    pub(crate) fn blot(&self, id: BlotId) -> &BlotNode {
        self.arena[id.0].as_ref().expect("blot slot already freed")
    }

    pub(crate) fn blot_mut(&mut self, id: BlotId) -> &mut BlotNode {
        self.arena[id.0].as_mut().expect("blot slot already freed")
    }

    /// Whether `id` still addresses a live blot.
    pub fn is_alive(&self, id: BlotId) -> bool {
        self.arena.get(id.0).is_some_and(Option::is_some)
    }

    // ---- blot accessors ------------------------------------------------

    /// Registry index of the blot's definition.
    pub fn definition_index(&self, id: BlotId) -> usize {
        self.blot(id).def
    }

    /// The blot's definition name.
    pub fn name(&self, id: BlotId) -> &str {
        self.registry.name_of(self.blot(id).def)
    }

    /// The blot's structural flavor.
    pub fn flavor(&self, id: BlotId) -> BlotFlavor {
        match self.registry.get(self.blot(id).def) {
            Definition::Blot(spec) => spec.flavor,
            // Attributor indices never land on blots.
            Definition::Attr(_) => BlotFlavor::Embed,
        }
    }

    /// The host node the blot projects onto.
    pub fn host_node(&self, id: BlotId) -> NodeId {
        self.blot(id).node
    }

    /// Parent blot, if attached.
    pub fn parent_of(&self, id: BlotId) -> Option<BlotId> {
        self.blot(id).parent
    }

    /// Next sibling blot.
    pub fn next_of(&self, id: BlotId) -> Option<BlotId> {
        self.blot(id).next
    }

    /// Previous sibling blot.
    pub fn prev_of(&self, id: BlotId) -> Option<BlotId> {
        self.blot(id).prev
    }

    /// Whether the blot's flavor can hold children.
    pub fn is_parent(&self, id: BlotId) -> bool {
        matches!(
            self.flavor(id),
            BlotFlavor::Scroll
                | BlotFlavor::Block
                | BlotFlavor::Inline
                | BlotFlavor::Container
        )
    }

    /// Whether the blot is a leaf (text or embed).
    pub fn is_leaf(&self, id: BlotId) -> bool {
        matches!(self.flavor(id), BlotFlavor::Text | BlotFlavor::Embed)
    }

    // ---- identity ------------------------------------------------------

    /// Enter the blot into the identity table.
    pub(crate) fn attach(&mut self, id: BlotId) {
        let node = self.blot(id).node;
        self.identity.insert(node, id);
    }

    /// Map a host node back to its blot. With `bubbling`, climbs host
    /// parents until a registered node is found.
    pub fn find(&self, node: NodeId, bubbling: bool) -> Option<BlotId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(&id) = self.identity.get(&n) {
                return Some(id);
            }
            if !bubbling {
                return None;
            }
            cur = self.host.parent(n);
        }
        None
    }

    // ---- creation ------------------------------------------------------

    /// Create a detached blot by definition name.
    pub fn create(&mut self, name: &str, value: Option<&Value>) -> Result<BlotId> {
        let def = self
            .registry
            .query(name, Scope::BLOT)
            .ok_or_else(|| ModelError::UnableToCreate(name.to_string()))?;
        self.create_by_index(def, value)
    }

    /// Create a detached blot for the generic variant at `level`.
    pub fn create_generic(&mut self, level: Scope) -> Result<BlotId> {
        let def = self
            .registry
            .query_scope(level, Scope::BLOT)
            .ok_or_else(|| ModelError::UnableToCreate(format!("{level:?}")))?;
        self.create_by_index(def, None)
    }

    /// Create a detached blot from a definition index, building its host
    /// node.
    pub fn create_by_index(&mut self, def: usize, value: Option<&Value>) -> Result<BlotId> {
        let (flavor, tag, hook) = {
            let spec = self
                .registry
                .blot_spec(def)
                .ok_or_else(|| ModelError::UnableToCreate(self.registry.name_of(def).to_string()))?;
            (spec.flavor, spec.tag_name.clone(), spec.create_node.clone())
        };
        let node = match flavor {
            BlotFlavor::Text => {
                let data = value.and_then(Value::as_str).unwrap_or_default();
                self.host.create_text(data)
            }
            BlotFlavor::Embed => match hook {
                Some(hook) => hook(&mut self.host, value),
                None => {
                    let tag = tag.ok_or_else(|| {
                        ModelError::UnableToCreate(self.registry.name_of(def).to_string())
                    })?;
                    self.host.create_element(&tag)
                }
            },
            _ => {
                let tag = tag.ok_or_else(|| {
                    ModelError::UnableToCreate(self.registry.name_of(def).to_string())
                })?;
                self.host.create_element(&tag)
            }
        };
        let mut blot = BlotNode::new(def, node);
        if flavor == BlotFlavor::Text {
            blot.text = self.host.text(node).unwrap_or_default().to_string();
        }
        let id = self.alloc_blot(blot);
        self.attach(id);
        Ok(id)
    }

    /// Adopt an existing host node: resolve it through the registry and
    /// build a blot around it without touching the host tree.
    pub fn create_for_node(&mut self, node: NodeId, probe: Scope) -> Result<BlotId> {
        let def = self
            .registry
            .query_node(&self.host, node, probe)
            .ok_or_else(|| {
                let label = self
                    .host
                    .tag(node)
                    .map(str::to_string)
                    .unwrap_or_else(|| "#text".to_string());
                ModelError::UnableToCreate(label)
            })?;
        let mut blot = BlotNode::new(def, node);
        if self.registry.blot_spec(def).is_some_and(|s| s.flavor == BlotFlavor::Text) {
            blot.text = self.host.text(node).unwrap_or_default().to_string();
        }
        let store_needed = self
            .registry
            .blot_spec(def)
            .is_some_and(|s| s.is_formattable());
        let id = self.alloc_blot(blot);
        self.attach(id);
        if store_needed {
            self.rebuild_attributes(id);
        }
        Ok(id)
    }

    /// Rescan a formattable blot's host markers into its store.
    pub(crate) fn rebuild_attributes(&mut self, id: BlotId) {
        let node = self.blot(id).node;
        let mut store = std::mem::take(&mut self.blot_mut(id).attributes);
        store.build(&self.registry, &self.host, node);
        self.blot_mut(id).attributes = store;
    }

    // ---- detach / remove ----------------------------------------------

    /// Purge the identity entries of `id` and everything below it, and
    /// free the arena slots. Host nodes are untouched.
    pub(crate) fn detach_subtree(&mut self, id: BlotId) {
        let mut child = self.blot(id).head;
        while let Some(c) = child {
            let next = self.blot(c).next;
            self.detach_subtree(c);
            child = next;
        }
        let node = self.blot(id).node;
        trace!(blot = id.0, "detaching blot");
        self.identity.remove(&node);
        self.arena[id.0] = None;
    }

    /// Remove the blot from the tree and the host, purging its subtree.
    pub fn remove_blot(&mut self, id: BlotId) {
        let node = self.blot(id).node;
        self.unlink(id);
        self.host.remove(node);
        self.detach_subtree(id);
    }

    // ---- length --------------------------------------------------------

    /// Content length in UTF-16 code units. Embeds count 1; parents sum
    /// their children.
    pub fn length(&self, id: BlotId) -> usize {
        match self.flavor(id) {
            BlotFlavor::Text => crate::host::utf16_len(&self.blot(id).text),
            BlotFlavor::Embed => 1,
            _ => {
                let mut sum = 0;
                let mut child = self.blot(id).head;
                while let Some(c) = child {
                    sum += self.length(c);
                    child = self.blot(c).next;
                }
                sum
            }
        }
    }

    // ---- ui node -------------------------------------------------------

    /// Install an overlay host child that carries no blot. It is kept as
    /// the parent's first host child and skipped during adoption.
    pub fn attach_ui(&mut self, id: BlotId, node: NodeId) {
        if let Some(old) = self.blot(id).ui_node {
            self.host.remove(old);
        }
        self.host.set_attribute(node, "contenteditable", "false");
        let parent_node = self.blot(id).node;
        let first = self.host.first_child(parent_node);
        self.host.insert_before(parent_node, node, first);
        self.blot_mut(id).ui_node = Some(node);
    }

    /// The blot's overlay node, if one is installed.
    pub fn ui_node(&self, id: BlotId) -> Option<NodeId> {
        self.blot(id).ui_node
    }

    // ---- snapshots -----------------------------------------------------

    /// Serialized HTML of the document content.
    pub fn html(&self) -> String {
        self.host.inner_html(self.blot(self.root).node)
    }

    /// Indented debug dump of the blot tree.
    pub fn to_tree(&self) -> String {
        let mut out = String::new();
        self.dump(self.root, 0, &mut out);
        out
    }

    fn dump(&self, id: BlotId, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.name(id));
        match self.flavor(id) {
            BlotFlavor::Text => {
                out.push_str(" \"");
                out.push_str(&self.blot(id).text);
                out.push('"');
            }
            _ => {
                if let Some(tag) = self.host.tag(self.blot(id).node) {
                    out.push_str(" <");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
        out.push('\n');
        let mut child = self.blot(id).head;
        while let Some(c) = child {
            self.dump(c, depth + 1, out);
            child = self.blot(c).next;
        }
    }

    // ---- invariants ----------------------------------------------------

    /// Walk the whole tree checking link, identity, and host-order
    /// consistency. Panics on the first violation. With the
    /// `assert-invariants` feature this runs after every public
    /// operation.
    pub fn assert_invariants(&self) {
        self.check_subtree(self.root);
    }

    pub(crate) fn debug_check(&self) {
        #[cfg(feature = "assert-invariants")]
        self.assert_invariants();
    }

    fn check_subtree(&self, id: BlotId) {
        let blot = self.blot(id);
        assert_eq!(
            self.identity.get(&blot.node),
            Some(&id),
            "identity table must map the blot's host node back to it"
        );
        let mut count = 0;
        let mut prev: Option<BlotId> = None;
        let mut child = blot.head;
        let mut host_children: Vec<NodeId> = self
            .host
            .children(blot.node)
            .iter()
            .copied()
            .filter(|&n| Some(n) != blot.ui_node)
            .collect();
        host_children.reverse();
        while let Some(c) = child {
            let entry = self.blot(c);
            assert_eq!(entry.parent, Some(id), "child parent link");
            assert_eq!(entry.prev, prev, "child prev link");
            assert_eq!(
                host_children.pop(),
                Some(entry.node),
                "host child order must mirror blot child order"
            );
            count += 1;
            prev = Some(c);
            child = entry.next;
        }
        assert_eq!(blot.tail, prev, "tail link");
        assert_eq!(blot.child_count, count, "child count");
        let mut c = blot.head;
        while let Some(inner) = c {
            self.check_subtree(inner);
            c = self.blot(inner).next;
        }
    }
}

impl Default for Scroll {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_scroll_holds_only_the_root() {
        let scroll = Scroll::new();
        assert_eq!(scroll.name(scroll.root()), "scroll");
        assert_eq!(scroll.length(scroll.root()), 0);
        assert_eq!(scroll.html(), "");
        scroll.assert_invariants();
    }

    #[test]
    fn create_resolves_names_and_fails_on_unknown_ones() {
        let mut scroll = Scroll::new();
        let block = scroll.create("block", None).unwrap();
        assert_eq!(scroll.name(block), "block");
        assert_eq!(scroll.host().tag(scroll.host_node(block)), Some("P"));
        assert_eq!(
            scroll.create("marquee", None),
            Err(ModelError::UnableToCreate("marquee".to_string()))
        );
    }

    #[test]
    fn find_bubbles_through_unregistered_host_nodes() {
        let mut scroll = Scroll::new();
        let block = scroll.create("block", None).unwrap();
        let root = scroll.root();
        scroll.append(root, block);
        let stray = scroll.host_mut().create_element("em");
        let block_node = scroll.host_node(block);
        scroll.host_mut().append_child(block_node, stray);
        assert_eq!(scroll.find(stray, false), None);
        assert_eq!(scroll.find(stray, true), Some(block));
    }

    #[test]
    fn detach_purges_identity_recursively() {
        let mut scroll = Scroll::new();
        let root = scroll.root();
        let block = scroll.create("block", None).unwrap();
        let text = scroll.create("text", Some(&Value::from("hi"))).unwrap();
        scroll.append(root, block);
        scroll.append(block, text);
        let text_node = scroll.host_node(text);

        scroll.remove_blot(block);
        assert!(!scroll.is_alive(block));
        assert!(!scroll.is_alive(text));
        assert_eq!(scroll.find(text_node, false), None);
        assert_eq!(scroll.length(root), 0);
    }
}
