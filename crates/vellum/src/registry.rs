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

//! Definition registry mapping names, tags, and class markers to blot
//! and attributor definitions.
//!
//! Blots are described by data-driven [`BlotSpec`] descriptors rather
//! than a type hierarchy: one struct carries the flavor, scope, host
//! selectors, child rules, and the embed hooks. Definitions are stored
//! once and addressed by index everywhere else in the engine, so specs
//! and attributors never need to be cloned per node.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strum_macros::Display;

use crate::attributor::Attributor;
use crate::error::{ModelError, Result};
use crate::host::{HostTree, NodeId};
use crate::scope::Scope;
use crate::value::Value;

/// Reserved name no definition may take.
const ABSTRACT_NAME: &str = "abstract";

/// The structural role a blot plays in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BlotFlavor {
    /// The document root.
    Scroll,
    /// A block-level formatted parent.
    Block,
    /// An inline formatted parent.
    Inline,
    /// An unformatted grouping parent.
    Container,
    /// A text leaf.
    Text,
    /// An opaque leaf widget.
    Embed,
}

/// One rule in a parent's allowed-children list.
#[derive(Debug, Clone)]
pub enum ChildRule {
    /// Allows the definition with this blot name.
    ByName(String),
    /// Allows any definition whose scope matches this probe.
    ByScope(Scope),
    /// Allows any definition of this flavor.
    ByFlavor(BlotFlavor),
}

/// Builds the host node for an embed, from an optional initial value.
pub type CreateNodeFn = Arc<dyn Fn(&mut HostTree, Option<&Value>) -> NodeId>;

/// Reads an embed's canonical value back off its host node.
pub type ValueOfFn = Arc<dyn Fn(&HostTree, NodeId) -> Value>;

/// A data-driven blot descriptor.
#[derive(Clone)]
pub struct BlotSpec {
    /// The name content operations use.
    pub blot_name: String,
    /// The structural role.
    pub flavor: BlotFlavor,
    /// Always a blot-type scope; the LEVEL axis follows the flavor.
    pub scope: Scope,
    /// Host tag created for (and matched against) this blot.
    pub tag_name: Option<String>,
    /// Class marker identifying this blot on a shared tag.
    pub class_name: Option<String>,
    /// Which children a parent of this spec accepts. Empty means
    /// unrestricted.
    pub allowed_children: Vec<ChildRule>,
    /// Name of the child synthesized when this parent empties, instead
    /// of removing the parent itself.
    pub default_child: Option<String>,
    /// Embed hook: build the host node.
    pub create_node: Option<CreateNodeFn>,
    /// Embed hook: read the canonical value.
    pub value_of: Option<ValueOfFn>,
}

impl fmt::Debug for BlotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlotSpec")
            .field("blot_name", &self.blot_name)
            .field("flavor", &self.flavor)
            .field("scope", &self.scope)
            .field("tag_name", &self.tag_name)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

impl BlotSpec {
    fn new(name: &str, flavor: BlotFlavor, scope: Scope) -> Self {
        Self {
            blot_name: name.to_string(),
            flavor,
            scope,
            tag_name: None,
            class_name: None,
            allowed_children: Vec::new(),
            default_child: None,
            create_node: None,
            value_of: None,
        }
    }

    /// The document root descriptor. Accepts block-level blots and
    /// containers, and refills with its default child when emptied.
    pub fn scroll(name: &str, tag: &str) -> Self {
        let mut spec = Self::new(name, BlotFlavor::Scroll, Scope::BLOCK_BLOT);
        spec.tag_name = Some(tag.to_uppercase());
        spec.allowed_children = vec![
            ChildRule::ByScope(Scope::BLOCK_BLOT),
            ChildRule::ByFlavor(BlotFlavor::Container),
        ];
        spec.default_child = Some("block".to_string());
        spec
    }

    /// A block-level formatted parent accepting inline content.
    pub fn block(name: &str, tag: &str) -> Self {
        let mut spec = Self::new(name, BlotFlavor::Block, Scope::BLOCK_BLOT);
        spec.tag_name = Some(tag.to_uppercase());
        spec.allowed_children = vec![ChildRule::ByScope(Scope::INLINE_BLOT)];
        spec
    }

    /// An inline formatted parent accepting inline content.
    pub fn inline(name: &str, tag: &str) -> Self {
        let mut spec = Self::new(name, BlotFlavor::Inline, Scope::INLINE_BLOT);
        spec.tag_name = Some(tag.to_uppercase());
        spec.allowed_children = vec![ChildRule::ByScope(Scope::INLINE_BLOT)];
        spec
    }

    /// An unformatted grouping parent. Children are unrestricted unless
    /// rules are added.
    pub fn container(name: &str, tag: &str) -> Self {
        let mut spec = Self::new(name, BlotFlavor::Container, Scope::BLOCK_BLOT);
        spec.tag_name = Some(tag.to_uppercase());
        spec
    }

    /// The text-leaf descriptor. Matches any host text node.
    pub fn text(name: &str) -> Self {
        Self::new(name, BlotFlavor::Text, Scope::INLINE_BLOT)
    }

    /// An opaque leaf widget.
    pub fn embed(name: &str, tag: &str) -> Self {
        let mut spec = Self::new(name, BlotFlavor::Embed, Scope::INLINE_BLOT);
        spec.tag_name = Some(tag.to_uppercase());
        spec
    }

    /// Override the LEVEL axis; the TYPE axis stays blot.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = (scope & Scope::LEVEL) | (Scope::BLOT & Scope::TYPE);
        self
    }

    /// Identify this blot by a class marker instead of its tag alone.
    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    /// Replace the allowed-children rules.
    pub fn with_allowed_children(mut self, rules: Vec<ChildRule>) -> Self {
        self.allowed_children = rules;
        self
    }

    /// Set the child synthesized when this parent empties.
    pub fn with_default_child(mut self, name: &str) -> Self {
        self.default_child = Some(name.to_string());
        self
    }

    /// Install the embed node-construction hook.
    pub fn with_create_node(
        mut self,
        hook: impl Fn(&mut HostTree, Option<&Value>) -> NodeId + 'static,
    ) -> Self {
        self.create_node = Some(Arc::new(hook));
        self
    }

    /// Install the embed value-readback hook.
    pub fn with_value_of(
        mut self,
        hook: impl Fn(&HostTree, NodeId) -> Value + 'static,
    ) -> Self {
        self.value_of = Some(Arc::new(hook));
        self
    }

    /// Whether this flavor can hold children.
    pub fn is_parent(&self) -> bool {
        matches!(
            self.flavor,
            BlotFlavor::Scroll
                | BlotFlavor::Block
                | BlotFlavor::Inline
                | BlotFlavor::Container
        )
    }

    /// Whether this flavor contributes a named structural format
    /// (inline and block variants do; containers and leaves do not).
    pub fn is_formattable(&self) -> bool {
        matches!(self.flavor, BlotFlavor::Block | BlotFlavor::Inline)
    }
}

/// A registered definition.
#[derive(Debug, Clone)]
pub enum Definition {
    /// A blot descriptor.
    Blot(BlotSpec),
    /// A formatting attribute.
    Attr(Attributor),
}

impl Definition {
    fn name(&self) -> &str {
        match self {
            Definition::Blot(spec) => &spec.blot_name,
            Definition::Attr(attr) => &attr.attr_name,
        }
    }

    /// The definition's scope mask.
    pub fn scope(&self) -> Scope {
        match self {
            Definition::Blot(spec) => spec.scope,
            Definition::Attr(attr) => attr.scope,
        }
    }
}

/// Index of definitions by name, host tag, class marker, and attribute
/// key. Definition indices are stable for the registry's lifetime.
#[derive(Default)]
pub struct Registry {
    definitions: Vec<Definition>,
    by_name: HashMap<String, usize>,
    by_tag: HashMap<String, usize>,
    by_class: HashMap<String, usize>,
    by_attr_key: HashMap<String, usize>,
    text_index: Option<usize>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the four core variants: `scroll` (DIV),
    /// `block` (P), `inline` (SPAN), and `text`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(Definition::Blot(BlotSpec::scroll("scroll", "div")))
            .expect("core scroll definition");
        registry
            .register(Definition::Blot(BlotSpec::block("block", "p")))
            .expect("core block definition");
        registry
            .register(Definition::Blot(BlotSpec::inline("inline", "span")))
            .expect("core inline definition");
        registry
            .register(Definition::Blot(BlotSpec::text("text")))
            .expect("core text definition");
        registry
    }

    /// Register a definition, indexing every selector it declares.
    /// Returns the definition's index.
    pub fn register(&mut self, definition: Definition) -> Result<usize> {
        let name = definition.name().to_string();
        if name.is_empty() {
            return Err(ModelError::InvalidDefinition(
                "definition has no name".to_string(),
            ));
        }
        if name == ABSTRACT_NAME {
            return Err(ModelError::AbstractRegistration);
        }
        let index = self.definitions.len();
        match &definition {
            Definition::Blot(spec) => {
                if let Some(class) = &spec.class_name {
                    self.by_class.insert(class.clone(), index);
                }
                if let Some(tag) = &spec.tag_name {
                    // The tag default: the first class-less registration
                    // for a tag keeps it.
                    if spec.class_name.is_none() {
                        self.by_tag.entry(tag.clone()).or_insert(index);
                    }
                }
                if spec.flavor == BlotFlavor::Text && self.text_index.is_none() {
                    self.text_index = Some(index);
                }
            }
            Definition::Attr(attr) => {
                self.by_attr_key.insert(attr.key_name.clone(), index);
            }
        }
        self.by_name.insert(name, index);
        self.definitions.push(definition);
        Ok(index)
    }

    /// The definition at `index`.
    pub fn get(&self, index: usize) -> &Definition {
        &self.definitions[index]
    }

    /// The blot spec at `index`, if the definition is a blot.
    pub fn blot_spec(&self, index: usize) -> Option<&BlotSpec> {
        match self.get(index) {
            Definition::Blot(spec) => Some(spec),
            Definition::Attr(_) => None,
        }
    }

    /// The attributor at `index`, if the definition is one.
    pub fn attributor(&self, index: usize) -> Option<&Attributor> {
        match self.get(index) {
            Definition::Attr(attr) => Some(attr),
            Definition::Blot(_) => None,
        }
    }

    /// The name of the definition at `index`.
    pub fn name_of(&self, index: usize) -> &str {
        self.get(index).name()
    }

    /// The first-registered text definition, if any.
    pub fn text_definition(&self) -> Option<usize> {
        self.text_index
    }

    fn admit(&self, index: usize, probe: Scope) -> Option<usize> {
        if self.get(index).scope().matches(probe) {
            Some(index)
        } else {
            None
        }
    }

    /// Look up by blot name, attribute name or key, class marker, or
    /// tag, in that order, admitting only definitions whose scope
    /// intersects `probe` on both axes.
    pub fn query(&self, name: &str, probe: Scope) -> Option<usize> {
        if let Some(&index) = self.by_name.get(name) {
            return self.admit(index, probe);
        }
        if let Some(&index) = self.by_attr_key.get(name) {
            return self.admit(index, probe);
        }
        if let Some(&index) = self.by_class.get(name) {
            return self.admit(index, probe);
        }
        if let Some(&index) = self.by_tag.get(&name.to_uppercase()) {
            return self.admit(index, probe);
        }
        None
    }

    /// The generic fallback for a bare scope probe: the `block` variant
    /// for block-level probes, the `inline` variant otherwise.
    pub fn query_scope(&self, level: Scope, probe: Scope) -> Option<usize> {
        let name = if level.is_block_level() { "block" } else { "inline" };
        let &index = self.by_name.get(name)?;
        self.admit(index, probe)
    }

    /// Resolve a host node to a definition: text nodes map to the text
    /// variant, elements match class markers first and then their tag.
    pub fn query_node(&self, host: &HostTree, node: NodeId, probe: Scope) -> Option<usize> {
        if host.is_text(node) {
            let index = self.text_index?;
            return self.admit(index, probe);
        }
        for token in host.classes(node) {
            let Some((prefix, _)) = token.rsplit_once('-') else {
                continue;
            };
            if let Some(&index) = self.by_class.get(prefix) {
                if let Some(found) = self.admit(index, probe) {
                    return Some(found);
                }
            }
        }
        let tag = host.tag(node)?;
        let &index = self.by_tag.get(tag)?;
        self.admit(index, probe)
    }

    /// Whether the definition at `child` satisfies `rule`.
    pub fn rule_admits(&self, rule: &ChildRule, child: usize) -> bool {
        match rule {
            ChildRule::ByName(name) => self.name_of(child) == name,
            ChildRule::ByScope(scope) => self.get(child).scope().matches(*scope),
            ChildRule::ByFlavor(flavor) => self
                .blot_spec(child)
                .is_some_and(|spec| spec.flavor == *flavor),
        }
    }

    /// Whether the parent spec at `parent` accepts the definition at
    /// `child`. An empty rule list is unrestricted.
    pub fn allows_child(&self, parent: usize, child: usize) -> bool {
        let Some(spec) = self.blot_spec(parent) else {
            return false;
        };
        if spec.allowed_children.is_empty() {
            return true;
        }
        spec.allowed_children
            .iter()
            .any(|rule| self.rule_admits(rule, child))
    }
}
