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

//! Named formatting attributes and their per-node store.
//!
//! An [`Attributor`] encodes one named attribute onto a host node using
//! one of three interchangeable strategies:
//!
//! | Kind        | Encoding                                        |
//! |-------------|-------------------------------------------------|
//! | `Attribute` | a dedicated attribute, `key="value"`            |
//! | `Class`     | a prefixed class token, `key-value`             |
//! | `Style`     | a style property, `key: value`                  |
//!
//! All three share the `add`/`remove`/`value`/`can_add` contract. The
//! [`AttributorStore`] tracks which attributors are currently realized on
//! one node and can rebuild that set by rescanning the node's markers
//! against the registry.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::Display;

use crate::host::{camelize, HostTree, NodeId};
use crate::registry::Registry;
use crate::scope::Scope;
use crate::value::Value;

static QUOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']"#).expect("quote pattern"));

/// How an attributor writes its value to a host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AttributorKind {
    /// A dedicated attribute on the node.
    Attribute,
    /// A `{key}-{value}` class token.
    Class,
    /// A style property, camel-cased from the hyphenated key.
    Style,
}

/// One named formatting attribute.
#[derive(Debug, Clone)]
pub struct Attributor {
    /// The format name exposed to content operations.
    pub attr_name: String,
    /// The key used in the host encoding.
    pub key_name: String,
    /// Always an attribute-type scope; only the LEVEL axis varies.
    pub scope: Scope,
    /// Legal values; `None` accepts anything.
    pub whitelist: Option<Vec<String>>,
    /// The encoding strategy.
    pub kind: AttributorKind,
}

impl Attributor {
    fn new(kind: AttributorKind, attr_name: &str, key_name: &str) -> Self {
        Self {
            attr_name: attr_name.to_string(),
            key_name: key_name.to_string(),
            scope: Scope::ATTRIBUTE,
            whitelist: None,
            kind,
        }
    }

    /// A dedicated-attribute encoder.
    pub fn attribute(attr_name: &str, key_name: &str) -> Self {
        Self::new(AttributorKind::Attribute, attr_name, key_name)
    }

    /// A class-token encoder.
    pub fn class(attr_name: &str, key_name: &str) -> Self {
        Self::new(AttributorKind::Class, attr_name, key_name)
    }

    /// A style-property encoder.
    pub fn style(attr_name: &str, key_name: &str) -> Self {
        Self::new(AttributorKind::Style, attr_name, key_name)
    }

    /// Restrict the LEVEL axis; the TYPE axis stays attribute.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = (scope & Scope::LEVEL) | (Scope::ATTRIBUTE & Scope::TYPE);
        self
    }

    /// Restrict legal values.
    pub fn with_whitelist(mut self, values: &[&str]) -> Self {
        self.whitelist = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Whether `value` is legal for this attributor. Surrounding quote
    /// characters are stripped before whitelist comparison, since host
    /// environments normalize style strings inconsistently.
    pub fn can_add(&self, value: &str) -> bool {
        match &self.whitelist {
            None => true,
            Some(list) => {
                let stripped = QUOTES.replace_all(value, "");
                list.iter().any(|legal| *legal == stripped)
            }
        }
    }

    /// Realize `value` on `node`. Returns false (and writes nothing)
    /// unless [`can_add`](Self::can_add) passes.
    pub fn add(&self, host: &mut HostTree, node: NodeId, value: &str) -> bool {
        if !self.can_add(value) {
            return false;
        }
        match self.kind {
            AttributorKind::Attribute => {
                host.set_attribute(node, &self.key_name, value);
            }
            AttributorKind::Class => {
                // At most one logical value: clear every same-prefixed
                // token before adding the new one.
                self.remove(host, node);
                host.add_class(node, &format!("{}-{}", self.key_name, value));
            }
            AttributorKind::Style => {
                host.set_style(node, &camelize(&self.key_name), value);
            }
        }
        true
    }

    /// Clear this attribute's encoding from `node`.
    pub fn remove(&self, host: &mut HostTree, node: NodeId) {
        match self.kind {
            AttributorKind::Attribute => {
                host.remove_attribute(node, &self.key_name);
            }
            AttributorKind::Class => {
                let prefix = format!("{}-", self.key_name);
                for token in host.classes(node) {
                    if token.starts_with(&prefix) {
                        host.remove_class(node, &token);
                    }
                }
            }
            AttributorKind::Style => {
                host.remove_style(node, &camelize(&self.key_name));
            }
        }
    }

    /// The decoded value currently realized on `node`, if it still
    /// passes [`can_add`](Self::can_add).
    pub fn value(&self, host: &HostTree, node: NodeId) -> Option<String> {
        let raw = match self.kind {
            AttributorKind::Attribute => {
                host.attribute(node, &self.key_name).map(str::to_string)
            }
            AttributorKind::Class => {
                let prefix = format!("{}-", self.key_name);
                host.classes(node)
                    .into_iter()
                    .find(|token| token.starts_with(&prefix))
                    .map(|token| token[prefix.len()..].to_string())
            }
            AttributorKind::Style => host.style(node, &camelize(&self.key_name)),
        }?;
        if self.can_add(&raw) {
            Some(raw)
        } else {
            None
        }
    }

    /// The candidate attribute keys of `kind` realized on `node`, in the
    /// registry's key space (hyphenated for styles, prefix for classes).
    pub fn keys(kind: AttributorKind, host: &HostTree, node: NodeId) -> Vec<String> {
        match kind {
            AttributorKind::Attribute => host.attribute_names(node),
            AttributorKind::Class => host
                .classes(node)
                .into_iter()
                .filter_map(|token| {
                    token.rsplit_once('-').map(|(prefix, _)| prefix.to_string())
                })
                .collect(),
            AttributorKind::Style => host
                .style_properties(node)
                .into_iter()
                .map(|property| crate::host::hyphenate(&property))
                .collect(),
        }
    }
}

/// Per-node mapping from attribute name to the attributor currently
/// realized on that node. Attributor definitions themselves live in the
/// registry; the store holds definition indices.
#[derive(Debug, Clone, Default)]
pub struct AttributorStore {
    attributes: HashMap<String, usize>,
}

impl AttributorStore {
    /// Rescan `node`'s realized markers, tokens, and properties,
    /// intersecting recognized keys against the registry.
    pub fn build(&mut self, registry: &Registry, host: &HostTree, node: NodeId) {
        self.attributes.clear();
        let mut keys = Attributor::keys(AttributorKind::Attribute, host, node);
        keys.extend(Attributor::keys(AttributorKind::Class, host, node));
        keys.extend(Attributor::keys(AttributorKind::Style, host, node));
        for key in keys {
            let Some(index) = registry.query(&key, Scope::ATTRIBUTE) else {
                continue;
            };
            if let Some(attr) = registry.attributor(index) {
                self.attributes.insert(attr.attr_name.clone(), index);
            }
        }
    }

    /// Apply or clear one attribute on `node`, keeping the store in
    /// sync. `None` clears.
    pub fn attribute(
        &mut self,
        registry: &Registry,
        host: &mut HostTree,
        node: NodeId,
        index: usize,
        value: Option<&str>,
    ) -> bool {
        let Some(attr) = registry.attributor(index) else {
            return false;
        };
        match value {
            Some(value) => {
                if attr.add(host, node, value) {
                    self.attributes.insert(attr.attr_name.clone(), index);
                    true
                } else {
                    false
                }
            }
            None => {
                attr.remove(host, node);
                self.attributes.remove(&attr.attr_name);
                true
            }
        }
    }

    /// Re-apply every currently active attribute's value onto `target`.
    pub fn copy(
        &self,
        registry: &Registry,
        host: &mut HostTree,
        source: NodeId,
        target: NodeId,
    ) {
        for &index in self.attributes.values() {
            let Some(attr) = registry.attributor(index) else {
                continue;
            };
            if let Some(value) = attr.value(host, source) {
                attr.add(host, target, &value);
            }
        }
    }

    /// Copy active attributes onto `target`, then clear them from
    /// `source` (and from the store).
    pub fn move_to(
        &mut self,
        registry: &Registry,
        host: &mut HostTree,
        source: NodeId,
        target: NodeId,
    ) {
        self.copy(registry, host, source, target);
        for &index in self.attributes.values() {
            if let Some(attr) = registry.attributor(index) {
                attr.remove(host, source);
            }
        }
        self.attributes.clear();
    }

    /// Snapshot of active attribute values on `node`.
    pub fn values(
        &self,
        registry: &Registry,
        host: &HostTree,
        node: NodeId,
    ) -> HashMap<String, Value> {
        let mut out = HashMap::new();
        for (name, &index) in &self.attributes {
            let Some(attr) = registry.attributor(index) else {
                continue;
            };
            if let Some(value) = attr.value(host, node) {
                out.insert(name.clone(), Value::Str(value));
            }
        }
        out
    }

    /// Whether `name` is currently active.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of active attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attributes are active.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_comparison_strips_quotes() {
        let attr = Attributor::style("font", "font-family")
            .with_whitelist(&["serif", "monospace"]);
        assert!(attr.can_add("serif"));
        assert!(attr.can_add("\"monospace\""));
        assert!(attr.can_add("'serif'"));
        assert!(!attr.can_add("cursive"));
    }

    #[test]
    fn add_fails_silently_outside_the_whitelist() {
        let mut host = HostTree::new();
        let span = host.create_element("span");
        let attr = Attributor::attribute("align", "data-align")
            .with_whitelist(&["left", "right"]);
        assert!(!attr.add(&mut host, span, "diagonal"));
        assert_eq!(host.attribute(span, "data-align"), None);
        assert!(attr.add(&mut host, span, "right"));
        assert_eq!(host.attribute(span, "data-align"), Some("right"));
    }

    #[test]
    fn class_attributor_keeps_one_logical_value() {
        let mut host = HostTree::new();
        let span = host.create_element("span");
        host.add_class(span, "size-small");
        host.add_class(span, "size-huge");
        let attr = Attributor::class("size", "size");
        assert!(attr.add(&mut host, span, "large"));
        assert_eq!(host.classes(span), vec!["size-large"]);
        assert_eq!(attr.value(&host, span).as_deref(), Some("large"));
        attr.remove(&mut host, span);
        assert!(host.classes(span).is_empty());
    }

    #[test]
    fn style_attributor_camelizes_its_key() {
        let mut host = HostTree::new();
        let span = host.create_element("span");
        let attr = Attributor::style("size", "font-size");
        assert!(attr.add(&mut host, span, "18px"));
        assert_eq!(host.attribute(span, "style"), Some("font-size: 18px"));
        assert_eq!(attr.value(&host, span).as_deref(), Some("18px"));
        attr.remove(&mut host, span);
        assert_eq!(host.attribute(span, "style"), None);
    }

    #[test]
    fn value_is_empty_when_realized_value_left_the_whitelist() {
        let mut host = HostTree::new();
        let span = host.create_element("span");
        host.set_attribute(span, "data-align", "diagonal");
        let attr = Attributor::attribute("align", "data-align")
            .with_whitelist(&["left", "right"]);
        assert_eq!(attr.value(&host, span), None);
    }

    #[test]
    fn keys_report_the_registry_key_space() {
        let mut host = HostTree::new();
        let span = host.create_element("span");
        host.set_attribute(span, "data-align", "left");
        host.add_class(span, "size-large");
        host.set_attribute(span, "style", "font-size: 10px");
        assert!(Attributor::keys(AttributorKind::Attribute, &host, span)
            .contains(&"data-align".to_string()));
        assert_eq!(
            Attributor::keys(AttributorKind::Class, &host, span),
            vec!["size"]
        );
        assert_eq!(
            Attributor::keys(AttributorKind::Style, &host, span),
            vec!["font-size"]
        );
    }
}
