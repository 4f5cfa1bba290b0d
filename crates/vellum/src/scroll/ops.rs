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

//! Index-addressed content operations and structural edits.
//!
//! Blot-level operations take a [`BlotId`] and keep model and host in
//! lockstep. The root wrappers at the bottom drain pending host records
//! first and run the convergence pass before returning, so callers
//! always operate on (and leave behind) a reconciled tree.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{ModelError, Result};
use crate::host::NodeId;
use crate::registry::BlotFlavor;
use crate::scope::Scope;
use crate::value::Value;

use super::{BlotId, Scroll};

impl Scroll {
    // ---- structural edits ----------------------------------------------

    /// Divide the blot at a content offset, returning the blot that
    /// starts at that offset. Without `force`, offset 0 returns the blot
    /// itself and the full length returns its next sibling (`None` at
    /// the tail). With `force`, a cut is made even at the boundaries.
    pub fn split(&mut self, id: BlotId, index: usize, force: bool) -> Option<BlotId> {
        let len = self.length(id);
        if !force {
            if index == 0 {
                return Some(id);
            }
            if index >= len {
                return self.blot(id).next;
            }
        }
        match self.flavor(id) {
            BlotFlavor::Text => Some(self.split_text_blot(id, index)),
            BlotFlavor::Embed => {
                if index == 0 {
                    Some(id)
                } else {
                    self.blot(id).next
                }
            }
            _ => Some(self.split_parent_blot(id, index, force)),
        }
    }

    fn split_text_blot(&mut self, id: BlotId, index: usize) -> BlotId {
        let node = self.blot(id).node;
        let def = self.blot(id).def;
        // split_text already places the right-half node after the left.
        let right_node = self.host.split_text(node, index);
        self.blot_mut(id).text = self.host.text(node).unwrap_or_default().to_string();
        let mut blot = super::BlotNode::new(def, right_node);
        blot.text = self.host.text(right_node).unwrap_or_default().to_string();
        let right = self.alloc_blot(blot);
        self.attach(right);
        let (parent, next) = {
            let blot = self.blot(id);
            (blot.parent, blot.next)
        };
        if let Some(parent) = parent {
            self.insert_before_blot(parent, right, next);
        }
        right
    }

    fn split_parent_blot(&mut self, id: BlotId, index: usize, force: bool) -> BlotId {
        let node = self.blot(id).node;
        let def = self.blot(id).def;
        let clone_node = self.host.clone_shallow(node);
        let clone = self.alloc_blot(super::BlotNode::new(def, clone_node));
        self.attach(clone);
        let (parent, next) = {
            let blot = self.blot(id);
            (blot.parent, blot.next)
        };
        if let Some(parent) = parent {
            self.insert_before_blot(parent, clone, next);
        }
        let total = self.length(id);
        for (child, offset, _span) in self.each_at(id, index, total.saturating_sub(index)) {
            if let Some(piece) = self.split(child, offset, force) {
                self.append(clone, piece);
            }
        }
        if self
            .registry
            .blot_spec(def)
            .is_some_and(|spec| spec.is_formattable())
        {
            self.rebuild_attributes(clone);
        }
        clone
    }

    /// Cut the sub-range `[index, index + len)` out into its own blot at
    /// this blot's level, returning it. Fails with [`IsolateAtEnd`]
    /// when the range starts past the content with nothing following.
    ///
    /// [`IsolateAtEnd`]: ModelError::IsolateAtEnd
    pub fn isolate(&mut self, id: BlotId, index: usize, len: usize) -> Result<BlotId> {
        let target = self
            .split(id, index, false)
            .ok_or(ModelError::IsolateAtEnd)?;
        self.split(target, len, false);
        Ok(target)
    }

    /// Wrap the blot in a newly created parent named `name`, which takes
    /// its place in the tree. Fails with [`CannotWrap`] when the named
    /// definition cannot hold children.
    ///
    /// [`CannotWrap`]: ModelError::CannotWrap
    pub fn wrap(&mut self, id: BlotId, name: &str, value: Option<&Value>) -> Result<BlotId> {
        let def = self
            .registry
            .query(name, Scope::BLOT)
            .ok_or_else(|| ModelError::UnableToCreate(name.to_string()))?;
        if !self
            .registry
            .blot_spec(def)
            .is_some_and(|spec| spec.is_parent())
        {
            return Err(ModelError::CannotWrap(name.to_string()));
        }
        let wrapper = self.create_by_index(def, value)?;
        self.wrap_with(id, wrapper)
    }

    /// Wrap the blot in an existing (detached or attached) parent blot.
    pub fn wrap_with(&mut self, id: BlotId, wrapper: BlotId) -> Result<BlotId> {
        if !self.is_parent(wrapper) {
            return Err(ModelError::CannotWrap(self.name(wrapper).to_string()));
        }
        let (parent, next) = {
            let blot = self.blot(id);
            (blot.parent, blot.next)
        };
        if let Some(parent) = parent {
            self.insert_before_blot(parent, wrapper, next);
        }
        self.append(wrapper, id);
        Ok(wrapper)
    }

    /// Hoist the blot's children into its parent at its position, then
    /// remove the blot. A no-op on detached blots.
    pub fn unwrap_blot(&mut self, id: BlotId) {
        let (parent, next) = {
            let blot = self.blot(id);
            (blot.parent, blot.next)
        };
        let Some(parent) = parent else {
            return;
        };
        for child in self.children(id) {
            self.insert_before_blot(parent, child, next);
        }
        self.remove_blot(id);
    }

    /// Move every child of `from` into `to`, in order, before `anchor`.
    pub(crate) fn move_children(&mut self, from: BlotId, to: BlotId, anchor: Option<BlotId>) {
        for child in self.children(from) {
            self.insert_before_blot(to, child, anchor);
        }
    }

    /// Replace the blot with a newly created one named `name`, moving
    /// children and copying active formatting attributes across.
    pub fn replace_with(&mut self, id: BlotId, name: &str, value: Option<&Value>) -> Result<BlotId> {
        let def = self
            .registry
            .query(name, Scope::BLOT)
            .ok_or_else(|| ModelError::UnableToCreate(name.to_string()))?;
        self.replace_with_index(id, def, value)
    }

    pub(crate) fn replace_with_index(
        &mut self,
        id: BlotId,
        def: usize,
        value: Option<&Value>,
    ) -> Result<BlotId> {
        let replacement = self.create_by_index(def, value)?;
        let (parent, next) = {
            let blot = self.blot(id);
            (blot.parent, blot.next)
        };
        if let Some(parent) = parent {
            self.insert_before_blot(parent, replacement, next);
        }
        if self.is_parent(id) && self.is_parent(replacement) {
            self.move_children(id, replacement, None);
        }
        let formattable = self
            .registry
            .blot_spec(self.blot(id).def)
            .is_some_and(|spec| spec.is_formattable());
        if formattable {
            let source = self.blot(id).node;
            let target = self.blot(replacement).node;
            let store = std::mem::take(&mut self.blot_mut(id).attributes);
            store.copy(&self.registry, &mut self.host, source, target);
            self.blot_mut(id).attributes = store;
            self.rebuild_attributes(replacement);
        }
        self.remove_blot(id);
        Ok(replacement)
    }

    // ---- formats and values --------------------------------------------

    /// Snapshot of the blot's formats: active attributes plus the named
    /// structural format (generic variants contribute none).
    pub fn formats(&self, id: BlotId) -> HashMap<String, Value> {
        let blot = self.blot(id);
        let mut out = blot.attributes.values(&self.registry, &self.host, blot.node);
        if let Some(spec) = self.registry.blot_spec(blot.def) {
            if spec.is_formattable()
                && self.registry.query_scope(spec.scope, Scope::BLOT) != Some(blot.def)
            {
                out.insert(spec.blot_name.clone(), Value::Bool(true));
            }
        }
        out
    }

    /// The canonical `(name, value)` pair of a leaf. Text blots report
    /// their string; embeds ask their value hook, defaulting to `true`.
    pub fn value(&self, id: BlotId) -> Option<(String, Value)> {
        let blot = self.blot(id);
        let spec = self.registry.blot_spec(blot.def)?;
        match spec.flavor {
            BlotFlavor::Text => Some((
                spec.blot_name.clone(),
                Value::Str(blot.text.clone()),
            )),
            BlotFlavor::Embed => {
                let value = match &spec.value_of {
                    Some(hook) => hook(&self.host, blot.node),
                    None => Value::Bool(true),
                };
                Some((spec.blot_name.clone(), value))
            }
            _ => None,
        }
    }

    /// The cached text of a text blot.
    pub fn text_of(&self, id: BlotId) -> Option<&str> {
        match self.flavor(id) {
            BlotFlavor::Text => Some(&self.blot(id).text),
            _ => None,
        }
    }

    /// Apply (or clear, for falsy values) one named format to the whole
    /// blot. Attribute formats go through the store; the blot's own name
    /// reverts it to the generic variant; other blot names at this level
    /// restructure; block-level names applied below their level climb.
    pub fn format_blot(&mut self, id: BlotId, name: &str, value: &Value) -> Result<()> {
        let def = self.blot(id).def;
        let level = self
            .registry
            .get(def)
            .scope();
        let formattable = self
            .registry
            .blot_spec(def)
            .is_some_and(|spec| spec.is_formattable());

        let attr_probe = (level & Scope::LEVEL) | (Scope::ATTRIBUTE & Scope::TYPE);
        if formattable {
            if let Some(attr) = self.registry.query(name, attr_probe) {
                if self.registry.attributor(attr).is_some() {
                    let node = self.blot(id).node;
                    let text = value.to_attr_string();
                    let applied = value.is_truthy().then_some(text.as_str());
                    let mut store = std::mem::take(&mut self.blot_mut(id).attributes);
                    store.attribute(&self.registry, &mut self.host, node, attr, applied);
                    self.blot_mut(id).attributes = store;
                    return Ok(());
                }
            }
        }

        if name == self.name(id) {
            if !value.is_truthy() {
                if let Some(generic) = self.registry.query_scope(level, Scope::BLOT) {
                    if generic != def {
                        self.replace_with_index(id, generic, None)?;
                    }
                }
            }
            return Ok(());
        }

        let blot_probe = (level & Scope::LEVEL) | (Scope::BLOT & Scope::TYPE);
        if formattable {
            if let Some(target) = self.registry.query(name, blot_probe) {
                if self.registry.blot_spec(target).is_some() {
                    if value.is_truthy() {
                        self.replace_with_index(id, target, Some(value))?;
                    }
                    return Ok(());
                }
            }
        }

        if let Some(parent) = self.blot(id).parent {
            return self.format_blot(parent, name, value);
        }
        trace!(format = name, "ignoring format with no matching definition");
        Ok(())
    }

    /// Apply one named format over a content sub-range.
    pub fn format_at(
        &mut self,
        id: BlotId,
        index: usize,
        len: usize,
        name: &str,
        value: &Value,
    ) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        match self.flavor(id) {
            BlotFlavor::Text | BlotFlavor::Embed => {
                let target = self.isolate(id, index, len)?;
                if self.registry.query(name, Scope::BLOT).is_some() {
                    if value.is_truthy() {
                        self.wrap(target, name, Some(value))?;
                    }
                } else if self.registry.query(name, Scope::ATTRIBUTE).is_some() {
                    let level = self.registry.get(self.blot(target).def).scope();
                    let parent = self.create_generic(level)?;
                    let wrapper = self.wrap_with(target, parent)?;
                    self.format_blot(wrapper, name, value)?;
                }
                Ok(())
            }
            BlotFlavor::Block => {
                // Block-level formats cover the whole block; they never
                // split it around a sub-range.
                if self.registry.query(name, Scope::BLOCK).is_some() {
                    self.format_blot(id, name, value)
                } else {
                    self.format_children_at(id, index, len, name, value)
                }
            }
            BlotFlavor::Inline => {
                let attr_probe =
                    (Scope::INLINE & Scope::LEVEL) | (Scope::ATTRIBUTE & Scope::TYPE);
                let handles = self.formats(id).contains_key(name)
                    || self.registry.query(name, attr_probe).is_some();
                if handles {
                    let target = self.isolate(id, index, len)?;
                    self.format_blot(target, name, value)
                } else {
                    self.format_children_at(id, index, len, name, value)
                }
            }
            _ => self.format_children_at(id, index, len, name, value),
        }
    }

    fn format_children_at(
        &mut self,
        id: BlotId,
        index: usize,
        len: usize,
        name: &str,
        value: &Value,
    ) -> Result<()> {
        for (child, offset, span) in self.each_at(id, index, len) {
            self.format_at(child, offset, span, name, value)?;
        }
        Ok(())
    }

    // ---- insertion and deletion ----------------------------------------

    fn create_text_blot(&mut self, text: &str) -> Result<BlotId> {
        let def = self
            .registry
            .text_definition()
            .ok_or_else(|| ModelError::UnableToCreate("text".to_string()))?;
        self.create_by_index(def, Some(&Value::from(text)))
    }

    /// Insert plain text at a content offset.
    pub fn insert_at(&mut self, id: BlotId, index: usize, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        match self.flavor(id) {
            BlotFlavor::Text => {
                let node = self.blot(id).node;
                self.host.splice_text(node, index, 0, text);
                self.blot_mut(id).text =
                    self.host.text(node).unwrap_or_default().to_string();
                Ok(())
            }
            BlotFlavor::Embed => {
                let anchor = self.split(id, index, false);
                let parent = self
                    .blot(id)
                    .parent
                    .ok_or_else(|| ModelError::UnableToCreate("text".to_string()))?;
                let blot = self.create_text_blot(text)?;
                self.insert_before_blot(parent, blot, anchor);
                Ok(())
            }
            _ => match self.find_child(id, index, true) {
                Some((child, offset)) => self.insert_at(child, offset, text),
                None => {
                    let default_child = self
                        .registry
                        .blot_spec(self.blot(id).def)
                        .and_then(|spec| spec.default_child.clone());
                    if let Some(name) = default_child {
                        let child = self.create(&name, None)?;
                        self.append(id, child);
                        return self.insert_at(child, 0, text);
                    }
                    let blot = self.create_text_blot(text)?;
                    self.append(id, blot);
                    Ok(())
                }
            },
        }
    }

    /// Insert an embed at a content offset.
    pub fn insert_embed_at(
        &mut self,
        id: BlotId,
        index: usize,
        name: &str,
        value: &Value,
    ) -> Result<()> {
        match self.flavor(id) {
            BlotFlavor::Text | BlotFlavor::Embed => {
                let anchor = self.split(id, index, false);
                let parent = self
                    .blot(id)
                    .parent
                    .ok_or_else(|| ModelError::UnableToCreate(name.to_string()))?;
                let blot = self.create(name, Some(value))?;
                self.insert_before_blot(parent, blot, anchor);
                Ok(())
            }
            _ => match self.find_child(id, index, true) {
                Some((child, offset)) => self.insert_embed_at(child, offset, name, value),
                None => {
                    let default_child = self
                        .registry
                        .blot_spec(self.blot(id).def)
                        .and_then(|spec| spec.default_child.clone());
                    if let Some(child_name) = default_child {
                        let child = self.create(&child_name, None)?;
                        self.append(id, child);
                        return self.insert_embed_at(child, 0, name, value);
                    }
                    let blot = self.create(name, Some(value))?;
                    self.append(id, blot);
                    Ok(())
                }
            },
        }
    }

    /// Delete the content sub-range `[index, index + len)`.
    pub fn delete_at(&mut self, id: BlotId, index: usize, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        match self.flavor(id) {
            BlotFlavor::Text => {
                let total = self.length(id);
                if index == 0 && len >= total {
                    self.remove_blot(id);
                } else {
                    let node = self.blot(id).node;
                    self.host.splice_text(node, index, len, "");
                    self.blot_mut(id).text =
                        self.host.text(node).unwrap_or_default().to_string();
                }
                Ok(())
            }
            BlotFlavor::Embed => {
                self.remove_blot(id);
                Ok(())
            }
            _ => {
                // A full-range delete takes the parent itself out, not
                // just its content.
                let total = self.length(id);
                if index == 0 && len >= total && self.blot(id).parent.is_some() {
                    self.remove_blot(id);
                    return Ok(());
                }
                for (child, offset, span) in self.each_at(id, index, len) {
                    self.delete_at(child, offset, span)?;
                }
                Ok(())
            }
        }
    }

    // ---- leaf mapping --------------------------------------------------

    /// Map a host node and host-local offset to a content offset within
    /// this leaf. `None` when the node does not belong to the leaf.
    pub fn index_of_node(&self, id: BlotId, node: NodeId, offset: usize) -> Option<usize> {
        let blot = self.blot(id);
        match self.flavor(id) {
            BlotFlavor::Text => {
                if node == blot.node {
                    Some(offset.min(crate::host::utf16_len(&blot.text)))
                } else {
                    None
                }
            }
            BlotFlavor::Embed => {
                if node == blot.node || self.host.contains(blot.node, node) {
                    Some(offset.min(1))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Map a content offset within this leaf to a host node and
    /// host-local offset.
    pub fn position(&self, id: BlotId, offset: usize, _inclusive: bool) -> (NodeId, usize) {
        let blot = self.blot(id);
        match self.flavor(id) {
            BlotFlavor::Text => (blot.node, offset),
            _ => {
                let parent_node = self
                    .host
                    .parent(blot.node)
                    .unwrap_or(blot.node);
                let mut index = self.host.index_in_parent(blot.node).unwrap_or(0);
                if offset > 0 {
                    index += 1;
                }
                (parent_node, index)
            }
        }
    }

    /// The chain of `(blot, local offset)` pairs from this blot down to
    /// the leaf containing `index`.
    pub fn path(&self, id: BlotId, index: usize, inclusive: bool) -> Vec<(BlotId, usize)> {
        let mut out = vec![(id, index)];
        if self.is_parent(id) {
            if let Some((child, offset)) = self.find_child(id, index, inclusive) {
                if self.is_parent(child) {
                    out.extend(self.path(child, offset, inclusive));
                } else {
                    out.push((child, offset));
                }
            }
        }
        out
    }

    // ---- root wrappers -------------------------------------------------

    /// Total document length in UTF-16 code units.
    pub fn doc_length(&self) -> usize {
        self.length(self.root())
    }

    /// Insert plain text at a document offset, reconciling pending host
    /// changes first and converging before returning.
    pub fn insert(&mut self, index: usize, text: &str) -> Result<()> {
        self.update(None)?;
        let root = self.root();
        self.insert_at(root, index, text)?;
        let records = self.host.take_records();
        self.optimize(records)?;
        self.debug_check();
        Ok(())
    }

    /// Insert an embed at a document offset.
    pub fn insert_embed(&mut self, index: usize, name: &str, value: &Value) -> Result<()> {
        self.update(None)?;
        let root = self.root();
        self.insert_embed_at(root, index, name, value)?;
        let records = self.host.take_records();
        self.optimize(records)?;
        self.debug_check();
        Ok(())
    }

    /// Delete a document range. A full-range delete clears every child
    /// and lets the convergence pass refill the default child.
    pub fn delete(&mut self, index: usize, len: usize) -> Result<()> {
        self.update(None)?;
        let root = self.root();
        if index == 0 && len >= self.length(root) {
            for child in self.children(root) {
                self.remove_blot(child);
            }
        } else {
            self.delete_at(root, index, len)?;
        }
        let records = self.host.take_records();
        self.optimize(records)?;
        self.debug_check();
        Ok(())
    }

    /// Apply a named format over a document range.
    pub fn format(&mut self, index: usize, len: usize, name: &str, value: &Value) -> Result<()> {
        self.update(None)?;
        let root = self.root();
        self.format_at(root, index, len, name, value)?;
        let records = self.host.take_records();
        self.optimize(records)?;
        self.debug_check();
        Ok(())
    }
}
