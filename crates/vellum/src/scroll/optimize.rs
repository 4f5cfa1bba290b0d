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

//! The bounded convergence pass.
//!
//! After reconciliation (or any content operation) the tree is driven
//! to a canonical form: adjacent texts merge, identically formatted
//! inline siblings merge, empty inlines and containers remove
//! themselves, emptied parents with a default child refill, and child
//! rules are enforced. Corrections themselves emit host records, which
//! seed the next pass; the loop is bounded and fails rather than spin.

use tracing::{debug, trace};

use crate::error::{ModelError, Result};
use crate::host::{MutationKind, MutationRecord};
use crate::registry::BlotFlavor;

use super::{BlotId, Scroll};

/// Upper bound on convergence passes before giving up.
pub(crate) const MAX_OPTIMIZE_ITERATIONS: usize = 100;

impl Scroll {
    /// Run the convergence loop, seeded with the records that triggered
    /// it. Fails with [`MaxIterationsExceeded`] when corrections keep
    /// producing new records past the iteration bound.
    ///
    /// [`MaxIterationsExceeded`]: ModelError::MaxIterationsExceeded
    pub(crate) fn optimize(&mut self, seed: Vec<MutationRecord>) -> Result<()> {
        let root = self.root();
        self.optimize_subtree(root)?;
        let mut records = seed;
        records.extend(self.host.take_records());
        let mut iterations = 0;
        while !records.is_empty() {
            iterations += 1;
            if iterations > MAX_OPTIMIZE_ITERATIONS {
                return Err(ModelError::MaxIterationsExceeded);
            }
            trace!(iterations, records = records.len(), "optimize pass");
            for blot in self.mark_dirty(&records) {
                if self.is_alive(blot) {
                    self.optimize_blot(blot)?;
                }
            }
            records = self.host.take_records();
        }
        debug!(iterations, "optimize converged");
        Ok(())
    }

    /// The blots touched by `records`, with their ancestor chains,
    /// deepest first so merges settle before parents check emptiness.
    fn mark_dirty(&self, records: &[MutationRecord]) -> Vec<BlotId> {
        let mut dirty: Vec<BlotId> = Vec::new();
        let mut push = |scroll: &Scroll, blot: BlotId, dirty: &mut Vec<BlotId>| {
            let mut cur = Some(blot);
            while let Some(b) = cur {
                if !dirty.contains(&b) {
                    dirty.push(b);
                }
                cur = scroll.blot(b).parent;
            }
        };
        for record in records {
            let Some(blot) = self.find(record.target, true) else {
                continue;
            };
            push(self, blot, &mut dirty);
            if record.kind == MutationKind::Attributes {
                if let Some(prev) = self.blot(blot).prev {
                    push(self, prev, &mut dirty);
                }
            }
            for &added in &record.added_nodes {
                if let Some(child) = self.find(added, false) {
                    push(self, child, &mut dirty);
                }
            }
        }
        dirty.sort_by_key(|&blot| std::cmp::Reverse(self.depth(blot)));
        dirty
    }

    fn depth(&self, id: BlotId) -> usize {
        let mut depth = 0;
        let mut cur = self.blot(id).parent;
        while let Some(parent) = cur {
            depth += 1;
            cur = self.blot(parent).parent;
        }
        depth
    }

    /// Post-order pass over a whole subtree.
    fn optimize_subtree(&mut self, id: BlotId) -> Result<()> {
        for child in self.children(id) {
            if self.is_alive(child) {
                self.optimize_subtree(child)?;
            }
        }
        if self.is_alive(id) {
            self.optimize_blot(id)?;
        }
        Ok(())
    }

    /// One canonicalization step for one blot.
    pub(crate) fn optimize_blot(&mut self, id: BlotId) -> Result<()> {
        match self.flavor(id) {
            BlotFlavor::Text => self.optimize_text(id),
            BlotFlavor::Embed => Ok(()),
            BlotFlavor::Inline => self.optimize_inline(id),
            _ => self.parent_housekeeping(id),
        }
    }

    fn optimize_text(&mut self, id: BlotId) -> Result<()> {
        if self.blot(id).text.is_empty() && self.blot(id).parent.is_some() {
            self.remove_blot(id);
            return Ok(());
        }
        while let Some(next) = self.blot(id).next {
            if self.flavor(next) != BlotFlavor::Text {
                break;
            }
            let mut combined = self.blot(id).text.clone();
            combined.push_str(&self.blot(next).text);
            let node = self.blot(id).node;
            self.host.set_text(node, &combined);
            self.blot_mut(id).text = combined;
            self.remove_blot(next);
        }
        Ok(())
    }

    fn optimize_inline(&mut self, id: BlotId) -> Result<()> {
        self.parent_housekeeping(id)?;
        if !self.is_alive(id) {
            return Ok(());
        }
        // A format-less inline carries no information; hoist its
        // children out.
        if self.formats(id).is_empty() {
            self.unwrap_blot(id);
            return Ok(());
        }
        // Merge the next sibling in when it is structurally identical
        // with a deep-equal format set.
        while let Some(next) = self.blot(id).next {
            let identical = self.flavor(next) == BlotFlavor::Inline
                && self.blot(next).def == self.blot(id).def
                && self.formats(next) == self.formats(id);
            if !identical {
                break;
            }
            self.move_children(next, id, None);
            self.remove_blot(next);
        }
        Ok(())
    }

    fn parent_housekeeping(&mut self, id: BlotId) -> Result<()> {
        self.enforce_allowed_children(id)?;
        if !self.is_alive(id) {
            return Ok(());
        }
        if let Some(ui) = self.blot(id).ui_node {
            let node = self.blot(id).node;
            if self.host.first_child(node) != Some(ui) {
                let first = self.host.first_child(node);
                self.host.insert_before(node, ui, first);
            }
        }
        if self.blot(id).child_count == 0 {
            let default_child = self
                .registry
                .blot_spec(self.blot(id).def)
                .and_then(|spec| spec.default_child.clone());
            if let Some(name) = default_child {
                trace!(blot = id.0, child = %name, "refilling emptied parent");
                let child = self.create(&name, None)?;
                self.append(id, child);
            } else if let Some(parent) = self.blot(id).parent {
                // An empty defaultless parent removes itself, except
                // when it is its own parent's sole refill child.
                let refill = self.blot(parent).child_count == 1
                    && self
                        .registry
                        .blot_spec(self.blot(parent).def)
                        .and_then(|spec| spec.default_child.as_deref())
                        == Some(self.name(id));
                if !refill {
                    self.remove_blot(id);
                }
            }
        }
        Ok(())
    }

    /// Enforce the parent's child rules, applying at most one
    /// correction: block-level intruders split the parent around them
    /// and hoist, parent intruders unwrap, leaves are dropped. Records
    /// emitted by the correction drive the next pass.
    pub(crate) fn enforce_allowed_children(&mut self, id: BlotId) -> Result<()> {
        if !self.is_parent(id) {
            return Ok(());
        }
        let parent_def = self.blot(id).def;
        let mut cursor = self.blot(id).head;
        while let Some(child) = cursor {
            let next = self.blot(child).next;
            let child_def = self.blot(child).def;
            if !self.registry.allows_child(parent_def, child_def) {
                let child_scope = self.registry.get(child_def).scope();
                if child_scope.is_block_level() && self.blot(id).parent.is_some() {
                    let end = self.offset_in_parent(child) + self.length(child);
                    if self.blot(child).next.is_some() {
                        self.split(id, end, false);
                    }
                    let start = self.offset_in_parent(child);
                    let holder = if start > 0 {
                        self.split(id, start, false)
                    } else {
                        Some(id)
                    };
                    if let Some(holder) = holder {
                        self.unwrap_blot(holder);
                    }
                } else if self.is_parent(child) {
                    self.unwrap_blot(child);
                } else {
                    trace!(blot = child.0, "dropping disallowed leaf child");
                    self.remove_blot(child);
                }
                return Ok(());
            }
            cursor = next;
        }
        Ok(())
    }
}
