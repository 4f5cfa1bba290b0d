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

//! Reconciliation of host change batches into the blot tree.
//!
//! Records are grouped by the nearest registered blot and folded per
//! blot: child-list changes drive detachment and adoption, attribute
//! changes rebuild the format store, character-data changes re-sync text
//! caches. Child order is rebuilt from host truth afterwards, so the
//! fold is insensitive to record ordering within a batch.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::Result;
use crate::host::{MutationKind, MutationRecord, NodeId};
use crate::registry::BlotFlavor;
use crate::scope::Scope;

use super::{BlotId, Scroll};

impl Scroll {
    /// Reconcile a batch of host change records, draining the host's
    /// pending queue when `records` is `None`, then run the convergence
    /// pass.
    pub fn update(&mut self, records: Option<Vec<MutationRecord>>) -> Result<()> {
        let records = match records {
            Some(records) => records,
            None => self.host.take_records(),
        };
        if !records.is_empty() {
            debug!(records = records.len(), "reconciling host change batch");
            self.fold_records(&records)?;
        }
        self.optimize(records)?;
        self.debug_check();
        Ok(())
    }

    /// Entry point for host integrations delivering their own record
    /// batches.
    pub fn apply_change_batch(&mut self, records: Vec<MutationRecord>) -> Result<()> {
        self.update(Some(records))
    }

    fn fold_records(&mut self, records: &[MutationRecord]) -> Result<()> {
        let mut order: Vec<BlotId> = Vec::new();
        let mut buckets: HashMap<BlotId, Vec<MutationRecord>> = HashMap::new();
        for record in records {
            let Some(blot) = self.find(record.target, true) else {
                continue;
            };
            if !buckets.contains_key(&blot) {
                order.push(blot);
            }
            buckets.entry(blot).or_default().push(record.clone());
        }
        // The root folds last, after child-level corrections settled.
        let root = self.root();
        order.sort_by_key(|&blot| usize::from(blot == root));
        for blot in order {
            if !self.is_alive(blot) {
                continue;
            }
            if let Some(batch) = buckets.remove(&blot) {
                self.update_blot(blot, &batch)?;
            }
        }
        Ok(())
    }

    fn update_blot(&mut self, id: BlotId, records: &[MutationRecord]) -> Result<()> {
        let node = self.blot(id).node;
        match self.flavor(id) {
            BlotFlavor::Text => {
                let changed = records
                    .iter()
                    .any(|r| r.kind == MutationKind::CharacterData && r.target == node);
                if changed {
                    let text = self.host.text(node).unwrap_or_default().to_string();
                    self.blot_mut(id).text = text;
                }
                Ok(())
            }
            BlotFlavor::Embed => Ok(()),
            flavor => {
                let attrs_changed = records
                    .iter()
                    .any(|r| r.kind == MutationKind::Attributes && r.target == node);
                if attrs_changed
                    && matches!(flavor, BlotFlavor::Inline | BlotFlavor::Block)
                {
                    self.rebuild_attributes(id);
                }
                self.fold_child_list(id, records)?;
                self.enforce_allowed_children(id)
            }
        }
    }

    fn fold_child_list(&mut self, id: BlotId, records: &[MutationRecord]) -> Result<()> {
        let node = self.blot(id).node;
        let mut added: Vec<NodeId> = Vec::new();
        let mut removed: Vec<NodeId> = Vec::new();
        for record in records {
            if record.kind == MutationKind::ChildList && record.target == node {
                added.extend(record.added_nodes.iter().copied());
                removed.extend(record.removed_nodes.iter().copied());
            }
        }
        if added.is_empty() && removed.is_empty() {
            return Ok(());
        }
        let root_node = self.blot(self.root()).node;

        for gone in removed {
            // Transient reparent: still attached somewhere in the live
            // tree, so the receiving parent's fold adopts it instead.
            if self.host.parent(gone).is_some() && self.host.contains(root_node, gone) {
                trace!("skipping transiently reparented node");
                continue;
            }
            if let Some(blot) = self.find(gone, false) {
                self.unlink(blot);
                self.detach_subtree(blot);
            }
        }

        let ui = self.blot(id).ui_node;
        let mut fresh: Vec<NodeId> = added
            .into_iter()
            .filter(|&n| self.host.parent(n) == Some(node) && Some(n) != ui)
            .collect();
        fresh.sort_by(|&a, &b| self.host.position(a).cmp(&self.host.position(b)));
        fresh.dedup();
        for incoming in fresh {
            self.make_attached_blot(incoming)?;
        }

        self.rebuild_child_links(id);
        Ok(())
    }

    /// Resolve a host node to a blot, creating (and recursively
    /// building) one when none exists. Unknown elements are replaced by
    /// a generic inline wrapper that adopts their children.
    pub(crate) fn make_attached_blot(&mut self, node: NodeId) -> Result<BlotId> {
        if let Some(existing) = self.find(node, false) {
            return Ok(existing);
        }
        match self.create_for_node(node, Scope::ANY) {
            Ok(blot) => {
                if self.is_parent(blot) {
                    self.build_children(blot)?;
                }
                Ok(blot)
            }
            Err(err) => {
                trace!(%err, "adopting unknown host node through a generic inline");
                let wrapper = self.create_generic(Scope::INLINE)?;
                let wrapper_node = self.blot(wrapper).node;
                for child in self.host.children(node).to_vec() {
                    self.host.append_child(wrapper_node, child);
                }
                if let Some(parent_node) = self.host.parent(node) {
                    self.host.insert_before(parent_node, wrapper_node, Some(node));
                    self.host.remove(node);
                }
                self.build_children(wrapper)?;
                Ok(wrapper)
            }
        }
    }

    /// Build blots for every host child of an adopted parent, in order.
    fn build_children(&mut self, id: BlotId) -> Result<()> {
        let node = self.blot(id).node;
        for child_node in self.host.children(node).to_vec() {
            let child = self.make_attached_blot(child_node)?;
            self.link_child(id, child, None);
        }
        Ok(())
    }

    /// Rebuild the model child list of `id` from host truth: every host
    /// child with a blot is linked in host order; everything else is
    /// left unlinked for other folds (or corrections) to claim.
    fn rebuild_child_links(&mut self, id: BlotId) {
        for child in self.children(id) {
            self.unlink(child);
        }
        let node = self.blot(id).node;
        let ui = self.blot(id).ui_node;
        for child_node in self.host.children(node).to_vec() {
            if Some(child_node) == ui {
                continue;
            }
            if let Some(blot) = self.find(child_node, false) {
                if self.blot(blot).parent.is_none() {
                    self.link_child(id, blot, None);
                }
            }
        }
    }
}
