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

//! Ordered child structure: the intrusive doubly-linked sibling list
//! and the index arithmetic over it.
//!
//! Every structural edit here moves the blot's host node in lockstep,
//! so the host child order always mirrors the blot child order.

use super::{BlotId, Scroll};

impl Scroll {
    /// Remove `id` from its parent's child list, nulling its links. The
    /// host node is not touched.
    pub(crate) fn unlink(&mut self, id: BlotId) {
        let (parent, prev, next) = {
            let blot = self.blot(id);
            (blot.parent, blot.prev, blot.next)
        };
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(p) => self.blot_mut(p).next = next,
            None => self.blot_mut(parent).head = next,
        }
        match next {
            Some(n) => self.blot_mut(n).prev = prev,
            None => self.blot_mut(parent).tail = prev,
        }
        self.blot_mut(parent).child_count -= 1;
        let blot = self.blot_mut(id);
        blot.parent = None;
        blot.prev = None;
        blot.next = None;
    }

    /// Link `child` into `parent`'s list before `anchor` without
    /// touching the host tree. Used when adopting host nodes that are
    /// already in place.
    pub(crate) fn link_child(&mut self, parent: BlotId, child: BlotId, anchor: Option<BlotId>) {
        self.unlink(child);
        let prev = match anchor {
            Some(a) => self.blot(a).prev,
            None => self.blot(parent).tail,
        };
        match prev {
            Some(p) => self.blot_mut(p).next = Some(child),
            None => self.blot_mut(parent).head = Some(child),
        }
        match anchor {
            Some(a) => self.blot_mut(a).prev = Some(child),
            None => self.blot_mut(parent).tail = Some(child),
        }
        {
            let blot = self.blot_mut(child);
            blot.parent = Some(parent);
            blot.prev = prev;
            blot.next = anchor;
        }
        self.blot_mut(parent).child_count += 1;
    }

    /// Insert `child` under `parent` before `anchor` (append when
    /// `anchor` is `None`), moving its host node the same way.
    pub fn insert_before_blot(&mut self, parent: BlotId, child: BlotId, anchor: Option<BlotId>) {
        self.link_child(parent, child, anchor);
        let parent_node = self.blot(parent).node;
        let child_node = self.blot(child).node;
        let anchor_node = anchor.map(|a| self.blot(a).node);
        self.host.insert_before(parent_node, child_node, anchor_node);
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: BlotId, child: BlotId) {
        self.insert_before_blot(parent, child, None);
    }

    /// Snapshot of `parent`'s children in order.
    pub fn children(&self, parent: BlotId) -> Vec<BlotId> {
        let mut out = Vec::with_capacity(self.blot(parent).child_count);
        let mut child = self.blot(parent).head;
        while let Some(c) = child {
            out.push(c);
            child = self.blot(c).next;
        }
        out
    }

    /// Number of children.
    pub fn child_count(&self, parent: BlotId) -> usize {
        self.blot(parent).child_count
    }

    /// The `i`-th child.
    pub fn child_at(&self, parent: BlotId, i: usize) -> Option<BlotId> {
        let mut child = self.blot(parent).head;
        let mut n = 0;
        while let Some(c) = child {
            if n == i {
                return Some(c);
            }
            n += 1;
            child = self.blot(c).next;
        }
        None
    }

    /// Position of `child` in `parent`'s list.
    pub fn index_of_child(&self, parent: BlotId, child: BlotId) -> Option<usize> {
        let mut cur = self.blot(parent).head;
        let mut n = 0;
        while let Some(c) = cur {
            if c == child {
                return Some(n);
            }
            n += 1;
            cur = self.blot(c).next;
        }
        None
    }

    /// Content offset of `id` within its parent: the summed lengths of
    /// its preceding siblings.
    pub fn offset_in_parent(&self, id: BlotId) -> usize {
        let mut offset = 0;
        let mut prev = self.blot(id).prev;
        while let Some(p) = prev {
            offset += self.length(p);
            prev = self.blot(p).prev;
        }
        offset
    }

    /// Content offset of `id` relative to `ancestor` (the root when
    /// `None`).
    pub fn offset(&self, id: BlotId, ancestor: Option<BlotId>) -> usize {
        let stop = ancestor.unwrap_or_else(|| self.root());
        let mut offset = 0;
        let mut cur = id;
        while cur != stop {
            offset += self.offset_in_parent(cur);
            match self.blot(cur).parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        offset
    }

    /// The child containing content offset `index`, and the offset
    /// remaining within it.
    ///
    /// A boundary offset (exactly at the end of an entry) belongs to the
    /// *next* entry at its start — unless `inclusive` is set and the
    /// next entry is empty or absent, in which case the current entry is
    /// returned at its end.
    pub fn find_child(
        &self,
        parent: BlotId,
        index: usize,
        inclusive: bool,
    ) -> Option<(BlotId, usize)> {
        let mut index = index;
        let mut child = self.blot(parent).head;
        while let Some(c) = child {
            let len = self.length(c);
            if index < len {
                return Some((c, index));
            }
            let next = self.blot(c).next;
            if inclusive && index == len && next.is_none_or(|n| self.length(n) == 0) {
                return Some((c, index));
            }
            index -= len;
            child = next;
        }
        None
    }

    /// The children overlapping the half-open range `[index, index+len)`
    /// of `parent`, each with its local sub-range `(child, start, len)`.
    /// Zero-length children are not reported.
    pub fn each_at(&self, parent: BlotId, index: usize, len: usize) -> Vec<(BlotId, usize, usize)> {
        let mut out = Vec::new();
        if len == 0 {
            return out;
        }
        let end = index + len;
        let mut pos = 0;
        let mut child = self.blot(parent).head;
        while let Some(c) = child {
            if pos >= end {
                break;
            }
            let child_len = self.length(c);
            if pos + child_len > index {
                let start = index.saturating_sub(pos);
                let span = child_len.min(end - pos) - start;
                out.push((c, start, span));
            }
            pos += child_len;
            child = self.blot(c).next;
        }
        out
    }

    /// Every blot strictly below `id`, in document order.
    pub fn descendants(&self, id: BlotId) -> Vec<BlotId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: BlotId, out: &mut Vec<BlotId>) {
        let mut child = self.blot(id).head;
        while let Some(c) = child {
            out.push(c);
            self.collect_descendants(c, out);
            child = self.blot(c).next;
        }
    }

    /// The first descendant satisfying `predicate` on the path down to
    /// content offset `index`, with the offset remaining within it.
    pub fn descendant(
        &self,
        id: BlotId,
        index: usize,
        predicate: impl Fn(BlotId) -> bool,
    ) -> Option<(BlotId, usize)> {
        let (child, offset) = self.find_child(id, index, false)?;
        if predicate(child) {
            return Some((child, offset));
        }
        if self.is_parent(child) {
            return self.descendant(child, offset, predicate);
        }
        None
    }

    /// Every descendant satisfying `predicate` that overlaps the content
    /// range `[index, index+len)`, in document order.
    pub fn descendants_matching<F>(
        &self,
        id: BlotId,
        index: usize,
        len: usize,
        predicate: F,
    ) -> Vec<BlotId>
    where
        F: Fn(BlotId) -> bool + Copy,
    {
        let mut out = Vec::new();
        for (child, offset, span) in self.each_at(id, index, len) {
            if predicate(child) {
                out.push(child);
            }
            if self.is_parent(child) {
                out.extend(self.descendants_matching(child, offset, span, predicate));
            }
        }
        out
    }
}
