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

//! A live document-model engine.
//!
//! Vellum maintains a tree of formatted-content nodes ("blots")
//! bidirectionally synchronized with a mutable host node tree. Content
//! is addressed by UTF-16 code-unit offsets; host-side mutations arrive
//! as batched change records and are reconciled without losing node
//! identity or format state.
//!
//! The pieces:
//!
//! - [`host`]: the host tree stand-in and its [`MutationRecord`] batches.
//! - [`Scope`]: the TYPE/LEVEL bitmask classifying definitions.
//! - [`Registry`] and [`BlotSpec`]: data-driven blot and attributor
//!   definitions.
//! - [`Attributor`]: attribute, class, and style format encodings.
//! - [`Scroll`]: the document root owning the blot tree, with the
//!   index-addressed operations and the reconciliation loop.
//!
//! ```
//! use vellum::Scroll;
//!
//! let mut scroll = Scroll::new();
//! scroll.insert(0, "hello world")?;
//! assert_eq!(scroll.html(), "<p>hello world</p>");
//! # Ok::<(), vellum::ModelError>(())
//! ```

pub mod attributor;
pub mod error;
pub mod host;
pub mod registry;
pub mod scope;
pub mod scroll;
pub mod value;

pub use attributor::{Attributor, AttributorKind, AttributorStore};
pub use error::{ModelError, Result};
pub use host::{HostTree, MutationKind, MutationRecord, NodeId};
pub use registry::{BlotFlavor, BlotSpec, ChildRule, Definition, Registry};
pub use scope::Scope;
pub use scroll::{BlotId, Scroll};
pub use value::Value;

/// Contract for embed widgets that render their own caret while a
/// keyboard-dispatch collaborator has focus inside them. The engine
/// never draws a caret; it only forwards these calls.
pub trait EmbedCursor {
    /// Show a substitute caret at a content offset inside the embed.
    fn show_fake_cursor(&mut self, index: usize);

    /// Hide the substitute caret.
    fn hide_fake_cursor(&mut self);
}
