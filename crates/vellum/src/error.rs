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

//! Error kinds for the document model.
//!
//! All of these represent programmer or integration errors rather than
//! recoverable runtime conditions. No retries happen anywhere in the
//! engine; every failure propagates to the caller.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Failures surfaced by registry, blot, and reconciliation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// `create` was given a selector with no resolvable definition.
    #[error("unable to create blot for `{0}`")]
    UnableToCreate(String),

    /// A definition passed to `register` did not declare a name, or was
    /// otherwise malformed.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// The reserved placeholder name `abstract` was passed to `register`.
    #[error("cannot register the reserved `abstract` definition")]
    AbstractRegistration,

    /// A `wrap` target cannot hold children.
    #[error("cannot wrap with `{0}`: it cannot hold children")]
    CannotWrap(String),

    /// `isolate` requested a split at or past the tail with no following
    /// sibling to split into.
    #[error("attempt to isolate at end")]
    IsolateAtEnd,

    /// The optimize fixed-point loop failed to converge within its
    /// iteration bound. Fatal: indicates a cyclic or pathological
    /// change-record pattern.
    #[error("maximum optimize iterations exceeded")]
    MaxIterationsExceeded,
}
