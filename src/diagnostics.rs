// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Non-fatal structural anomalies found while parsing.
//!
//! Chat histories are routinely paginated or partially loaded, so none of these abort a
//! parse. Each one names the local fallback that was applied.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{GroupId, MessageId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// The parent is not loaded; the message was attached as a root.
    #[serde(rename_all = "camelCase")]
    OrphanParent { message_id: MessageId, parent_id: MessageId },
    /// Following parent pointers came back to `message_id`; the edge was dropped.
    #[serde(rename_all = "camelCase")]
    CycleBroken { message_id: MessageId },
    /// Only the first message with this id was indexed.
    #[serde(rename_all = "camelCase")]
    DuplicateMessage { message_id: MessageId },
    /// Only the first group with this id was indexed.
    #[serde(rename_all = "camelCase")]
    DuplicateGroup { group_id: GroupId },
    /// The message names a group without metadata; it was treated as ungrouped.
    #[serde(rename_all = "camelCase")]
    UnknownGroup { message_id: MessageId, group_id: GroupId },
    /// The group's trigger message is not loaded; the reference was dropped.
    #[serde(rename_all = "camelCase")]
    GroupParentMissing { group_id: GroupId, parent_message_id: MessageId },
    /// A requested branch index was past the end and was clamped.
    #[serde(rename_all = "camelCase")]
    BranchIndexClamped { parent_message_id: MessageId, requested: usize, clamped: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanParent { message_id, parent_id } => {
                write!(f, "message {message_id} references missing parent {parent_id}; attached as root")
            }
            Self::CycleBroken { message_id } => {
                write!(f, "parent cycle through message {message_id}; edge dropped")
            }
            Self::DuplicateMessage { message_id } => {
                write!(f, "duplicate message id {message_id}; first occurrence kept")
            }
            Self::DuplicateGroup { group_id } => {
                write!(f, "duplicate group id {group_id}; first occurrence kept")
            }
            Self::UnknownGroup { message_id, group_id } => {
                write!(f, "message {message_id} references unknown group {group_id}; ignored")
            }
            Self::GroupParentMissing { group_id, parent_message_id } => {
                write!(f, "group {group_id} references missing message {parent_message_id}")
            }
            Self::BranchIndexClamped { parent_message_id, requested, clamped } => write!(
                f,
                "branch index {requested} out of range under {parent_message_id}; clamped to {clamped}"
            ),
        }
    }
}

/// Collects diagnostics for one parse and mirrors each to `tracing`.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "conversation structure anomaly");
        self.items.push(diagnostic);
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
