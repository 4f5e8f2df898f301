// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Semantic tree of a conversation.
//!
//! A node sequence (`Vec<ContextNode>`) reads top to bottom. Nodes that end a linear run
//! (`Branch`, `Compare`) own the alternatives that follow; an `AssistantGroup` is followed by
//! its continuation in the same sequence.
//!
//! Node ids are derived from message and group ids, so rebuilding the same input yields the
//! same ids. Synthetic ids join a kind and the ids with `#`, which ids never contain.

mod builder;

use std::mem;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    GroupId, GroupMode, MessageId, ModelPerformance, ModelUsage, NODE_ID_SEPARATOR,
};

pub use builder::build_context_tree;
pub(crate) use builder::build;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContextNode {
    Message(MessageNode),
    AssistantGroup(AssistantGroupNode),
    Compare(CompareNode),
    Branch(BranchNode),
    MessageGroup(MessageGroupNode),
}

impl ContextNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Message(node) => &node.id,
            Self::AssistantGroup(node) => &node.id,
            Self::Compare(node) => &node.id,
            Self::Branch(node) => &node.id,
            Self::MessageGroup(node) => &node.id,
        }
    }

    /// The message this node is anchored on, if any.
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Self::Message(node) => Some(&node.message_id),
            Self::AssistantGroup(node) => Some(&node.assistant_message_id),
            Self::Compare(node) => Some(&node.message_id),
            Self::Branch(node) => Some(&node.parent_message_id),
            Self::MessageGroup(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&BranchNode> {
        match self {
            Self::Branch(node) => Some(node),
            _ => None,
        }
    }

    /// Nested node sequences, in display order.
    pub fn sequences(&self) -> Vec<&[ContextNode]> {
        match self {
            Self::Message(node) => vec![node.children.as_slice()],
            Self::AssistantGroup(_) => Vec::new(),
            Self::Compare(node) => node.columns.iter().map(Vec::as_slice).collect(),
            Self::Branch(node) => node.branches.iter().map(Vec::as_slice).collect(),
            Self::MessageGroup(node) => vec![node.children.as_slice()],
        }
    }

    /// Moves every nested node out, leaving this node a leaf.
    fn take_descendants(&mut self) -> Vec<ContextNode> {
        match self {
            Self::Message(node) => mem::take(&mut node.children),
            Self::MessageGroup(node) => mem::take(&mut node.children),
            Self::AssistantGroup(node) => {
                mem::take(&mut node.tools).into_iter().flat_map(|tool| tool.children).collect()
            }
            Self::Compare(node) => mem::take(&mut node.columns).into_iter().flatten().collect(),
            Self::Branch(node) => mem::take(&mut node.branches).into_iter().flatten().collect(),
        }
    }
}

// A linear chat nests one level per message; the derived drop would recurse that deep.
impl Drop for ContextNode {
    fn drop(&mut self) {
        let mut pending = self.take_descendants();
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.take_descendants());
        }
    }
}

/// A single message with the sequence that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageNode {
    pub id: String,
    pub message_id: MessageId,
    #[serde(default)]
    pub children: Vec<ContextNode>,
}

impl MessageNode {
    pub(crate) fn leaf(message_id: &MessageId) -> Self {
        Self { id: message_id.to_string(), message_id: message_id.clone(), children: Vec::new() }
    }
}

/// An assistant message and the tool calls it issued.
///
/// Usage and performance are element-wise sums over the assistant and its tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistantGroupNode {
    pub id: String,
    pub assistant_message_id: MessageId,
    pub tools: Vec<MessageNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<ModelPerformance>,
}

/// Parallel outputs for one input, shown side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompareNode {
    pub id: String,
    /// The message the columns answer.
    pub message_id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_column_id: Option<MessageId>,
    pub columns: Vec<Vec<ContextNode>>,
}

/// Mutually exclusive continuations of one message; exactly one is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchNode {
    pub id: String,
    pub parent_message_id: MessageId,
    pub branches: Vec<Vec<ContextNode>>,
    pub active_branch_index: usize,
}

impl BranchNode {
    /// The active branch, clamping an out-of-range index to the last branch.
    pub fn active_branch(&self) -> Option<&[ContextNode]> {
        let last = self.branches.len().checked_sub(1)?;
        self.branches.get(self.active_branch_index.min(last)).map(Vec::as_slice)
    }
}

/// A manual or summary group wrapping the subtree that starts at its first member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageGroupNode {
    pub id: String,
    pub group_id: GroupId,
    pub mode: GroupMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub children: Vec<ContextNode>,
}

// Ids never contain the separator, so synthetic ids cannot collide with message ids.
pub(crate) fn assistant_group_node_id(assistant_message_id: &MessageId) -> String {
    format!("assistant-group{NODE_ID_SEPARATOR}{assistant_message_id}")
}

pub(crate) fn branch_node_id(parent_message_id: &MessageId) -> String {
    format!("branch{NODE_ID_SEPARATOR}{parent_message_id}")
}

pub(crate) fn compare_node_id(message_id: &MessageId) -> String {
    format!("compare{NODE_ID_SEPARATOR}{message_id}")
}

pub(crate) fn message_group_node_id(group_id: &GroupId, first_message_id: &MessageId) -> String {
    format!("message-group{NODE_ID_SEPARATOR}{group_id}{NODE_ID_SEPARATOR}{first_message_id}")
}
