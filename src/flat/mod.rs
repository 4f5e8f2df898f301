// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear render list derived from the context tree.
//!
//! Only the active branch of each [`BranchNode`] is emitted. Compare columns are all emitted,
//! back to back, with the column lengths recorded on the synthetic compare entry so a renderer
//! can split them again.

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::index::HelperMaps;
use crate::model::{
    GroupMode, Message, MessageId, MessageRole, ModelPerformance, ModelUsage,
};
use crate::tree::{
    AssistantGroupNode, BranchNode, CompareNode, ContextNode, MessageGroupNode, MessageNode,
};

/// Read access to messages by id.
pub trait MessageLookup {
    fn message(&self, id: &str) -> Option<&Message>;
}

impl MessageLookup for HelperMaps<'_> {
    fn message(&self, id: &str) -> Option<&Message> {
        HelperMaps::message(self, id)
    }
}

impl MessageLookup for BTreeMap<MessageId, Message> {
    fn message(&self, id: &str) -> Option<&Message> {
        self.get(id)
    }
}

impl MessageLookup for HashMap<MessageId, Message> {
    fn message(&self, id: &str) -> Option<&Message> {
        self.get(id)
    }
}

/// Role of a flat entry: a message role, or the kind of synthetic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FlatRole {
    User,
    Assistant,
    Tool,
    System,
    Supervisor,
    AssistantGroup,
    Compare,
    MessageGroup,
}

impl FlatRole {
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::AssistantGroup | Self::Compare | Self::MessageGroup)
    }
}

impl From<MessageRole> for FlatRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Self::User,
            MessageRole::Assistant => Self::Assistant,
            MessageRole::Tool => Self::Tool,
            MessageRole::System => Self::System,
            MessageRole::Supervisor => Self::Supervisor,
        }
    }
}

/// Display data carried by synthetic entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatMessageExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_mode: Option<GroupMode>,
    /// The message the synthetic block hangs off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Branch switcher state for a message whose continuation branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    pub count: usize,
    pub active_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatMessage {
    /// Message id for real entries, node id for synthetic ones.
    pub id: String,
    pub role: FlatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<FlatMessageExtra>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_message_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<ModelPerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchInfo>,
    /// Entry count of each compare column, in column order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compare_columns: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_column_id: Option<MessageId>,
}

impl FlatMessage {
    fn synthetic(id: &str, role: FlatRole, extra: FlatMessageExtra) -> Self {
        Self {
            id: id.to_owned(),
            role,
            message_id: None,
            extra: Some(extra),
            assistant_message_id: None,
            usage: None,
            performance: None,
            branch: None,
            compare_columns: Vec::new(),
            active_column_id: None,
        }
    }

    fn real(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: message.role().into(),
            message_id: Some(message.id().clone()),
            extra: None,
            assistant_message_id: None,
            usage: message.usage().cloned(),
            performance: message.performance().cloned(),
            branch: None,
            compare_columns: Vec::new(),
            active_column_id: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.role.is_synthetic()
    }
}

/// Flattens `tree` in display order, resolving messages through `lookup`.
///
/// Node references that `lookup` cannot resolve are skipped.
pub fn flatten<L>(tree: &[ContextNode], lookup: &L) -> Vec<FlatMessage>
where
    L: MessageLookup + ?Sized,
{
    let mut flattener = Flattener { lookup, out: Vec::new(), pending: Vec::new() };
    flattener.run(tree);
    flattener.out
}

enum Step<'t> {
    Node(&'t ContextNode),
    /// A compare column ended; record its length on the compare entry at `slot`.
    ColumnEnd { slot: usize },
}

struct Flattener<'l, 't, L: ?Sized> {
    lookup: &'l L,
    out: Vec<FlatMessage>,
    // Pre-order work list; trees nest one level per message, so no recursion.
    pending: Vec<Step<'t>>,
}

impl<'t, L: MessageLookup + ?Sized> Flattener<'_, 't, L> {
    fn run(&mut self, tree: &'t [ContextNode]) {
        self.schedule(tree);
        while let Some(step) = self.pending.pop() {
            match step {
                Step::Node(ContextNode::Message(node)) => self.message(node),
                Step::Node(ContextNode::AssistantGroup(node)) => self.assistant_group(node),
                Step::Node(ContextNode::Compare(node)) => self.compare(node),
                Step::Node(ContextNode::Branch(node)) => self.branch(node),
                Step::Node(ContextNode::MessageGroup(node)) => self.message_group(node),
                Step::ColumnEnd { slot } => self.column_end(slot),
            }
        }
    }

    fn schedule(&mut self, nodes: &'t [ContextNode]) {
        self.pending.extend(nodes.iter().rev().map(Step::Node));
    }

    fn real(&self, message_id: &MessageId) -> Option<FlatMessage> {
        self.lookup.message(message_id.as_str()).map(FlatMessage::real)
    }

    fn message(&mut self, node: &'t MessageNode) {
        if let Some(mut entry) = self.real(&node.message_id) {
            entry.branch = match node.children.as_slice() {
                [ContextNode::Branch(branch)] if !branch.branches.is_empty() => Some(BranchInfo {
                    count: branch.branches.len(),
                    active_index: branch.active_branch_index.min(branch.branches.len() - 1),
                }),
                _ => None,
            };
            self.out.push(entry);
        }
        self.schedule(&node.children);
    }

    fn assistant_group(&mut self, node: &'t AssistantGroupNode) {
        let parent_message_id = self
            .lookup
            .message(node.assistant_message_id.as_str())
            .and_then(Message::parent_id)
            .cloned();
        let mut entry = FlatMessage::synthetic(
            &node.id,
            FlatRole::AssistantGroup,
            FlatMessageExtra { parent_message_id, ..FlatMessageExtra::default() },
        );
        entry.assistant_message_id = Some(node.assistant_message_id.clone());
        entry.usage = node.usage.clone();
        entry.performance = node.performance.clone();
        self.out.push(entry);

        let assistant = self.real(&node.assistant_message_id);
        self.out.extend(assistant);
        for tool in &node.tools {
            let tool = self.real(&tool.message_id);
            self.out.extend(tool);
        }
    }

    fn compare(&mut self, node: &'t CompareNode) {
        let slot = self.out.len();
        let mut entry = FlatMessage::synthetic(
            &node.id,
            FlatRole::Compare,
            FlatMessageExtra {
                group_mode: Some(GroupMode::Compare),
                parent_message_id: Some(node.message_id.clone()),
                description: node.description.clone(),
                title: None,
            },
        );
        entry.active_column_id = node.active_column_id.clone();
        entry.compare_columns = Vec::with_capacity(node.columns.len());
        self.out.push(entry);

        for column in node.columns.iter().rev() {
            self.pending.push(Step::ColumnEnd { slot });
            self.schedule(column);
        }
    }

    // Columns follow the compare entry back to back.
    fn column_end(&mut self, slot: usize) {
        let start = slot + 1 + self.out[slot].compare_columns.iter().sum::<usize>();
        let length = self.out.len() - start;
        self.out[slot].compare_columns.push(length);
    }

    fn branch(&mut self, node: &'t BranchNode) {
        if let Some(active) = node.active_branch() {
            self.schedule(active);
        }
    }

    fn message_group(&mut self, node: &'t MessageGroupNode) {
        self.out.push(FlatMessage::synthetic(
            &node.id,
            FlatRole::MessageGroup,
            FlatMessageExtra {
                group_mode: Some(node.mode),
                parent_message_id: node.parent_message_id.clone(),
                description: node.description.clone(),
                title: node.title.clone(),
            },
        ));
        self.schedule(&node.children);
    }
}
