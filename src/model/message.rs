// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::{GroupId, MessageId, ThreadId};
use super::usage::{ModelPerformance, ModelUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MessageRole {
    User,
    Assistant,
    Tool,
    System,
    Supervisor,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::System => "system",
            Self::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display hints persisted alongside a message by the chat store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageMetadata {
    /// The children of this message are parallel outputs shown side by side.
    pub compare: bool,
    /// Pinned branch: the child that was last selected for this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_branch_id: Option<MessageId>,
    /// This message is the preferred column of the compare block it belongs to.
    pub active_column: bool,
}

/// One persisted chat message.
///
/// Owned and mutated by the message store; the engine only reads it. `updated_at` doubles as
/// the per-message version the parse cache uses to detect content-only changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    #[serde(default)]
    parent_id: Option<MessageId>,
    #[serde(default)]
    thread_id: Option<ThreadId>,
    #[serde(default)]
    group_id: Option<GroupId>,
    role: MessageRole,
    #[serde(default)]
    content: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage: Option<ModelUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    performance: Option<ModelPerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<MessageMetadata>,
}

impl Message {
    pub fn new(id: MessageId, role: MessageRole) -> Self {
        Self {
            id,
            parent_id: None,
            thread_id: None,
            group_id: None,
            role,
            content: String::new(),
            created_at: 0,
            updated_at: 0,
            usage: None,
            performance: None,
            metadata: None,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&MessageId> {
        self.parent_id.as_ref()
    }

    pub fn set_parent_id(&mut self, parent_id: Option<MessageId>) {
        self.parent_id = parent_id;
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    pub fn set_thread_id(&mut self, thread_id: Option<ThreadId>) {
        self.thread_id = thread_id;
    }

    pub fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    pub fn set_group_id(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id;
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn is_role(&self, role: MessageRole) -> bool {
        self.role == role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Appends a streamed chunk and bumps the version.
    pub fn push_content(&mut self, chunk: &str) {
        self.content.push_str(chunk);
        self.updated_at = self.updated_at.saturating_add(1);
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: i64) {
        self.created_at = created_at;
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, updated_at: i64) {
        self.updated_at = updated_at;
    }

    pub fn usage(&self) -> Option<&ModelUsage> {
        self.usage.as_ref()
    }

    pub fn set_usage(&mut self, usage: Option<ModelUsage>) {
        self.usage = usage;
    }

    pub fn performance(&self) -> Option<&ModelPerformance> {
        self.performance.as_ref()
    }

    pub fn set_performance(&mut self, performance: Option<ModelPerformance>) {
        self.performance = performance;
    }

    pub fn metadata(&self) -> Option<&MessageMetadata> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Option<MessageMetadata>) {
        self.metadata = metadata;
    }

    pub(crate) fn wants_compare(&self) -> bool {
        self.metadata.as_ref().is_some_and(|metadata| metadata.compare)
    }

    pub(crate) fn pinned_branch(&self) -> Option<&MessageId> {
        self.metadata.as_ref().and_then(|metadata| metadata.active_branch_id.as_ref())
    }

    pub(crate) fn is_active_column(&self) -> bool {
        self.metadata.as_ref().is_some_and(|metadata| metadata.active_column)
    }
}
