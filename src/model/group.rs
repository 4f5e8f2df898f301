// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::{GroupId, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum GroupMode {
    /// Members are parallel outputs rendered side by side.
    Compare,
    Summary,
    Manual,
}

impl GroupMode {
    /// Summary and manual groups only decorate a subtree; compare groups fan out.
    pub fn is_display_only(self) -> bool {
        matches!(self, Self::Summary | Self::Manual)
    }
}

/// Metadata for the set of messages sharing one `group_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageGroupMetadata {
    id: GroupId,
    mode: GroupMode,
    #[serde(default)]
    parent_message_id: Option<MessageId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl MessageGroupMetadata {
    pub fn new(id: GroupId, mode: GroupMode) -> Self {
        Self { id, mode, parent_message_id: None, title: None, description: None }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GroupMode) {
        self.mode = mode;
    }

    pub fn parent_message_id(&self) -> Option<&MessageId> {
        self.parent_message_id.as_ref()
    }

    pub fn set_parent_message_id(&mut self, parent_message_id: Option<MessageId>) {
        self.parent_message_id = parent_message_id;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title<T: Into<String>>(&mut self, title: Option<T>) {
        self.title = title.map(Into::into);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description<T: Into<String>>(&mut self, description: Option<T>) {
        self.description = description.map(Into::into);
    }
}
