// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Input entities as persisted by the chat store.
//!
//! Messages point at their parent; groups tie sibling messages together for compare or
//! summary display. The engine reads these and never mutates them.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod group;
pub mod ids;
pub mod message;
pub mod usage;

pub use group::{GroupMode, MessageGroupMetadata};
pub use ids::{GroupId, Id, IdError, MessageId, ThreadId, NODE_ID_SEPARATOR};
pub use message::{Message, MessageMetadata, MessageRole};
pub use usage::{ModelPerformance, ModelUsage};
