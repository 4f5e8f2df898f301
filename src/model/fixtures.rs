// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::group::{GroupMode, MessageGroupMetadata};
use super::ids::{GroupId, MessageId};
use super::message::{Message, MessageMetadata, MessageRole};
use super::usage::ModelUsage;

pub(crate) fn mid(value: &str) -> MessageId {
    MessageId::new(value).expect("message id")
}

pub(crate) fn gid(value: &str) -> GroupId {
    GroupId::new(value).expect("group id")
}

pub(crate) fn msg(id: &str, parent: Option<&str>, role: MessageRole) -> Message {
    let mut message = Message::new(mid(id), role);
    message.set_parent_id(parent.map(mid));
    message.set_content(format!("content of {id}"));
    message
}

pub(crate) fn user(id: &str, parent: Option<&str>) -> Message {
    msg(id, parent, MessageRole::User)
}

pub(crate) fn assistant(id: &str, parent: Option<&str>) -> Message {
    msg(id, parent, MessageRole::Assistant)
}

pub(crate) fn tool(id: &str, parent: &str) -> Message {
    msg(id, Some(parent), MessageRole::Tool)
}

pub(crate) fn grouped(mut message: Message, group_id: &str) -> Message {
    message.set_group_id(Some(gid(group_id)));
    message
}

pub(crate) fn with_tokens(mut message: Message, total_tokens: u64) -> Message {
    message.set_usage(Some(ModelUsage { total_tokens: Some(total_tokens), ..ModelUsage::default() }));
    message
}

pub(crate) fn with_metadata(mut message: Message, metadata: MessageMetadata) -> Message {
    message.set_metadata(Some(metadata));
    message
}

pub(crate) fn group(id: &str, mode: GroupMode, parent: Option<&str>) -> MessageGroupMetadata {
    let mut group = MessageGroupMetadata::new(gid(id), mode);
    group.set_parent_message_id(parent.map(mid));
    group
}

/// Assigns ascending creation times in slice order, the order the store delivers.
pub(crate) fn in_creation_order(mut messages: Vec<Message>) -> Vec<Message> {
    for (index, message) in messages.iter_mut().enumerate() {
        let at = i64::try_from(index).unwrap_or(i64::MAX);
        message.set_created_at(at);
        message.set_updated_at(at);
    }
    messages
}

/// `u1 -> a1 -> u2 -> a2`
pub(crate) fn linear_chat() -> Vec<Message> {
    in_creation_order(vec![
        user("u1", None),
        assistant("a1", Some("u1")),
        user("u2", Some("a1")),
        assistant("a2", Some("u2")),
    ])
}

/// `u1` regenerated three times: `a1`, `a2`, `a3`; `a2` has a follow-up `u2`.
pub(crate) fn branching_chat() -> Vec<Message> {
    in_creation_order(vec![
        user("u1", None),
        assistant("a1", Some("u1")),
        assistant("a2", Some("u1")),
        user("u2", Some("a2")),
        assistant("a3", Some("u1")),
    ])
}

/// `u1` answered by two models in compare group `g1`.
pub(crate) fn compare_chat() -> (Vec<Message>, Vec<MessageGroupMetadata>) {
    let messages = in_creation_order(vec![
        user("u1", None),
        grouped(assistant("c1", Some("u1")), "g1"),
        grouped(assistant("c2", Some("u1")), "g1"),
    ]);
    (messages, vec![group("g1", GroupMode::Compare, Some("u1"))])
}

/// `u1 -> a1(tools t1, t2) -> a2 -> u2`, the follow-up assistant hanging off the last tool.
pub(crate) fn tool_chat() -> Vec<Message> {
    in_creation_order(vec![
        user("u1", None),
        with_tokens(assistant("a1", Some("u1")), 10),
        with_tokens(tool("t1", "a1"), 5),
        with_tokens(tool("t2", "a1"), 3),
        assistant("a2", Some("t2")),
        user("u2", Some("a2")),
    ])
}
