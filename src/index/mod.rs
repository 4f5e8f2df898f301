// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lookup structures over the raw message and group slices.
//!
//! The maps borrow from the input: messages are referenced, never copied, until the final
//! owned `message_map` is produced for the parse result.

use std::collections::{BTreeMap, HashMap};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{Message, MessageGroupMetadata, MessageId};

/// Index built once per parse.
///
/// `children` lists keep input order, which callers guarantee to be creation order; the
/// indexer never re-sorts. Roots live under the `None` parent key.
#[derive(Debug, Default)]
pub struct HelperMaps<'a> {
    order: Vec<&'a Message>,
    message_map: HashMap<&'a str, &'a Message>,
    children_map: HashMap<Option<&'a str>, Vec<&'a Message>>,
    message_group_map: HashMap<&'a str, &'a MessageGroupMetadata>,
    thread_map: HashMap<&'a str, Vec<&'a Message>>,
}

impl<'a> HelperMaps<'a> {
    pub fn message(&self, id: &str) -> Option<&'a Message> {
        self.message_map.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.message_map.contains_key(id)
    }

    /// Indexed messages in input order, first occurrence of each id only.
    pub fn messages(&self) -> &[&'a Message] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn roots(&self) -> &[&'a Message] {
        self.children(None)
    }

    /// Children of `parent_id`, or the roots for `None`. Unknown parents have none.
    pub fn children(&self, parent_id: Option<&str>) -> &[&'a Message] {
        // Keys borrow the input, so resolve the caller's id to the indexed one first.
        let key = match parent_id {
            Some(parent_id) => match self.message_map.get_key_value(parent_id) {
                Some((&key, _)) => Some(key),
                None => return &[],
            },
            None => None,
        };
        self.children_map.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children_of(&self, message: &Message) -> &[&'a Message] {
        self.children(Some(message.id().as_str()))
    }

    pub fn group(&self, group_id: &str) -> Option<&'a MessageGroupMetadata> {
        self.message_group_map.get(group_id).copied()
    }

    pub fn groups(&self) -> impl Iterator<Item = &'a MessageGroupMetadata> + '_ {
        self.message_group_map.values().copied()
    }

    pub fn thread(&self, thread_id: &str) -> &[&'a Message] {
        self.thread_map.get(thread_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn thread_count(&self) -> usize {
        self.thread_map.len()
    }

    /// The group of `message`, if it has one with known metadata.
    pub fn group_of(&self, message: &Message) -> Option<&'a MessageGroupMetadata> {
        message.group_id().and_then(|group_id| self.group(group_id.as_str()))
    }

    pub fn parent_of(&self, message: &Message) -> Option<&'a Message> {
        message.parent_id().and_then(|parent_id| self.message(parent_id.as_str()))
    }
}

/// Builds the helper maps and returns the anomalies found along the way.
pub fn build_helper_maps<'a>(
    messages: &'a [Message],
    groups: &'a [MessageGroupMetadata],
) -> (HelperMaps<'a>, Vec<Diagnostic>) {
    let mut diagnostics = Diagnostics::default();
    let maps = index(messages, groups, &mut diagnostics);
    (maps, diagnostics.into_vec())
}

pub(crate) fn index<'a>(
    messages: &'a [Message],
    groups: &'a [MessageGroupMetadata],
    diagnostics: &mut Diagnostics,
) -> HelperMaps<'a> {
    let mut maps = HelperMaps {
        order: Vec::with_capacity(messages.len()),
        message_map: HashMap::with_capacity(messages.len()),
        children_map: HashMap::new(),
        message_group_map: HashMap::with_capacity(groups.len()),
        thread_map: HashMap::new(),
    };

    for message in messages {
        let id = message.id().as_str();
        if maps.message_map.contains_key(id) {
            diagnostics.push(Diagnostic::DuplicateMessage { message_id: message.id().clone() });
            continue;
        }
        maps.message_map.insert(id, message);
        maps.order.push(message);

        if let Some(thread_id) = message.thread_id() {
            maps.thread_map.entry(thread_id.as_str()).or_default().push(message);
        }
    }

    for group in groups {
        let group_id = group.id().as_str();
        if maps.message_group_map.contains_key(group_id) {
            diagnostics.push(Diagnostic::DuplicateGroup { group_id: group.id().clone() });
            continue;
        }
        maps.message_group_map.insert(group_id, group);

        if let Some(parent_message_id) = group.parent_message_id() {
            if !maps.message_map.contains_key(parent_message_id.as_str()) {
                diagnostics.push(Diagnostic::GroupParentMissing {
                    group_id: group.id().clone(),
                    parent_message_id: parent_message_id.clone(),
                });
            }
        }
    }

    for index in 0..maps.order.len() {
        let message = maps.order[index];
        let parent_key = match message.parent_id() {
            Some(parent_id) if maps.message_map.contains_key(parent_id.as_str()) => {
                Some(parent_id.as_str())
            }
            Some(parent_id) => {
                diagnostics.push(Diagnostic::OrphanParent {
                    message_id: message.id().clone(),
                    parent_id: parent_id.clone(),
                });
                None
            }
            None => None,
        };
        maps.children_map.entry(parent_key).or_default().push(message);

        if let Some(group_id) = message.group_id() {
            if !maps.message_group_map.contains_key(group_id.as_str()) {
                diagnostics.push(Diagnostic::UnknownGroup {
                    message_id: message.id().clone(),
                    group_id: group_id.clone(),
                });
            }
        }
    }

    maps
}

/// Owned id → message map; the first occurrence of a duplicated id wins, as in [`index`].
pub(crate) fn owned_message_map(messages: &[Message]) -> BTreeMap<MessageId, Message> {
    let mut map = BTreeMap::new();
    for message in messages {
        map.entry(message.id().clone()).or_insert_with(|| message.clone());
    }
    map
}
