// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The `parse` entry point: index, build, flatten.

use std::collections::BTreeMap;

use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};

use crate::config::ParseOptions;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::flat::{flatten, FlatMessage};
use crate::index::{self, owned_message_map};
use crate::model::{Message, MessageGroupMetadata, MessageId};
use crate::ops::{self, BranchSelection, SelectBranchError};
use crate::tree::{self, ContextNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub context_tree: Vec<ContextNode>,
    pub flat_list: Vec<FlatMessage>,
    /// Every input message by id, first occurrence of a duplicated id only.
    pub message_map: BTreeMap<MessageId, Message>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Activates branch `index` under `parent_message_id` and rebuilds the flat list.
    pub fn select_branch(
        &mut self,
        parent_message_id: &MessageId,
        index: usize,
    ) -> Result<BranchSelection, SelectBranchError> {
        let selection = ops::select_branch(&mut self.context_tree, parent_message_id, index)?;
        if selection.changed() {
            self.reflatten();
        }
        Ok(selection)
    }

    pub(crate) fn reflatten(&mut self) {
        self.flat_list = flatten(&self.context_tree, &self.message_map);
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.message_map.get(id)
    }
}

/// Parses with default options.
pub fn parse(messages: &[Message], groups: &[MessageGroupMetadata]) -> ParseResult {
    parse_with(messages, groups, &ParseOptions::default())
}

/// Turns a flat message list into the context tree, the flat render list and the id map.
///
/// `messages` must be in creation order; the result is a pure function of the arguments.
pub fn parse_with(
    messages: &[Message],
    groups: &[MessageGroupMetadata],
    options: &ParseOptions,
) -> ParseResult {
    let mut diagnostics = Diagnostics::default();
    let maps = index::index(messages, groups, &mut diagnostics);
    let context_tree = tree::build(&maps, options, &mut diagnostics);
    let flat_list = flatten(&context_tree, &maps);
    let message_map = owned_message_map(messages);

    tracing::debug!(
        messages = messages.len(),
        groups = groups.len(),
        roots = context_tree.len(),
        flat = flat_list.len(),
        anomalies = diagnostics.len(),
        "conversation parsed"
    );

    ParseResult { context_tree, flat_list, message_map, diagnostics: diagnostics.into_vec() }
}

/// JSON schema of [`ParseResult`], for consumers on the other side of a serialization
/// boundary.
pub fn parse_result_schema() -> Schema {
    schemars::schema_for!(ParseResult)
}
