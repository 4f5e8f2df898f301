// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parse options supplied by the owning UI.
//!
//! Branch selection is UI state, so it lives here rather than in the engine: the engine
//! picks a default through [`BranchPolicy`] and accepts explicit selections on top.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Message, MessageId};

/// Which branch is active when nothing was selected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchPolicy {
    /// The most recently created branch.
    #[default]
    Latest,
    /// The oldest branch.
    First,
    /// The first branch that has a continuation of its own, else the first branch.
    FirstWithContinuation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParseOptions {
    pub branch_policy: BranchPolicy,
    /// Explicit selections keyed by the message the branches hang off.
    pub active_branches: BTreeMap<MessageId, usize>,
    /// Skip `metadata.activeBranchId` pins persisted on branching messages.
    pub ignore_persisted_selection: bool,
    /// Keep messages that belong to a thread out of the main tree.
    pub exclude_threaded: bool,
}

impl ParseOptions {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|source| ConfigError::Json { source })
    }

    pub fn with_branch_policy(mut self, branch_policy: BranchPolicy) -> Self {
        self.branch_policy = branch_policy;
        self
    }

    pub fn with_active_branch(mut self, parent_message_id: MessageId, index: usize) -> Self {
        self.active_branches.insert(parent_message_id, index);
        self
    }

    pub fn with_exclude_threaded(mut self, exclude_threaded: bool) -> Self {
        self.exclude_threaded = exclude_threaded;
        self
    }

    pub(crate) fn includes(&self, message: &Message) -> bool {
        !(self.exclude_threaded && message.thread_id().is_some())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json { source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { source } => write!(f, "invalid parse options: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BranchPolicy, ParseOptions};
    use crate::model::MessageId;

    #[test]
    fn defaults_select_latest_branch() {
        let options = ParseOptions::default();
        assert_eq!(options.branch_policy, BranchPolicy::Latest);
        assert!(options.active_branches.is_empty());
        assert!(!options.ignore_persisted_selection);
        assert!(!options.exclude_threaded);
    }

    #[test]
    fn options_parse_from_camel_case_json() {
        let options = ParseOptions::from_json_str(
            r#"{
                "branchPolicy": "firstWithContinuation",
                "activeBranches": { "u1": 0 },
                "excludeThreaded": true
            }"#,
        )
        .expect("options");

        assert_eq!(options.branch_policy, BranchPolicy::FirstWithContinuation);
        assert_eq!(options.active_branches.get("u1"), Some(&0));
        assert!(options.exclude_threaded);
        assert_eq!(
            options,
            ParseOptions::default()
                .with_branch_policy(BranchPolicy::FirstWithContinuation)
                .with_active_branch(MessageId::new("u1").expect("id"), 0)
                .with_exclude_threaded(true)
        );
    }

    #[test]
    fn options_reject_unknown_fields() {
        let err = ParseOptions::from_json_str(r#"{ "branchPolcy": "first" }"#)
            .expect_err("typo must be rejected");
        assert!(err.to_string().starts_with("invalid parse options:"));
    }
}
