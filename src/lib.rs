// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversation Flow: parent-pointer chat history to context tree and render list.
//!
//! [`parse`] runs three stages in order: [`index`] builds lookup maps over the input,
//! [`tree`] resolves branches, tool calls and groups into a [`ContextNode`] forest, and
//! [`flat`] walks the active path into a list of [`FlatMessage`] entries. [`ParseCache`]
//! wraps the pipeline for views that re-parse on every streamed token.

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod flat;
pub mod index;
pub mod model;
pub mod ops;
pub mod parse;
pub mod query;
pub mod tree;

pub use cache::{CacheOutcome, Fingerprint, ParseCache};
pub use config::{BranchPolicy, ConfigError, ParseOptions};
pub use diagnostics::Diagnostic;
pub use flat::{flatten, BranchInfo, FlatMessage, FlatMessageExtra, FlatRole, MessageLookup};
pub use index::{build_helper_maps, HelperMaps};
pub use model::{
    GroupId, GroupMode, IdError, Message, MessageGroupMetadata, MessageId, MessageMetadata,
    MessageRole, ModelPerformance, ModelUsage, ThreadId, NODE_ID_SEPARATOR,
};
pub use ops::{BranchSelection, SelectBranchError};
pub use parse::{parse, parse_result_schema, parse_with, ParseResult};
pub use tree::{
    build_context_tree, AssistantGroupNode, BranchNode, CompareNode, ContextNode,
    MessageGroupNode, MessageNode,
};
