// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Memoization around [`parse_with`].
//!
//! Streaming updates rewrite message content many times per second without touching the
//! structure. The cache fingerprints the input in one pass and, when only content versions
//! moved, keeps the tree and flat list and rebuilds just the message map.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::config::ParseOptions;
use crate::index::owned_message_map;
use crate::model::{
    Message, MessageGroupMetadata, MessageId, ModelPerformance, ModelUsage,
};
use crate::ops::{BranchSelection, SelectBranchError};
use crate::parse::{parse_with, ParseResult};

/// Hashes of the parse-relevant input, split by what a change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// Everything the tree and flat list depend on.
    pub structure: u64,
    /// Message ids with their `updated_at` versions.
    pub content: u64,
}

impl Fingerprint {
    pub fn of(messages: &[Message], groups: &[MessageGroupMetadata]) -> Self {
        let mut structure = DefaultHasher::new();
        let mut content = DefaultHasher::new();

        messages.len().hash(&mut structure);
        for message in messages {
            message.id().hash(&mut structure);
            message.parent_id().hash(&mut structure);
            message.thread_id().hash(&mut structure);
            message.group_id().hash(&mut structure);
            message.role().hash(&mut structure);
            message.metadata().hash(&mut structure);
            hash_usage(message.usage(), &mut structure);
            hash_performance(message.performance(), &mut structure);

            message.id().hash(&mut content);
            message.updated_at().hash(&mut content);
        }
        groups.hash(&mut structure);

        Self { structure: structure.finish(), content: content.finish() }
    }
}

fn hash_usage<H: Hasher>(usage: Option<&ModelUsage>, state: &mut H) {
    let Some(usage) = usage else {
        state.write_u8(0);
        return;
    };
    state.write_u8(1);
    for counter in [
        usage.input_text_tokens,
        usage.input_cached_tokens,
        usage.input_cache_miss_tokens,
        usage.input_write_cache_tokens,
        usage.input_audio_tokens,
        usage.input_image_tokens,
        usage.input_citation_tokens,
        usage.output_text_tokens,
        usage.output_reasoning_tokens,
        usage.output_audio_tokens,
        usage.output_image_tokens,
        usage.accepted_prediction_tokens,
        usage.rejected_prediction_tokens,
        usage.total_input_tokens,
        usage.total_output_tokens,
        usage.total_tokens,
    ] {
        counter.hash(state);
    }
    usage.cost.map(f64::to_bits).hash(state);
}

fn hash_performance<H: Hasher>(performance: Option<&ModelPerformance>, state: &mut H) {
    let Some(performance) = performance else {
        state.write_u8(0);
        return;
    };
    state.write_u8(1);
    for amount in [performance.duration, performance.latency, performance.tps, performance.ttft] {
        amount.map(f64::to_bits).hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// No usable entry; the input was parsed from scratch.
    Miss,
    /// Same structure, newer content; only the message map was rebuilt.
    ContentRefreshed,
    Unchanged,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: Fingerprint,
    result: ParseResult,
}

/// Single-entry parse cache owned by one view.
#[derive(Debug, Clone, Default)]
pub struct ParseCache {
    options: ParseOptions,
    entry: Option<CacheEntry>,
}

impl ParseCache {
    pub fn new(options: ParseOptions) -> Self {
        Self { options, entry: None }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Replaces the options; the next parse is a miss.
    pub fn set_options(&mut self, options: ParseOptions) {
        self.options = options;
        self.invalidate();
    }

    pub fn result(&self) -> Option<&ParseResult> {
        self.entry.as_ref().map(|entry| &entry.result)
    }

    pub fn parse(
        &mut self,
        messages: &[Message],
        groups: &[MessageGroupMetadata],
    ) -> (&ParseResult, CacheOutcome) {
        let fingerprint = Fingerprint::of(messages, groups);

        let (entry, outcome) = match self.entry.take() {
            Some(entry) if entry.fingerprint == fingerprint => (entry, CacheOutcome::Unchanged),
            Some(mut entry) if entry.fingerprint.structure == fingerprint.structure => {
                entry.result.message_map = owned_message_map(messages);
                entry.fingerprint = fingerprint;
                (entry, CacheOutcome::ContentRefreshed)
            }
            _ => {
                let result = parse_with(messages, groups, &self.options);
                (CacheEntry { fingerprint, result }, CacheOutcome::Miss)
            }
        };

        tracing::trace!(?outcome, messages = messages.len(), "parse cache");
        let entry = self.entry.insert(entry);
        (&entry.result, outcome)
    }

    /// Switches a branch in the cached result and remembers the choice for later rebuilds.
    pub fn select_branch(
        &mut self,
        parent_message_id: &MessageId,
        index: usize,
    ) -> Result<BranchSelection, SelectBranchError> {
        let Some(entry) = self.entry.as_mut() else {
            return Err(SelectBranchError::NotFound { parent_message_id: parent_message_id.clone() });
        };
        let selection = entry.result.select_branch(parent_message_id, index)?;
        self.options.active_branches.insert(parent_message_id.clone(), selection.active_index);
        Ok(selection)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
