// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Token usage and latency metrics reported by the model provider.
//!
//! Every field is optional: a provider that does not report a counter leaves it unset, which
//! is different from reporting zero. Aggregation keeps that distinction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_text_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_cached_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_cache_miss_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_write_cache_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_audio_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_image_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_citation_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_text_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_reasoning_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_audio_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_image_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_prediction_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_prediction_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_output_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl ModelUsage {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Adds every counter present in `other` to the matching counter of `self`.
    pub fn accumulate(&mut self, other: &Self) {
        add_count(&mut self.input_text_tokens, other.input_text_tokens);
        add_count(&mut self.input_cached_tokens, other.input_cached_tokens);
        add_count(&mut self.input_cache_miss_tokens, other.input_cache_miss_tokens);
        add_count(&mut self.input_write_cache_tokens, other.input_write_cache_tokens);
        add_count(&mut self.input_audio_tokens, other.input_audio_tokens);
        add_count(&mut self.input_image_tokens, other.input_image_tokens);
        add_count(&mut self.input_citation_tokens, other.input_citation_tokens);
        add_count(&mut self.output_text_tokens, other.output_text_tokens);
        add_count(&mut self.output_reasoning_tokens, other.output_reasoning_tokens);
        add_count(&mut self.output_audio_tokens, other.output_audio_tokens);
        add_count(&mut self.output_image_tokens, other.output_image_tokens);
        add_count(&mut self.accepted_prediction_tokens, other.accepted_prediction_tokens);
        add_count(&mut self.rejected_prediction_tokens, other.rejected_prediction_tokens);
        add_count(&mut self.total_input_tokens, other.total_input_tokens);
        add_count(&mut self.total_output_tokens, other.total_output_tokens);
        add_count(&mut self.total_tokens, other.total_tokens);
        add_amount(&mut self.cost, other.cost);
    }

    /// Element-wise sum; `None` when no input carries any counter.
    pub fn sum<'a>(items: impl IntoIterator<Item = &'a ModelUsage>) -> Option<ModelUsage> {
        let mut total = ModelUsage::default();
        for item in items {
            total.accumulate(item);
        }
        (!total.is_empty()).then_some(total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelPerformance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttft: Option<f64>,
}

impl ModelPerformance {
    pub fn is_empty(&self) -> bool {
        self.duration.is_none() && self.latency.is_none() && self.tps.is_none() && self.ttft.is_none()
    }

    pub fn accumulate(&mut self, other: &Self) {
        add_amount(&mut self.duration, other.duration);
        add_amount(&mut self.latency, other.latency);
        add_amount(&mut self.tps, other.tps);
        add_amount(&mut self.ttft, other.ttft);
    }

    /// Element-wise sum; `None` when no input carries any measurement.
    pub fn sum<'a>(
        items: impl IntoIterator<Item = &'a ModelPerformance>,
    ) -> Option<ModelPerformance> {
        let mut total = ModelPerformance::default();
        for item in items {
            total.accumulate(item);
        }
        (!total.is_empty()).then_some(total)
    }
}

fn add_count(total: &mut Option<u64>, value: Option<u64>) {
    if let Some(value) = value {
        *total = Some(total.unwrap_or(0).saturating_add(value));
    }
}

fn add_amount(total: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value {
        *total = Some(total.unwrap_or(0.0) + value);
    }
}
