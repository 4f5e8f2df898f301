// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a context tree.
//!
//! Traversals visit every branch and every compare column, not just the active ones.

use serde::{Deserialize, Serialize};

use crate::model::MessageId;
use crate::tree::{BranchNode, CompareNode, ContextNode};

/// Pre-order iterator over every node of a forest.
#[derive(Debug, Clone)]
pub struct Nodes<'t> {
    stack: Vec<&'t ContextNode>,
}

impl<'t> Iterator for Nodes<'t> {
    type Item = &'t ContextNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for sequence in node.sequences().into_iter().rev() {
            self.stack.extend(sequence.iter().rev());
        }
        Some(node)
    }
}

pub fn nodes(tree: &[ContextNode]) -> Nodes<'_> {
    Nodes { stack: tree.iter().rev().collect() }
}

/// Every message id the tree references, tools included, in pre-order.
pub fn referenced_message_ids(tree: &[ContextNode]) -> Vec<&MessageId> {
    let mut ids = Vec::new();
    for node in nodes(tree) {
        match node {
            ContextNode::Message(node) => ids.push(&node.message_id),
            ContextNode::AssistantGroup(node) => {
                ids.push(&node.assistant_message_id);
                ids.extend(node.tools.iter().map(|tool| &tool.message_id));
            }
            ContextNode::Compare(_) | ContextNode::Branch(_) | ContextNode::MessageGroup(_) => {}
        }
    }
    ids
}

pub fn find_branch<'t>(tree: &'t [ContextNode], parent_message_id: &str) -> Option<&'t BranchNode> {
    nodes(tree)
        .filter_map(ContextNode::as_branch)
        .find(|branch| branch.parent_message_id.as_str() == parent_message_id)
}

pub(crate) fn find_branch_mut<'t>(
    tree: &'t mut [ContextNode],
    parent_message_id: &str,
) -> Option<&'t mut BranchNode> {
    let mut stack: Vec<&'t mut ContextNode> = tree.iter_mut().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            ContextNode::Branch(branch) => {
                if branch.parent_message_id.as_str() == parent_message_id {
                    return Some(branch);
                }
                for sequence in branch.branches.iter_mut().rev() {
                    stack.extend(sequence.iter_mut().rev());
                }
            }
            ContextNode::Message(node) => stack.extend(node.children.iter_mut().rev()),
            ContextNode::MessageGroup(node) => stack.extend(node.children.iter_mut().rev()),
            ContextNode::Compare(node) => {
                for column in node.columns.iter_mut().rev() {
                    stack.extend(column.iter_mut().rev());
                }
            }
            ContextNode::AssistantGroup(_) => {}
        }
    }
    None
}

/// The compare block that answers `message_id`.
pub fn find_compare<'t>(tree: &'t [ContextNode], message_id: &str) -> Option<&'t CompareNode> {
    nodes(tree).find_map(|node| match node {
        ContextNode::Compare(compare) if compare.message_id.as_str() == message_id => Some(compare),
        _ => None,
    })
}

/// One branch choice on the way to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStep {
    pub parent_message_id: MessageId,
    pub index: usize,
}

/// Branch selections that make `message_id` part of the flat list, outermost first.
///
/// `None` when the tree does not contain the message. Messages inside compare columns need no
/// selection for the compare itself, since every column is rendered.
pub fn locate(tree: &[ContextNode], message_id: &str) -> Option<Vec<BranchStep>> {
    enum Visit<'t> {
        Node(&'t ContextNode),
        /// Entering lane `index` of a branch nested under `depth` earlier steps.
        Lane { step: BranchStep, depth: usize },
        /// Leaving a branch lane; the path goes back to `depth` steps.
        Leave { depth: usize },
    }

    let mut path: Vec<BranchStep> = Vec::new();
    let mut stack: Vec<Visit<'_>> = tree.iter().rev().map(Visit::Node).collect();
    while let Some(visit) = stack.pop() {
        let node = match visit {
            Visit::Node(node) => node,
            Visit::Lane { step, depth } => {
                path.truncate(depth);
                path.push(step);
                continue;
            }
            Visit::Leave { depth } => {
                path.truncate(depth);
                continue;
            }
        };
        let found = match node {
            ContextNode::Message(node) => node.message_id.as_str() == message_id,
            ContextNode::AssistantGroup(node) => {
                node.assistant_message_id.as_str() == message_id
                    || node.tools.iter().any(|tool| tool.message_id.as_str() == message_id)
            }
            ContextNode::Compare(_) | ContextNode::Branch(_) | ContextNode::MessageGroup(_) => {
                false
            }
        };
        if found {
            return Some(path);
        }

        if let ContextNode::Branch(branch) = node {
            let depth = path.len();
            stack.push(Visit::Leave { depth });
            for (index, lane) in branch.branches.iter().enumerate().rev() {
                stack.extend(lane.iter().rev().map(Visit::Node));
                let parent_message_id = branch.parent_message_id.clone();
                stack.push(Visit::Lane { step: BranchStep { parent_message_id, index }, depth });
            }
        } else {
            for sequence in node.sequences().into_iter().rev() {
                stack.extend(sequence.iter().rev().map(Visit::Node));
            }
        }
    }
    None
}
