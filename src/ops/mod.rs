// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutations on a built context tree.
//!
//! Selecting a branch changes which alternative is active and nothing else: the tree shape and
//! node ids stay as built, so callers only need to re-flatten.

use std::fmt;

use crate::model::MessageId;
use crate::query::find_branch_mut;
use crate::tree::ContextNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchSelection {
    pub previous_index: usize,
    pub active_index: usize,
    /// The requested index was past the last branch.
    pub clamped: bool,
}

impl BranchSelection {
    pub fn changed(&self) -> bool {
        self.previous_index != self.active_index
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectBranchError {
    NotFound { parent_message_id: MessageId },
    Empty { parent_message_id: MessageId },
}

impl fmt::Display for SelectBranchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { parent_message_id } => {
                write!(f, "no branch point under message {parent_message_id}")
            }
            Self::Empty { parent_message_id } => {
                write!(f, "branch point under message {parent_message_id} has no branches")
            }
        }
    }
}

impl std::error::Error for SelectBranchError {}

/// Makes branch `index` active under `parent_message_id`, clamping to the last branch.
pub fn select_branch(
    tree: &mut [ContextNode],
    parent_message_id: &MessageId,
    index: usize,
) -> Result<BranchSelection, SelectBranchError> {
    let Some(branch) = find_branch_mut(tree, parent_message_id.as_str()) else {
        return Err(SelectBranchError::NotFound { parent_message_id: parent_message_id.clone() });
    };
    let Some(last) = branch.branches.len().checked_sub(1) else {
        return Err(SelectBranchError::Empty { parent_message_id: parent_message_id.clone() });
    };

    let previous_index = branch.active_branch_index.min(last);
    let active_index = index.min(last);
    branch.active_branch_index = active_index;

    tracing::debug!(
        parent_message_id = %parent_message_id,
        previous_index,
        active_index,
        "branch selected"
    );
    Ok(BranchSelection { previous_index, active_index, clamped: index > last })
}

#[cfg(test)]
mod tests;
