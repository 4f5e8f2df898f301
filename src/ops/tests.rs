// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{select_branch, BranchSelection, SelectBranchError};
use crate::model::fixtures::{
    assistant, branching_chat, in_creation_order, linear_chat, mid, tool, user,
};
use crate::query::find_branch;
use crate::tree::{BranchNode, ContextNode};
use crate::parse;

#[test]
fn select_branch_switches_active_index() {
    let mut result = parse(&branching_chat(), &[]);

    let selection = select_branch(&mut result.context_tree, &mid("u1"), 0).expect("select");
    assert_eq!(selection, BranchSelection { previous_index: 2, active_index: 0, clamped: false });
    assert!(selection.changed());
    assert_eq!(
        find_branch(&result.context_tree, "u1").map(|branch| branch.active_branch_index),
        Some(0)
    );
}

#[test]
fn select_branch_clamps_past_the_end() {
    let mut result = parse(&branching_chat(), &[]);

    let selection = select_branch(&mut result.context_tree, &mid("u1"), 10).expect("select");
    assert_eq!(selection, BranchSelection { previous_index: 2, active_index: 2, clamped: true });
    assert!(!selection.changed());
}

#[test]
fn select_branch_reports_missing_branch_point() {
    let mut result = parse(&linear_chat(), &[]);

    let err = select_branch(&mut result.context_tree, &mid("u1"), 0).expect_err("no branch");
    assert_eq!(err, SelectBranchError::NotFound { parent_message_id: mid("u1") });
    assert_eq!(err.to_string(), "no branch point under message u1");
}

#[test]
fn select_branch_rejects_empty_branch_point() {
    let mut tree = vec![ContextNode::Branch(BranchNode {
        id: "branch#u1".into(),
        parent_message_id: mid("u1"),
        branches: Vec::new(),
        active_branch_index: 0,
    })];

    let err = select_branch(&mut tree, &mid("u1"), 0).expect_err("empty");
    assert_eq!(err, SelectBranchError::Empty { parent_message_id: mid("u1") });
}

#[test]
fn select_branch_finds_branch_points_under_tool_results() {
    let messages = in_creation_order(vec![
        user("u", None),
        assistant("a", Some("u")),
        tool("t1", "a"),
        user("x", Some("t1")),
        user("y", Some("t1")),
    ]);
    let mut result = parse(&messages, &[]);

    let selection = select_branch(&mut result.context_tree, &mid("t1"), 0).expect("select");
    assert_eq!(selection, BranchSelection { previous_index: 1, active_index: 0, clamped: false });
    assert_eq!(
        select_branch(&mut result.context_tree, &mid("a"), 0),
        Err(SelectBranchError::NotFound { parent_message_id: mid("a") })
    );
}
