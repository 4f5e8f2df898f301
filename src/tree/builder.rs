// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::iter;
use std::mem;

use smallvec::SmallVec;

use super::{
    assistant_group_node_id, branch_node_id, compare_node_id, message_group_node_id,
    AssistantGroupNode, BranchNode, CompareNode, ContextNode, MessageGroupNode, MessageNode,
};
use crate::config::{BranchPolicy, ParseOptions};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::index::HelperMaps;
use crate::model::{
    GroupMode, Message, MessageGroupMetadata, MessageId, MessageRole, ModelPerformance,
    ModelUsage,
};

type Siblings<'a> = SmallVec<[&'a Message; 4]>;

/// Builds the context forest and returns the anomalies found while building it.
///
/// Diagnostics from indexing are not included; [`crate::parse_with`] collects both.
pub fn build_context_tree(
    maps: &HelperMaps<'_>,
    options: &ParseOptions,
) -> (Vec<ContextNode>, Vec<Diagnostic>) {
    let mut diagnostics = Diagnostics::default();
    let forest = build(maps, options, &mut diagnostics);
    (forest, diagnostics.into_vec())
}

pub(crate) fn build(
    maps: &HelperMaps<'_>,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<ContextNode> {
    TreeBuilder {
        maps,
        options,
        diagnostics,
        placed: HashSet::with_capacity(maps.len()),
        tasks: Vec::new(),
        open: Vec::new(),
        forest: Vec::new(),
    }
    .forest()
}

enum CompareSource<'a> {
    Group(&'a MessageGroupMetadata),
    Flag,
}

/// Pending work. Tasks are popped last in, first out, so they are pushed in reverse.
enum Task<'a> {
    /// Build `message` and everything after it into the innermost open sequence.
    Chain(&'a Message),
    /// Build what follows `anchor` from its admitted children.
    Continue { anchor: &'a Message, children: Siblings<'a> },
    /// The current lane of the innermost fan is complete.
    EndLane,
    /// The innermost open node is complete.
    Close,
}

/// A node whose children are still being built.
enum Open {
    Message { message_id: MessageId, children: Vec<ContextNode> },
    Group(MessageGroupNode),
    Fan { fan: Fan, lane: Vec<ContextNode> },
}

/// A compare or branch node collecting one lane per child.
enum Fan {
    Compare(CompareNode),
    Branch(BranchNode),
}

impl Fan {
    fn push_lane(&mut self, lane: Vec<ContextNode>) {
        match self {
            Self::Compare(node) => node.columns.push(lane),
            Self::Branch(node) => node.branches.push(lane),
        }
    }

    fn into_node(self) -> ContextNode {
        match self {
            Self::Compare(node) => ContextNode::Compare(node),
            Self::Branch(node) => ContextNode::Branch(node),
        }
    }
}

struct TreeBuilder<'b, 'a> {
    maps: &'b HelperMaps<'a>,
    options: &'b ParseOptions,
    diagnostics: &'b mut Diagnostics,
    // Every message has a single parent, so reaching a placed message a second time means
    // its parent chain loops back through the current path.
    placed: HashSet<&'a str>,
    // Linear chats nest one level per message, so building works off explicit stacks.
    tasks: Vec<Task<'a>>,
    open: Vec<Open>,
    forest: Vec<ContextNode>,
}

impl<'b, 'a> TreeBuilder<'b, 'a> {
    fn forest(mut self) -> Vec<ContextNode> {
        let maps = self.maps;

        for &root in maps.roots() {
            if self.options.includes(root) {
                self.run(root);
            }
        }

        // Pure cycles have no root; enter each one once, at the first member in input order.
        if self.placed.len() < maps.len() {
            for &message in maps.messages() {
                if self.placed.contains(message.id().as_str()) {
                    continue;
                }
                let Some(entry) = self.cycle_entry(message) else {
                    continue;
                };
                if self.placed.contains(entry.id().as_str()) || !self.options.includes(entry) {
                    continue;
                }
                tracing::trace!(message_id = %entry.id(), "entering unrooted cycle");
                self.run(entry);
            }
        }

        tracing::debug!(
            roots = self.forest.len(),
            placed = self.placed.len(),
            messages = maps.len(),
            "context tree built"
        );
        self.forest
    }

    /// First message met twice while walking up from `start`, or `None` when the walk ends
    /// at a root.
    fn cycle_entry(&self, start: &'a Message) -> Option<&'a Message> {
        let mut seen = HashSet::new();
        let mut current = start;
        while seen.insert(current.id().as_str()) {
            current = self.maps.parent_of(current)?;
        }
        Some(current)
    }

    fn run(&mut self, start: &'a Message) {
        self.tasks.push(Task::Chain(start));
        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Chain(message) => self.chain(message),
                Task::Continue { anchor, children } => self.continuation(anchor, &children),
                Task::EndLane => self.end_lane(),
                Task::Close => self.close(),
            }
        }
        debug_assert!(self.open.is_empty());
    }

    /// The sequence new nodes are appended to.
    fn target(&mut self) -> &mut Vec<ContextNode> {
        match self.open.last_mut() {
            None => &mut self.forest,
            Some(Open::Message { children, .. }) => children,
            Some(Open::Group(node)) => &mut node.children,
            Some(Open::Fan { lane, .. }) => lane,
        }
    }

    fn close(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        let node = match open {
            Open::Message { message_id, children } => ContextNode::Message(MessageNode {
                id: message_id.to_string(),
                message_id,
                children,
            }),
            Open::Group(node) => ContextNode::MessageGroup(node),
            Open::Fan { fan, .. } => fan.into_node(),
        };
        self.target().push(node);
    }

    fn end_lane(&mut self) {
        if let Some(Open::Fan { fan, lane }) = self.open.last_mut() {
            fan.push_lane(mem::take(lane));
        }
    }

    fn admit(&mut self, message: &'a Message) -> bool {
        if self.placed.contains(message.id().as_str()) {
            self.diagnostics.push(Diagnostic::CycleBroken { message_id: message.id().clone() });
            return false;
        }
        self.options.includes(message)
    }

    fn admitted_children(&mut self, message: &Message) -> Siblings<'a> {
        let maps = self.maps;
        maps.children_of(message).iter().copied().filter(|&child| self.admit(child)).collect()
    }

    fn chain(&mut self, message: &'a Message) {
        self.placed.insert(message.id().as_str());

        if let Some(group) = self.entered_display_group(message) {
            self.open.push(Open::Group(MessageGroupNode {
                id: message_group_node_id(group.id(), message.id()),
                group_id: group.id().clone(),
                mode: group.mode(),
                parent_message_id: group
                    .parent_message_id()
                    .filter(|parent_message_id| self.maps.contains(parent_message_id.as_str()))
                    .cloned(),
                title: group.title().map(str::to_owned),
                description: group.description().map(str::to_owned),
                children: Vec::new(),
            }));
            self.tasks.push(Task::Close);
        }
        self.segment(message);
    }

    /// Summary and manual groups open where a member's parent is outside the group.
    fn entered_display_group(&self, message: &'a Message) -> Option<&'a MessageGroupMetadata> {
        let group = self.maps.group_of(message).filter(|group| group.mode().is_display_only())?;
        let parent_group = self.maps.parent_of(message).and_then(Message::group_id);
        (parent_group != Some(group.id())).then_some(group)
    }

    fn segment(&mut self, message: &'a Message) {
        let aggregates_tools = message.is_role(MessageRole::Assistant);

        let mut children: Siblings<'a> = SmallVec::new();
        let mut tools: Siblings<'a> = SmallVec::new();
        for child in self.admitted_children(message) {
            if aggregates_tools && child.is_role(MessageRole::Tool) {
                tools.push(child);
            } else {
                children.push(child);
            }
        }

        if tools.is_empty() {
            self.open.push(Open::Message {
                message_id: message.id().clone(),
                children: Vec::new(),
            });
            self.tasks.push(Task::Close);
            self.tasks.push(Task::Continue { anchor: message, children });
            return;
        }

        for &tool in &tools {
            self.placed.insert(tool.id().as_str());
        }
        // Follow-ups continue after the whole group, each from the message it answers.
        let follow_ups: SmallVec<[(&'a Message, Siblings<'a>); 4]> =
            tools.iter().map(|&tool| (tool, self.admitted_children(tool))).collect();

        let members = || iter::once(message).chain(tools.iter().copied());
        tracing::trace!(
            assistant_message_id = %message.id(),
            tools = tools.len(),
            "assistant group"
        );
        let group = ContextNode::AssistantGroup(AssistantGroupNode {
            id: assistant_group_node_id(message.id()),
            assistant_message_id: message.id().clone(),
            tools: tools.iter().map(|tool| MessageNode::leaf(tool.id())).collect(),
            usage: ModelUsage::sum(members().filter_map(|member| member.usage())),
            performance: ModelPerformance::sum(members().filter_map(|member| member.performance())),
        });
        self.target().push(group);

        for (tool, tool_children) in follow_ups.into_iter().rev() {
            self.tasks.push(Task::Continue { anchor: tool, children: tool_children });
        }
        self.tasks.push(Task::Continue { anchor: message, children });
    }

    fn continuation(&mut self, anchor: &'a Message, children: &[&'a Message]) {
        if children.is_empty() {
            return;
        }

        if let Some(source) = self.compare_source(anchor, children) {
            let (group_id, description) = match source {
                CompareSource::Group(group) => {
                    (Some(group.id().clone()), group.description().map(str::to_owned))
                }
                CompareSource::Flag => (None, None),
            };
            let compare = CompareNode {
                id: compare_node_id(anchor.id()),
                message_id: anchor.id().clone(),
                group_id,
                description,
                active_column_id: children
                    .iter()
                    .find(|child| child.is_active_column())
                    .map(|child| child.id().clone()),
                columns: Vec::with_capacity(children.len()),
            };
            self.fan_out(Fan::Compare(compare), children);
            return;
        }

        if let &[only] = children {
            self.tasks.push(Task::Chain(only));
            return;
        }

        let active_branch_index = self.active_branch_index(anchor, children);
        let branch = BranchNode {
            id: branch_node_id(anchor.id()),
            parent_message_id: anchor.id().clone(),
            branches: Vec::with_capacity(children.len()),
            active_branch_index,
        };
        self.fan_out(Fan::Branch(branch), children);
    }

    /// Opens `fan` and schedules one lane per child, in child order.
    fn fan_out(&mut self, fan: Fan, children: &[&'a Message]) {
        self.open.push(Open::Fan { fan, lane: Vec::new() });
        self.tasks.push(Task::Close);
        for &child in children.iter().rev() {
            self.tasks.push(Task::EndLane);
            self.tasks.push(Task::Chain(child));
        }
    }

    fn compare_source(
        &self,
        anchor: &'a Message,
        children: &[&'a Message],
    ) -> Option<CompareSource<'a>> {
        let shared_group = children
            .first()
            .and_then(|first| self.maps.group_of(first))
            .filter(|group| group.mode() == GroupMode::Compare)
            .filter(|group| children.iter().all(|child| child.group_id() == Some(group.id())));
        if let Some(group) = shared_group {
            return Some(CompareSource::Group(group));
        }
        (anchor.wants_compare() && children.len() > 1).then_some(CompareSource::Flag)
    }

    /// Explicit selection, then the persisted pin, then the policy default.
    fn active_branch_index(&mut self, anchor: &'a Message, children: &[&'a Message]) -> usize {
        let last = children.len() - 1;

        if let Some(&requested) = self.options.active_branches.get(anchor.id().as_str()) {
            if requested > last {
                self.diagnostics.push(Diagnostic::BranchIndexClamped {
                    parent_message_id: anchor.id().clone(),
                    requested,
                    clamped: last,
                });
                return last;
            }
            return requested;
        }

        if !self.options.ignore_persisted_selection {
            let pinned = anchor
                .pinned_branch()
                .and_then(|pinned| children.iter().position(|child| child.id() == pinned));
            if let Some(index) = pinned {
                return index;
            }
        }

        match self.options.branch_policy {
            BranchPolicy::Latest => last,
            BranchPolicy::First => 0,
            BranchPolicy::FirstWithContinuation => children
                .iter()
                .position(|child| !self.maps.children_of(child).is_empty())
                .unwrap_or(0),
        }
    }
}
