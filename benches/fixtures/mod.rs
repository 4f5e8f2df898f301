// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-ConversationFlow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Conversation Flow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use conversation_flow::{
    FlatMessage, GroupId, GroupMode, Message, MessageGroupMetadata, MessageId, MessageRole,
    ModelUsage,
};

pub fn checksum_flat(list: &[FlatMessage]) -> u64 {
    let mut acc = 0u64;
    for entry in list {
        acc = acc.wrapping_mul(131).wrapping_add(entry.id.len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(entry.compare_columns.len() as u64);
        if let Some(branch) = entry.branch {
            acc = acc.wrapping_mul(131).wrapping_add(branch.active_index as u64);
        }
    }
    acc
}

pub mod chat {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub turns: usize,
        /// Every n-th turn is regenerated once, creating a two-way branch.
        pub regenerate_every: usize,
        /// Every n-th turn is answered by two models in a compare group.
        pub compare_every: usize,
        pub tools_per_answer: usize,
        pub long_text: bool,
    }

    impl Params {
        pub const fn new(
            turns: usize,
            regenerate_every: usize,
            compare_every: usize,
            tools_per_answer: usize,
            long_text: bool,
        ) -> Self {
            Self { turns, regenerate_every, compare_every, tools_per_answer, long_text }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        MediumTools,
        LargeBranchy,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumTools => "medium_tools",
                Self::LargeBranchy => "large_branchy",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params::new(20, 0, 0, 0, false),
                Self::MediumTools => Params::new(100, 10, 0, 2, false),
                Self::LargeBranchy => Params::new(250, 3, 7, 1, true),
            }
        }
    }

    fn id(value: String) -> MessageId {
        MessageId::new(value).expect("valid message id")
    }

    fn text(id: &MessageId, long_text: bool) -> String {
        if long_text {
            format!("{id}: {}", "lorem ipsum ".repeat(40))
        } else {
            format!("{id}")
        }
    }

    struct Builder {
        params: Params,
        messages: Vec<Message>,
        groups: Vec<MessageGroupMetadata>,
    }

    impl Builder {
        fn push(&mut self, id: MessageId, parent: Option<&MessageId>, role: MessageRole) -> MessageId {
            let mut message = Message::new(id.clone(), role);
            message.set_parent_id(parent.cloned());
            message.set_content(text(&id, self.params.long_text));
            let at = self.messages.len() as i64;
            message.set_created_at(at);
            message.set_updated_at(at);
            if role != MessageRole::User {
                message.set_usage(Some(ModelUsage {
                    total_tokens: Some(10 + self.messages.len() as u64 % 50),
                    ..ModelUsage::default()
                }));
            }
            self.messages.push(message);
            id
        }

        /// Answer plus its tool calls; returns the id the next turn continues from.
        fn answer(&mut self, id: MessageId, parent: &MessageId) -> MessageId {
            let answer = self.push(id, Some(parent), MessageRole::Assistant);
            let mut tail = answer.clone();
            for tool in 0..self.params.tools_per_answer {
                tail = self.push(
                    MessageId::new(format!("{answer}.t{tool}")).expect("valid tool id"),
                    Some(&answer),
                    MessageRole::Tool,
                );
            }
            tail
        }
    }

    pub fn conversation(params: Params) -> (Vec<Message>, Vec<MessageGroupMetadata>) {
        let mut builder = Builder { params, messages: Vec::new(), groups: Vec::new() };
        let mut parent: Option<MessageId> = None;

        for turn in 0..params.turns {
            let user = builder.push(id(format!("u{turn:05}")), parent.as_ref(), MessageRole::User);

            let compare = params.compare_every > 0 && turn % params.compare_every == 0;
            if compare {
                let group_id = GroupId::new(format!("g{turn:05}")).expect("valid group id");
                let mut group = MessageGroupMetadata::new(group_id.clone(), GroupMode::Compare);
                group.set_parent_message_id(Some(user.clone()));
                builder.groups.push(group);

                let mut tail = user.clone();
                for column in 0..2 {
                    let column_id = id(format!("c{turn:05}.{column}"));
                    tail = builder.push(column_id, Some(&user), MessageRole::Assistant);
                    if let Some(message) = builder.messages.last_mut() {
                        message.set_group_id(Some(group_id.clone()));
                    }
                }
                parent = Some(tail);
                continue;
            }

            let mut tail = builder.answer(id(format!("a{turn:05}")), &user);
            let regenerate = params.regenerate_every > 0 && turn % params.regenerate_every == 0;
            if regenerate {
                tail = builder.answer(id(format!("a{turn:05}.r")), &user);
            }
            parent = Some(tail);
        }

        (builder.messages, builder.groups)
    }

    pub fn fixture(case: Case) -> (Vec<Message>, Vec<MessageGroupMetadata>) {
        conversation(case.params())
    }
}
