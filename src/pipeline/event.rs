//! Transport-neutral view of an inbound chat message.

use crate::database::Member;

/// Kind of conversation a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Group or supergroup.
    Group,
    Private,
    /// Channels and anything else.
    Other,
}

/// Who sent the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl Sender {
    /// Membership row for this sender in `chat_id`.
    pub fn to_member(&self, chat_id: i64) -> Member {
        Member::new(
            chat_id,
            self.id,
            self.first_name.clone(),
            self.last_name.clone(),
            self.username.clone(),
        )
    }
}

/// One inbound message, as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    /// Absent when the message was sent on behalf of a chat (anonymous
    /// admins, linked-channel posts) or has no author at all.
    pub sender: Option<Sender>,
    pub text: Option<String>,
}
