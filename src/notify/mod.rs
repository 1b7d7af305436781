pub mod dingtalk;

pub use dingtalk::{spawn_digest_broadcast, DingTalkNotifier};

/// A markdown message as DingTalk group bots accept it.
#[derive(Debug, Clone)]
pub struct MarkdownMessage {
    pub title: String,
    pub text: String,
}
