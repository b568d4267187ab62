use std::fmt;

/// A broadcast topic: `channel:<threadId>:messages` for new messages and
/// `chat:<threadId>:messages:update` for edits and soft deletes. The thread
/// id is either a channel id or a conversation id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    pub thread_id: String,
    pub kind: TopicKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicKind {
    Created,
    Updated,
}

impl Topic {
    pub fn created(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            kind: TopicKind::Created,
        }
    }

    pub fn updated(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            kind: TopicKind::Updated,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (thread_id, kind) = if let Some(rest) = raw.strip_prefix("chat:") {
            (rest.strip_suffix(":messages:update")?, TopicKind::Updated)
        } else if let Some(rest) = raw.strip_prefix("channel:") {
            (rest.strip_suffix(":messages")?, TopicKind::Created)
        } else {
            return None;
        };
        if thread_id.is_empty() || thread_id.contains(':') {
            return None;
        }
        Some(Self {
            thread_id: thread_id.to_string(),
            kind,
        })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TopicKind::Created => write!(f, "channel:{}:messages", self.thread_id),
            TopicKind::Updated => write!(f, "chat:{}:messages:update", self.thread_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for topic in [Topic::created("abc"), Topic::updated("abc")] {
            assert_eq!(Topic::parse(&topic.to_string()), Some(topic));
        }
    }

    #[test]
    fn topic_strings() {
        assert_eq!(Topic::created("c1").to_string(), "channel:c1:messages");
        assert_eq!(Topic::updated("c1").to_string(), "chat:c1:messages:update");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(Topic::parse("channel::messages"), None);
        assert_eq!(Topic::parse("chat:c1:messages"), None);
        assert_eq!(Topic::parse("channel:c1:messages:update"), None);
        assert_eq!(Topic::parse("chat:c1:typing"), None);
        assert_eq!(Topic::parse("channel:a:b:messages"), None);
        assert_eq!(Topic::parse("dm:c1:messages"), None);
    }
}
