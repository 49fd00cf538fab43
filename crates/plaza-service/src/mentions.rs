//! Mention (`@username`) parsing and resolution.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::profiles::ProfileService;

/// A piece of mention-parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    /// Literal text.
    Text(String),
    /// A mention; the username without its leading `@`.
    Mention(String),
}

fn is_mention_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Splits text into literal and `@username` segments.
pub fn split_mentions(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '@' && chars.peek().is_some_and(|&next| is_mention_char(next)) {
            let mut handle = String::new();
            while let Some(&next) = chars.peek() {
                if is_mention_char(next) {
                    handle.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if !literal.is_empty() {
                segments.push(TextSegment::Text(std::mem::take(&mut literal)));
            }
            segments.push(TextSegment::Mention(handle));
        } else {
            literal.push(c);
        }
    }
    if !literal.is_empty() {
        segments.push(TextSegment::Text(literal));
    }
    segments
}

/// Resolves mention handles to profile ids, caching hits in memory.
#[derive(Debug, Clone)]
pub struct MentionResolver {
    profiles: Arc<ProfileService>,
    cache: Arc<DashMap<String, Uuid>>,
}

impl MentionResolver {
    /// Creates a new resolver.
    pub fn new(profiles: Arc<ProfileService>) -> Self {
        Self {
            profiles,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Resolves a username to its profile id. Unknown handles (and lookup
    /// failures) resolve to `None`.
    pub async fn resolve(&self, username: &str) -> Option<Uuid> {
        if let Some(hit) = self.cache.get(username) {
            return Some(*hit.value());
        }
        let profile = self.profiles.find_by_username(username).await.ok()??;
        self.cache.insert(username.to_string(), profile.profile_id);
        Some(profile.profile_id)
    }
}
