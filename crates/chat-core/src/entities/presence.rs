//! Presence set - users currently known to be online

use std::collections::BTreeSet;

/// Set of online user identifiers, maintained from JOIN / LEAVE envelopes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSet {
    users: BTreeSet<String>,
}

impl PresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Returns `true` if the user was not already present.
    pub fn add(&mut self, user: impl Into<String>) -> bool {
        self.users.insert(user.into())
    }

    /// Remove a user. Returns `true` if the user was present.
    pub fn remove(&mut self, user: &str) -> bool {
        self.users.remove(user)
    }

    pub fn contains(&self, user: &str) -> bool {
        self.users.contains(user)
    }

    pub fn clear(&mut self) {
        self.users.clear();
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterate users in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }

    /// Users other than `local_username`, in sorted order
    pub fn others<'a>(&'a self, local_username: &'a str) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |user| *user != local_username)
    }
}

impl<S: Into<String>> FromIterator<S> for PresenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().map(Into::into).collect(),
        }
    }
}
