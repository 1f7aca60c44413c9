// Spawn hierarchy resolution.
//
// Sessions form a forest through `spawned_by`. Anything without a resolvable
// parent, or caught in a cycle, is treated as a root.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::model::Session;

/// Key lookup over the input sessions, in encounter order.
///
/// The key is the session's identity: a repeated key refers to the same
/// session, so only the first record is kept.
#[derive(Debug)]
pub struct SessionIndex<'a> {
    sessions: Vec<&'a Session>,
    by_key: HashMap<&'a str, usize>,
}

impl<'a> SessionIndex<'a> {
    pub fn new(sessions: &'a [Session]) -> Self {
        let mut unique = Vec::with_capacity(sessions.len());
        let mut by_key = HashMap::with_capacity(sessions.len());
        for session in sessions {
            if by_key.contains_key(session.key.as_str()) {
                warn!(
                    key = %session.key,
                    dropped_spawned_by = ?session.spawned_by,
                    dropped_kind = ?session.kind,
                    "duplicate session key, dropping later record"
                );
                continue;
            }
            by_key.insert(session.key.as_str(), unique.len());
            unique.push(session);
        }
        Self { sessions: unique, by_key }
    }

    pub fn get(&self, key: &str) -> Option<&'a Session> {
        self.by_key.get(key).map(|&i| self.sessions[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// The session's parent, if it names one we know about.
    pub fn parent_of(&self, session: &Session) -> Option<&'a Session> {
        session.spawned_by.as_deref().and_then(|key| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Session> + '_ {
        self.sessions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Number of spawn links between `key` and its root.
///
/// Unknown sessions, sessions without a (known) parent and sessions whose
/// parent chain loops back on itself all have depth 0.
pub fn depth(key: &str, index: &SessionIndex<'_>) -> usize {
    let Some(mut current) = index.get(key) else {
        return 0;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(current.key.as_str());

    let mut depth = 0;
    while let Some(parent) = index.parent_of(current) {
        if !visited.insert(parent.key.as_str()) {
            return 0;
        }
        depth += 1;
        current = parent;
    }
    depth
}

/// Sessions bucketed by depth, each bucket in input order.
pub fn group_by_depth<'a>(index: &SessionIndex<'a>) -> BTreeMap<usize, Vec<&'a Session>> {
    let mut groups: BTreeMap<usize, Vec<&'a Session>> = BTreeMap::new();
    for session in index.iter() {
        groups.entry(depth(&session.key, index)).or_default().push(session);
    }
    groups
}
