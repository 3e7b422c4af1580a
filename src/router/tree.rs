//! Compressed radix trie over path bytes.
//!
//! Static runs are stored as compressed literal keys and split on demand so
//! that no two sibling keys share a prefix. Each node additionally owns at
//! most one wildcard child (`:name`, one path segment), one catch-all child
//! (`*name`, the rest of the path) and one regex child (`#name:re`). A
//! parallel `indices` byte array holds the first byte of every static child
//! so the walk can pick a branch without touching the child keys.
//!
//! Lookup walks the tree without allocating beyond appends to the supplied
//! parameter list, tracking two pieces of rollback state: the deepest
//! subtree value seen so far (used when no deeper match lands) and the
//! wildcard sibling of the most recent branch (retried when the static
//! branch dead-ends on a prefix mismatch).

use std::sync::Arc;

use regex::Regex;

use super::error::RouterError;
use super::pattern;
use crate::context::ParamVec;
use crate::handler::Handler;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum NodeKind {
    Static,
    Wildcard,
    CatchAll,
    Expression,
}

/// Handler plus the pattern string it was registered under, byte for byte.
pub(crate) struct RouteValue {
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) pattern: Arc<str>,
}

/// Outcome of a successful walk.
pub(crate) enum Found<'a> {
    /// A registered value matched the path.
    Route(&'a RouteValue),
    /// The path equals a registered subtree pattern minus its trailing
    /// slash; the caller should answer with a permanent redirect. Carries
    /// the trimmed pattern.
    Redirect { pattern: &'a str },
}

pub(crate) struct Node {
    key: String,
    kind: NodeKind,
    param_name: Option<Arc<str>>,
    value: Option<RouteValue>,
    children: Vec<Node>,
    indices: Vec<u8>,
    wildcard: Option<Box<Node>>,
    catchall: Option<Box<Node>>,
    expression: Option<Box<Node>>,
    regex: Option<Regex>,
    regex_src: String,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new_static("", None)
    }

    fn new_static(key: &str, value: Option<RouteValue>) -> Self {
        Self {
            key: key.to_string(),
            kind: NodeKind::Static,
            param_name: None,
            value,
            children: Vec::new(),
            indices: Vec::new(),
            wildcard: None,
            catchall: None,
            expression: None,
            regex: None,
            regex_src: String::new(),
        }
    }

    fn new_dynamic(kind: NodeKind, name: &str) -> Self {
        Self {
            key: String::new(),
            kind,
            param_name: Some(Arc::from(name)),
            value: None,
            children: Vec::new(),
            indices: Vec::new(),
            wildcard: None,
            catchall: None,
            expression: None,
            regex: None,
            regex_src: String::new(),
        }
    }

    /// Insert `pattern` with its value, failing on any conflict with the
    /// existing tree.
    pub(crate) fn insert(&mut self, pattern: &str, value: RouteValue) -> Result<(), RouterError> {
        self.insert_pattern(pattern, Some(value))
    }

    /// Recursive driver: peel off the literal run before the next dynamic
    /// marker, insert the dynamic segment, recurse on the tail.
    fn insert_pattern(&mut self, key: &str, value: Option<RouteValue>) -> Result<(), RouterError> {
        let Some(idx) = pattern::dynamic_index(key) else {
            self.insert_fragment(key, value)?;
            return Ok(());
        };

        let (prefix, rest) = key.split_at(idx);
        let node = self.insert_fragment(prefix, None)?;

        match pattern::segment_end(rest) {
            None => {
                node.insert_fragment(rest, value)?;
                Ok(())
            }
            Some(slash) => {
                if rest.starts_with('*') {
                    return Err(RouterError::SegmentsAfterCatchAll {
                        segment: rest[..slash].to_string(),
                    });
                }
                let node = node.insert_fragment(&rest[..slash], None)?;
                node.insert_pattern(&rest[slash..], value)
            }
        }
    }

    fn insert_fragment(
        &mut self,
        key: &str,
        value: Option<RouteValue>,
    ) -> Result<&mut Node, RouterError> {
        match key.as_bytes().first() {
            None => Ok(self),
            Some(b':') => self.insert_wildcard(&key[1..], value),
            Some(b'*') => self.insert_catchall(&key[1..], value),
            Some(b'#') => self.insert_expression(key, value),
            Some(_) => self.insert_static(key, value),
        }
    }

    fn insert_wildcard(
        &mut self,
        name: &str,
        value: Option<RouteValue>,
    ) -> Result<&mut Node, RouterError> {
        if name.is_empty() {
            return Err(RouterError::EmptyWildcardName {
                segment: ":".to_string(),
            });
        }
        let existed = self.wildcard.is_some();
        let node = self
            .wildcard
            .get_or_insert_with(|| Box::new(Node::new_dynamic(NodeKind::Wildcard, name)));
        if existed {
            let existing = node.param_name.as_deref().unwrap_or("");
            if existing != name {
                return Err(RouterError::MismatchedWildcards {
                    existing: format!(":{existing}"),
                    requested: format!(":{name}"),
                });
            }
        }
        set_value(&mut node.value, value)?;
        Ok(node)
    }

    fn insert_catchall(
        &mut self,
        name: &str,
        value: Option<RouteValue>,
    ) -> Result<&mut Node, RouterError> {
        if name.is_empty() {
            return Err(RouterError::EmptyWildcardName {
                segment: "*".to_string(),
            });
        }
        let existed = self.catchall.is_some();
        let node = self
            .catchall
            .get_or_insert_with(|| Box::new(Node::new_dynamic(NodeKind::CatchAll, name)));
        if existed {
            let existing = node.param_name.as_deref().unwrap_or("");
            if existing != name {
                return Err(RouterError::MismatchedWildcards {
                    existing: format!("*{existing}"),
                    requested: format!("*{name}"),
                });
            }
        }
        set_value(&mut node.value, value)?;
        Ok(node)
    }

    fn insert_expression(
        &mut self,
        key: &str,
        value: Option<RouteValue>,
    ) -> Result<&mut Node, RouterError> {
        let Some(colon) = key.find(':') else {
            return Err(RouterError::InvalidRegexSegment {
                segment: key.to_string(),
                reason: "missing ':' between name and expression".to_string(),
            });
        };
        let name = &key[1..colon];
        if name.is_empty() {
            return Err(RouterError::EmptyWildcardName {
                segment: key.to_string(),
            });
        }
        let raw = &key[colon + 1..];
        let compiled =
            Regex::new(&format!("^({raw})")).map_err(|err| RouterError::InvalidRegexSegment {
                segment: key.to_string(),
                reason: err.to_string(),
            })?;

        let existed = self.expression.is_some();
        let node = self.expression.get_or_insert_with(|| {
            let mut node = Node::new_dynamic(NodeKind::Expression, name);
            node.regex_src = compiled.as_str().to_string();
            node.regex = Some(compiled.clone());
            Box::new(node)
        });
        if existed {
            let existing = node.param_name.as_deref().unwrap_or("");
            if existing != name || node.regex_src != compiled.as_str() {
                return Err(RouterError::MismatchedWildcards {
                    existing: format!("#{existing}:{}", node.regex_src),
                    requested: format!("#{name}:{}", compiled.as_str()),
                });
            }
        }
        set_value(&mut node.value, value)?;
        Ok(node)
    }

    fn insert_static(
        &mut self,
        key: &str,
        value: Option<RouteValue>,
    ) -> Result<&mut Node, RouterError> {
        for i in 0..self.children.len() {
            if self.children[i].key == key {
                set_value(&mut self.children[i].value, value)?;
                return Ok(&mut self.children[i]);
            }

            let cp = common_prefix_len(&self.children[i].key, key);
            if cp == 0 {
                continue;
            }

            if cp == self.children[i].key.len() {
                return self.children[i].insert_static(&key[cp..], value);
            }

            // The child's key extends past the shared prefix: trim it and
            // move it beneath a new node. The parent's index byte for this
            // slot stays valid because the first byte is part of the prefix.
            let mut child = std::mem::replace(&mut self.children[i], Node::new_static("", None));
            child.key.drain(..cp);

            if cp == key.len() {
                let mut adopted = Node::new_static(key, value);
                adopted.indices.push(child.key.as_bytes()[0]);
                adopted.children.push(child);
                self.children[i] = adopted;
                return Ok(&mut self.children[i]);
            }

            let target = Node::new_static(&key[cp..], value);
            let mut branch = Node::new_static(&key[..cp], None);
            branch.indices.push(child.key.as_bytes()[0]);
            branch.indices.push(target.key.as_bytes()[0]);
            branch.children.push(child);
            branch.children.push(target);
            self.children[i] = branch;
            let last = self.children[i].children.len() - 1;
            return Ok(&mut self.children[i].children[last]);
        }

        self.indices.push(key.as_bytes()[0]);
        self.children.push(Node::new_static(key, value));
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Walk the tree for `path`, appending captured parameters to `params`.
    ///
    /// Returns the matched value, a redirect marker when the path equals a
    /// registered subtree pattern minus its trailing slash, or `None`.
    pub(crate) fn lookup<'n>(
        &'n self,
        mut path: &str,
        params: &mut ParamVec,
        match_trailing_slash: bool,
    ) -> Option<Found<'n>> {
        let mut node = self;
        let mut fallback: Option<&'n RouteValue> = None;
        let mut wildcard_backup: Option<&'n Node> = None;

        loop {
            match node.kind {
                NodeKind::Static => {
                    if !path.starts_with(node.key.as_str()) {
                        if let Some(backup) = wildcard_backup.take() {
                            node = backup;
                            continue;
                        }
                        if let Some(value) = &node.value {
                            if subtree_key_matches(&node.key, path) {
                                let pattern = &value.pattern[..value.pattern.len() - 1];
                                return Some(Found::Redirect { pattern });
                            }
                        }
                        return fallback.map(Found::Route);
                    }
                    path = &path[node.key.len()..];
                    if path.is_empty() {
                        return node.value.as_ref().or(fallback).map(Found::Route);
                    }
                    if node.value.is_some() && node.key.ends_with('/') {
                        fallback = node.value.as_ref();
                    }
                }
                NodeKind::Wildcard => match path.find('/') {
                    None => {
                        if let Some(name) = &node.param_name {
                            params.push((Arc::clone(name), path.to_string()));
                        }
                        return node.value.as_ref().or(fallback).map(Found::Route);
                    }
                    Some(idx) => {
                        if let Some(name) = &node.param_name {
                            params.push((Arc::clone(name), path[..idx].to_string()));
                        }
                        path = &path[idx..];
                    }
                },
                NodeKind::CatchAll => {
                    if let Some(name) = &node.param_name {
                        params.push((Arc::clone(name), path.to_string()));
                    }
                    return node.value.as_ref().or(fallback).map(Found::Route);
                }
                NodeKind::Expression => {
                    let Some(m) = node.regex.as_ref().and_then(|re| re.find(path)) else {
                        return fallback.map(Found::Route);
                    };
                    if let Some(name) = &node.param_name {
                        params.push((Arc::clone(name), path[..m.end()].to_string()));
                    }
                    path = &path[m.end()..];
                    if path.is_empty() {
                        return node.value.as_ref().or(fallback).map(Found::Route);
                    }
                }
            }

            // Lets `/foo` answer a request for `/foo/` when enabled.
            if match_trailing_slash && path == "/" && node.value.is_some() {
                fallback = node.value.as_ref();
            }

            wildcard_backup = node.wildcard.as_deref();

            let first = path.as_bytes()[0];
            if let Some(pos) = node.indices.iter().position(|&b| b == first) {
                node = &node.children[pos];
                continue;
            }
            if let Some(next) = node.catchall.as_deref() {
                node = next;
                continue;
            }
            if let Some(next) = node.wildcard.as_deref() {
                node = next;
                continue;
            }
            if let Some(next) = node.expression.as_deref() {
                node = next;
                continue;
            }
            return fallback.map(Found::Route);
        }
    }
}

fn set_value(slot: &mut Option<RouteValue>, value: Option<RouteValue>) -> Result<(), RouterError> {
    if let Some(value) = value {
        if slot.is_some() {
            return Err(RouterError::MultipleRegistrations {
                pattern: value.pattern.to_string(),
            });
        }
        *slot = Some(value);
    }
    Ok(())
}

/// True when `key` is exactly `path` plus a trailing slash.
fn subtree_key_matches(key: &str, path: &str) -> bool {
    key.len() == path.len() + 1 && key.ends_with('/') && key.starts_with(path)
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count()
}
