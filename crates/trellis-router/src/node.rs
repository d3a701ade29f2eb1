//! Radix tree node.
//!
//! One node per path segment. Matching prefers static children, then the
//! parameter child, then the catch-all child, and backtracks when a
//! preferred branch dead-ends.

use http::Method;
use trellis_core::{EngineError, EngineResult, Params};

use crate::method_router::MethodRouter;

/// Kind of path segment in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment, e.g. `users`.
    Static,
    /// Named parameter, e.g. `:id`.
    Param(String),
    /// Catch-all swallowing the rest of the path, e.g. `*path`.
    CatchAll(String),
}

impl SegmentKind {
    fn parse(segment: &str) -> Self {
        if let Some(name) = segment.strip_prefix(':').filter(|n| !n.is_empty()) {
            Self::Param(name.to_string())
        } else if let Some(name) = segment.strip_prefix('*').filter(|n| !n.is_empty()) {
            Self::CatchAll(name.to_string())
        } else {
            Self::Static
        }
    }
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Segment as written in the template.
    pub segment: String,
    /// Kind of segment.
    pub kind: SegmentKind,
    /// Values served at this exact path.
    pub methods: MethodRouter<T>,
    /// Static children, sorted by segment.
    pub static_children: Vec<Node<T>>,
    /// Parameter child (at most one).
    pub param_child: Option<Box<Node<T>>>,
    /// Catch-all child (at most one, always a leaf).
    pub catch_all_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(segment: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
            methods: MethodRouter::new(),
            static_children: Vec::new(),
            param_child: None,
            catch_all_child: None,
        }
    }

    /// Creates the root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", SegmentKind::Static)
    }

    /// Inserts `value` for `(method, path)`.
    ///
    /// Fails on an already bound pair, on a parameter name differing from
    /// the one already bound at that position, and on a catch-all that is
    /// not the last segment.
    pub fn insert(&mut self, path: &str, method: Method, value: T) -> EngineResult<()> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(pos) = segments
            .iter()
            .position(|s| matches!(SegmentKind::parse(s), SegmentKind::CatchAll(_)))
        {
            if pos + 1 != segments.len() {
                return Err(EngineError::invalid_template(
                    path,
                    "a catch-all must be the last segment",
                ));
            }
        }

        let node = self.descend(path, &segments)?;
        node.methods
            .insert(method.clone(), value)
            .map_err(|_| EngineError::conflict(method.as_str(), path))
    }

    fn descend(&mut self, path: &str, segments: &[&str]) -> EngineResult<&mut Self> {
        let Some((segment, rest)) = segments.split_first() else {
            return Ok(self);
        };

        let child = match SegmentKind::parse(segment) {
            SegmentKind::Static => {
                let idx = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(idx) => idx,
                    Err(idx) => {
                        self.static_children
                            .insert(idx, Self::new(*segment, SegmentKind::Static));
                        idx
                    }
                };
                &mut self.static_children[idx]
            }
            SegmentKind::Param(name) => {
                Self::wildcard_slot(&mut self.param_child, path, segment, name, SegmentKind::Param)?
            }
            SegmentKind::CatchAll(name) => Self::wildcard_slot(
                &mut self.catch_all_child,
                path,
                segment,
                name,
                SegmentKind::CatchAll,
            )?,
        };
        child.descend(path, rest)
    }

    fn wildcard_slot<'a>(
        slot: &'a mut Option<Box<Self>>,
        path: &str,
        segment: &str,
        name: String,
        kind: fn(String) -> SegmentKind,
    ) -> EngineResult<&'a mut Self> {
        if let Some(existing) = slot.as_deref() {
            if existing.kind != kind(name.clone()) {
                let bound = match &existing.kind {
                    SegmentKind::Param(n) | SegmentKind::CatchAll(n) => n.as_str(),
                    SegmentKind::Static => "",
                };
                return Err(EngineError::param_conflict(path, bound, name));
            }
        }
        Ok(&mut **slot.get_or_insert_with(|| Box::new(Self::new(segment, kind(name)))))
    }

    /// Finds the node serving `path`, capturing parameters.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments(&self, segments: &[&str], params: &mut Params) -> Option<&MethodRouter<T>> {
        let Some((segment, rest)) = segments.split_first() else {
            return (!self.methods.is_empty()).then_some(&self.methods);
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(rest, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.as_str(), *segment);
                if let Some(found) = child.match_segments(rest, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.catch_all_child {
            if let SegmentKind::CatchAll(name) = &child.kind {
                if !child.methods.is_empty() {
                    params.push(name.as_str(), segments.join("/"));
                    return Some(&child.methods);
                }
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Self> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(routes: &[(&str, &'static str)]) -> Node<&'static str> {
        let mut root = Node::root();
        for (path, value) in routes {
            root.insert(path, Method::GET, *value).unwrap();
        }
        root
    }

    fn lookup(root: &Node<&'static str>, path: &str) -> Option<(&'static str, Params)> {
        root.match_path(path)
            .and_then(|(methods, params)| methods.get(&Method::GET).map(|v| (*v, params)))
    }

    #[test]
    fn test_segment_kind_parse() {
        assert_eq!(SegmentKind::parse("users"), SegmentKind::Static);
        assert_eq!(SegmentKind::parse(":id"), SegmentKind::Param("id".into()));
        assert_eq!(SegmentKind::parse("*rest"), SegmentKind::CatchAll("rest".into()));
        assert_eq!(SegmentKind::parse(":"), SegmentKind::Static);
        assert_eq!(SegmentKind::parse("*"), SegmentKind::Static);
    }

    #[test]
    fn test_static_match() {
        let root = tree(&[("/users", "list")]);
        let (value, params) = lookup(&root, "/users").unwrap();
        assert_eq!(value, "list");
        assert!(params.is_empty());
        assert!(lookup(&root, "/posts").is_none());
    }

    #[test]
    fn test_param_match() {
        let root = tree(&[("/some/:id/path/:subId", "show")]);
        let (value, params) = lookup(&root, "/some/1/path/2").unwrap();
        assert_eq!(value, "show");
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("subId"), Some("2"));
    }

    #[test]
    fn test_catch_all_match() {
        let root = tree(&[("/files/*path", "serve")]);
        let (value, params) = lookup(&root, "/files/images/logo.png").unwrap();
        assert_eq!(value, "serve");
        assert_eq!(params.get("path"), Some("images/logo.png"));
        assert!(lookup(&root, "/files").is_none());
    }

    #[test]
    fn test_priority() {
        let root = tree(&[
            ("/users/me", "me"),
            ("/users/:id", "user"),
            ("/users/*rest", "rest"),
        ]);
        assert_eq!(lookup(&root, "/users/me").unwrap().0, "me");
        assert_eq!(lookup(&root, "/users/42").unwrap().0, "user");
        assert_eq!(lookup(&root, "/users/42/extra").unwrap().0, "rest");
    }

    #[test]
    fn test_backtracking_unwinds_params() {
        // "/a/x/c" first tries the param branch under /a, which dead-ends
        let root = tree(&[("/a/:first/b", "param"), ("/a/*tail", "tail")]);
        let (value, params) = lookup(&root, "/a/x/c").unwrap();
        assert_eq!(value, "tail");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("first"), None);
        assert_eq!(params.get("tail"), Some("x/c"));
    }

    #[test]
    fn test_backtracking_from_static() {
        let root = tree(&[("/users/me/settings", "settings"), ("/users/:id", "user")]);
        let (value, params) = lookup(&root, "/users/me").unwrap();
        assert_eq!(value, "user");
        assert_eq!(params.get("id"), Some("me"));
    }

    #[test]
    fn test_slashes_ignored() {
        let root = tree(&[("/api/v1/users/", "list")]);
        assert_eq!(lookup(&root, "//api/v1//users").unwrap().0, "list");
    }

    #[test]
    fn test_root_path() {
        let root = tree(&[("/", "index")]);
        assert_eq!(lookup(&root, "/").unwrap().0, "index");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut root = tree(&[("/users/:id", "first")]);
        let err = root.insert("/users/:id", Method::GET, "second").unwrap_err();
        assert_eq!(err, EngineError::conflict("GET", "/users/:id"));
        assert_eq!(lookup(&root, "/users/1").unwrap().0, "first");

        root.insert("/users/:id", Method::DELETE, "delete").unwrap();
    }

    #[test]
    fn test_param_name_conflict() {
        let mut root = tree(&[("/users/:id", "user")]);
        let err = root.insert("/users/:name/posts", Method::GET, "posts").unwrap_err();
        assert_eq!(err, EngineError::param_conflict("/users/:name/posts", "id", "name"));

        // same name at the same position is fine
        root.insert("/users/:id/posts", Method::GET, "posts").unwrap();
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let mut root: Node<&str> = Node::root();
        let err = root.insert("/files/*path/meta", Method::GET, "x").unwrap_err();
        assert!(matches!(err, EngineError::InvalidTemplate { .. }));
    }
}
