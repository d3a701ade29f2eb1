//! Path template parsing.
//!
//! Routes are declared with the native placeholder syntax, where a variable
//! segment starts with `:` (a named parameter) or `*` (a catch-all):
//!
//! ```text
//! native     /some/:id/path/:subId      (caller-facing, bound to the engine)
//! document   /some/{id}/path/{subId}    (OpenAPI path template)
//! ```
//!
//! Engines that dispatch on brace syntax receive `{id}` / `{*rest}` instead,
//! see [`ParamStyle`].

/// Delimiter between path segments.
pub const DELIMITER: char = '/';

/// Sigil marking a named parameter segment.
pub const PARAM_SIGIL: char = ':';

/// Sigil marking a catch-all segment.
pub const CATCH_ALL_SIGIL: char = '*';

/// Result of [`parse_template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Parameter names, left to right, duplicates kept.
    pub params: Vec<String>,
    /// The template with every variable segment rewritten to `{name}`.
    pub document: String,
}

/// Classifies one segment of a native template.
fn variable(segment: &str) -> Option<(&str, bool)> {
    if let Some(name) = segment.strip_prefix(PARAM_SIGIL) {
        (!name.is_empty()).then_some((name, false))
    } else if let Some(name) = segment.strip_prefix(CATCH_ALL_SIGIL) {
        (!name.is_empty()).then_some((name, true))
    } else {
        None
    }
}

/// Parses a native template into its parameter names and document form.
///
/// Total over any input. Segments are rewritten in place, so literals,
/// doubled delimiters and a trailing delimiter come back untouched.
///
/// # Example
///
/// ```
/// use trellis_core::template::parse_template;
///
/// let parsed = parse_template("/some/:id/path/:subId");
/// assert_eq!(parsed.params, vec!["id", "subId"]);
/// assert_eq!(parsed.document, "/some/{id}/path/{subId}");
/// ```
pub fn parse_template(raw: &str) -> ParsedTemplate {
    let mut params = Vec::new();
    let segments: Vec<String> = raw
        .split(DELIMITER)
        .map(|segment| match variable(segment) {
            Some((name, _)) => {
                params.push(name.to_string());
                format!("{{{name}}}")
            }
            None => segment.to_string(),
        })
        .collect();

    ParsedTemplate {
        params,
        document: segments.join("/"),
    }
}

/// Collapses repeated delimiters, forces one leading delimiter and drops a
/// trailing one (the root path stays `/`).
///
/// ```
/// use trellis_core::template::normalize_path;
///
/// assert_eq!(normalize_path("/api/v1//some"), "/api/v1/some");
/// assert_eq!(normalize_path("api/v1/"), "/api/v1");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split(DELIMITER).filter(|s| !s.is_empty()) {
        normalized.push(DELIMITER);
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push(DELIMITER);
    }
    normalized
}

/// Placeholder syntax an engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// `:id` and `*rest`, identical to the native syntax.
    #[default]
    Colon,
    /// `{id}` and `{*rest}`.
    Brace,
}

/// A path parameter discovered in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// Parameter name.
    pub name: String,
    /// Whether the segment swallows the rest of the path.
    pub catch_all: bool,
}

/// A parsed route template, computed once when a route is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    native: String,
    document: String,
    params: Vec<PathParam>,
}

impl Template {
    /// Parses a native template.
    pub fn new(raw: impl Into<String>) -> Self {
        let native = raw.into();
        let ParsedTemplate { document, .. } = parse_template(&native);
        let params = native
            .split(DELIMITER)
            .filter_map(variable)
            .map(|(name, catch_all)| PathParam {
                name: name.to_string(),
                catch_all,
            })
            .collect();

        Self {
            native,
            document,
            params,
        }
    }

    /// Joins a prefix and a route template into the final route path.
    ///
    /// Both forms are normalized; prefix parameters come first.
    ///
    /// ```
    /// use trellis_core::template::Template;
    ///
    /// let joined = Template::join(&Template::new("/api/v1/"), &Template::new("/some/:id"));
    /// assert_eq!(joined.native(), "/api/v1/some/:id");
    /// assert_eq!(joined.document(), "/api/v1/some/{id}");
    /// ```
    pub fn join(prefix: &Template, route: &Template) -> Self {
        let params = prefix
            .params
            .iter()
            .chain(route.params.iter())
            .cloned()
            .collect();

        Self {
            native: normalize_path(&format!("{}/{}", prefix.native, route.native)),
            document: normalize_path(&format!("{}/{}", prefix.document, route.document)),
            params,
        }
    }

    /// Returns the template normalized as a standalone path.
    pub fn normalized(&self) -> Self {
        Self {
            native: normalize_path(&self.native),
            document: normalize_path(&self.document),
            params: self.params.clone(),
        }
    }

    /// The template exactly as declared.
    pub fn native(&self) -> &str {
        &self.native
    }

    /// The brace-syntax form used in the API document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Path parameters in declaration order.
    pub fn params(&self) -> &[PathParam] {
        &self.params
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Renders the native path in an engine's placeholder syntax.
    pub fn engine_path(&self, style: ParamStyle) -> String {
        match style {
            ParamStyle::Colon => self.native.clone(),
            ParamStyle::Brace => self
                .native
                .split(DELIMITER)
                .map(|segment| match variable(segment) {
                    Some((name, false)) => format!("{{{name}}}"),
                    Some((name, true)) => format!("{{*{name}}}"),
                    None => segment.to_string(),
                })
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_no_variables() {
        let parsed = parse_template("/users/list");
        assert!(parsed.params.is_empty());
        assert_eq!(parsed.document, "/users/list");
    }

    #[test]
    fn test_parse_multiple_params() {
        let parsed = parse_template("/some/:id/path/:subId");
        assert_eq!(parsed.params, vec!["id", "subId"]);
        assert_eq!(parsed.document, "/some/{id}/path/{subId}");
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let parsed = parse_template("/a/:id/b/:id");
        assert_eq!(parsed.params, vec!["id", "id"]);
        assert_eq!(parsed.document, "/a/{id}/b/{id}");
    }

    #[test]
    fn test_parse_prefix_names_are_positional() {
        // ":id" must not clobber ":idx"
        let parsed = parse_template("/:id/:idx");
        assert_eq!(parsed.params, vec!["id", "idx"]);
        assert_eq!(parsed.document, "/{id}/{idx}");
    }

    #[test]
    fn test_parse_trailing_slash_untouched() {
        let parsed = parse_template("/users/:id/");
        assert_eq!(parsed.params, vec!["id"]);
        assert_eq!(parsed.document, "/users/{id}/");
    }

    #[test]
    fn test_parse_bare_sigil_is_literal() {
        let parsed = parse_template("/a/:/b/*");
        assert!(parsed.params.is_empty());
        assert_eq!(parsed.document, "/a/:/b/*");
    }

    #[test]
    fn test_parse_catch_all() {
        let parsed = parse_template("/files/*path");
        assert_eq!(parsed.params, vec!["path"]);
        assert_eq!(parsed.document, "/files/{path}");
    }

    #[test]
    fn test_parse_empty() {
        let parsed = parse_template("");
        assert!(parsed.params.is_empty());
        assert_eq!(parsed.document, "");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/api/v1/"), "/api/v1");
        assert_eq!(normalize_path("//api///v1"), "/api/v1");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("some"), "/some");
    }

    #[test]
    fn test_join_prefix_trailing_delimiter() {
        let joined = Template::join(&Template::new("/api/v1/"), &Template::new("/some"));
        assert_eq!(joined.native(), "/api/v1/some");
        assert_eq!(joined.document(), "/api/v1/some");
    }

    #[test]
    fn test_join_empty_route() {
        let joined = Template::join(&Template::new("/api/v1"), &Template::new(""));
        assert_eq!(joined.native(), "/api/v1");
    }

    #[test]
    fn test_join_prefix_params_first() {
        let joined = Template::join(&Template::new("/orgs/:org"), &Template::new("/users/:id"));
        let names: Vec<_> = joined.param_names().collect();
        assert_eq!(names, vec!["org", "id"]);
        assert_eq!(joined.document(), "/orgs/{org}/users/{id}");
    }

    #[test]
    fn test_template_keeps_native() {
        let template = Template::new("/some/:id/path/:subId");
        assert_eq!(template.native(), "/some/:id/path/:subId");
        assert_eq!(template.document(), "/some/{id}/path/{subId}");
        assert_eq!(template.params().len(), 2);
    }

    #[test]
    fn test_engine_path_styles() {
        let template = Template::new("/files/:bucket/*key");
        assert_eq!(template.engine_path(ParamStyle::Colon), "/files/:bucket/*key");
        assert_eq!(template.engine_path(ParamStyle::Brace), "/files/{bucket}/{*key}");
        assert!(template.params()[1].catch_all);
    }

    fn literal() -> impl Strategy<Value = String> {
        "[a-z0-9_-]{1,8}"
    }

    proptest! {
        #[test]
        fn prop_literal_templates_unchanged(segments in prop::collection::vec(literal(), 0..6), trailing in any::<bool>()) {
            let mut raw = format!("/{}", segments.join("/"));
            if trailing {
                raw.push('/');
            }
            let parsed = parse_template(&raw);
            prop_assert!(parsed.params.is_empty());
            prop_assert_eq!(parsed.document, raw);
        }

        #[test]
        fn prop_params_in_order(parts in prop::collection::vec((literal(), any::<bool>()), 1..8)) {
            let raw: String = parts
                .iter()
                .map(|(name, is_param)| if *is_param { format!("/:{name}") } else { format!("/{name}") })
                .collect();
            let expected_doc: String = parts
                .iter()
                .map(|(name, is_param)| if *is_param { format!("/{{{name}}}") } else { format!("/{name}") })
                .collect();
            let expected_params: Vec<String> = parts
                .iter()
                .filter(|(_, is_param)| *is_param)
                .map(|(name, _)| name.clone())
                .collect();

            let parsed = parse_template(&raw);
            prop_assert_eq!(parsed.params, expected_params);
            prop_assert_eq!(parsed.document, expected_doc);

            let template = Template::new(raw.clone());
            prop_assert_eq!(template.native(), raw.as_str());
        }

        #[test]
        fn prop_normalize_idempotent(raw in "[a-z/]{0,24}") {
            let once = normalize_path(&raw);
            prop_assert_eq!(normalize_path(&once), once.clone());
            prop_assert!(once.starts_with('/'));
            prop_assert!(!once.contains("//"));
        }
    }
}
