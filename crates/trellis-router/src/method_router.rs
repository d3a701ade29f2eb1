//! Per-path method table.
//!
//! [`MethodRouter`] maps HTTP methods to whatever a tree node serves for
//! one path. Most paths bind one to three methods, so entries live inline.

use http::Method;
use smallvec::SmallVec;

/// Methods kept inline before spilling.
const INLINE_METHODS: usize = 4;

/// Maps methods to values for a single path.
///
/// # Example
///
/// ```rust
/// use trellis_router::MethodRouter;
/// use http::Method;
///
/// let mut methods = MethodRouter::new();
/// methods.insert(Method::GET, "listUsers").unwrap();
/// methods.insert(Method::POST, "createUser").unwrap();
///
/// assert_eq!(methods.get(&Method::GET), Some(&"listUsers"));
/// assert_eq!(methods.get(&Method::DELETE), None);
/// assert_eq!(methods.allow_header(), "GET, POST");
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    entries: SmallVec<[(Method, T); INLINE_METHODS]>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `method`.
    ///
    /// The first binding wins: when the method is taken the value is handed
    /// back unchanged.
    pub fn insert(&mut self, method: Method, value: T) -> Result<(), T> {
        if self.contains(&method) {
            return Err(value);
        }
        self.entries.push((method, value));
        Ok(())
    }

    /// Value bound to `method`.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, value)| value)
    }

    /// Whether `method` is bound.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.entries.iter().any(|(m, _)| m == method)
    }

    /// Bound methods in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter().map(|(m, _)| m)
    }

    /// Value for the `Allow` header of a 405 response.
    #[must_use]
    pub fn allow_header(&self) -> String {
        self.methods()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of bound methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let methods: MethodRouter<u8> = MethodRouter::new();
        assert!(methods.is_empty());
        assert_eq!(methods.allow_header(), "");
    }

    #[test]
    fn test_insert_and_get() {
        let mut methods = MethodRouter::new();
        methods.insert(Method::GET, 1).unwrap();
        methods.insert(Method::DELETE, 2).unwrap();

        assert_eq!(methods.get(&Method::GET), Some(&1));
        assert_eq!(methods.get(&Method::DELETE), Some(&2));
        assert_eq!(methods.get(&Method::PUT), None);
        assert_eq!(methods.len(), 2);
    }

    #[test]
    fn test_first_binding_wins() {
        let mut methods = MethodRouter::new();
        methods.insert(Method::GET, "first").unwrap();
        assert_eq!(methods.insert(Method::GET, "second"), Err("second"));
        assert_eq!(methods.get(&Method::GET), Some(&"first"));
    }

    #[test]
    fn test_allow_header_order() {
        let mut methods = MethodRouter::new();
        for method in [Method::PATCH, Method::GET, Method::PUT] {
            methods.insert(method, ()).unwrap();
        }
        assert_eq!(methods.allow_header(), "PATCH, GET, PUT");
    }

    #[test]
    fn test_spills_past_inline() {
        let mut methods = MethodRouter::new();
        for method in [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ] {
            methods.insert(method, ()).unwrap();
        }
        assert_eq!(methods.len(), 6);
        assert!(methods.contains(&Method::OPTIONS));
    }

    #[test]
    fn test_extension_method() {
        let purge = Method::from_bytes(b"PURGE").unwrap();
        let mut methods = MethodRouter::new();
        methods.insert(purge.clone(), "purge").unwrap();
        assert_eq!(methods.get(&purge), Some(&"purge"));
    }
}
