//! Route table and navigation capability.
//!
//! `/` and `/docs` are aliases for the same home view; each keeps its own
//! path in the [`Router`]. `/docs/{id}` addresses one document and anything
//! else falls through to the not-found view.

use super::documents::DocumentId;

pub const ROOT_PATH: &str = "/";
pub const DOCS_PATH: &str = "/docs";

/// Which alias reached the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAlias {
    Root,
    Docs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Panel plus creation trigger.
    Home(HomeAlias),
    Document(DocumentId),
    NotFound,
}

impl Route {
    /// Resolve a path. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();

        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if !path.is_empty() && !path.starts_with('/') {
            return Route::NotFound;
        }

        match segments.as_slice() {
            [] => Route::Home(HomeAlias::Root),
            ["docs"] => Route::Home(HomeAlias::Docs),
            ["docs", id] => Route::Document(DocumentId::from(*id)),
            _ => Route::NotFound,
        }
    }

    pub fn document_path(id: &DocumentId) -> String {
        format!("{DOCS_PATH}/{id}")
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Route::Home(_))
    }
}

/// Navigation capability handed to views.
///
/// Views ask to go somewhere; the app decides when the route actually
/// changes. Keeps the creation flow free of any concrete router.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);

    fn navigate_to_document(&self, id: &DocumentId) {
        self.navigate(&Route::document_path(id));
    }
}

/// Current location plus back history.
#[derive(Debug, Clone)]
pub struct Router {
    path: String,
    route: Route,
    history: Vec<String>,
}

impl Router {
    pub fn new(start_path: &str) -> Self {
        let path = normalize(start_path);
        Self {
            route: Route::parse(&path),
            path,
            history: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Go to `path`. Returns false when already there.
    pub fn navigate(&mut self, path: &str) -> bool {
        let path = normalize(path);
        if path == self.path {
            return false;
        }
        let previous = std::mem::replace(&mut self.path, path);
        self.history.push(previous);
        self.route = Route::parse(&self.path);
        log::info!("Navigated to {} ({:?})", self.path, self.route);
        true
    }

    /// Return to the previous path, if any.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.route = Route::parse(&previous);
                self.path = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}

fn normalize(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", Route::Home(HomeAlias::Root))]
    #[case("", Route::Home(HomeAlias::Root))]
    #[case("/docs", Route::Home(HomeAlias::Docs))]
    #[case("/docs/", Route::Home(HomeAlias::Docs))]
    #[case("/docs?page=2", Route::Home(HomeAlias::Docs))]
    #[case("/docs/abc", Route::Document(DocumentId::from("abc")))]
    #[case("/docs/abc/", Route::Document(DocumentId::from("abc")))]
    #[case("/docs/some-unknown-doc#top", Route::Document(DocumentId::from("some-unknown-doc")))]
    #[case("/docs/abc/edit", Route::NotFound)]
    #[case("/settings", Route::NotFound)]
    #[case("docs", Route::NotFound)]
    fn test_parse(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[test]
    fn test_document_path() {
        assert_eq!(Route::document_path(&DocumentId::from("42")), "/docs/42");
    }

    #[test]
    fn test_aliases_keep_their_path() {
        let mut router = Router::new("/");
        assert!(router.route().is_home());
        assert_eq!(router.path(), "/");

        assert!(router.navigate("/docs"));
        assert!(router.route().is_home());
        assert_eq!(router.path(), "/docs");
    }

    #[test]
    fn test_navigate_same_path_is_noop() {
        let mut router = Router::new("/docs");
        assert!(!router.navigate("/docs"));
        assert!(!router.can_go_back());
    }

    #[test]
    fn test_back() {
        let mut router = Router::new("/");
        router.navigate("/docs/1");
        router.navigate("/docs/2");
        assert!(router.back());
        assert_eq!(router.route(), &Route::Document(DocumentId::from("1")));
        assert!(router.back());
        assert_eq!(router.path(), "/");
        assert!(!router.back());
    }

    #[test]
    fn test_start_path_is_normalized() {
        assert_eq!(Router::new("docs").path(), "/docs");
        assert_eq!(Router::new("  ").path(), "/");
    }

    #[test]
    fn test_default_navigate_to_document() {
        struct Recorder(std::sync::Mutex<Vec<String>>);
        impl Navigator for Recorder {
            fn navigate(&self, path: &str) {
                self.0.lock().unwrap().push(path.to_string());
            }
        }

        let recorder = Recorder(std::sync::Mutex::new(Vec::new()));
        recorder.navigate_to_document(&DocumentId::from("new-doc"));
        assert_eq!(*recorder.0.lock().unwrap(), vec!["/docs/new-doc".to_string()]);
    }
}
