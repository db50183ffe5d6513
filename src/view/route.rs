use std::fmt;

/// Screens reachable by path.
///
/// Nothing but the path travels between screens; the detail screen fetches
/// its photo again by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Grid,
    Photo(String),
}

impl Route {
    /// `/` and `/photo/{id}`. Anything else is unknown.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path {
            "" | "/" => Some(Route::Grid),
            _ => {
                let id = path.strip_prefix("/photo/")?.trim_end_matches('/');
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::Photo(id.to_string()))
                }
            }
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::Grid => "/".to_string(),
            Route::Photo(id) => format!("/photo/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
