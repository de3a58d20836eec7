//! The two top-level views and the authentication guard.

use crate::session::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// Sign-in and sign-up.
    #[default]
    Auth,
    /// The board editor; requires a signed-in user.
    Board,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Auth => "/auth",
            Route::Board => "/dashboard",
        }
    }

    /// Map a location path to a route. `/` redirects to `/auth`; unknown
    /// paths yield None.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" | "/auth" | "/login" | "/signup" => Some(Route::Auth),
            "/dashboard" => Some(Route::Board),
            _ => None,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Board)
    }
}

/// The route actually shown when `requested` is asked for.
///
/// Protected routes fall back to [`Route::Auth`] while signed out; a
/// signed-in user asking for the auth view is sent to the board.
pub fn guard(requested: Route, user: Option<&User>) -> Route {
    match (requested, user) {
        (route, None) if route.requires_auth() => Route::Auth,
        (Route::Auth, Some(_)) => Route::Board,
        (route, _) => route,
    }
}
