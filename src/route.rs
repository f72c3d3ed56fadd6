//! Hash routing: the game, the avatar-preview utility, or not-found.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Game,
    Avatars,
    NotFound,
}

/// Parse a location hash (or path) into a route. Empty and "#/" mean the
/// game; anything unrecognized renders the not-found view.
pub fn parse(path: &str) -> Route {
    match path.trim_start_matches('#').trim_matches('/') {
        "" => Route::Game,
        "avatars" => Route::Avatars,
        _ => Route::NotFound,
    }
}

/// Current route from the browser location.
#[cfg(target_arch = "wasm32")]
pub fn current() -> Route {
    let hash = web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    parse(&hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_routes() {
        assert_eq!(parse(""), Route::Game);
        assert_eq!(parse("#/"), Route::Game);
        assert_eq!(parse("/"), Route::Game);
        assert_eq!(parse("#/avatars"), Route::Avatars);
        assert_eq!(parse("avatars"), Route::Avatars);
    }

    #[test]
    fn test_unknown_routes_fall_through() {
        assert_eq!(parse("#/admin"), Route::NotFound);
        assert_eq!(parse("garbage"), Route::NotFound);
    }
}
