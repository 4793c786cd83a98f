// ── Route table & navigation guard ──
//
// Every screen of the console is a route with access metadata. The guard
// is a pure function of (target, session) so it can be tested without a
// runtime; `Navigator` layers the current location and the 401 reaction
// on top.

use std::fmt;
use std::sync::Arc;

use strum::Display;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;
use url::form_urlencoded;
use wxdeck_api::models::UserRole;

use crate::error::CoreError;
use crate::session::{Session, SessionState};

/// Query parameter carrying the path to return to after login.
pub const REDIRECT_PARAM: &str = "redirect";

const HOME: &str = "/";
const LOGIN: &str = "/login";

/// Guard hops before giving up on a redirect chain.
const MAX_REDIRECTS: usize = 4;

// ── Route table ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum View {
    Dashboard,
    Devices,
    DeviceDetail,
    Readings,
    Options,
    Users,
    Settings,
    ApiKeys,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// Only reachable without a session.
    pub guest_only: bool,
    /// Roles allowed in; `None` admits any authenticated user.
    pub roles: Option<&'static [UserRole]>,
}

impl RouteMeta {
    const AUTH: Self = Self {
        requires_auth: true,
        guest_only: false,
        roles: None,
    };

    const ADMIN: Self = Self {
        requires_auth: true,
        guest_only: false,
        roles: Some(&[UserRole::Admin]),
    };

    const GUEST: Self = Self {
        requires_auth: false,
        guest_only: true,
        roles: None,
    };
}

impl Default for RouteMeta {
    fn default() -> Self {
        Self::AUTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Pattern; `:name` segments match any single non-empty segment.
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub meta: RouteMeta,
}

#[rustfmt::skip]
pub static ROUTES: &[Route] = &[
    Route { path: "/", name: "Dashboard", view: View::Dashboard, meta: RouteMeta::AUTH },
    Route { path: "/devices", name: "Devices", view: View::Devices, meta: RouteMeta::AUTH },
    Route { path: "/devices/:id", name: "DeviceDetail", view: View::DeviceDetail, meta: RouteMeta::AUTH },
    Route { path: "/readings", name: "Readings", view: View::Readings, meta: RouteMeta::AUTH },
    Route { path: "/options", name: "Options", view: View::Options, meta: RouteMeta::ADMIN },
    Route { path: "/users", name: "Users", view: View::Users, meta: RouteMeta::ADMIN },
    Route { path: "/settings", name: "Settings", view: View::Settings, meta: RouteMeta::ADMIN },
    Route { path: "/api-keys", name: "ApiKeys", view: View::ApiKeys, meta: RouteMeta::ADMIN },
    Route { path: "/login", name: "Login", view: View::Login, meta: RouteMeta::GUEST },
];

impl Route {
    fn matches(&self, path: &str) -> bool {
        let mut pattern = self.path.split('/').filter(|s| !s.is_empty());
        let mut actual = path.split('/').filter(|s| !s.is_empty());
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(_)) if p.starts_with(':') => {}
                (Some(p), Some(a)) if p == a => {}
                _ => return false,
            }
        }
    }
}

/// Find the route serving `path`, if any.
pub fn resolve(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.matches(path))
}

// ── Locations ────────────────────────────────────────────────────────

/// A path plus its query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parse `"/devices/3?tab=keys"`. Relative paths are taken from `/`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let base = Url::parse("wxdeck://console/").map_err(|e| CoreError::Validation {
            message: e.to_string(),
        })?;
        let url = base.join(raw).map_err(|e| CoreError::Validation {
            message: format!("invalid path {raw:?}: {e}"),
        })?;
        Ok(Self {
            path: url.path().to_owned(),
            query: url.query_pairs().into_owned().collect(),
        })
    }

    pub fn home() -> Self {
        Self {
            path: HOME.to_owned(),
            query: Vec::new(),
        }
    }

    /// The login route, remembering where to go afterwards.
    pub fn login(redirect: Option<String>) -> Self {
        Self {
            path: LOGIN.to_owned(),
            query: redirect
                .map(|r| vec![(REDIRECT_PARAM.to_owned(), r)])
                .unwrap_or_default(),
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path and query, as it would appear in an address bar.
    pub fn full_path(&self) -> String {
        self.to_string()
    }

    pub fn route(&self) -> Option<&'static Route> {
        resolve(&self.path)
    }

    pub fn is_login(&self) -> bool {
        self.route().is_some_and(|r| r.view == View::Login)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

// ── Guard ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RedirectReason {
    UnknownRoute,
    NotAuthenticated,
    GuestOnly,
    Forbidden,
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed(Location),
    Redirect {
        /// What was asked for.
        from: Location,
        /// Where navigation ended up.
        to: Location,
        /// Why the first hop was taken.
        reason: RedirectReason,
    },
}

impl Navigation {
    /// The location that was committed.
    pub fn location(&self) -> &Location {
        match self {
            Self::Proceed(loc) | Self::Redirect { to: loc, .. } => loc,
        }
    }

    /// Turn access denials into errors. Guest-only bounces and unknown
    /// paths are not failures.
    pub fn into_result(self) -> Result<Location, CoreError> {
        match self {
            Self::Proceed(loc) => Ok(loc),
            Self::Redirect {
                from,
                to,
                reason: RedirectReason::NotAuthenticated,
            } => Err(CoreError::NotAuthenticated {
                redirect: to
                    .query_param(REDIRECT_PARAM)
                    .map_or_else(|| from.full_path(), str::to_owned),
            }),
            Self::Redirect {
                from,
                reason: RedirectReason::Forbidden,
                ..
            } => Err(CoreError::Forbidden { path: from.path }),
            Self::Redirect { to, .. } => Ok(to),
        }
    }
}

/// Decide one hop: `None` to proceed, or where to send the user instead.
fn check(target: &Location, session: &SessionState) -> Option<(Location, RedirectReason)> {
    let Some(route) = target.route() else {
        return Some((Location::home(), RedirectReason::UnknownRoute));
    };
    let authenticated = session.is_authenticated();

    if route.meta.requires_auth && !authenticated {
        return Some((
            Location::login(Some(target.full_path())),
            RedirectReason::NotAuthenticated,
        ));
    }
    if route.meta.guest_only && authenticated {
        return Some((Location::home(), RedirectReason::GuestOnly));
    }
    if let Some(roles) = route.meta.roles {
        let allowed = session.role().is_some_and(|role| roles.contains(&role));
        if !allowed {
            return Some((Location::home(), RedirectReason::Forbidden));
        }
    }
    None
}

/// Run the guard for `target`, following redirects until a route admits
/// the session.
pub fn guard(target: Location, session: &SessionState) -> Navigation {
    let Some((mut to, reason)) = check(&target, session) else {
        return Navigation::Proceed(target);
    };
    for _ in 0..MAX_REDIRECTS {
        match check(&to, session) {
            None => break,
            Some((next, _)) => to = next,
        }
    }
    Navigation::Redirect {
        from: target,
        to,
        reason,
    }
}

// ── Navigator ────────────────────────────────────────────────────────

/// Current location plus guarded navigation.
pub struct Navigator {
    session: Arc<Session>,
    current: watch::Sender<Location>,
}

impl Navigator {
    pub fn new(session: Arc<Session>) -> Self {
        let (current, _) = watch::channel(Location::home());
        Self { session, current }
    }

    pub fn current(&self) -> Location {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.current.subscribe()
    }

    /// Navigate to `path`, restoring the session first if needed, and
    /// commit wherever the guard lands.
    pub fn push(&self, path: &str) -> Navigation {
        self.session.init_from_storage();

        let navigation = match Location::parse(path) {
            Ok(target) => guard(target, &self.session.snapshot()),
            Err(e) => {
                debug!(error = %e, "unparseable path, treating as unknown");
                let from = Location {
                    path: path.to_owned(),
                    query: Vec::new(),
                };
                guard(from, &self.session.snapshot())
            }
        };

        if let Navigation::Redirect { from, to, reason } = &navigation {
            debug!(%from, %to, %reason, "navigation redirected");
        }
        self.current.send_replace(navigation.location().clone());
        navigation
    }

    /// Send the user to the login route, remembering where they were.
    ///
    /// A no-op when already on the login route, so a burst of concurrent
    /// 401s produces exactly one redirect. Returns whether it moved.
    pub fn redirect_to_login(&self) -> bool {
        let moved = self.current.send_if_modified(|loc| {
            if loc.is_login() {
                return false;
            }
            *loc = Location::login(Some(loc.full_path()));
            true
        });
        if moved {
            warn!("redirected to login");
        }
        moved
    }
}
