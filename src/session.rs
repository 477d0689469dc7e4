//! # session — Server-Side Sessions & Flash Messages
//!
//! The browser only holds an opaque id in the `finance_session` cookie
//! (`HttpOnly`, `SameSite=Lax`, no `Max-Age`, so it ends with the browser
//! session). Everything else stays in memory on the server:
//!
//! - the logged-in user, if any
//! - queued flash messages, drained by the next page render
//!
//! [`session_layer`] resolves the cookie on every page request and puts a
//! [`Session`] handle into the request extensions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::SharedState;

pub const COOKIE_NAME: &str = "finance_session";

// ─── Data ─────────────────────────────────────────────────────────────────────

/// Who is logged in on this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id:       i64,
    pub username: String,
}

#[derive(Debug)]
struct SessionData {
    user:      Option<SessionUser>,
    flashes:   Vec<String>,
    last_seen: DateTime<Utc>,
}

impl SessionData {
    fn new(now: DateTime<Utc>) -> Self {
        Self { user: None, flashes: Vec::new(), last_seen: now }
    }
}

// ─── Store ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionData>>>,
    idle:  Duration,
}

impl SessionStore {
    pub fn new(idle: Duration) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), idle }
    }

    /// Resume the session named by the cookie, or start a fresh one.
    /// The flag is `true` when a new id was issued and must be sent back.
    pub async fn resume(&self, id: Option<Uuid>) -> (Session, bool) {
        self.resume_at(id, Utc::now()).await
    }

    async fn resume_at(&self, id: Option<Uuid>, now: DateTime<Utc>) -> (Session, bool) {
        let mut map = self.inner.write().await;

        if let Some(id) = id {
            match map.get(&id).map(|data| self.is_idle(data, now)) {
                Some(false) => {
                    if let Some(data) = map.get_mut(&id) {
                        data.last_seen = now;
                    }
                    return (self.handle(id), false);
                }
                Some(true) => {
                    debug!(%id, "session expired");
                    map.remove(&id);
                }
                None => {}
            }
        }

        // piggy-back the sweep on session creation
        map.retain(|_, data| !self.is_idle(data, now));

        let id = Uuid::new_v4();
        map.insert(id, SessionData::new(now));
        (self.handle(id), true)
    }

    /// Move the data of `old` to a brand-new id and forget `old`.
    async fn rotate(&self, old: Uuid) -> Uuid {
        let mut map = self.inner.write().await;
        let now = Utc::now();
        let mut data = map.remove(&old).unwrap_or_else(|| SessionData::new(now));
        data.last_seen = now;

        let id = Uuid::new_v4();
        map.insert(id, data);
        debug!(%old, new = %id, "session id rotated");
        id
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    fn is_idle(&self, data: &SessionData, now: DateTime<Utc>) -> bool {
        (now - data.last_seen)
            .to_std()
            .map(|elapsed| elapsed > self.idle)
            .unwrap_or(false)
    }

    fn handle(&self, id: Uuid) -> Session {
        Session { id: Arc::new(RwLock::new(id)), store: self.clone() }
    }
}

// ─── Session Handle ───────────────────────────────────────────────────────────

/// Cheap handle to one session; clone freely. Clones share the id, so a
/// [`Session::regenerate`] in a handler is seen by [`session_layer`].
#[derive(Clone)]
pub struct Session {
    id:    Arc<RwLock<Uuid>>,
    store: SessionStore,
}

impl Session {
    pub async fn id(&self) -> Uuid {
        *self.id.read().await
    }

    /// Issue a new id for this session and drop the old one. Called when
    /// a user logs in, so an id handed out before login is dead afterwards.
    pub async fn regenerate(&self) {
        let mut id = self.id.write().await;
        *id = self.store.rotate(*id).await;
    }

    pub async fn user(&self) -> Option<SessionUser> {
        let id = self.id().await;
        let map = self.store.inner.read().await;
        map.get(&id).and_then(|data| data.user.clone())
    }

    pub async fn log_in(&self, user: SessionUser) {
        self.with_data(|data| data.user = Some(user)).await;
    }

    /// Forget the user and any pending flashes.
    pub async fn clear(&self) {
        self.with_data(|data| {
            data.user = None;
            data.flashes.clear();
        })
        .await;
    }

    pub async fn flash(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_data(|data| data.flashes.push(message)).await;
    }

    /// Remove and return all queued flash messages, oldest first.
    pub async fn take_flashes(&self) -> Vec<String> {
        let id = self.id().await;
        let mut map = self.store.inner.write().await;
        map.get_mut(&id)
            .map(|data| std::mem::take(&mut data.flashes))
            .unwrap_or_default()
    }

    /// Writes recreate the entry if it was swept mid-request.
    async fn with_data(&self, f: impl FnOnce(&mut SessionData)) {
        let id = self.id().await;
        let mut map = self.store.inner.write().await;
        let data = map
            .entry(id)
            .or_insert_with(|| SessionData::new(Utc::now()));
        f(data);
    }
}

// ─── Middleware ───────────────────────────────────────────────────────────────

/// Axum middleware: attach a [`Session`] to the request, set the cookie when
/// a new session was started or the handler regenerated the id.
pub async fn session_layer(
    State(state): State<SharedState>,
    mut request:  Request,
    next:         Next,
) -> Response {
    let cookie_id = cookie_value(request.headers(), COOKIE_NAME)
        .and_then(|raw| Uuid::parse_str(raw).ok());

    let (session, fresh) = state.sessions.resume(cookie_id).await;
    let issued = session.id().await;
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    let current = session.id().await;
    if fresh || current != issued {
        match HeaderValue::from_str(&session_cookie(current)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "could not build session cookie"),
        }
    }

    response
}

fn session_cookie(id: Uuid) -> String {
    format!("{COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Value of cookie `name` from any `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
