#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;

use finance::{app_router, build_state, Config};

/// Router over a fresh in-memory database with fixed quote prices and a
/// $10,000.00 starting balance.
pub async fn build_test_router() -> Router {
    let state = build_state(&Config::default()).await.unwrap();
    app_router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` of the session cookie set by the response, if any.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("finance_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), Some(to));
}

/// Register `username` and return the logged-in session cookie.
pub async fn register(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}&confirmation={password}");
    let response = post_form(app, "/register", &body, None).await;
    assert_redirect(&response, "/");
    session_cookie(&response).expect("register sets a session cookie")
}

/// Follow a flash redirect: GET `to` and return the page.
pub async fn follow(app: &Router, response: &Response, cookie: &str) -> String {
    let to = location(response).expect("redirect").to_string();
    body_text(get(app, &to, Some(cookie)).await).await
}
