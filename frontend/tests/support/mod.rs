//! In-process fake Stash backend for integration tests.
//!
//! Routes are matched on exact method and path. Every request is recorded,
//! matched or not; unmatched requests get a 404 with a `detail` body.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;

use actix_web::http::{Method, StatusCode};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub trace_id: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

/// Canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: Option<String>,
}

impl Reply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: Some(body.to_string()),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: Some(body.to_owned()),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

struct FakeState {
    routes: HashMap<(Method, String), Reply>,
    requests: Mutex<Vec<Recorded>>,
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn record(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    let recorded = Recorded {
        method: req.method().clone(),
        path: req.path().to_owned(),
        authorization: header(&req, "authorization"),
        trace_id: header(&req, "trace-id"),
        content_type: header(&req, "content-type"),
        body: serde_json::from_slice(&body).ok(),
    };
    state
        .requests
        .lock()
        .expect("request log lock")
        .push(recorded);

    let key = (req.method().clone(), req.path().to_owned());
    match state.routes.get(&key) {
        Some(reply) => {
            let status = StatusCode::from_u16(reply.status).expect("valid status");
            let mut response = HttpResponse::build(status);
            match &reply.body {
                Some(body) => response.content_type("application/json").body(body.clone()),
                None => response.finish(),
            }
        }
        None => HttpResponse::NotFound()
            .content_type("application/json")
            .body(r#"{"detail":"Not Found"}"#),
    }
}

/// Running fake backend.
pub struct FakeBackend {
    base_url: String,
    state: web::Data<FakeState>,
}

impl FakeBackend {
    /// Serve `routes` on an ephemeral loopback port.
    pub fn start(routes: impl IntoIterator<Item = (Method, &'static str, Reply)>) -> Self {
        let state = web::Data::new(FakeState {
            routes: routes
                .into_iter()
                .map(|(method, path, reply)| ((method, path.to_owned()), reply))
                .collect(),
            requests: Mutex::default(),
        });
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .default_service(web::to(record))
        })
        .workers(1)
        .listen(listener)
        .expect("listen on fake backend")
        .run();
        actix_rt::spawn(server);
        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .expect("request log lock")
            .clone()
    }
}

/// Base URL of a port nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}

/// `{ token, user }` body returned by login and registration.
pub fn auth_body(token: &str) -> Value {
    serde_json::json!({
        "token": { "access_token": token, "token_type": "bearer" },
        "user": { "id": 1, "email": "a@b.com", "username": "ada" }
    })
}
