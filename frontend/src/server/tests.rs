//! Tests for server construction and readiness signalling.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::{fixture, rstest};

use super::{AppDependencies, ServerConfig, build_app, create_server};
use crate::domain::TRACE_ID_HEADER;
use crate::domain::ports::MockStashApiFactory;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        cookie_name: "stash_session".to_owned(),
        ttl: Duration::days(7),
    }
}

fn idle_factory() -> Arc<MockStashApiFactory> {
    let mut factory = MockStashApiFactory::new();
    factory.expect_client().never();
    Arc::new(factory)
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, session: SessionSettings) {
    assert!(!health_state.is_ready(), "state should start unready");
    let bind: SocketAddr = "127.0.0.1:0".parse().expect("loopback address");

    let _server = create_server(
        health_state.clone(),
        ServerConfig::new(session, bind, idle_factory()),
    )
    .expect("server should bind an ephemeral port");

    assert!(health_state.is_ready(), "server creation should mark readiness");
}

#[rstest]
#[actix_rt::test]
async fn app_serves_probes_and_pages_with_trace_ids(
    health_state: web::Data<HealthState>,
    session: SessionSettings,
) {
    health_state.mark_ready();
    let app = test::init_service(build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(HttpState::new(idle_factory())),
        session,
    }))
    .await;

    let probe =
        test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(probe.status(), StatusCode::OK);
    assert!(probe.headers().contains_key(TRACE_ID_HEADER));

    let page = test::call_service(&app, test::TestRequest::get().uri("/stash").to_request()).await;
    assert_eq!(page.status(), StatusCode::SEE_OTHER);
    assert!(page.headers().contains_key(TRACE_ID_HEADER));
}
