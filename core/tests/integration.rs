//! End-to-end loads against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Loader` with the
//! real `UreqTransport` through every response shape the server offers:
//! envelope success and failures, malformed and empty bodies, oversized
//! bodies, 5xx without a body and a refused connection.

use std::net::SocketAddr;
use std::sync::mpsc;

use resource_core::{
    envelope_parser, ApiError, HttpMethod, JsonObject, Loader, Outcome, ParamEncoding, Resource,
    TransportConfig, TransportError, UreqTransport,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
struct Stock {
    object: JsonObject,
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn stock(addr: SocketAddr, path: &str) -> Resource<Stock> {
    Resource::new(
        HttpMethod::Get,
        format!("http://{addr}{path}"),
        envelope_parser(|data| Outcome::Success(Stock { object: data })),
    )
}

fn echo(addr: SocketAddr, method: HttpMethod) -> Resource<Value> {
    Resource::new(
        method,
        format!("http://{addr}/echo"),
        envelope_parser(|data| Outcome::Success(Value::Object(data))),
    )
}

/// Load through the callback API and collect everything it reports.
fn load_all<T: Send + 'static>(loader: &Loader, resource: &Resource<T>) -> Vec<Outcome<T>> {
    let (tx, rx) = mpsc::channel();
    loader
        .load(resource, move |outcome| tx.send(outcome).unwrap())
        .join()
        .unwrap();
    rx.iter().collect()
}

fn hits(loader: &Loader, addr: SocketAddr) -> u64 {
    let resource = Resource::new(
        HttpMethod::Get,
        format!("http://{addr}/hits"),
        envelope_parser(|data| match data.get("hits").and_then(Value::as_u64) {
            Some(n) => Outcome::Success(n),
            None => Outcome::Failure(ApiError::ParseFailure("hits".to_string())),
        }),
    );
    loader.fetch(&resource).into_result().unwrap()
}

#[test]
fn success_envelope_yields_domain_value() {
    let addr = start_server();
    let loader = Loader::default();

    let outcomes = load_all(&loader, &stock(addr, "/stock"));
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        Outcome::Success(stock) => {
            assert_eq!(stock.object["id"], "42");
            assert_eq!(stock.object["symbol"], "ACME");
        }
        Outcome::Failure(err) => panic!("expected success, got {err}"),
    }
}

#[test]
fn session_expired_envelope() {
    let addr = start_server();
    let outcomes = load_all(&Loader::default(), &stock(addr, "/session-expired"));
    assert_eq!(outcomes, vec![Outcome::Failure(ApiError::SessionExpired)]);
}

#[test]
fn no_access_envelope_without_data() {
    let addr = start_server();
    let outcomes = load_all(&Loader::default(), &stock(addr, "/no-access"));
    assert_eq!(outcomes, vec![Outcome::Failure(ApiError::NoAccess)]);
}

#[test]
fn unknown_codes_and_fragments() {
    let addr = start_server();
    let loader = Loader::default();

    for path in ["/envelope/-1", "/envelope/1", "/envelope/404", "/fragment"] {
        let outcome = loader.fetch(&stock(addr, path));
        assert_eq!(outcome, Outcome::Failure(ApiError::UnknownServerError), "{path}");
    }
}

#[test]
fn malformed_body_is_parse_failure() {
    let addr = start_server();
    let outcomes = load_all(&Loader::default(), &stock(addr, "/malformed"));
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], Outcome::Failure(ApiError::ParseFailure(_))));
}

#[test]
fn server_error_without_body_reports_once_and_is_not_retried() {
    let addr = start_server();
    let loader = Loader::default();

    let outcomes = load_all(&loader, &stock(addr, "/internal-error"));
    assert_eq!(
        outcomes,
        vec![Outcome::Failure(ApiError::TransportError(TransportError::Status {
            status: 500
        }))]
    );
    assert_eq!(hits(&loader, addr), 1);
}

#[test]
fn empty_success_body_is_parse_failure() {
    let addr = start_server();
    let loader = Loader::default();

    for path in ["/blank", "/empty"] {
        let outcome = loader.fetch(&stock(addr, path));
        assert!(
            matches!(outcome, Outcome::Failure(ApiError::ParseFailure(_))),
            "{path}: {outcome:?}"
        );
    }
}

#[test]
fn body_over_ten_mebibytes_is_read_by_default() {
    let addr = start_server();
    let path = format!("/padded/{}", 11 * 1024 * 1024);

    let stock = Loader::default()
        .fetch(&stock(addr, &path))
        .into_result()
        .unwrap();
    assert_eq!(stock.object["pad"].as_str().unwrap().len(), 11 * 1024 * 1024);
}

#[test]
fn body_over_configured_limit_is_transport_error() {
    let addr = start_server();
    let loader = Loader::new(UreqTransport::new(&TransportConfig::default().max_body(1024)));

    let outcome = loader.fetch(&stock(addr, "/padded/4096"));
    assert!(
        matches!(
            outcome,
            Outcome::Failure(ApiError::TransportError(TransportError::Io(_)))
        ),
        "{outcome:?}"
    );

    assert!(loader.fetch(&stock(addr, "/padded/16")).is_success());
}

#[test]
fn refused_connection_is_transport_error() {
    // Bind then drop to get a port nobody is listening on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let outcomes = load_all(&Loader::default(), &stock(addr, "/stock"));
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        outcomes[0],
        Outcome::Failure(ApiError::TransportError(TransportError::Io(_)))
    ));
}

#[test]
fn request_matches_descriptor() {
    let addr = start_server();
    let resource = echo(addr, HttpMethod::Delete)
        .header("clientType", "0")
        .header("deviceType", "iPhone 5S")
        .header("clientType", "1")
        .param("width", "640");

    let echoed = Loader::default().fetch(&resource).into_result().unwrap();
    assert_eq!(echoed["method"], "DELETE");
    assert_eq!(echoed["headers"]["clienttype"], serde_json::json!(["0", "1"]));
    assert_eq!(echoed["headers"]["devicetype"], serde_json::json!(["iPhone 5S"]));
    // Params are not sent with the default encoding.
    assert_eq!(echoed["query"], Value::Null);
    assert_eq!(echoed["body"], "");
}

#[test]
fn query_encoding_sends_params_in_url() {
    let addr = start_server();
    let resource = echo(addr, HttpMethod::Get)
        .param("width", "640")
        .param("height", 1136)
        .param_encoding(ParamEncoding::Query);

    let echoed = Loader::default().fetch(&resource).into_result().unwrap();
    let query = echoed["query"].as_str().unwrap();
    assert!(query.contains("width=640"), "{query}");
    assert!(query.contains("height=1136"), "{query}");
}

#[test]
fn json_body_encoding_sends_params_as_body() {
    let addr = start_server();
    let resource = echo(addr, HttpMethod::Post)
        .param("width", "640")
        .param_encoding(ParamEncoding::JsonBody);

    let echoed = Loader::default().fetch(&resource).into_result().unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["headers"]["content-type"], serde_json::json!(["application/json"]));
    let body: Value = serde_json::from_str(echoed["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"width": "640"}));
}

#[test]
fn default_user_agent_is_sent() {
    let addr = start_server();
    let echoed = Loader::default()
        .fetch(&echo(addr, HttpMethod::Get))
        .into_result()
        .unwrap();
    let agent = echoed["headers"]["user-agent"][0].as_str().unwrap();
    assert!(agent.starts_with("resource-core/"), "{agent}");
}

#[tokio::test(flavor = "multi_thread")]
async fn load_async_resolves_outcome() {
    let addr = start_server();
    let loader = Loader::default();

    let outcome = loader.load_async(&stock(addr, "/stock")).await;
    assert!(outcome.is_success());

    let outcome = loader.load_async(&stock(addr, "/no-access")).await;
    assert_eq!(outcome, Outcome::Failure(ApiError::NoAccess));
}
