//! Unit tests for the OAuth2 login flow.

use std::sync::Mutex;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{AccessToken, AuthError, Authenticator, ClientCredentials, CodePrompt};

/// Prompt double that returns a canned code and records the URL it was shown.
struct CannedPrompt {
    code: &'static str,
    seen_url: Mutex<Option<Url>>,
}

impl CannedPrompt {
    fn new(code: &'static str) -> Self {
        Self {
            code,
            seen_url: Mutex::new(None),
        }
    }

    fn seen_url(&self) -> Url {
        self.seen_url
            .lock()
            .expect("url mutex should be available")
            .clone()
            .expect("prompt should have been shown a URL")
    }
}

impl CodePrompt for CannedPrompt {
    fn read_code(&self, authorization_url: &Url) -> Result<String, AuthError> {
        *self
            .seen_url
            .lock()
            .expect("url mutex should be available") = Some(authorization_url.clone());
        Ok(self.code.to_owned())
    }
}

/// Prompt double simulating an operator abort.
struct ClosedPrompt;

impl CodePrompt for ClosedPrompt {
    fn read_code(&self, _authorization_url: &Url) -> Result<String, AuthError> {
        Err(AuthError::PromptClosed)
    }
}

fn credentials() -> ClientCredentials {
    ClientCredentials::new("client-id", "client-secret").expect("credentials should be accepted")
}

async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/.well-known/oauth-authorization-server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorization_endpoint": format!("{}/oauth2/authorize", server.uri()),
            "token_endpoint": format!("{}/oauth2/token", server.uri()),
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_exchanges_code_for_token() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=entered-code"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .and(body_string_contains(
            "redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "issued-token" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let prompt = CannedPrompt::new("entered-code");
    let authenticator = Authenticator::new(&server.uri(), credentials(), &prompt)
        .expect("authenticator should build");
    let token = authenticator.login().await.expect("login should succeed");

    assert_eq!(
        token,
        AccessToken::new("issued-token").expect("token should be valid"),
        "issued token mismatch"
    );
}

#[tokio::test]
async fn authorization_url_carries_scope_and_oob_redirect() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
        .mount(&server)
        .await;

    let prompt = CannedPrompt::new("c");
    let authenticator = Authenticator::new(&server.uri(), credentials(), &prompt)
        .expect("authenticator should build");
    authenticator.login().await.expect("login should succeed");

    let url = prompt.seen_url();
    assert!(
        url.as_str().starts_with(&format!("{}/oauth2/authorize?", server.uri())),
        "unexpected authorization endpoint in {url}"
    );
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(
        pairs.contains(&("response_type".to_owned(), "code".to_owned())),
        "missing response_type in {pairs:?}"
    );
    assert!(
        pairs.contains(&("client_id".to_owned(), "client-id".to_owned())),
        "missing client_id in {pairs:?}"
    );
    assert!(
        pairs.contains(&(
            "redirect_uri".to_owned(),
            "urn:ietf:wg:oauth:2.0:oob".to_owned()
        )),
        "missing oob redirect in {pairs:?}"
    );
    assert!(
        pairs.contains(&(
            "scope".to_owned(),
            "write_changeset_comments read_prefs".to_owned()
        )),
        "missing scope in {pairs:?}"
    );
}

#[tokio::test]
async fn exchange_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad verification code"))
        .mount(&server)
        .await;

    let prompt = CannedPrompt::new("wrong-code");
    let authenticator = Authenticator::new(&server.uri(), credentials(), &prompt)
        .expect("authenticator should build");
    let result = authenticator.login().await;

    assert_eq!(
        result,
        Err(AuthError::Exchange {
            status: 401,
            body: "bad verification code".to_owned(),
        }),
        "expected the exchange failure to surface status and body"
    );
}

#[tokio::test]
async fn discovery_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/oauth-authorization-server"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let prompt = CannedPrompt::new("never-used");
    let authenticator = Authenticator::new(&server.uri(), credentials(), &prompt)
        .expect("authenticator should build");
    let result = authenticator.login().await;

    assert!(
        matches!(result, Err(AuthError::Discovery { .. })),
        "expected a discovery error, got {result:?}"
    );
}

#[tokio::test]
async fn closed_prompt_aborts_the_attempt() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    let authenticator = Authenticator::new(&server.uri(), credentials(), &ClosedPrompt)
        .expect("authenticator should build");
    let result = authenticator.login().await;

    assert_eq!(
        result,
        Err(AuthError::PromptClosed),
        "expected the prompt abort to surface"
    );
}

#[test]
fn blank_credentials_are_rejected() {
    assert_eq!(
        ClientCredentials::new("", "secret"),
        Err(AuthError::MissingClientId),
        "blank client id should be rejected"
    );
    assert_eq!(
        ClientCredentials::new("id", "  "),
        Err(AuthError::MissingClientSecret),
        "blank client secret should be rejected"
    );
}

#[test]
fn blank_token_is_rejected() {
    assert_eq!(
        AccessToken::new("  "),
        Err(AuthError::EmptyToken),
        "blank token should be rejected"
    );
}
