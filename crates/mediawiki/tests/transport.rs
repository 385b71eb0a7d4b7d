//! End-to-end tests of the reqwest transport against a mock wiki.

use std::sync::Arc;

use epi::{
    BanParams, BlockParams, EditToken, EpiError, Expiry, TransportError, UserApi, UserId,
    UserIdLookupParams, Username,
};
use mediawiki::{ReqwestTransport, StaticTokenProvider, WikiConfig};
use serde_json::json;
use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TOKEN: &str = "0123abcd+\\";

fn user_api(server_uri: &str, script_path: &str) -> UserApi {
    let config = WikiConfig::with_script_path(server_uri, script_path).unwrap();
    let transport = ReqwestTransport::new(config).unwrap();
    let tokens = StaticTokenProvider::new(EditToken::new(TOKEN).unwrap());
    UserApi::new(Arc::new(transport), Arc::new(tokens))
}

fn username(name: &str) -> Username {
    Username::new(name).unwrap()
}

/// Answers like MediaWiki does for `format=json&callback=…`.
struct JsonpResponder(serde_json::Value);

impl Respond for JsonpResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let callback = url::form_urlencoded::parse(&request.body)
            .find(|(k, _)| k == "callback")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/javascript; charset=utf-8")
            .set_body_string(format!("/**/{callback}({});", self.0))
    }
}

#[tokio::test]
async fn ban_posts_form_to_index_php() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "action=ajax&rs=ChatAjax&method=blockOrBanChat&userToBanId=99&time=86400\
             &reason=Spam+bot&mode=global&token=0123abcd%2B%5C",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let result = user_api(&server.uri(), "")
        .ban(BanParams::new(UserId::new(99), 86400u64).with_reason("Spam bot"))
        .await
        .unwrap();

    assert_eq!(result, json!({ "success": true }));
}

#[tokio::test]
async fn block_appends_bare_markers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .and(body_string(
            "action=block&user=Vandal&expiry=infinite&reason=Long-term+abuse&format=json\
             &token=0123abcd%2B%5C&nocreate&autoblock",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "block": { "user": "Vandal", "id": 5, "expiry": "infinite" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = BlockParams::new(username("Vandal"), Expiry::Infinite)
        .with_reason("Long-term abuse")
        .prevent_account_creation()
        .with_autoblock();
    let result = user_api(&server.uri(), "/w").block(params).await.unwrap();

    assert_eq!(
        result,
        json!({ "user": "Vandal", "id": 5, "expiry": "infinite" })
    );
}

#[tokio::test]
async fn block_surfaces_api_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": "permissiondenied", "info": "You don't have permission" }
        })))
        .mount(&server)
        .await;

    let err = user_api(&server.uri(), "")
        .block(BlockParams::new(username("Vandal"), "1 week"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EpiError::Application(json!({
            "code": "permissiondenied",
            "info": "You don't have permission"
        }))
    );
}

#[tokio::test]
async fn user_id_decodes_jsonp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains(
            "action=query&list=users&ususers=Some+User&usprop=&format=json&callback=epi_",
        ))
        .respond_with(JsonpResponder(json!({
            "batchcomplete": "",
            "query": { "users": [ { "userid": 42, "name": "Some User" } ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = user_api(&server.uri(), "")
        .user_id(UserIdLookupParams::new(username("Some User")))
        .await
        .unwrap();

    assert_eq!(id, UserId::new(42));
}

#[tokio::test]
async fn user_id_rejects_undefined_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("undefined"))
        .mount(&server)
        .await;

    let err = user_api(&server.uri(), "")
        .user_id(UserIdLookupParams::new(username("Ghost")))
        .await
        .unwrap_err();

    assert_eq!(err, EpiError::Sentinel("undefined".into()));
}

#[tokio::test]
async fn ban_answered_with_undefined_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("undefined"))
        .expect(1)
        .mount(&server)
        .await;

    let err = user_api(&server.uri(), "")
        .ban(BanParams::new(UserId::new(5), 60u64))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EpiError::Transport(TransportError::Decode { .. })
    ));
}

#[tokio::test]
async fn absent_reason_is_sent_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string(
            "action=block&user=Vandal&expiry=%2B5&reason=&format=json&token=0123abcd%2B%5C",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "block": { "id": 9 } })))
        .expect(1)
        .mount(&server)
        .await;

    let expiry: Expiry = "+5".parse().unwrap();
    let result = user_api(&server.uri(), "")
        .block(BlockParams::new(username("Vandal"), expiry))
        .await
        .unwrap();

    assert_eq!(result, json!({ "id": 9 }));
}

#[tokio::test]
async fn http_errors_carry_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = user_api(&server.uri(), "")
        .ban(BanParams::new(UserId::new(1), 60u64))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EpiError::Transport(TransportError::Status {
            status: 503,
            retry_after_secs: Some(7),
        })
    );
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!DOCTYPE html>"))
        .mount(&server)
        .await;

    let err = user_api(&server.uri(), "")
        .block(BlockParams::new(username("A"), 60u64))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EpiError::Transport(TransportError::Decode { .. })
    ));
}

#[tokio::test]
async fn unreachable_wiki_is_a_connection_error() {
    // Nothing listens on the discard port.
    let err = user_api("http://127.0.0.1:9", "")
        .user_id(UserIdLookupParams::new(username("A")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EpiError::Transport(TransportError::Connection { .. })
    ));
}

#[tokio::test]
async fn concurrent_calls_send_separate_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("user=First"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "block": { "id": 1 } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("user=Second"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": { "code": "nosuchuser" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = user_api(&server.uri(), "");
    let (first, second) = tokio::join!(
        api.block(BlockParams::new(username("First"), "1 day")),
        api.block(BlockParams::new(username("Second"), "1 day")),
    );

    assert_eq!(first.unwrap(), json!({ "id": 1 }));
    assert_eq!(
        second.unwrap_err(),
        EpiError::Application(json!({ "code": "nosuchuser" }))
    );
}

