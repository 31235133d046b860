use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pokeref_api::build_app_with_config;
use pokeref_tests::{intent_event, launch_event, spawn_upstreams, FakeUpstreams};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app_with(slack_status: StatusCode) -> (Router, FakeUpstreams) {
    let upstreams = spawn_upstreams(slack_status).await;
    let app = build_app_with_config(&upstreams.config()).expect("app should build");
    (app, upstreams)
}

async fn post_event(app: &Router, event: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/skill")
        .header("content-type", "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, parsed)
}

fn speech(body: &Value) -> &str {
    body["response"]["outputSpeech"]["text"]
        .as_str()
        .expect("response should carry speech")
}

#[tokio::test]
async fn health_reports_capabilities() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["capabilities"]["slack_forwarding"], json!(true));
    assert_eq!(parsed["capabilities"]["application_gate"], json!(false));
    assert_eq!(parsed["metrics"]["invocations_total"], json!(0));
}

#[tokio::test]
async fn launch_returns_wire_shaped_welcome() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let (status, body) = post_event(&app, launch_event()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], json!("1.0"));
    assert_eq!(body["sessionAttributes"], json!({}));
    assert_eq!(body["response"]["card"]["type"], json!("Simple"));
    assert_eq!(body["response"]["card"]["title"], json!("Welcome"));
    assert_eq!(body["response"]["shouldEndSession"], json!(false));
    assert!(speech(&body).starts_with("Welcome to Pokemon Reference"));
}

#[tokio::test]
async fn lookup_then_height_reuses_session_entity() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let (_, lookup) = post_event(
        &app,
        intent_event("LookupPokemonIntent", Some("Pikachu"), json!({})),
    )
    .await;
    assert_eq!(lookup["sessionAttributes"], json!({ "pokemon": "Pikachu" }));
    assert_eq!(lookup["response"]["shouldEndSession"], json!(false));

    let (status, height) = post_event(
        &app,
        intent_event(
            "GetPokemonHeightIntent",
            None,
            lookup["sessionAttributes"].clone(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(speech(&height), "Pikachu is 40 centimeters tall.");
    assert_eq!(height["response"]["shouldEndSession"], json!(true));
    assert_eq!(height["response"]["reprompt"]["outputSpeech"]["text"], Value::Null);
}

#[tokio::test]
async fn spoken_names_are_normalized_for_the_directory() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let (_, body) = post_event(
        &app,
        intent_event("GetPokemonHeightIntent", Some("Mr Mime"), json!({})),
    )
    .await;

    assert_eq!(speech(&body), "Mr Mime is 130 centimeters tall.");
    assert_eq!(body["sessionAttributes"], json!({ "pokemon": "Mr Mime" }));
}

#[tokio::test]
async fn slack_height_posts_to_webhook() {
    let (app, upstreams) = app_with(StatusCode::OK).await;

    let (_, body) = post_event(
        &app,
        intent_event("SlackPokemonHeightIntent", Some("Bulbasaur"), json!({})),
    )
    .await;

    assert_eq!(
        speech(&body),
        "The following message was posted to Slack: Bulbasaur is 70 centimeters tall."
    );
    assert_eq!(
        upstreams.slack_posts.lock().as_slice(),
        &[json!({ "text": "Bulbasaur is 70 centimeters tall." })]
    );
}

#[tokio::test]
async fn slack_failure_is_reported_in_speech() {
    let (app, _upstreams) = app_with(StatusCode::INTERNAL_SERVER_ERROR).await;

    let (status, body) = post_event(
        &app,
        intent_event("SlackPokemonHeightIntent", Some("Onix"), json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        speech(&body),
        "I was unable to post the following to Slack: Onix is 880 centimeters tall."
    );
}

#[tokio::test]
async fn unknown_pokemon_gets_apology() {
    let (app, upstreams) = app_with(StatusCode::OK).await;

    let (status, body) = post_event(
        &app,
        intent_event("SlackPokemonHeightIntent", Some("Agumon"), json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        speech(&body),
        "I'm sorry. I don't know which Pokemon you're asking about."
    );
    assert_eq!(body["response"]["shouldEndSession"], json!(true));
    assert!(upstreams.slack_posts.lock().is_empty());
}

#[tokio::test]
async fn unknown_intent_fails_the_invocation() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let (status, body) = post_event(
        &app,
        intent_event("GetPokemonWeightIntent", Some("Pikachu"), json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("unrecognized_intent"));
    assert!(body.get("response").is_none());
}

#[tokio::test]
async fn session_ended_is_acknowledged() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let (status, body) = post_event(
        &app,
        json!({
            "session": { "application": { "applicationId": "amzn1.echo-sdk-ams.app.test" } },
            "request": {
                "type": "SessionEndedRequest",
                "requestId": "amzn1.echo-api.request.end",
                "reason": "USER_INITIATED"
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn foreign_application_is_forbidden() {
    let upstreams = spawn_upstreams(StatusCode::OK).await;
    let mut config = upstreams.config();
    config.application_id = Some("amzn1.echo-sdk-ams.app.mine".to_string());
    let app = build_app_with_config(&config).expect("app should build");

    let (status, body) = post_event(&app, launch_event()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("invalid_application_id"));
}

#[tokio::test]
async fn malformed_event_is_a_client_error() {
    let (app, _upstreams) = app_with(StatusCode::OK).await;

    let (status, _) = post_event(&app, json!({ "request": { "type": "LaunchRequest" } })).await;

    assert!(status.is_client_error());
}
