use std::collections::HashMap;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pokeref_agents::SkillRouter;
use pokeref_clients::{seal_secret, AesGcmKeyring, SkillConfig};
use pokeref_core::SkillEvent;
use pokeref_observability::AppMetrics;
use pokeref_tests::{intent_event, spawn_upstreams};
use serde_json::json;

#[tokio::test]
async fn sealed_webhook_is_opened_at_startup_and_used() -> anyhow::Result<()> {
    let upstreams = spawn_upstreams(StatusCode::OK).await;

    let key = [0x11u8; 32];
    let sealed = seal_secret(&AesGcmKeyring::new(&key), &upstreams.slack_url)?;
    let env: HashMap<&str, String> = HashMap::from([
        ("POKEREF_POKEAPI_BASE_URL", upstreams.pokeapi_base.clone()),
        ("POKEREF_SLACK_HOOK", sealed),
        ("POKEREF_KMS_KEY", BASE64.encode(key)),
    ]);
    let config = SkillConfig::from_lookup(|name| env.get(name).cloned())?;

    let metrics = AppMetrics::shared();
    let router = SkillRouter::from_config(&config, metrics.clone())?;
    assert!(router.forwarding_configured());

    let event: SkillEvent = serde_json::from_value(intent_event(
        "SlackPokemonHeightIntent",
        None,
        json!({ "pokemon": "Bulbasaur" }),
    ))?;
    let response = router
        .route_event(&event)
        .await?
        .expect("height intent should answer");

    assert!(response
        .speech_text()
        .starts_with("The following message was posted to Slack: "));
    assert_eq!(upstreams.slack_posts.lock().len(), 1);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.invocations_total, 1);
    assert_eq!(snapshot.lookups_total, 1);
    assert_eq!(snapshot.forwards_total, 1);
    assert_eq!(snapshot.forward_failures_total, 0);
    Ok(())
}

#[tokio::test]
async fn missing_webhook_reports_failed_forward() -> anyhow::Result<()> {
    let upstreams = spawn_upstreams(StatusCode::OK).await;
    let mut config = upstreams.config();
    config.slack_hook = None;

    let router = SkillRouter::from_config(&config, AppMetrics::shared())?;
    assert!(!router.forwarding_configured());

    let event: SkillEvent = serde_json::from_value(intent_event(
        "SlackPokemonHeightIntent",
        Some("Pikachu"),
        json!({}),
    ))?;
    let response = router
        .route_event(&event)
        .await?
        .expect("height intent should answer");

    assert_eq!(
        response.speech_text(),
        "I was unable to post the following to Slack: Pikachu is 40 centimeters tall."
    );
    assert!(upstreams.slack_posts.lock().is_empty());
    Ok(())
}
