mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{bearer, token_with_claims, TestServer, SIGNING_KEY};

async fn error_message(res: reqwest::Response) -> Result<String> {
    let body = res.json::<Value>().await?;
    Ok(body["error"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let server = TestServer::start().await;

    let res = server.client.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({ "message": "Asset service is running" }));
    Ok(())
}

#[tokio::test]
async fn health_reports_store_state() -> Result<()> {
    let server = TestServer::start().await;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    server.store.set_unavailable(true);
    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_message(res).await?, "Store unavailable");
    Ok(())
}

#[tokio::test]
async fn missing_header_is_401() -> Result<()> {
    let server = TestServer::start().await;

    let res = server.client.get(server.url("/assets")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(res).await?, "Authorization header is required");
    Ok(())
}

#[tokio::test]
async fn wrong_scheme_is_401() -> Result<()> {
    let server = TestServer::start().await;

    let res = server
        .client
        .get(server.url("/assets"))
        .header("Authorization", "Token abc.def.ghi")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(res).await?, "Invalid token format");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_403() -> Result<()> {
    let server = TestServer::start().await;
    let token = token_with_claims(
        json!({ "user_id": 42, "exp": chrono::Utc::now().timestamp() - 10 }),
        SIGNING_KEY,
    );

    let res = server
        .client
        .get(server.url("/assets"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_message(res).await?, "Token has expired");
    Ok(())
}

#[tokio::test]
async fn foreign_signature_is_403() -> Result<()> {
    let server = TestServer::start().await;
    let token = token_with_claims(
        json!({ "user_id": 42, "exp": chrono::Utc::now().timestamp() + 60 }),
        "someone-elses-key",
    );

    let res = server
        .client
        .get(server.url("/assets"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_message(res).await?, "Invalid token");
    Ok(())
}

#[tokio::test]
async fn valid_token_lists_empty_collection() -> Result<()> {
    let server = TestServer::start().await;

    let res = server
        .client
        .get(server.url("/assets"))
        .header("Authorization", bearer(42))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn auth_runs_before_body_parsing() -> Result<()> {
    let server = TestServer::start().await;

    let res = server
        .client
        .post(server.url("/assets"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn auth_runs_before_id_parsing() -> Result<()> {
    let server = TestServer::start().await;

    let res = server.client.get(server.url("/assets/not-an-id")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
