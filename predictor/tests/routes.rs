use std::{io, sync::Arc, time::Duration};

use artifacts::{
    AnyRegressor, AnyScaler, ArtifactStore,
    regressor::LinearRegression,
    scaler::StandardScaler,
};
use axum::{Form, Json, extract::State, http::StatusCode};
use pipeline::{Applicant, Pipeline};
use predictor::{
    AppState, router,
    routes::{api_predict, health, index, submit},
    view::FormInput,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::timeout,
};

fn state() -> AppState {
    let scaler = StandardScaler::new(vec![39.2, 30.66, 1.09], vec![14.04, 6.09, 1.2]).unwrap();
    let model = LinearRegression::new(
        vec![3_600.0, -130.0, 2_000.0, 570.0, 23_650.0, 350.0],
        8_500.0,
    )
    .unwrap();
    let store = ArtifactStore::new(AnyScaler::Standard(scaler), AnyRegressor::Linear(model));
    Arc::new(Pipeline::new(store).unwrap())
}

fn form(smoker: &str) -> FormInput {
    FormInput {
        age: "30".into(),
        bmi: "25.0".into(),
        children: "0".into(),
        sex: "male".into(),
        smoker: smoker.into(),
        region: "northeast".into(),
    }
}

/// Pulls the rendered amount out of a result card.
fn amount(html: &str) -> Option<&str> {
    let start = html.find("<p class=\"amount\">")? + "<p class=\"amount\">".len();
    let end = html[start..].find("</p>")?;
    Some(&html[start..start + end])
}

#[tokio::test]
async fn index_shows_an_empty_form() {
    let html = index().await.0;

    assert!(html.contains("Medical Insurance Cost Predictor"));
    assert!(amount(&html).is_none());
}

#[tokio::test]
async fn submit_renders_a_currency_amount() {
    let (status, html) = submit(State(state()), Ok(Form(form("no")))).await;

    assert_eq!(status, StatusCode::OK);
    let amount = amount(&html.0).expect("result card");
    assert!(amount.starts_with('$'));
    assert!(amount.contains(','));
    assert_eq!(amount.split('.').nth(1).map(str::len), Some(2));
}

#[tokio::test]
async fn smoker_submission_differs() {
    let state = state();

    let (_, no) = submit(State(state.clone()), Ok(Form(form("no")))).await;
    let (_, yes) = submit(State(state), Ok(Form(form("yes")))).await;

    assert_ne!(amount(&no.0), amount(&yes.0));
}

#[tokio::test]
async fn invalid_category_is_reported_on_the_page() {
    let mut input = form("no");
    input.region = "midwest".into();

    let (status, html) = submit(State(state()), Ok(Form(input))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(amount(&html.0).is_none());
    assert!(html.0.contains("invalid region"));
}

#[tokio::test]
async fn non_numeric_field_is_reported_on_the_page() {
    let mut input = form("no");
    input.bmi = "heavy".into();

    let (status, html) = submit(State(state()), Ok(Form(input))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.0.contains("bmi &#39;heavy&#39; is not a number"));
}

#[tokio::test]
async fn api_returns_raw_and_formatted_charges() {
    let applicant = Applicant {
        age: 30,
        sex: "male".into(),
        bmi: 25.0,
        children: 0,
        smoker: "no".into(),
        region: "northeast".into(),
    };

    let Json(res) = api_predict(State(state()), Ok(Json(applicant))).await.unwrap();

    assert!(res.charges.is_finite());
    assert_eq!(res.formatted, predictor::format_usd(res.charges));
}

#[tokio::test]
async fn api_rejects_out_of_range_age() {
    let applicant = Applicant {
        age: 101,
        sex: "female".into(),
        bmi: 25.0,
        children: 0,
        smoker: "no".into(),
        region: "northeast".into(),
    };

    let (status, Json(err)) = api_predict(State(state()), Ok(Json(applicant)))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err.error.contains("age"));
}

#[tokio::test]
async fn health_is_ok() {
    assert_eq!(health().await, "ok");
}

/// Sends one request to a freshly served router and returns the raw response.
async fn post(path: &str, content_type: &str, body: &str) -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move { axum::serve(listener, router(state())).await });

    let request = format!(
        "POST {path} HTTP/1.1\r\nHost: {addr}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    let read = timeout(Duration::from_secs(5), stream.read_to_string(&mut response)).await;

    server.abort();
    read.map_err(io::Error::other)??;
    Ok(response)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn form_post_over_tcp() -> io::Result<()> {
    let body = "age=30&bmi=25.0&children=0&sex=male&smoker=no&region=northeast";

    let response = post("/", "application/x-www-form-urlencoded", body).await?;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(amount(&response).is_some_and(|a| a.starts_with('$')));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn incomplete_form_renders_an_error_card() -> io::Result<()> {
    let body = "age=30&bmi=25.0&children=0&sex=male&smoker=no";

    let response = post("/", "application/x-www-form-urlencoded", body).await?;

    assert!(response.starts_with("HTTP/1.1 422"));
    assert!(response.to_ascii_lowercase().contains("content-type: text/html"));
    assert!(response.contains("missing field `region`"));
    assert!(response.contains("Medical Insurance Cost Predictor"));
    assert!(amount(&response).is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mistyped_json_field_gets_a_json_error() -> io::Result<()> {
    let body = r#"{"age": "30", "sex": "male", "bmi": 25.0, "children": 0, "smoker": "no", "region": "northeast"}"#;

    let response = post("/api/predict", "application/json", body).await?;

    assert!(response.starts_with("HTTP/1.1 422"));
    assert!(response.to_ascii_lowercase().contains("content-type: application/json"));
    let (_, payload) = response.split_once("\r\n\r\n").expect("response body");
    let payload: serde_json::Value = serde_json::from_str(payload).expect("json body");
    assert!(payload["error"].as_str().is_some_and(|e| e.contains("age")));
    Ok(())
}
