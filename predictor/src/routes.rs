use std::{
    error::Error,
    fmt::{self, Display},
    sync::Arc,
};

use axum::{
    Form, Json, Router,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use log::{debug, warn};
use pipeline::{Applicant, Pipeline, PipelineErr};
use serde::Serialize;

use crate::{
    currency::format_usd,
    view::{FormInput, Outcome, render_page},
};

/// Shared, read-only request state.
pub type AppState = Arc<Pipeline>;

/// Why a form submission did not produce an estimate.
#[derive(Debug)]
pub enum RequestErr {
    /// A numeric field is not a number at all.
    NotANumber { field: &'static str, value: String },
    Pipeline(PipelineErr),
}

impl Display for RequestErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestErr::NotANumber { field, value } => {
                write!(f, "{field} '{value}' is not a number")
            }
            RequestErr::Pipeline(e) => write!(f, "{e}"),
        }
    }
}

impl Error for RequestErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RequestErr::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PipelineErr> for RequestErr {
    fn from(value: PipelineErr) -> Self {
        Self::Pipeline(value)
    }
}

impl FormInput {
    /// Parses the numeric fields, leaving range and category checks to the pipeline.
    ///
    /// # Returns
    /// The applicant or the first field that is not a number.
    pub fn to_applicant(&self) -> Result<Applicant, RequestErr> {
        fn number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, RequestErr> {
            value.trim().parse().map_err(|_| RequestErr::NotANumber {
                field,
                value: value.to_string(),
            })
        }

        Ok(Applicant {
            age: number("age", &self.age)?,
            sex: self.sex.clone(),
            bmi: number("bmi", &self.bmi)?,
            children: number("children", &self.children)?,
            smoker: self.smoker.clone(),
            region: self.region.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub charges: f64,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Builds the application router.
///
/// # Arguments
/// * `state` - The pipeline shared by every request.
///
/// # Returns
/// A router serving the form, the JSON endpoint and the health check.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/predict", post(api_predict))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn index() -> Html<String> {
    Html(render_page(&FormInput::default(), &Outcome::Pending))
}

/// Runs the pipeline on a form submission and re-renders the page.
///
/// A body that does not decode into the form's fields re-renders the default
/// form with the decoding error.
pub async fn submit(
    State(pipeline): State<AppState>,
    input: Result<Form<FormInput>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let input = match input {
        Ok(Form(input)) => input,
        Err(rejection) => {
            warn!("rejected submission: {}", rejection.body_text());
            let outcome = Outcome::Rejected(rejection.body_text());
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&FormInput::default(), &outcome)),
            );
        }
    };

    let (status, outcome) = match estimate(&pipeline, &input) {
        Ok(charges) => (StatusCode::OK, Outcome::Estimate(charges)),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, Outcome::Rejected(e.to_string())),
    };

    (status, Html(render_page(&input, &outcome)))
}

fn estimate(pipeline: &Pipeline, input: &FormInput) -> Result<f64, RequestErr> {
    let applicant = input.to_applicant()?;
    pipeline
        .estimate(&applicant)
        .inspect(|charges| debug!("estimated {charges:.2} for {applicant:?}"))
        .map_err(|e| {
            warn!("rejected submission: {e}");
            RequestErr::from(e)
        })
}

/// Answers a JSON prediction request.
///
/// # Returns
/// The raw and formatted charges, or a JSON error with status 422 when the
/// body cannot be decoded or the pipeline rejects the applicant.
pub async fn api_predict(
    State(pipeline): State<AppState>,
    applicant: Result<Json<Applicant>, JsonRejection>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(applicant) = applicant.map_err(|rejection| unprocessable(rejection.body_text()))?;

    match pipeline.estimate(&applicant) {
        Ok(charges) => Ok(Json(PredictResponse {
            charges,
            formatted: format_usd(charges),
        })),
        Err(e) => Err(unprocessable(e.to_string())),
    }
}

fn unprocessable(error: String) -> (StatusCode, Json<ErrorResponse>) {
    warn!("rejected api request: {error}");
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse { error }))
}

pub async fn health() -> &'static str {
    "ok"
}
