mod form;

use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    ChartSeries, GrowthFreeze, ProjectionInput, ProjectionResult, Summary, YearRecord, project,
    render_table,
};
use form::{FormValue, decimal_or_zero, integer_or_zero};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

pub const MAX_DURATION_YEARS: i64 = 100;

const INVALID_INPUT_ALERT: &str =
    "Please enter valid values for SIP Amount, Duration, and Return Rate";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliGrowthFreeze {
    Leading,
    Continuous,
}

impl From<CliGrowthFreeze> for GrowthFreeze {
    fn from(value: CliGrowthFreeze) -> Self {
        match value {
            CliGrowthFreeze::Leading => GrowthFreeze::Leading,
            CliGrowthFreeze::Continuous => GrowthFreeze::Continuous,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Chart,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGrowthFreeze {
    #[serde(alias = "literal")]
    Leading,
    #[serde(alias = "last-step", alias = "lastStep")]
    Continuous,
}

impl From<ApiGrowthFreeze> for CliGrowthFreeze {
    fn from(value: ApiGrowthFreeze) -> Self {
        match value {
            ApiGrowthFreeze::Leading => CliGrowthFreeze::Leading,
            ApiGrowthFreeze::Continuous => CliGrowthFreeze::Continuous,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum AlertSeverity {
    Danger,
}

/// Field names follow the calculator form's input ids.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    sip_amount: Option<FormValue>,
    sip_duration: Option<FormValue>,
    growth_rate: Option<FormValue>,
    growth_rate_amount: Option<FormValue>,
    growth_duration: Option<FormValue>,
    return_rate: Option<FormValue>,
    freeze: Option<ApiGrowthFreeze>,
}

#[derive(Parser, Debug)]
#[command(
    name = "sip",
    about = "SIP future value calculator with yearly contribution step-ups",
    after_help = "Run `sip serve [port]` to start the web calculator instead."
)]
struct Cli {
    #[arg(long, help = "Monthly SIP amount")]
    sip_amount: f64,
    #[arg(long, allow_negative_numbers = true, help = "Investment duration in years")]
    duration: i64,
    #[arg(long, help = "Yearly contribution step-up in percent, e.g. 10")]
    growth_rate: Option<f64>,
    #[arg(
        long,
        help = "Yearly contribution step-up as a fixed amount; wins over --growth-rate when > 0"
    )]
    growth_amount: Option<f64>,
    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Number of years over which step-ups apply"
    )]
    growth_duration: i64,
    #[arg(long, help = "Expected annual return in percent, e.g. 12")]
    return_rate: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliGrowthFreeze::Leading,
        help = "Contribution after the growth window: one step ahead (leading) or held at the last grown value (continuous)"
    )]
    freeze: CliGrowthFreeze,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    total_contributed: f64,
    final_corpus_value: f64,
    growth_mode: &'static str,
    freeze: GrowthFreeze,
    chart: ChartSeries,
    years: Vec<YearRecord>,
    display: Summary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    severity: AlertSeverity,
}

fn build_inputs(cli: Cli) -> Result<ProjectionInput, String> {
    for (name, value) in [
        ("--sip-amount", Some(cli.sip_amount)),
        ("--return-rate", Some(cli.return_rate)),
        ("--growth-rate", cli.growth_rate),
        ("--growth-amount", cli.growth_amount),
    ] {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(format!("{name} must be a finite number"));
        }
    }

    if cli.duration > MAX_DURATION_YEARS {
        return Err(format!("--duration must be <= {MAX_DURATION_YEARS}"));
    }

    // Non-positive durations pass through as zero for the engine to reject.
    let duration_years = u32::try_from(cli.duration.max(0)).unwrap_or(0);
    let growth_duration_years = u32::try_from(cli.growth_duration.max(0)).unwrap_or(u32::MAX);

    Ok(ProjectionInput {
        base_contribution: cli.sip_amount,
        duration_years,
        growth_rate_percent: cli.growth_rate.map(|v| v.max(0.0)),
        growth_amount_per_year: cli.growth_amount.map(|v| v.max(0.0)),
        growth_duration_years,
        annual_return_percent: cli.return_rate,
        freeze: cli.freeze.into(),
    })
}

/// Runs one projection from command-line flags and returns the rendered output.
pub fn run_cli() -> Result<String, String> {
    render_cli(Cli::parse())
}

fn render_cli(cli: Cli) -> Result<String, String> {
    let format = cli.format;
    let inputs = build_inputs(cli)?;
    let result = project(&inputs).map_err(|e| e.to_string())?;

    match format {
        OutputFormat::Table => Ok(render_table(&Summary::from_result(
            &result,
            inputs.annual_return_percent,
        ))),
        OutputFormat::Json => {
            let response = build_project_response(&inputs, &result);
            serde_json::to_string_pretty(&response)
                .map_err(|e| format!("failed to serialize projection: {e}"))
        }
        OutputFormat::Chart => {
            let chart = ChartSeries::from_result(&result);
            Ok(chart
                .points()
                .map(|(label, value)| format!("{label}\t{value:.2}\n"))
                .collect())
        }
    }
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "SIP calculator listening");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => {
            warn!(error = %msg, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match project(&inputs) {
        Ok(result) => {
            debug!(years = result.years.len(), "projection served");
            json_response(StatusCode::OK, build_project_response(&inputs, &result))
        }
        Err(err) => {
            warn!(error = %err, "rejected projection request");
            error_response(StatusCode::BAD_REQUEST, INVALID_INPUT_ALERT)
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            severity: AlertSeverity::Danger,
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<ProjectionInput, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

/// Absent or unparseable fields read as zero; only the three mandatory
/// fields are then checked by the engine.
fn inputs_from_payload(payload: ProjectPayload) -> Result<ProjectionInput, String> {
    let cli = Cli {
        sip_amount: decimal_or_zero(payload.sip_amount.as_ref()),
        duration: integer_or_zero(payload.sip_duration.as_ref()),
        growth_rate: payload.growth_rate.as_ref().map(FormValue::as_decimal),
        growth_amount: payload.growth_rate_amount.as_ref().map(FormValue::as_decimal),
        growth_duration: integer_or_zero(payload.growth_duration.as_ref()),
        return_rate: decimal_or_zero(payload.return_rate.as_ref()),
        freeze: payload
            .freeze
            .map(CliGrowthFreeze::from)
            .unwrap_or(CliGrowthFreeze::Leading),
        format: OutputFormat::Json,
    };
    build_inputs(cli)
}

fn build_project_response(inputs: &ProjectionInput, result: &ProjectionResult) -> ProjectResponse {
    ProjectResponse {
        total_contributed: result.total_contributed,
        final_corpus_value: result.final_corpus_value,
        growth_mode: inputs.growth_mode().name(),
        freeze: inputs.freeze,
        chart: ChartSeries::from_result(result),
        years: result.years.clone(),
        display: Summary::from_result(result, inputs.annual_return_percent),
    }
}
