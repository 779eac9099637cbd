use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    DrawdownPlan, DrawdownResult, EngineResult, GrowthPlan, GrowthResult, find_coast_fire_year,
    find_crossover_year, simulate_drawdown, simulate_growth,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    start_amount: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_rate: Option<f64>,
    years: Option<u32>,
    inflation_rate: Option<f64>,
    adjust_for_inflation: Option<bool>,
    delay_years: Option<u32>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DrawdownPayload {
    initial_pot: Option<f64>,
    monthly_drawdown: Option<f64>,
    annual_rate: Option<f64>,
    years: Option<u32>,
    take_lump_sum: Option<bool>,
    lump_sum_percent: Option<f64>,
    currency: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg plan",
    about = "Project savings growth with monthly compounding"
)]
struct PlanCli {
    #[arg(long, default_value_t = 1000.0, help = "Opening balance")]
    start_amount: f64,
    #[arg(
        long,
        default_value_t = 50.0,
        help = "Contribution added at the end of each month"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual growth rate in percent, e.g. 7"
    )]
    annual_rate: f64,
    #[arg(long, default_value_t = 30)]
    years: u32,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(long, help = "Report balances in today's money")]
    adjust_for_inflation: bool,
    #[arg(
        long,
        default_value_t = 0,
        help = "Years to wait before saving anything"
    )]
    delay_years: u32,
    #[arg(long, default_value = "£")]
    currency: String,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg drawdown",
    about = "Run a retirement pot down with a fixed monthly income"
)]
struct DrawdownCli {
    #[arg(
        long,
        default_value_t = 100000.0,
        help = "Pot at the start of retirement"
    )]
    initial_pot: f64,
    #[arg(
        long,
        default_value_t = 2000.0,
        help = "Income drawn at the end of each month"
    )]
    monthly_drawdown: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Expected annual growth rate in percent, e.g. 5"
    )]
    annual_rate: f64,
    #[arg(long, default_value_t = 25)]
    years: u32,
    #[arg(long, help = "Take a lump sum off the pot before drawdown starts")]
    take_lump_sum: bool,
    #[arg(
        long,
        default_value_t = 25.0,
        help = "Lump sum as a percent of the pot"
    )]
    lump_sum_percent: f64,
    #[arg(long, default_value = "£")]
    currency: String,
}

#[derive(Debug)]
struct PlanRequest {
    plan: GrowthPlan,
    currency: String,
}

#[derive(Debug)]
struct DrawdownRequest {
    plan: DrawdownPlan,
    currency: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    currency: String,
    start_amount: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
    inflation_rate_percent: f64,
    adjust_for_inflation: bool,
    delay_years: u32,
    crossover_year: Option<f64>,
    coast_fire_year: Option<u32>,
    growth: GrowthResult,
    comparison: Option<GrowthResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DrawdownResponse {
    currency: String,
    initial_pot: f64,
    monthly_drawdown: f64,
    annual_rate_percent: f64,
    years: u32,
    take_lump_sum: bool,
    lump_sum_percent: f64,
    drawdown: DrawdownResult,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_plan_request(cli: PlanCli) -> Result<PlanRequest, String> {
    if !cli.start_amount.is_finite() || cli.start_amount < 0.0 {
        return Err("--start-amount must be >= 0".to_string());
    }

    if !cli.monthly_contribution.is_finite() || cli.monthly_contribution < 0.0 {
        return Err("--monthly-contribution must be >= 0".to_string());
    }

    if !cli.annual_rate.is_finite() || cli.annual_rate < 0.0 {
        return Err("--annual-rate must be >= 0".to_string());
    }

    if cli.years == 0 {
        return Err("--years must be > 0".to_string());
    }

    if !cli.inflation_rate.is_finite() || cli.inflation_rate < 0.0 {
        return Err("--inflation-rate must be >= 0".to_string());
    }

    Ok(PlanRequest {
        plan: GrowthPlan {
            start_amount: cli.start_amount,
            monthly_contribution: cli.monthly_contribution,
            annual_rate_percent: cli.annual_rate,
            years: cli.years,
            inflation_rate_percent: cli.inflation_rate,
            adjust_for_inflation: cli.adjust_for_inflation,
            delay_years: cli.delay_years,
        },
        currency: cli.currency,
    })
}

fn build_drawdown_request(cli: DrawdownCli) -> Result<DrawdownRequest, String> {
    if !cli.initial_pot.is_finite() || cli.initial_pot < 0.0 {
        return Err("--initial-pot must be >= 0".to_string());
    }

    if !cli.monthly_drawdown.is_finite() || cli.monthly_drawdown < 0.0 {
        return Err("--monthly-drawdown must be >= 0".to_string());
    }

    if !cli.annual_rate.is_finite() || cli.annual_rate < 0.0 {
        return Err("--annual-rate must be >= 0".to_string());
    }

    if cli.years == 0 {
        return Err("--years must be > 0".to_string());
    }

    if !(0.0..=100.0).contains(&cli.lump_sum_percent) {
        return Err("--lump-sum-percent must be between 0 and 100".to_string());
    }

    Ok(DrawdownRequest {
        plan: DrawdownPlan {
            initial_pot: cli.initial_pot,
            monthly_drawdown: cli.monthly_drawdown,
            annual_rate_percent: cli.annual_rate,
            years: cli.years,
            take_lump_sum: cli.take_lump_sum,
            lump_sum_percent: cli.lump_sum_percent,
        },
        currency: cli.currency,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route(
            "/api/drawdown",
            get(drawdown_get_handler).post(drawdown_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Nest egg HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

pub fn run_plan_command(args: &[String]) -> Result<(), String> {
    let mut argv = vec!["nestegg plan".to_string()];
    argv.extend_from_slice(args);
    let cli = PlanCli::parse_from(argv);

    let request = build_plan_request(cli)?;
    let response = build_plan_response(&request).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize response: {e}"))?;
    println!("{json}");
    Ok(())
}

pub fn run_drawdown_command(args: &[String]) -> Result<(), String> {
    let mut argv = vec!["nestegg drawdown".to_string()];
    argv.extend_from_slice(args);
    let cli = DrawdownCli::parse_from(argv);

    let request = build_drawdown_request(cli)?;
    let response = build_drawdown_response(&request).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize response: {e}"))?;
    println!("{json}");
    Ok(())
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

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_handler_impl(payload: PlanPayload) -> Response {
    let request = match plan_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            log::warn!("rejected plan request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match build_plan_response(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            log::warn!("rejected plan request: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

async fn drawdown_get_handler(Query(payload): Query<DrawdownPayload>) -> Response {
    drawdown_handler_impl(payload).await
}

async fn drawdown_post_handler(Json(payload): Json<DrawdownPayload>) -> Response {
    drawdown_handler_impl(payload).await
}

async fn drawdown_handler_impl(payload: DrawdownPayload) -> Response {
    let request = match drawdown_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            log::warn!("rejected drawdown request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match build_drawdown_response(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            log::warn!("rejected drawdown request: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanRequest, String> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    plan_request_from_payload(payload)
}

#[cfg(test)]
fn drawdown_request_from_json(json: &str) -> Result<DrawdownRequest, String> {
    let payload = serde_json::from_str::<DrawdownPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    drawdown_request_from_payload(payload)
}

fn plan_request_from_payload(payload: PlanPayload) -> Result<PlanRequest, String> {
    let mut cli = default_plan_cli_for_api();

    if let Some(v) = payload.start_amount {
        cli.start_amount = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.adjust_for_inflation {
        cli.adjust_for_inflation = v;
    }
    if let Some(v) = payload.delay_years {
        cli.delay_years = v;
    }
    if let Some(v) = payload.currency {
        cli.currency = v;
    }

    build_plan_request(cli)
}

fn drawdown_request_from_payload(payload: DrawdownPayload) -> Result<DrawdownRequest, String> {
    let mut cli = default_drawdown_cli_for_api();

    if let Some(v) = payload.initial_pot {
        cli.initial_pot = v;
    }
    if let Some(v) = payload.monthly_drawdown {
        cli.monthly_drawdown = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.take_lump_sum {
        cli.take_lump_sum = v;
    }
    if let Some(v) = payload.lump_sum_percent {
        cli.lump_sum_percent = v;
    }
    if let Some(v) = payload.currency {
        cli.currency = v;
    }

    build_drawdown_request(cli)
}

fn default_plan_cli_for_api() -> PlanCli {
    PlanCli {
        start_amount: 1_000.0,
        monthly_contribution: 50.0,
        annual_rate: 7.0,
        years: 30,
        inflation_rate: 3.0,
        adjust_for_inflation: false,
        delay_years: 0,
        currency: "£".to_string(),
    }
}

fn default_drawdown_cli_for_api() -> DrawdownCli {
    DrawdownCli {
        initial_pot: 100_000.0,
        monthly_drawdown: 2_000.0,
        annual_rate: 5.0,
        years: 25,
        take_lump_sum: false,
        lump_sum_percent: 25.0,
        currency: "£".to_string(),
    }
}

fn build_plan_response(request: &PlanRequest) -> EngineResult<PlanResponse> {
    let plan = &request.plan;

    let primary = GrowthPlan {
        delay_years: 0,
        ..plan.clone()
    };
    let growth = simulate_growth(&primary)?;

    // Milestones are judged on nominal balances; deflating them would shrink
    // the target along with the series.
    let nominal = if primary.adjust_for_inflation {
        simulate_growth(&GrowthPlan {
            adjust_for_inflation: false,
            ..primary.clone()
        })?
    } else {
        growth.clone()
    };

    let crossover_year = find_crossover_year(
        plan.start_amount,
        plan.monthly_contribution,
        plan.annual_rate_percent,
        plan.years,
    )?;
    let coast_fire_year = find_coast_fire_year(
        &nominal.balances,
        plan.annual_rate_percent,
        plan.years,
        nominal.final_balance,
    )?;

    let comparison = if plan.delay_years > 0 {
        Some(simulate_growth(plan)?)
    } else {
        None
    };

    Ok(PlanResponse {
        currency: request.currency.clone(),
        start_amount: plan.start_amount,
        monthly_contribution: plan.monthly_contribution,
        annual_rate_percent: plan.annual_rate_percent,
        years: plan.years,
        inflation_rate_percent: plan.inflation_rate_percent,
        adjust_for_inflation: plan.adjust_for_inflation,
        delay_years: plan.delay_years,
        crossover_year,
        coast_fire_year,
        growth,
        comparison,
    })
}

fn build_drawdown_response(request: &DrawdownRequest) -> EngineResult<DrawdownResponse> {
    let plan = &request.plan;
    let drawdown = simulate_drawdown(plan)?;

    Ok(DrawdownResponse {
        currency: request.currency.clone(),
        initial_pot: plan.initial_pot,
        monthly_drawdown: plan.monthly_drawdown,
        annual_rate_percent: plan.annual_rate_percent,
        years: plan.years,
        take_lump_sum: plan.take_lump_sum,
        lump_sum_percent: plan.lump_sum_percent,
        drawdown,
    })
}
