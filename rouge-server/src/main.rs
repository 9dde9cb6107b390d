use std::env;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use rouge_core::metric::Metric;
use rouge_core::{Rouge, RougeConfig};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// JSON body of the `/v1/scores` endpoint
#[derive(Serialize, Deserialize)]
struct ScoreRequest {
	hyps: Vec<String>,
	refs: Vec<String>,
	avg: Option<bool>,
	ignore_empty: Option<bool>,
}

struct SharedData {
	rouge: Rouge,
}

/// Bind address and worker count, read from the environment.
///
/// - `ROUGE_HOST` (default `127.0.0.1`)
/// - `ROUGE_PORT` (default `5000`)
/// - `ROUGE_WORKERS` (default: actix-web's own choice)
struct ServerConfig {
	host: String,
	port: u16,
	workers: Option<usize>,
}

impl ServerConfig {
	fn from_env() -> Self {
		Self::from_vars(|name| env::var(name).ok())
	}

	/// Builds the configuration from a variable lookup, falling back to the
	/// defaults (with a warning) on invalid values.
	fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let host = lookup("ROUGE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
		let port = match lookup("ROUGE_PORT") {
			Some(value) => value.parse().unwrap_or_else(|_| {
				warn!("invalid ROUGE_PORT '{value}', using {DEFAULT_PORT}");
				DEFAULT_PORT
			}),
			None => DEFAULT_PORT,
		};
		let workers = lookup("ROUGE_WORKERS").and_then(|value| match value.parse::<usize>() {
			Ok(workers) if workers > 0 => Some(workers),
			_ => {
				warn!("invalid ROUGE_WORKERS '{value}', using the default worker count");
				None
			}
		});
		Self { host, port, workers }
	}
}

/// HTTP POST endpoint `/v1/scores`
///
/// Scores every hypothesis against the reference at the same index with the
/// active evaluator. Returns a JSON list of per-pair scores, or a JSON map of
/// averaged scores when `avg` is set.
#[post("/v1/scores")]
async fn post_scores(data: web::Data<Mutex<SharedData>>, body: web::Json<ScoreRequest>) -> impl Responder {
	// Score outside the lock, the evaluator is cheap to clone
	let rouge = match data.lock() {
		Ok(shared_data) => shared_data.rouge.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Evaluator lock failed"),
	};

	let request = body.into_inner();
	let avg = request.avg.unwrap_or(false);
	let ignore_empty = request.ignore_empty.unwrap_or(false);

	let result = web::block(move || rouge.get_scores(&request.hyps, &request.refs, avg, ignore_empty)).await;
	match result {
		Ok(Ok(scores)) => HttpResponse::Ok().json(scores),
		Ok(Err(e)) => HttpResponse::BadRequest().body(e.to_string()),
		Err(_) => HttpResponse::InternalServerError().body("Scoring task failed"),
	}
}

#[get("/v1/metrics")]
async fn get_metrics() -> impl Responder {
	let names: Vec<&str> = Metric::ALL.iter().map(Metric::name).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

#[get("/v1/config")]
async fn get_config(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Evaluator lock failed"),
	};
	HttpResponse::Ok().json(shared_data.rouge.config())
}

#[put("/v1/config")]
async fn put_config(data: web::Data<Mutex<SharedData>>, body: web::Json<RougeConfig>) -> impl Responder {
	let rouge = match Rouge::new(body.into_inner()) {
		Ok(rouge) => rouge,
		Err(e) => return HttpResponse::BadRequest().body(format!("Invalid configuration: {e}")),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Evaluator lock failed"),
	};
	info!("evaluator reconfigured: metrics={:?} stats={:?}", rouge.metrics(), rouge.stats());
	shared_data.rouge = rouge;

	HttpResponse::Ok().body("Configuration updated")
}

/// Main entry point for the server.
///
/// Creates a default evaluator, wraps it in a `Mutex` so that it can be
/// reconfigured at runtime, and starts an Actix-web HTTP server.
///
/// # Notes
/// - Bind address comes from `ROUGE_HOST` / `ROUGE_PORT`.
/// - Log verbosity is controlled by `RUST_LOG`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = ServerConfig::from_env();
	let shared_data = SharedData {
		rouge: Rouge::default(),
	};
	let shared_rouge = web::Data::new(Mutex::new(shared_data));

	info!("listening on {}:{}", config.host, config.port);
	let mut server = HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_rouge.clone())
			.service(post_scores)
			.service(get_metrics)
			.service(get_config)
			.service(put_config)
	});
	if let Some(workers) = config.workers {
		server = server.workers(workers);
	}

	server
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
