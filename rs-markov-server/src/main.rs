use std::sync::Mutex;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{delete, get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use rs_markov_core::error::MarkovError;
use rs_markov_core::io::list_files;
use rs_markov_core::model::engine::{Engine, DEFAULT_DATABASE};
use rs_markov_core::model::generation_input::Seed;
use rs_markov_core::model::monitor::WorkerSpec;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_words: Option<usize>,
	max_attempts: Option<usize>,
	database: Option<String>,
	verbose: Option<bool>,
	seed: Option<String>, // -> none, word:<w> or list:<a,b,c>
}

#[derive(Deserialize)]
struct ReadParams {
	name: Option<String>,
	database: Option<String>,
	overwrite: Option<bool>,
}

#[derive(Deserialize)]
struct ClearParams {
	name: Option<String>,
}

struct SharedData {
	engine: Engine,
}

impl GenerateParams {
	/// Determines the seed strategy for sentence generation.
	fn seed(&self) -> Result<Seed, String> {
		match &self.seed {
			None => Ok(Seed::None),
			Some(s) if s.to_lowercase() == "none" => Ok(Seed::None),
			Some(s) if s.to_lowercase().starts_with("word:") => {
				let value = &s["word:".len()..];
				if value.is_empty() {
					Err("Word seed cannot be empty".into())
				} else {
					Ok(Seed::Word(value.to_owned()))
				}
			}
			Some(s) if s.to_lowercase().starts_with("list:") => {
				let values: Vec<String> = s["list:".len()..]
					.split(',')
					.map(str::trim)
					.filter(|v| !v.is_empty())
					.map(str::to_owned)
					.collect();
				if values.is_empty() {
					Err("List seed cannot be empty".into())
				} else {
					Ok(Seed::List(values))
				}
			}
			Some(_) => Err("Seed must start with 'word:' or 'list:' or be 'none'".into()),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a sentence from the engine based on query parameters.
/// Returns the generated sentence as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let seed = match query.seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	let mut input = shared_data.engine.make_generation_input();
	input.max_words = query.max_words.unwrap_or(20);
	input.max_attempts = query.max_attempts.unwrap_or(100);
	input.verbose = query.verbose.unwrap_or(false);
	input.seed = seed;
	if let Some(database) = &query.database {
		input.database = database.clone();
	}

	match shared_data.engine.generate(&input) {
		Ok(sentence) => HttpResponse::Ok().body(sentence),
		Err(e @ MarkovError::EmptyDatabase { .. }) => HttpResponse::Conflict().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files(&"./data".to_owned(), "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[get("/v1/databases")]
async fn get_databases(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};
	HttpResponse::Ok().body(shared_data.engine.database_names().join("\n"))
}

#[put("/v1/read")]
async fn put_read(data: web::Data<Mutex<SharedData>>, query: web::Query<ReadParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	let database = query.database.as_deref().unwrap_or(DEFAULT_DATABASE);
	let overwrite = query.overwrite.unwrap_or(false);

	let corpus_path = format!("./data/{}.txt", name);
	match shared_data.engine.read_file(corpus_path, database, overwrite) {
		Ok(_) => HttpResponse::Ok().body("Corpus read successfully"),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to read corpus: {e}")),
	}
}

#[delete("/v1/databases")]
async fn delete_databases(data: web::Data<Mutex<SharedData>>, query: web::Query<ClearParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	match shared_data.engine.clear(query.name.as_deref()) {
		Ok(_) => HttpResponse::Ok().body("Cleared"),
		Err(e @ MarkovError::UnknownDatabase { .. }) => HttpResponse::NotFound().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// Main entry point for the server.
///
/// Builds the engine, starts its liveness monitor with a heartbeat worker,
/// wraps everything in a `Mutex` for thread safety, and starts an Actix-web
/// HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Corpora are read from the hardcoded `./data` directory and should be
///   made configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let mut engine = Engine::new();
	let heartbeat = WorkerSpec::new("heartbeat", || {
		loop {
			std::thread::sleep(Duration::from_secs(60));
		}
	});
	if let Err(e) = engine.start_monitor(Duration::from_secs(5), heartbeat) {
		log::error!("failed to start the liveness monitor: {e}");
	}

	let shared_data = SharedData { engine };
	let shared_engine = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_engine.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_databases)
			.service(put_read)
			.service(delete_databases)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
