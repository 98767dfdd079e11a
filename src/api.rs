//! REST handlers for the results editor, registry and results store.
//!
//! Every error body is `{ "error": "<message>" }`.

use crate::logic::{select_qualified, EditCommand, ResultsEditor};
use crate::models::{ParticipationResults, Registrant, ResultsError, SaveResultsRequest};
use crate::registry::{ParticipantRegistry, RegistryError};
use crate::store::{ResultsStore, StoreError};
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Shared server state: results documents and registrations.
pub struct AppState {
    /// Async lock: a save holds it while the document is written to disk.
    pub store: tokio::sync::RwLock<ResultsStore>,
    pub registry: RwLock<ParticipantRegistry>,
}

impl AppState {
    pub fn new(store: ResultsStore, registry: ParticipantRegistry) -> Self {
        Self {
            store: tokio::sync::RwLock::new(store),
            registry: RwLock::new(registry),
        }
    }
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: String,
}

/// Path segments: tournament id and participation type.
#[derive(Deserialize)]
struct ParticipationPath {
    id: String,
    participation_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantsQuery {
    participation_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishBody {
    is_published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandsBody {
    commands: Vec<EditCommand>,
    /// Refuse the batch unless the stored document still has this version.
    #[serde(default)]
    expected_version: Option<u64>,
}

/// One participation type's results with the document's version and publish state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParticipationView {
    tournament_id: String,
    participation_type: String,
    version: u64,
    is_published: bool,
    #[serde(flatten)]
    results: ParticipationResults,
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn store_error(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::InvalidTournamentId(_) | StoreError::MissingParticipationType => {
            HttpResponse::BadRequest().json(error_body(e))
        }
        StoreError::Conflict { .. } => HttpResponse::Conflict().json(error_body(e)),
        StoreError::Io(_) | StoreError::Json(_) => {
            log::error!("Results storage failure: {}", e);
            HttpResponse::InternalServerError().json(error_body(e))
        }
    }
}

fn results_error(e: &ResultsError) -> HttpResponse {
    match e {
        ResultsError::GroupNotFound(_)
        | ResultsError::MatchNotFound(_)
        | ResultsError::ParticipantNotFound(_) => HttpResponse::NotFound().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

fn registry_error(e: &RegistryError) -> HttpResponse {
    match e {
        RegistryError::DuplicateRegistrant { .. } => HttpResponse::Conflict().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tt-results",
    })
}

/// Registered participants, optionally for one participation type.
#[get("/api/tournaments/{id}/participants")]
async fn api_list_participants(
    state: State,
    path: Path<TournamentPath>,
    query: Query<ParticipantsQuery>,
) -> HttpResponse {
    let registry = match state.registry.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(registry.participants(&path.id, query.participation_type.as_deref()))
}

/// Register one participant for the tournament.
#[post("/api/tournaments/{id}/participants")]
async fn api_register_participant(
    state: State,
    path: Path<TournamentPath>,
    body: Json<Registrant>,
) -> HttpResponse {
    let mut registry = match state.registry.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let registrant = body.into_inner();
    let participant = registrant.to_participant();
    match registry.register(&path.id, registrant) {
        Ok(()) => HttpResponse::Ok().json(participant),
        Err(e) => registry_error(&e),
    }
}

/// The whole results document (default-empty when nothing was saved).
#[get("/api/tournaments/{id}/results")]
async fn api_get_results(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let store = state.store.read().await;
    match store.get(&path.id) {
        Ok(doc) => HttpResponse::Ok().json(doc),
        Err(e) => store_error(&e),
    }
}

/// Replace one participation type's results as sent.
#[post("/api/tournaments/{id}/results")]
async fn api_save_results(
    state: State,
    path: Path<TournamentPath>,
    body: Json<SaveResultsRequest>,
) -> HttpResponse {
    let mut store = state.store.write().await;
    match store.save(&path.id, body.into_inner()).await {
        Ok(doc) => HttpResponse::Ok().json(doc),
        Err(e) => store_error(&e),
    }
}

#[put("/api/tournaments/{id}/results/publish")]
async fn api_publish_results(
    state: State,
    path: Path<TournamentPath>,
    body: Json<PublishBody>,
) -> HttpResponse {
    let mut store = state.store.write().await;
    match store.set_published(&path.id, body.is_published).await {
        Ok(doc) => HttpResponse::Ok().json(doc),
        Err(e) => store_error(&e),
    }
}

#[get("/api/tournaments/{id}/results/{participation_type}")]
async fn api_get_participation(state: State, path: Path<ParticipationPath>) -> HttpResponse {
    let store = state.store.read().await;
    match store.get(&path.id) {
        Ok(doc) => HttpResponse::Ok().json(ParticipationView {
            results: doc.participation(&path.participation_type),
            tournament_id: doc.tournament_id,
            participation_type: path.participation_type.clone(),
            version: doc.version,
            is_published: doc.is_published,
        }),
        Err(e) => store_error(&e),
    }
}

/// Players currently marked to qualify from the groups.
#[get("/api/tournaments/{id}/results/{participation_type}/qualified")]
async fn api_get_qualified(state: State, path: Path<ParticipationPath>) -> HttpResponse {
    let store = state.store.read().await;
    match store.get(&path.id) {
        Ok(doc) => {
            let results = doc.participation(&path.participation_type);
            HttpResponse::Ok().json(select_qualified(&results.group_stage_results))
        }
        Err(e) => store_error(&e),
    }
}

/// Apply a batch of edit commands and save. All or nothing.
#[post("/api/tournaments/{id}/results/{participation_type}/commands")]
async fn api_apply_commands(
    state: State,
    path: Path<ParticipationPath>,
    body: Json<CommandsBody>,
) -> HttpResponse {
    let mut store = state.store.write().await;
    let doc = match store.get(&path.id) {
        Ok(doc) => doc,
        Err(e) => return store_error(&e),
    };
    if let Some(expected) = body.expected_version {
        if expected != doc.version {
            return store_error(&StoreError::Conflict {
                expected,
                actual: doc.version,
            });
        }
    }

    let CommandsBody { commands, .. } = body.into_inner();
    let count = commands.len();
    let mut editor = ResultsEditor::new(doc.participation(&path.participation_type));
    if let Err(e) = editor.apply_all(commands) {
        log::info!(
            "Rejected command batch for {}/{}: {}",
            path.id,
            path.participation_type,
            e
        );
        return results_error(&e);
    }

    let request = SaveResultsRequest::new(path.participation_type.clone(), editor.into_results())
        .with_expected_version(doc.version);
    match store.save(&path.id, request).await {
        Ok(saved) => {
            log::debug!(
                "Applied {} command(s) to {}/{}",
                count,
                path.id,
                path.participation_type
            );
            HttpResponse::Ok().json(ParticipationView {
                results: saved.participation(&path.participation_type),
                tournament_id: saved.tournament_id,
                participation_type: path.participation_type.clone(),
                version: saved.version,
                is_published: saved.is_published,
            })
        }
        Err(e) => store_error(&e),
    }
}

/// Register every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_participants)
        .service(api_register_participant)
        .service(api_get_results)
        .service(api_save_results)
        .service(api_publish_results)
        .service(api_get_qualified)
        .service(api_get_participation)
        .service(api_apply_commands);
}
