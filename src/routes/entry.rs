use actix_web::{
    error::{JsonPayloadError, PathError},
    http::StatusCode,
    web::{self, ServiceConfig},
    HttpRequest, HttpResponse, HttpResponseBuilder,
};
use log::debug;
use serde::Deserialize;

use crate::{
    db::Database,
    errors::ApiError,
    models::entry::{Entry, EntryRepresentation},
};

const ENTRY_RESOURCE: &str = "entry";

/// Wire shape of `entry`, linking to its single-item resource.
fn represent(req: &HttpRequest, entry: Entry) -> Result<EntryRepresentation, ApiError> {
    let url = req.url_for(ENTRY_RESOURCE, [entry.id.to_string()])?;
    Ok(EntryRepresentation::new(entry, url.to_string()))
}

fn represent_all(
    req: &HttpRequest,
    entries: Vec<Entry>,
) -> Result<Vec<EntryRepresentation>, ApiError> {
    entries
        .into_iter()
        .map(|entry| represent(req, entry))
        .collect()
}

async fn get_entries(req: HttpRequest, db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let entries = db.lock_entry_table()?.get_all()?;
    let body = represent_all(&req, entries)?;
    Ok(HttpResponseBuilder::new(StatusCode::OK).json(body))
}

async fn get_entry(
    req: HttpRequest,
    id: web::Path<i64>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let entry = db
        .lock_entry_table()?
        .find_one(id)?
        .ok_or_else(|| ApiError::NotFound("entry not found".to_string()))?;
    Ok(HttpResponseBuilder::new(StatusCode::OK).json(represent(&req, entry)?))
}

#[derive(Deserialize)]
struct PostEntryRequestData {
    title: String,
}
async fn post_entry(
    req: HttpRequest,
    body: web::Json<PostEntryRequestData>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let request_data = body.into_inner();
    let entry = db.lock_entry_table()?.append(&request_data.title)?;
    debug!("event=entry_created module=routes id={}", entry.id);
    Ok(HttpResponseBuilder::new(StatusCode::OK).json(represent(&req, entry)?))
}

async fn delete_entries(
    req: HttpRequest,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let entries = {
        let entry_table = db.lock_entry_table()?;
        let deleted = entry_table.delete_all()?;
        debug!("event=entries_cleared module=routes deleted={deleted}");
        entry_table.get_all()?
    };
    let body = represent_all(&req, entries)?;
    Ok(HttpResponseBuilder::new(StatusCode::OK).json(body))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::NotFound("entry not found".to_string()).into()
}

pub fn configure_routes(config: &mut ServiceConfig) {
    config
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::resource("/")
                .name("index")
                .route(web::get().to(get_entries))
                .route(web::post().to(post_entry))
                .route(web::delete().to(delete_entries)),
        )
        .service(
            web::resource("/entries/{id}")
                .name(ENTRY_RESOURCE)
                .route(web::get().to(get_entry)),
        );
}
