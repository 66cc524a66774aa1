//! In-memory fake of the PetFriends REST service.
//!
//! Reproduces the observable contract the suite asserts on, quirks
//! included: no content validation on pet fields, `age` is free text, and a
//! photo upload against an unknown pet id fails with 500 rather than 400.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "petlover@example.com";
pub const DEMO_PASSWORD: &str = "petfriends";

/// Uploads above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PetListing {
    pub pets: Vec<Pet>,
}

/// Text fields of create and update forms. Absent fields leave the stored
/// value alone on update and default to empty on create.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

/// The login the fake accepts.
#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD)
    }
}

#[derive(Debug)]
struct User {
    id: String,
    email: String,
    password: String,
    key: String,
}

impl User {
    fn new(email: &str, password: &str) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            key: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Service state. `pets` is kept in insertion order and listed newest first.
#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
    pets: Vec<Pet>,
}

impl Store {
    /// One login account plus a second, inaccessible account that owns a
    /// pet, so the global catalogue is never empty.
    pub fn seeded(account: &Account) -> Self {
        let shelter = User::new("shelter@petfriends.local", &Uuid::new_v4().to_string());
        let stray = Pet::new(
            &shelter.id,
            PetForm {
                name: Some("Шарик".to_string()),
                animal_type: Some("дворняга".to_string()),
                age: Some("2".to_string()),
            },
            String::new(),
        );
        Self {
            users: vec![User::new(&account.email, &account.password), shelter],
            pets: vec![stray],
        }
    }

    fn user_for_key(&self, headers: &HeaderMap) -> Result<&User, MockError> {
        let key = header_text(headers, "auth_key").ok_or(MockError::Unauthorized)?;
        self.users
            .iter()
            .find(|user| user.key == key)
            .ok_or(MockError::Unauthorized)
    }

    fn own_pet_mut(&mut self, user_id: &str, pet_id: &str) -> Option<&mut Pet> {
        self.pets
            .iter_mut()
            .find(|pet| pet.id == pet_id && pet.user_id == user_id)
    }
}

impl Pet {
    fn new(user_id: &str, form: PetForm, pet_photo: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: form.name.unwrap_or_default(),
            animal_type: form.animal_type.unwrap_or_default(),
            age: form.age.unwrap_or_default(),
            pet_photo,
            user_id: user_id.to_string(),
            created_at: timestamp(),
        }
    }

    fn apply(&mut self, form: PetForm) {
        if let Some(name) = form.name {
            self.name = name;
        }
        if let Some(animal_type) = form.animal_type {
            self.animal_type = animal_type;
        }
        if let Some(age) = form.age {
            self.age = age;
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Errors a handler can answer with. Messages match the real service's
/// response texts where they are known.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("This user wasn't found in database")]
    UnknownUser,
    #[error("Please provide 'auth_key' Header")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal Server Error")]
    Internal,
    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = match &self {
            MockError::UnknownUser | MockError::Unauthorized => StatusCode::FORBIDDEN,
            MockError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MockError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            MockError::Multipart(err) => err.status(),
        };
        tracing::warn!(%status, error = %self, "request rejected");
        (status, self.to_string()).into_response()
    }
}

pub fn app() -> Router {
    app_for(Account::default())
}

pub fn app_for(account: Account) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded(&account)));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_for(listener, Account::default()).await
}

pub async fn run_for(listener: TcpListener, account: Account) -> Result<(), std::io::Error> {
    axum::serve(listener, app_for(account)).await
}

#[derive(Serialize)]
struct KeyBody {
    key: String,
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<KeyBody>, MockError> {
    let email = header_text(&headers, "email").unwrap_or_default();
    let password = header_text(&headers, "password").unwrap_or_default();
    let store = db.read().await;
    let user = store
        .users
        .iter()
        .find(|user| user.email == email && user.password == password)
        .ok_or(MockError::UnknownUser)?;
    tracing::info!(email = %user.email, "issued auth key");
    Ok(Json(KeyBody {
        key: user.key.clone(),
    }))
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetListing>, MockError> {
    let store = db.read().await;
    let user = store.user_for_key(&headers)?;
    let pets = match query.filter.as_str() {
        "" => store.pets.iter().rev().cloned().collect(),
        "my_pets" => store
            .pets
            .iter()
            .rev()
            .filter(|pet| pet.user_id == user.id)
            .cloned()
            .collect(),
        _ => return Err(MockError::BadRequest("Filter value is incorrect".to_string())),
    };
    Ok(Json(PetListing { pets }))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Pet>, MockError> {
    let user_id = authorize(&db, &headers).await?;
    let upload = read_upload(&mut multipart).await?;
    let pet = Pet::new(&user_id, upload.form, upload.photo.unwrap_or_default());
    insert(&db, pet).await
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, MockError> {
    let user_id = authorize(&db, &headers).await?;
    insert(&db, Pet::new(&user_id, form, String::new())).await
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, MockError> {
    let user_id = authorize(&db, &headers).await?;
    let mut store = db.write().await;
    let pet = store
        .own_pet_mut(&user_id, &pet_id)
        .ok_or_else(|| MockError::BadRequest("Pet with this id wasn't found".to_string()))?;
    pet.apply(form);
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
) -> Result<StatusCode, MockError> {
    let user_id = authorize(&db, &headers).await?;
    let mut store = db.write().await;
    let before = store.pets.len();
    store
        .pets
        .retain(|pet| !(pet.id == pet_id && pet.user_id == user_id));
    if store.pets.len() < before {
        tracing::info!(%pet_id, "deleted pet");
    }
    // The real service answers 200 whether or not anything was removed.
    Ok(StatusCode::OK)
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Pet>, MockError> {
    let user_id = authorize(&db, &headers).await?;
    let photo = read_upload(&mut multipart)
        .await?
        .photo
        .ok_or_else(|| MockError::BadRequest("pet_photo is required".to_string()))?;
    let mut store = db.write().await;
    // Unknown ids surface as a server error, not a 400.
    let pet = store.own_pet_mut(&user_id, &pet_id).ok_or(MockError::Internal)?;
    pet.pet_photo = photo;
    Ok(Json(pet.clone()))
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Result<String, MockError> {
    let store = db.read().await;
    Ok(store.user_for_key(headers)?.id.clone())
}

async fn insert(db: &Db, pet: Pet) -> Result<Json<Pet>, MockError> {
    tracing::info!(id = %pet.id, name = %pet.name, "created pet");
    db.write().await.pets.push(pet.clone());
    Ok(Json(pet))
}

#[derive(Debug, Default)]
struct Upload {
    form: PetForm,
    photo: Option<String>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, MockError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => upload.form.name = Some(field.text().await?),
            "animal_type" => upload.form.animal_type = Some(field.text().await?),
            "age" => upload.form.age = Some(field.text().await?),
            "pet_photo" => {
                let content_type = field.content_type().unwrap_or("image/jpeg").to_string();
                let bytes = field.bytes().await?;
                upload.photo = Some(data_uri(&content_type, &bytes));
            }
            _ => {}
        }
    }
    Ok(upload)
}

/// Photos are echoed back inline, the way the real service returns them.
pub fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

fn timestamp() -> String {
    let now = chrono::Utc::now();
    format!("{}.{:03}", now.timestamp(), now.timestamp_subsec_millis())
}
