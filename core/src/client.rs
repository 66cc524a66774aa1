//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a parse step that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.
//!
//! Two parse flavours exist. `decode` never fails and yields the raw
//! `(status, body)` pair, which is what black-box tests assert on. The
//! typed `parse_*` methods check for 200 and deserialize, for callers that
//! need the data to carry on (setup steps, fixtures).

use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse, ResponseBody};
use crate::multipart::MultipartForm;
use crate::types::{AuthKey, Credentials, Pet, PetFields, PetFilter, PetList, Photo};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Name of the multipart part carrying the image.
pub const PHOTO_FIELD: &str = "pet_photo";

/// Synchronous, stateless client for the PetFriends API.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/key` with the credentials as headers.
    pub fn build_get_api_key(&self, credentials: &Credentials) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ],
            body: None,
        }
    }

    pub fn build_list_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("filter", filter.as_str())
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/pets?{query}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    /// `POST /api/pets` as multipart: the three text fields plus the photo.
    pub fn build_add_pet(&self, auth_key: &AuthKey, fields: &PetFields, photo: &Photo) -> HttpRequest {
        let form = fields
            .as_pairs()
            .iter()
            .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value))
            .file(PHOTO_FIELD, photo);
        self.multipart_request(format!("{}/api/pets", self.base_url), auth_key, form)
    }

    /// `POST /api/create_pet_simple` as an urlencoded form, no photo.
    pub fn build_add_pet_simple(&self, auth_key: &AuthKey, fields: &PetFields) -> HttpRequest {
        self.form_request(
            HttpMethod::Post,
            format!("{}/api/create_pet_simple", self.base_url),
            auth_key,
            fields,
        )
    }

    pub fn build_update_pet(&self, auth_key: &AuthKey, pet_id: &str, fields: &PetFields) -> HttpRequest {
        self.form_request(HttpMethod::Put, self.pet_url(pet_id), auth_key, fields)
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.pet_url(pet_id),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn build_set_photo(&self, auth_key: &AuthKey, pet_id: &str, photo: &Photo) -> HttpRequest {
        let form = MultipartForm::new().file(PHOTO_FIELD, photo);
        let url = format!("{}/api/pets/set_photo/{}", self.base_url, path_segment(pet_id));
        self.multipart_request(url, auth_key, form)
    }

    /// Decode any response into its `(status, body)` pair without judging
    /// the status.
    pub fn decode(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::decode(&response.body),
        }
    }

    pub fn parse_api_key(&self, response: HttpResponse) -> Result<AuthKey, ApiError> {
        #[derive(serde::Deserialize)]
        struct KeyBody {
            key: AuthKey,
        }
        check_status(&response, 200)?;
        let body: KeyBody = deserialize(&response.body)?;
        Ok(body.key)
    }

    pub fn parse_pet_list(&self, response: HttpResponse) -> Result<PetList, ApiError> {
        check_status(&response, 200)?;
        deserialize(&response.body)
    }

    /// Parse the record returned by add, add-simple, update and set-photo.
    pub fn parse_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response, 200)?;
        deserialize(&response.body)
    }

    pub fn parse_delete_pet(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    fn pet_url(&self, pet_id: &str) -> String {
        format!("{}/api/pets/{}", self.base_url, path_segment(pet_id))
    }

    fn form_request(
        &self,
        method: HttpMethod,
        url: String,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> HttpRequest {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields.as_pairs())
            .finish();
        HttpRequest {
            method,
            url,
            headers: vec![
                auth_header(auth_key),
                ("content-type".to_string(), FORM_URLENCODED.to_string()),
            ],
            body: Some(body.into_bytes()),
        }
    }

    fn multipart_request(&self, url: String, auth_key: &AuthKey, form: MultipartForm) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![
                auth_header(auth_key),
                ("content-type".to_string(), form.content_type()),
            ],
            body: Some(form.finish()),
        }
    }
}

fn auth_header(auth_key: &AuthKey) -> (String, String) {
    ("auth_key".to_string(), auth_key.as_str().to_string())
}

/// Percent-encode an id for use as a single path segment.
fn path_segment(id: &str) -> String {
    form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn deserialize<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 403 {
        return Err(ApiError::Forbidden {
            body: response.body.clone(),
        });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
