//! The wrapper the scenarios drive: one method per service operation, each
//! returning the decoded `(status, body)` pair untouched.

use std::path::Path;
use std::time::Duration;

use petfriends_core::{
    ApiResponse, AuthKey, Credentials, HttpRequest, PetFields, PetFilter, PetFriendsClient, PetList,
};

use crate::error::SuiteError;
use crate::fixtures::read_photo;
use crate::transport::{Transport, UreqTransport};

pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn connect(base_url: &str, timeout: Option<Duration>) -> Self {
        Self::new(base_url, UreqTransport::new(timeout))
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, SuiteError> {
        let credentials = Credentials::new(email, password);
        self.round_trip(self.client.build_get_api_key(&credentials))
    }

    #[tracing::instrument(skip_all, fields(filter = filter.as_str()))]
    pub fn get_list_of_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> Result<ApiResponse, SuiteError> {
        self.round_trip(self.client.build_list_pets(auth_key, filter))
    }

    /// Reads the photo from `photo_path` and uploads it with the pet.
    #[tracing::instrument(skip_all, fields(photo = %photo_path.display()))]
    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        photo_path: &Path,
    ) -> Result<ApiResponse, SuiteError> {
        let photo = read_photo(photo_path)?;
        let fields = PetFields::new(name, animal_type, age);
        self.round_trip(self.client.build_add_pet(auth_key, &fields, &photo))
    }

    #[tracing::instrument(skip_all)]
    pub fn add_new_pet_simple(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, SuiteError> {
        let fields = PetFields::new(name, animal_type, age);
        self.round_trip(self.client.build_add_pet_simple(auth_key, &fields))
    }

    #[tracing::instrument(skip_all, fields(pet_id = %pet_id))]
    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, SuiteError> {
        let fields = PetFields::new(name, animal_type, age);
        self.round_trip(self.client.build_update_pet(auth_key, pet_id, &fields))
    }

    #[tracing::instrument(skip_all, fields(pet_id = %pet_id))]
    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, SuiteError> {
        self.round_trip(self.client.build_delete_pet(auth_key, pet_id))
    }

    #[tracing::instrument(skip_all, fields(pet_id = %pet_id, photo = %photo_path.display()))]
    pub fn set_photo(&self, auth_key: &AuthKey, pet_id: &str, photo_path: &Path) -> Result<ApiResponse, SuiteError> {
        let photo = read_photo(photo_path)?;
        self.round_trip(self.client.build_set_photo(auth_key, pet_id, &photo))
    }

    /// Log in and return the key, failing on anything but 200.
    pub fn auth_key(&self, credentials: &Credentials) -> Result<AuthKey, SuiteError> {
        let response = self.transport.execute(self.client.build_get_api_key(credentials))?;
        Ok(self.client.parse_api_key(response)?)
    }

    /// Typed listing for setup steps, failing on anything but 200.
    pub fn list_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> Result<PetList, SuiteError> {
        let response = self.transport.execute(self.client.build_list_pets(auth_key, filter))?;
        Ok(self.client.parse_pet_list(response)?)
    }

    fn round_trip(&self, request: HttpRequest) -> Result<ApiResponse, SuiteError> {
        let response = self.client.decode(self.transport.execute(request)?);
        tracing::info!(status = response.status, "service answered");
        Ok(response)
    }
}
