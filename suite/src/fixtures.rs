//! Fixture images and the per-test setup that makes scenarios independent of
//! whatever the account already holds.

use std::path::{Path, PathBuf};

use petfriends_core::{AuthKey, Pet, PetFilter, Photo};

use crate::api::PetFriends;
use crate::error::SuiteError;
use crate::transport::Transport;

pub const CAT_PHOTO: &str = "cat.png";
pub const ONE_PIXEL_PHOTO: &str = "one_pixel.png";
pub const UHD_4K_PHOTO: &str = "uhd_4k.png";

/// Resolves fixture image names against one directory.
#[derive(Debug, Clone)]
pub struct Fixtures {
    dir: PathBuf,
}

impl Fixtures {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn cat(&self) -> PathBuf {
        self.path(CAT_PHOTO)
    }

    pub fn one_pixel(&self) -> PathBuf {
        self.path(ONE_PIXEL_PHOTO)
    }

    pub fn uhd_4k(&self) -> PathBuf {
        self.path(UHD_4K_PHOTO)
    }
}

/// Load an image from disk as an upload payload.
pub fn read_photo(path: &Path) -> Result<Photo, SuiteError> {
    let bytes = std::fs::read(path).map_err(|source| SuiteError::Fixture {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(Photo::new(file_name, bytes))
}

/// Newest pet owned by the account, or a precondition failure.
pub fn first_own_pet<T: Transport>(pf: &PetFriends<T>, auth_key: &AuthKey) -> Result<Pet, SuiteError> {
    pf.list_pets(auth_key, PetFilter::MyPets)?
        .pets
        .into_iter()
        .next()
        .ok_or_else(|| SuiteError::Precondition("there are no pets owned by this account".to_string()))
}

/// Like [`first_own_pet`], but adds a pet first when the account has none.
pub fn ensure_own_pet<T: Transport>(
    pf: &PetFriends<T>,
    auth_key: &AuthKey,
    photo: &Path,
) -> Result<Pet, SuiteError> {
    let mine = pf.list_pets(auth_key, PetFilter::MyPets)?;
    if let Some(pet) = mine.pets.into_iter().next() {
        return Ok(pet);
    }
    tracing::info!("account has no pets, adding one");
    pf.add_new_pet(auth_key, "Суперкот", "кот", "3", photo)?;
    first_own_pet(pf, auth_key)
}
