//! Where a scenario's requests go: the configured live service, or a fresh
//! fake started just for that scenario.

use std::net::SocketAddr;
use std::path::Path;

use petfriends_core::{AuthKey, Credentials};
use petfriends_mock::Account;

use crate::api::PetFriends;
use crate::config::Config;
use crate::error::SuiteError;
use crate::fixtures::Fixtures;
use crate::logging::init_logging;

pub struct Session {
    pub api: PetFriends,
    pub credentials: Credentials,
    pub fixtures: Fixtures,
    base_url: String,
    fake: bool,
}

impl Session {
    /// Load configuration from the environment and start a session with
    /// fixtures resolved under `root` (normally the suite crate directory).
    pub fn from_env(root: &Path) -> Result<Self, SuiteError> {
        Self::start(&Config::load()?, root)
    }

    pub fn start(config: &Config, root: &Path) -> Result<Self, SuiteError> {
        init_logging(&config.logging.level);

        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => {
                let addr = spawn_fake(Account::new(&config.email, &config.password))?;
                format!("http://{addr}")
            }
        };
        tracing::info!(%base_url, "session started");

        Ok(Self {
            api: PetFriends::connect(&base_url, config.timeout()),
            credentials: config.credentials(),
            fixtures: Fixtures::new(config.images_dir_in(root)),
            base_url,
            fake: config.base_url.is_none(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when requests go to a fake started for this session only.
    pub fn uses_fake(&self) -> bool {
        self.fake
    }

    /// Fresh auth key for the configured account.
    pub fn auth_key(&self) -> Result<AuthKey, SuiteError> {
        self.api.auth_key(&self.credentials)
    }
}

/// Start the fake service on a random local port, on its own thread and
/// runtime. The server lives until the process exits.
pub fn spawn_fake(account: Account) -> Result<SocketAddr, SuiteError> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").map_err(SuiteError::Mock)?;
    let addr = std_listener.local_addr().map_err(SuiteError::Mock)?;
    std_listener.set_nonblocking(true).map_err(SuiteError::Mock)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SuiteError::Mock)?;

    std::thread::spawn(move || {
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener)?;
            petfriends_mock::run_for(listener, account).await
        });
        if let Err(err) = served {
            tracing::error!(%err, "fake service stopped");
        }
    });

    tracing::debug!(%addr, "fake service listening");
    Ok(addr)
}
