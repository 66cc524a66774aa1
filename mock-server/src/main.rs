use petfriends_mock::Account;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let account = Account::new(
        std::env::var("PF_MOCK_EMAIL").unwrap_or_else(|_| petfriends_mock::DEMO_EMAIL.to_string()),
        std::env::var("PF_MOCK_PASSWORD").unwrap_or_else(|_| petfriends_mock::DEMO_PASSWORD.to_string()),
    );
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, email = %account.email, "fake PetFriends listening");
    petfriends_mock::run_for(listener, account).await
}
