use tracing::{error, info};
use whatsapp_courier::config::Config;
use whatsapp_courier::server;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    info!("Starting WhatsApp AI Bot on port {}", config.port);

    if let Err(e) = server::run(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}
