use imgdock_core::Config;

// Use mimalloc as the global allocator; image buffers churn through the
// system allocator otherwise.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, routes)
    let (_state, router) = imgdock_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    imgdock_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
