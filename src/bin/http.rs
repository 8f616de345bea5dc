#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use cadet_roster::{BuilderConfig, http_api, logging};

    logging::init();

    let addr: SocketAddr = std::env::var("CADET_ROSTER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let config = match std::env::var("CADET_ROSTER_CONFIG") {
        Ok(path) => BuilderConfig::load(&path)?,
        Err(_) => BuilderConfig::default(),
    };

    http_api::serve(addr, config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
