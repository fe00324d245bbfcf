/*
 * Responsibility
 * - Tracing / panic hook setup
 * - ClientConfig from env -> cache backend -> ServiceClient
 * - Start the token refresh loop and probe the health endpoint of every external service
 */
use std::{panic, sync::Arc};

use anyhow::{Result, bail};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_request::dto::responses::HealthCheckBody;
use service_request::routes::GetRequest;
use service_request::services::cache::{CacheClient, MemoryCache, ValkeyClient};
use service_request::{ClientConfig, RequestOptions, ResponseBody, Service, ServiceClient};

fn init_tracing() {
    // RUST_LOG wins; otherwise info for everything
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr may be hidden depending on how the process is launched
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

async fn build_cache(config: &ClientConfig) -> Arc<dyn CacheClient> {
    let connected = match &config.cache_url {
        Some(url) => ValkeyClient::new(url).await,
        None => ValkeyClient::for_service(&config.default_host, 6379, config.self_service).await,
    };
    match connected {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "cache backend unavailable, using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    }
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = ClientConfig::from_env()?;
    info!(
        service = %config.self_service,
        externals = ?config.external_services,
        "starting service probe"
    );

    let cache = build_cache(&config).await;
    let client = ServiceClient::new(config.clone(), cache)?;
    let _refresh = client.spawn_token_refresh_task(None);

    let mut unhealthy = Vec::new();
    for service in config.external_services.iter().copied() {
        if !probe(&client, service).await {
            unhealthy.push(service);
        }
    }

    if !unhealthy.is_empty() {
        bail!("unhealthy services: {:?}", unhealthy);
    }
    info!("all external services are healthy");
    Ok(())
}

async fn probe(client: &ServiceClient, service: Service) -> bool {
    let request = GetRequest::<HealthCheckBody>::new(service, "health");
    let options = RequestOptions::new().use_cache(false);
    match client.get(request, options).await {
        Ok(response) => match response.body {
            ResponseBody::Success(body) if body.status == "ok" => {
                info!(service = %service, "healthy");
                true
            }
            ResponseBody::Success(body) => {
                warn!(service = %service, status = %body.status, error = ?body.error, "degraded");
                false
            }
            _ => {
                warn!(service = %service, status = response.status_code, "health check failed");
                false
            }
        },
        Err(e) => {
            error!(service = %service, error = %e, "health check failed");
            false
        }
    }
}
