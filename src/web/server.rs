use axum::{
    http::{header, Method},
    Router,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::web::api::{create_router, AppState};

/// Configuration for the web server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: String,
    pub enable_cors: bool,
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3005,
            static_dir: "web".to_string(),
            enable_cors: true,
            max_sessions: 1000,
        }
    }
}

impl ServerConfig {
    /// Defaults, overridden by `MSSSP_*` environment variables, then by positional
    /// arguments `[port] [static_dir]`
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env_and_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        config.apply_vars(|key| std::env::var(key).ok());

        let mut args = args.into_iter();
        if let Some(port) = args.next() {
            parse_into(&mut config.port, "port argument", &port);
        }
        if let Some(dir) = args.next() {
            config.static_dir = dir;
        }
        config
    }

    /// Applies `MSSSP_HOST`, `MSSSP_PORT`, `MSSSP_STATIC_DIR`, `MSSSP_CORS` and
    /// `MSSSP_MAX_SESSIONS` from `lookup`
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("MSSSP_HOST") {
            parse_into(&mut self.host, "MSSSP_HOST", &host);
        }
        if let Some(port) = lookup("MSSSP_PORT") {
            parse_into(&mut self.port, "MSSSP_PORT", &port);
        }
        if let Some(dir) = lookup("MSSSP_STATIC_DIR") {
            self.static_dir = dir;
        }
        if let Some(cors) = lookup("MSSSP_CORS") {
            parse_into(&mut self.enable_cors, "MSSSP_CORS", &cors);
        }
        if let Some(max) = lookup("MSSSP_MAX_SESSIONS") {
            parse_into(&mut self.max_sessions, "MSSSP_MAX_SESSIONS", &max);
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_into<T: std::str::FromStr>(slot: &mut T, name: &str, raw: &str) {
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => log::warn!("ignoring invalid {}: {:?}", name, raw),
    }
}

/// Build the application router for a configuration
pub fn build_app(config: &ServerConfig) -> Router {
    let app_state = AppState::new(config.max_sessions);

    let mut app = Router::new()
        // API routes
        .merge(create_router())
        // Static files for a front end that draws the graph
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(app_state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        app = app.layer(ServiceBuilder::new().layer(cors).into_inner());
    }

    app
}

/// Start the web server with the given configuration
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(&config);
    let addr = config.addr();

    log::info!("matrix_sssp web server listening on http://{}", addr);
    log::info!("serving static files from {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn vars_override_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MSSSP_PORT", "8080"),
            ("MSSSP_CORS", "false"),
            ("MSSSP_MAX_SESSIONS", "not-a-number"),
            ("MSSSP_HOST", "0.0.0.0"),
        ]);

        let mut config = ServerConfig::default();
        config.apply_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert!(!config.enable_cors);
        assert_eq!(config.max_sessions, 1000);
        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
    }
}
