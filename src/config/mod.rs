// Configuration module entry point
// Builds the immutable server configuration once at startup

mod state;
mod types;

use std::net::SocketAddr;

use ::config::ConfigError;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

/// Port used when no positional argument is given
pub const DEFAULT_PORT: u16 = 8000;

impl Config {
    /// Build the configuration from defaults and the optional `[port]` argument.
    ///
    /// A present argument always wins over the default; an argument that is not
    /// a valid TCP port is an error rather than a silent fallback.
    pub fn load(port_arg: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("logging.access_log", true)?
            .set_default("http.server_name", default_server_name())?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?;

        if let Some(arg) = port_arg {
            builder = builder.set_override("server.port", i64::from(parse_port(arg)?))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse the positional port argument (1-65535)
pub fn parse_port(arg: &str) -> Result<u16, ConfigError> {
    match arg.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::Message(format!(
            "Invalid port '{arg}': expected an integer between 1 and 65535"
        ))),
    }
}

fn default_server_name() -> String {
    format!("unityweb-server/{}", env!("CARGO_PKG_VERSION"))
}
