use std::net::SocketAddr;

use clap::Parser;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB

/// Runtime configuration, read from flags or the environment (after `.env`).
#[derive(Debug, Clone, Parser)]
#[command(name = "runai-check", about = "Running shoe wear assessment powered by Gemini")]
pub struct Config {
    /// Gemini API key. Left empty when unset; every analysis will then fail.
    #[arg(long, env = "GOOGLE_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Upper bound on a request body, covering all images of one analysis.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Emit logs as JSON lines instead of the human-readable format.
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // Reads declared defaults straight from the command, so variables set in
    // the surrounding environment cannot leak in.
    fn default_of(id: &str) -> String {
        let command = Config::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()
            .first()
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_else(|| panic!("no default for {id}"))
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_of("api_key"), "");
        assert_eq!(default_of("model"), DEFAULT_MODEL);
        assert_eq!(default_of("api_base_url"), DEFAULT_API_BASE_URL);
        assert_eq!(default_of("host"), "0.0.0.0");
        assert_eq!(default_of("port"), "3000");
        assert_eq!(default_of("max_upload_bytes"), (10 * 1024 * 1024).to_string());
        assert_eq!(default_of("log_json"), "false");
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "runai-check",
            "--api-key",
            "secret",
            "--model",
            "gemini-2.0-flash",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
        ])
        .unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
