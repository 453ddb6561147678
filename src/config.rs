use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8123";
pub const TRANSCRIBE_PATH: &str = "/transcribeAudioUrl";
pub const SPEECH_PATH: &str = "/textToSpeechUrl";

/// Files tried, in order, after `CONFIG_PATH`.
const CONFIG_CANDIDATES: &[&str] = &["agent-bridge.yaml", "agent-bridge.json", "conf.yaml"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the agent route; the info route lives at `{endpoint}/info`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub base_url: String,
    #[serde(default = "default_transcribe_path")]
    pub transcribe_path: String,
    #[serde(default = "default_speech_path")]
    pub speech_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    /// Falls back to `upstream.base_url` when unset.
    #[serde(default)]
    pub deployment_url: Option<String>,
    pub graph_id: String,
    #[serde(default)]
    pub langsmith_api_key: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_endpoint() -> String {
    "/api/copilotkit".to_string()
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_transcribe_path() -> String {
    TRANSCRIBE_PATH.to_string()
}

fn default_speech_path() -> String {
    SPEECH_PATH.to_string()
}

fn default_agents() -> Vec<AgentConfig> {
    vec![AgentConfig {
        name: "sample_agent".to_string(),
        deployment_url: None,
        graph_id: "sample_agent".to_string(),
        langsmith_api_key: String::new(),
        description: None,
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            agents: default_agents(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            transcribe_path: default_transcribe_path(),
            speech_path: default_speech_path(),
        }
    }
}

impl Config {
    /// Load a YAML or JSON file, substituting `${VAR}` from the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let content = substitute_env(&raw, |name| std::env::var(name).ok());

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config: Self = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?
        };
        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject settings the router cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if !self.server.endpoint.starts_with('/') {
            anyhow::bail!(
                "server.endpoint must start with '/', got {:?}",
                self.server.endpoint
            );
        }
        Ok(())
    }

    /// Load the first config file found, or the defaults when there is none,
    /// then apply environment overrides.
    pub fn discover() -> Result<Self> {
        let explicit = std::env::var("CONFIG_PATH").ok();

        let mut config = match explicit {
            // An explicit path must load.
            Some(path) => {
                let config = Self::load(&path)?;
                info!("Loaded configuration from: {}", path);
                config
            }
            None => match CONFIG_CANDIDATES.iter().find(|p| Path::new(p).exists()) {
                Some(path) => {
                    let config = Self::load(path)?;
                    info!("Loaded configuration from: {}", path);
                    config
                }
                None => {
                    info!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// `LANGGRAPH_API_URL`, `LANGSMITH_API_KEY` and `PORT` take precedence over the file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LANGGRAPH_API_URL").filter(|v| !v.is_empty()) {
            debug!("Upstream base URL overridden by environment: {}", url);
            self.upstream.base_url = url;
        }

        if let Some(key) = lookup("LANGSMITH_API_KEY").filter(|v| !v.is_empty()) {
            for agent in self.agents.iter_mut() {
                if agent.langsmith_api_key.is_empty() {
                    agent.langsmith_api_key = key.clone();
                }
            }
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }
    }
}

impl AgentConfig {
    pub fn deployment_url<'a>(&'a self, upstream: &'a UpstreamConfig) -> &'a str {
        self.deployment_url.as_deref().unwrap_or(&upstream.base_url)
    }
}

/// Replace `${VAR}` placeholders; unknown variables are left untouched.
pub fn substitute_env(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static placeholder pattern");
    pattern
        .replace_all(content, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_local_upstream() {
        let config = Config::default();
        assert_eq!(config.upstream.base_url, "http://localhost:8123");
        assert_eq!(config.upstream.transcribe_path, "/transcribeAudioUrl");
        assert_eq!(config.upstream.speech_path, "/textToSpeechUrl");
        assert_eq!(config.server.endpoint, "/api/copilotkit");
        assert_eq!(config.agents.len(), 1);
        assert_eq!(config.agents[0].name, "sample_agent");
        assert_eq!(
            config.agents[0].deployment_url(&config.upstream),
            "http://localhost:8123"
        );
    }

    #[test]
    fn substitutes_known_variables_only() {
        let out = substitute_env(
            "key: ${API_KEY}\nother: ${MISSING}",
            env(&[("API_KEY", "secret")]),
        );
        assert_eq!(out, "key: secret\nother: ${MISSING}");
    }

    #[test]
    fn loads_partial_yaml_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "upstream:\n  base_url: http://agents:9000\nagents:\n  - name: planner\n    graph_id: plan_graph"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.base_url, "http://agents:9000");
        assert_eq!(config.upstream.speech_path, "/textToSpeechUrl");
        assert_eq!(config.agents[0].graph_id, "plan_graph");
        assert_eq!(
            config.agents[0].deployment_url(&config.upstream),
            "http://agents:9000"
        );
    }

    #[test]
    fn loads_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"server": {{"port": 8080}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.agents[0].name, "sample_agent");
    }

    #[test]
    fn rejects_malformed_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn rejects_endpoint_without_leading_slash() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  endpoint: api/copilotkit").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("server.endpoint"));

        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.server.endpoint = "api/copilotkit".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_fill_gaps() {
        let mut config = Config::default();
        config.agents.push(AgentConfig {
            name: "keyed".into(),
            deployment_url: Some("http://elsewhere".into()),
            graph_id: "keyed".into(),
            langsmith_api_key: "own-key".into(),
            description: None,
        });

        config.apply_env_overrides(env(&[
            ("LANGGRAPH_API_URL", "http://remote:8123"),
            ("LANGSMITH_API_KEY", "ls-key"),
            ("PORT", "4000"),
        ]));

        assert_eq!(config.upstream.base_url, "http://remote:8123");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.agents[0].langsmith_api_key, "ls-key");
        assert_eq!(config.agents[1].langsmith_api_key, "own-key");
        assert_eq!(config.agents[1].deployment_url(&config.upstream), "http://elsewhere");
    }
}
