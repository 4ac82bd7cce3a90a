use std::env;
use std::str::FromStr;

/// Which host connection the sidecar binds at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Local desktop session (mouse playback, platform accessibility API)
    Desktop,
    /// In-memory host that completes every gesture after its duration
    Simulated,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desktop" | "native" => Ok(Backend::Desktop),
            "simulated" | "sim" | "mock" => Ok(Backend::Simulated),
            other => Err(format!("unknown backend {:?}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub backend: Backend,
    /// Whether dispatch/inject refuse to run while control is disabled
    pub control_gate: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            backend: env::var("A11Y_BACKEND")
                .ok()
                .and_then(|b| match b.parse::<Backend>() {
                    Ok(backend) => Some(backend),
                    Err(e) => {
                        tracing::warn!("A11Y_BACKEND: {}, using {:?}", e, defaults.backend);
                        None
                    }
                })
                .unwrap_or(defaults.backend),
            control_gate: env::var("A11Y_CONTROL_GATE")
                .ok()
                .and_then(|g| parse_switch(&g))
                .unwrap_or(defaults.control_gate),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8766,
            host: "127.0.0.1".to_string(),
            backend: Backend::Desktop,
            control_gate: true,
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
