use anyhow::Context;
use pain_index::LeaderboardConfig;
use std::net::SocketAddr;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub leaderboard: LeaderboardConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = std::env::var("PAIN_INDEX_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("Invalid PAIN_INDEX_LISTEN_ADDR")?;
        let cors_allow = std::env::var("PAIN_INDEX_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(Self {
            listen_addr,
            cors_allow,
            leaderboard: LeaderboardConfig::from_env(),
        })
    }
}
