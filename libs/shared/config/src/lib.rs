use std::env;
use std::net::SocketAddr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub sweep_interval_seconds: u64,
    pub pending_grace_seconds: i64,
    pub slot_lock_wait_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(addr) => Some(addr),
                    Err(_) => {
                        warn!("BIND_ADDR is not a valid socket address, using default");
                        None
                    }
                })
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000))),
            sweep_interval_seconds: parse_var("SWEEP_INTERVAL_SECONDS", 60),
            pending_grace_seconds: parse_var("PENDING_GRACE_SECONDS", 120),
            slot_lock_wait_seconds: parse_var("SLOT_LOCK_WAIT_SECONDS", 5),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            sweep_interval_seconds: 60,
            pending_grace_seconds: 120,
            slot_lock_wait_seconds: 5,
        }
    }
}

fn parse_var<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("{} is not a valid number, using default {}", name, default);
                default
            }
        },
        Err(_) => default,
    }
}
