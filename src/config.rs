use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
pub const UPLOAD_DELAY: Duration = Duration::from_millis(2000);
pub const SAVE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub upload_delay: Duration,
    pub save_delay: Duration,
    pub max_upload_bytes: u64,
    pub seed_samples: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8081,
            upload_delay: UPLOAD_DELAY,
            save_delay: SAVE_DELAY,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            seed_samples: true,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

impl StudioConfig {
    /// Reads `BIND_ADDR`, `PORT`, `UPLOAD_DELAY_MS`, `SAVE_DELAY_MS`,
    /// `MAX_UPLOAD_BYTES` and `SEED_SAMPLE_VIDEOS`; anything unset keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            bind: parse_var(&lookup, "BIND_ADDR").unwrap_or(d.bind),
            port: parse_var(&lookup, "PORT").unwrap_or(d.port),
            upload_delay: parse_var(&lookup, "UPLOAD_DELAY_MS").map(Duration::from_millis).unwrap_or(d.upload_delay),
            save_delay: parse_var(&lookup, "SAVE_DELAY_MS").map(Duration::from_millis).unwrap_or(d.save_delay),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES").unwrap_or(d.max_upload_bytes),
            seed_samples: parse_var(&lookup, "SEED_SAMPLE_VIDEOS").unwrap_or(d.seed_samples),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Request body cap: comfortably above the upload ceiling so oversized files
    /// still reach validation and get a proper notice.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_upload_bytes.saturating_mul(2)).unwrap_or(usize::MAX)
    }
}
