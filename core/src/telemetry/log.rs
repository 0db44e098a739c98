use log::{debug, info, warn};

/// Thin wrapper over the `log` facade tagging records with their origin.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    origin: &'static str,
}

impl LogManager {
    pub fn new(origin: &'static str) -> Self {
        Self { origin }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.origin, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.origin, message);
    }

    pub fn warning(&self, message: &str) {
        warn!("[{}] {}", self.origin, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("roccore")
    }
}
