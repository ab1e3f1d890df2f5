//! Request admission guard: size cap and per-client rate limiting.
//!
//! Every request passes through the guard before any dispatch or bridge
//! invocation. Rate state is owned by the guard instance and uses a fixed
//! window per client, anchored at the first accepted request and expired
//! lazily on the next lookup. There are no per-request timers.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::transport::JsonRpcRequest;
use crate::config::MembankConfig;

/// Bucket shared by all requests that carry no `clientId`.
pub const DEFAULT_CLIENT_ID: &str = "default";

/// Per-client rate window state.
struct WindowState {
    opened_at: Instant,
    count: u32,
}

/// Validates and rate-limits inbound requests before dispatch.
pub struct AdmissionGuard {
    max_request_bytes: usize,
    max_requests: u32,
    window: Duration,
    counters: HashMap<String, WindowState>,
}

impl AdmissionGuard {
    /// Creates a guard with explicit limits.
    pub fn new(max_request_bytes: usize, max_requests: u32, window: Duration) -> Self {
        Self {
            max_request_bytes,
            max_requests,
            window,
            counters: HashMap::new(),
        }
    }

    /// Creates a guard from the server configuration.
    pub fn from_config(config: &MembankConfig) -> Self {
        Self::new(
            config.max_request_bytes,
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        )
    }

    /// Returns `true` if the request passes the size cap and the client's
    /// rate window; an accepted request is counted against the window.
    pub fn admit(&mut self, request: &JsonRpcRequest) -> bool {
        self.admit_at(request, Instant::now())
    }

    fn admit_at(&mut self, request: &JsonRpcRequest, now: Instant) -> bool {
        let size = serde_json::to_string(request)
            .map(|s| s.len())
            .unwrap_or(usize::MAX);
        if size > self.max_request_bytes {
            return false;
        }

        let client_id = request.client_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID);

        match self.counters.entry(client_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let state = entry.get_mut();
                if now.duration_since(state.opened_at) < self.window {
                    // Count is checked before increment: the first rejection
                    // happens on request max_requests + 2 within one window.
                    if state.count > self.max_requests {
                        return false;
                    }
                    state.count += 1;
                } else {
                    // The previous window expired; start a fresh one.
                    *state = WindowState {
                        opened_at: now,
                        count: 1,
                    };
                }
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(WindowState {
                    opened_at: now,
                    count: 1,
                });
                true
            }
        }
    }
}
