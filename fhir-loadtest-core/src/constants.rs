use std::time::Duration;

/// Per-request timeout applied to every dispatched request unless the config overrides it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on connections opened by one session, across all hosts.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1000;

/// Upper bound on connections opened by one session to a single host.
pub const DEFAULT_MAX_CONNECTIONS_PER_HOST: usize = 100;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "load-test-config.json";

/// The only status code counted as a success.
pub const SUCCESS_STATUS: u16 = 200;

/// Status code recorded when no HTTP response was received at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;
