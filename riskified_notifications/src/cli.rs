use std::env::{self, VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// Printed by `--help` and friends. `RISKIFIED_AUTH_TOKEN` is left out.
const PUBLIC_ENVS: [&str; 11] = [
    "RUST_LOG",
    "RISKIFIED_ENVIRONMENT",
    "RISKIFIED_SHOP_DOMAIN",
    "RISKIFIED_NOTIFICATIONS_HOST",
    "RISKIFIED_NOTIFICATIONS_PORT",
    "RISKIFIED_NOTIFICATIONS_PATH",
    "RISKIFIED_NOTIFICATIONS_WORKERS",
    "RISKIFIED_NOTIFICATIONS_SHUTDOWN_TIMEOUT",
    "RISKIFIED_NOTIFICATIONS_WEBHOOK_URL",
    "RISKIFIED_REGISTER_WEBHOOK",
    "RISKIFIED_UNREGISTER_WEBHOOK",
];

/// The receiver takes no arguments. If any are given, print the help and the public configuration, and return `true`
/// so that `main` exits instead of starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Current environment values (the auth token is never shown):");
    for name in PUBLIC_ENVS {
        println!("  {name:<42} {}", describe(env::var(name)));
    }
    true
}

fn describe(value: Result<String, VarError>) -> String {
    match value {
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
