//! HapticLink bridge binary
//!
//! Usage: `hapticlink [config.json]` (defaults to `hapticlink.json` in the
//! working directory). Construction failures are fatal; once the receive
//! loop is up, bad messages are logged and dropped without stopping it.

use std::env;
use std::process;

use log::error;

use hapticlink_osc::{BridgeConfig, OscBridge};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "hapticlink.json".to_string());

    let config = match BridgeConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("{path}: {e}");
            process::exit(1);
        }
    };

    let router = match config.build_router() {
        Ok(router) => router,
        Err(e) => {
            error!("{path}: {e}");
            process::exit(1);
        }
    };

    let mut bridge = match OscBridge::bind(config.listen_addr(), router) {
        Ok(bridge) => bridge,
        Err(e) => {
            error!("cannot bind {}: {e}", config.listen_addr());
            process::exit(1);
        }
    };

    if let Err(e) = bridge.run() {
        error!("receive loop failed: {e}");
        process::exit(1);
    }
}
