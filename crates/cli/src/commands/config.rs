use fleetdesk_core::config::{AppConfig, LoadOptions};

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    match serde_json::to_value(&config) {
        Ok(value) => CommandResult::success_with_data("config", "effective configuration", value),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 1),
    }
}
