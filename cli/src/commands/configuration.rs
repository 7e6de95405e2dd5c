use std::process::exit;

use tracker::config::{self, ApiType, AppConfiguration};

use crate::cli::{ConfigCommand, UpdateConfiguration};

fn configuration_file_name() -> String {
    config::configuration_file().map_or_else(|e| format!("<{e}>"), |p| p.to_string_lossy().to_string())
}

fn list_and_exit() {
    println!("Configuration file {}:\n", configuration_file_name());

    match config::load().and_then(|cfg| config::application_config_to_string(&cfg)) {
        Ok(toml_as_string) => {
            println!("{toml_as_string}");
        }
        Err(_) => {
            println!("Config file does not exist or is empty. Use 'jira-tracker config update' to create it");
        }
    }
    exit(0);
}

fn apply(update: UpdateConfiguration, app_config: &mut AppConfiguration) {
    if let Some(user) = update.user {
        app_config.jira.user = user;
    }
    if let Some(token) = update.token {
        app_config.jira.token = token;
    }
    if let Some(url) = update.url {
        app_config.jira.url = url;
    }
    if let Some(soap) = update.soap {
        app_config.jira.api = if soap { ApiType::Soap } else { ApiType::Rest };
    }
    if let Some(timeout) = update.timeout {
        app_config.jira.timeout_secs = Some(timeout);
    }
    if let Some(project) = update.project {
        app_config.issues.project = Some(project);
    }
    if let Some(closed_state) = update.closed_state {
        app_config.issues.closed_state = closed_state;
    }
    if let Some(custom_jql) = update.custom_jql {
        app_config.issues.custom_jql = Some(custom_jql).filter(|q| !q.trim().is_empty());
    }
    if let Some(query) = update.custom_mapping_query {
        app_config.issues.custom_mapping_query = Some(query).filter(|q| !q.trim().is_empty());
    }
}

pub fn execute(cmd: ConfigCommand) {
    match cmd {
        // List current configuration
        ConfigCommand::List => {
            list_and_exit();
        }
        // Add new values to the configuration
        ConfigCommand::Update(update) => {
            let mut app_config = match config::load_or_create() {
                Ok(ac) => ac,
                Err(e) => {
                    eprintln!(
                        "ERROR: Unable to load or create configuration file {}, reason:{}",
                        configuration_file_name(),
                        e
                    );
                    exit(4);
                }
            };
            apply(update, &mut app_config);
            if let Err(e) = app_config.validate() {
                eprintln!("WARNING: the configuration is not complete yet: {e}");
            }
            match config::save(&app_config) {
                Ok(path) => {
                    println!("Configuration saved to {}", path.to_string_lossy());
                    exit(0);
                }
                Err(e) => {
                    eprintln!("ERROR: Unable to save the configuration: {e}");
                    exit(4);
                }
            }
        }
        ConfigCommand::Remove => match config::remove() {
            Ok(path) => {
                println!("Configuration file {} removed", path.to_string_lossy());
            }
            Err(e) => {
                println!(
                    "ERROR:Unable to remove configuration file {} : {}",
                    configuration_file_name(),
                    e
                );
            }
        },
    }
}
