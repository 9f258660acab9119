//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::duration::Duration;
use crate::domain::error::ConfigError;
use crate::domain::speech::LanguageTag;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    validate_config_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "read_back" => {
            config.read_back = Some(parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?)
        }
        "export_dir" => config.export_dir = Some(value.to_string()),
        "refresh" => config.refresh = Some(value.to_string()),
        "max_duration" => config.max_duration = Some(value.to_string()),
        _ => unreachable!("key validated above"),
    }

    store.save(&config).await?;
    presenter.success(&format!("Set {} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;
    let value = config_value(&config, key).unwrap_or_else(|| "(not set)".to_string());
    presenter.output(&value);
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let shown = if *key == "api_key" {
            // Never echo the key itself
            config.api_key.as_ref().map(|_| "(set)".to_string())
        } else {
            config_value(&config, key)
        };
        presenter.output(&format!(
            "{} = {}",
            key,
            shown.unwrap_or_else(|| "(not set)".to_string())
        ));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.clone(),
        "language" => config.language.clone(),
        "read_back" => config.read_back.map(|v| v.to_string()),
        "export_dir" => config.export_dir.clone(),
        "refresh" => config.refresh.clone(),
        "max_duration" => config.max_duration.clone(),
        _ => None,
    }
}

fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "language" => {
            value
                .parse::<LanguageTag>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "read_back" => {
            parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?;
        }
        "refresh" | "max_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        _ => {}
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;

    fn store() -> (tempfile::TempDir, XdgConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        (dir, store)
    }

    #[tokio::test]
    async fn set_and_get_round_trip() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        handle_config_command(
            ConfigAction::Set {
                key: "language".to_string(),
                value: "de-DE".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.language.as_deref(), Some("de-DE"));
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Set {
                key: "keystroke".to_string(),
                value: "true".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn invalid_boolean_is_rejected() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Set {
                key: "read_back".to_string(),
                value: "maybe".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn invalid_duration_is_rejected() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Set {
                key: "refresh".to_string(),
                value: "soon".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn invalid_language_is_rejected() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Set {
                key: "language".to_string(),
                value: "not a tag".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
