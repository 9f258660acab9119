//! EchoScribe CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use echo_scribe::cli::{
    app::{
        load_merged_config, run_export_stdin, run_import, run_live, run_speak, EXIT_ERROR,
        EXIT_USAGE_ERROR,
    },
    args::{Cli, Commands, LiveOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use echo_scribe::domain::config::AppConfig;
use echo_scribe::domain::duration::Duration;
use echo_scribe::domain::speech::LanguageTag;
use echo_scribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Import { file }) => {
            return run_import(&file).await;
        }
        Some(Commands::Speak { text, language }) => {
            let language = match language {
                Some(tag) => match tag.parse::<LanguageTag>() {
                    Ok(tag) => tag,
                    Err(e) => {
                        presenter.error(&e.to_string());
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => load_merged_config(AppConfig::empty())
                    .await
                    .language_or_default(),
            };
            return run_speak(text, language).await;
        }
        Some(Commands::Export { to }) => {
            return run_export_stdin(to).await;
        }
        None => {}
    }

    // Live mode: overlay CLI flags on the merged config
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        language: cli.language.clone(),
        read_back: if cli.no_read_back { Some(false) } else { None },
        export_dir: cli.to.as_ref().map(|p| p.display().to_string()),
        refresh: cli.refresh.clone(),
        max_duration: cli.max_duration.clone(),
    };

    let config = load_merged_config(cli_config).await;

    let language = match config.language.as_deref().map(str::parse::<LanguageTag>) {
        Some(Ok(tag)) => tag,
        Some(Err(e)) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        None => LanguageTag::default(),
    };

    let refresh = match config.refresh.as_deref().map(str::parse::<Duration>) {
        Some(Ok(duration)) => duration,
        Some(Err(e)) => {
            presenter.error(&format!("Invalid refresh: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        None => Duration::default_refresh(),
    };

    let max_duration = match config.max_duration.as_deref().map(str::parse::<Duration>) {
        Some(Ok(duration)) => duration,
        Some(Err(e)) => {
            presenter.error(&format!("Invalid max-duration: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        None => Duration::default_max_duration(),
    };

    let options = LiveOptions {
        language,
        read_back: config.read_back_or_default(),
        export: cli.export,
        export_dir: config.export_dir.clone().map(PathBuf::from),
        refresh,
        max_duration,
    };

    run_live(options).await
}
