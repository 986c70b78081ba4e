//! `.trad` 翻訳ファイルを扱うコマンドラインツール

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;
use trad::config::{
    ConfigError,
    ConfigManager,
};
use trad::input::{
    LoadError,
    find_locale_files,
    load_translation_file,
};
use trad::{
    Translator,
    TranslatorError,
};
use tracing_subscriber::EnvFilter;

/// コマンドラインで報告するエラー
#[derive(Error, Debug)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Translator(#[from] TranslatorError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Failed to serialize translations: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "trad", version)]
#[command(about = "Look up translations in .trad locale files")]
struct Cli {
    /// Workspace holding .trad.json (defaults to the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the translation of each key
    Get {
        locale: String,
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print every translation of a locale as JSON
    Dump { locale: String },

    /// Parse every locale file and report errors
    Check,

    /// List the locale files of the language directory
    Locales,
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let workspace = cli.workspace.or_else(|| env::current_dir().ok());

    match load_config(workspace).and_then(|config| run(&config, cli.command)) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// 設定を読み込み、検証する
fn load_config(workspace: Option<PathBuf>) -> Result<ConfigManager, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(workspace)?;
    Ok(config_manager)
}

#[allow(clippy::print_stdout)]
fn run(config: &ConfigManager, command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Get { locale, keys } => {
            let translator = open_translator(config, &locale)?;
            for key in keys {
                println!("{}", translator.translate(&key)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Dump { locale } => {
            let translator = open_translator(config, &locale)?;
            let tree = translator
                .tree(&locale)
                .ok_or_else(|| TranslatorError::LocaleNotFound(locale.clone()))?;
            let flattened: BTreeMap<String, String> = tree.flatten().into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&flattened)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => check(config),
        Command::Locales => {
            let settings = config.get_settings();
            for file in find_locale_files(&config.lang_dir(), &settings.file_pattern)? {
                println!("{}\t{}", file.locale, file.path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `locale` を選択した `Translator` を作成する
///
/// 一括読み込みでは、`locale` 以外の壊れたファイルはログに出すだけ
fn open_translator(config: &ConfigManager, locale: &str) -> Result<Translator, CliError> {
    let translator = Translator::from_config(config);
    match translator.init() {
        Ok(()) => {}
        Err(error @ TranslatorError::LoadFailed(_)) => tracing::warn!("{error}"),
        Err(error) => return Err(error.into()),
    }
    translator.set_locale(locale)?;
    Ok(translator)
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn check(config: &ConfigManager) -> Result<ExitCode, CliError> {
    let settings = config.get_settings();
    let mut failed = 0_usize;

    for file in find_locale_files(&config.lang_dir(), &settings.file_pattern)? {
        match load_translation_file(&file) {
            Ok(tree) => println!("ok\t{}\t{} keys", file.locale, tree.len()),
            Err(error) => {
                eprintln!("error\t{}\t{error}", file.locale);
                failed += 1;
            }
        }
    }

    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
