use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the layered application configuration.
///
/// Precedence, lowest first: serde defaults, `config/default.*`, `config/<RUN_ENV>.*`,
/// `WERKSTATT__SECTION__KEY` variables, then the legacy flat variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    load_config_from(Path::new(&config_dir), &run_env, &prefix, |name| {
        env::var(name).ok()
    })
}

/// Same as [`load_config`] with every input passed in explicitly.
pub fn load_config_from<F>(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
    lookup: F,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    tracing::debug!(
        "Loading config from {} and {} (env prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let mut builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(prefix).separator(env_vars::CONFIG_SEPARATOR));

    for (path, value) in env_vars::legacy_overrides(lookup) {
        if env_vars::is_secret_path(path) {
            tracing::debug!("Legacy env override for {} (redacted)", path);
        } else {
            tracing::debug!("Legacy env override for {} = {}", path, value);
        }
        builder = builder.set_override(path, value)?;
    }

    let config: AppConfig = builder.build()?.try_deserialize()?;
    if config.shop.time_zone.parse::<chrono_tz::Tz>().is_err() {
        return Err(ConfigError::Message(format!(
            "unknown time zone '{}' in shop.time_zone",
            config.shop.time_zone
        )));
    }
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// `DOTENV_OVERRIDE` names the file, otherwise a first command line argument
/// starting with `.env`, otherwise `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
