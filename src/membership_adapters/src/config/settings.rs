use config::{Config, ConfigError, Environment, File, FileFormat};
use membership_application::{RegistrationOptions, RollbackPolicy};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{BASE_CONFIG_FILE, defaults, env};

/// Everything the membership module reads at start-up.
///
/// Sources, later ones winning: built-in defaults, `config/base.json` when
/// present, `DATABASE_URL`, then `MEMBERSHIP__<SECTION>__<KEY>` variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipSettings {
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub registration: RegistrationSettings,
    #[serde(default)]
    pub hashing: HashingSettings,
    #[serde(default)]
    pub events: EventSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub url: Option<Secret<String>>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RegistrationSettings {
    #[serde(default)]
    pub rollback: RollbackPolicy,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HashingSettings {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EventSettings {
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

impl MembershipSettings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = File::new(BASE_CONFIG_FILE, FileFormat::Json).required(false);
        Config::builder()
            .add_source(file)
            .set_override_option("postgres.url", std::env::var(env::DATABASE_URL_ENV_VAR).ok())?
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
    }

    pub fn registration_options(&self) -> RegistrationOptions {
        RegistrationOptions {
            rollback: self.registration.rollback,
        }
    }
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

fn default_max_connections() -> u32 {
    defaults::POSTGRES_MAX_CONNECTIONS
}

fn default_memory_kib() -> u32 {
    defaults::hashing::MEMORY_KIB
}

fn default_iterations() -> u32 {
    defaults::hashing::ITERATIONS
}

fn default_parallelism() -> u32 {
    defaults::hashing::PARALLELISM
}

fn default_event_capacity() -> usize {
    defaults::EVENT_CAPACITY
}
