pub mod env {
    pub const ENV_PREFIX: &str = "MEMBERSHIP";
    pub const ENV_SEPARATOR: &str = "__";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
}

pub const BASE_CONFIG_FILE: &str = "config/base.json";

pub mod defaults {
    pub const POSTGRES_MAX_CONNECTIONS: u32 = 5;
    pub const EVENT_CAPACITY: usize = 1024;

    pub mod hashing {
        pub const MEMORY_KIB: u32 = 15000;
        pub const ITERATIONS: u32 = 2;
        pub const PARALLELISM: u32 = 1;
    }
}
