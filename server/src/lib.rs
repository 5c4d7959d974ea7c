pub mod config {
    use serde::Deserialize;

    /// Runtime configuration, sourced from environment variables.
    #[derive(Deserialize, Debug)]
    pub struct Config {
        #[serde(default = "default_port")]
        pub port: u16,
        /// Region of the backing document store, logged at startup.
        #[serde(default = "default_region")]
        pub region: String,
        #[serde(default = "default_tasks_table")]
        pub tasks_table: String,
        #[serde(default = "default_boards_table")]
        pub boards_table: String,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_region() -> String {
        "us-east-1".to_string()
    }

    fn default_tasks_table() -> String {
        "tasks".to_string()
    }

    fn default_boards_table() -> String {
        "boards".to_string()
    }
}

pub mod board;
pub mod dashboard;
pub mod store;
pub mod task;
pub mod web;
