//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{Catalog, TapConfig};
use crate::connector::{Connector, DixaConnector};
use crate::error::Result;
use crate::output::JsonLinesWriter;
use crate::schema::build_catalog;
use crate::state::StateManager;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check { config } => self.check(config).await,
            Commands::Discover { config } => self.discover(config).await,
            Commands::Sync {
                config,
                catalog,
                state,
            } => self.sync(config, catalog.as_deref(), state.as_deref()).await,
        }
    }

    fn connector(config_path: &Path) -> Result<DixaConnector> {
        let config = TapConfig::from_file(config_path)?;
        DixaConnector::new(config)
    }

    fn load_state(path: Option<&Path>) -> Result<StateManager> {
        let Some(path) = path else {
            return Ok(StateManager::in_memory());
        };
        if !path.exists() {
            info!(path = %path.display(), "State file not found, starting fresh");
        }
        StateManager::from_file(path)
    }

    /// Check connection
    async fn check(&self, config_path: &Path) -> Result<()> {
        let result = Self::connector(config_path)?.check().await?;
        println!("{}", serde_json::to_string(&result)?);
        Ok(())
    }

    /// Discover streams
    async fn discover(&self, config_path: &Path) -> Result<()> {
        let catalog = Self::connector(config_path)?.discover().await?;
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        Ok(())
    }

    /// Sync streams
    async fn sync(
        &self,
        config_path: &Path,
        catalog_path: Option<&Path>,
        state_path: Option<&Path>,
    ) -> Result<()> {
        let connector = Self::connector(config_path)?;
        let catalog = match catalog_path {
            Some(path) => Catalog::from_file(path)?,
            None => build_catalog()?,
        };
        let state = Self::load_state(state_path)?;

        let mut writer = JsonLinesWriter::stdout();
        connector.sync(&catalog, state, &mut writer).await?;
        Ok(())
    }
}
