use std::path::PathBuf;

use clap::Args;

use service::{spawn_service, Config, ConfigError, ConfigFile, ServiceError};

/// Run the share store service in the foreground
#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Port to listen on (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for daily-rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Seconds between expiry sweeps
    #[arg(long)]
    pub sweep_interval_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service failed: {0}")]
    Service(#[from] ServiceError),
}

impl Serve {
    /// Layer command line flags over the file configuration
    fn apply(&self, mut file: ConfigFile) -> Result<Config, ConfigError> {
        if let Some(port) = self.port {
            file.listen_addr.set_port(port);
        }
        if let Some(log_dir) = &self.log_dir {
            file.log_dir = Some(log_dir.clone());
        }
        if let Some(secs) = self.sweep_interval_secs {
            file.sweep_interval_secs = secs;
        }
        if let Some(level) = &self.log_level {
            file.log_level = level.clone();
        }
        Config::try_from(file)
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let file = ConfigFile::load(ctx.config_path.as_deref())?;
        let config = self.apply(file)?;

        spawn_service(&config).await?;
        Ok("share service stopped".to_string())
    }
}
