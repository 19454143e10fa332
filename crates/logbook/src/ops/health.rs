use clap::Args;

use service::http::api::client::ApiError;

/// Ask the service at `--remote` how it is doing
#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let health = ctx.client.health().await?;
        Ok(format!(
            "{}: {} share(s) held, version {}, up since {}",
            health.status, health.shares, health.version, health.started_at
        ))
    }
}
