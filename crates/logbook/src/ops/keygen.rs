use clap::Args;

use common::crypto::ShareKey;

/// Print a fresh share key (32 hex characters)
#[derive(Args, Debug, Clone)]
pub struct Keygen;

#[async_trait::async_trait]
impl crate::op::Op for Keygen {
    type Error = std::convert::Infallible;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(ShareKey::generate().to_hex())
    }
}
