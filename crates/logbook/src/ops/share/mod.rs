use clap::{Args, Subcommand};

pub mod create;
pub mod open;

use crate::op::Op;

crate::command_enum! {
    (Create, create::Create),
    (Open, open::Open),
}

pub type ShareCommand = Command;

/// Create or open share links
#[derive(Args, Debug, Clone)]
pub struct Share {
    #[command(subcommand)]
    pub command: ShareCommand,
}

#[async_trait::async_trait]
impl Op for Share {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
