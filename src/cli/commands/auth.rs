use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::JwtSessionProvider;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a session token signed with SESSION_SECRET")]
    Token {
        #[arg(long, help = "User id (a random one when omitted)")]
        user: Option<Uuid>,
        #[arg(long, help = "Email to embed in the token")]
        email: Option<String>,
        #[arg(long, help = "Display name to embed in the token")]
        name: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { user, email, name } => {
            let security = &config::config().security;
            let provider = JwtSessionProvider::from_config(security)?;
            let user_id = user.unwrap_or_else(Uuid::new_v4);
            let token = provider.issue(user_id, email, name)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Session token issued",
                    Some(json!({
                        "user_id": user_id,
                        "token": token,
                        "cookie": security.session_cookie,
                        "expires_in_hours": security.session_expiry_hours,
                    })),
                ),
                OutputFormat::Text => {
                    // bare token so it can be captured in scripts
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
