use super::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "session-warden", about = "Issue, rotate and revoke session credentials")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Issue a new access + renewal token pair
    Issue {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long = "permission")]
        permissions: Vec<String>,
        #[arg(long, default_value_t = 0)]
        token_version: u64,
    },
    /// Rotate a renewal token into a fresh pair
    Refresh { renewal_token: String },
    /// Revoke the session behind a renewal token
    Revoke { renewal_token: String },
    /// Revoke every session of a user
    RevokeAll { user_id: String },
    /// Verify an access token and print its claims
    Verify { access_token: String },
    /// Hash a password with Argon2
    HashPassword { password: String },
    /// Run an issue / refresh / replay / revoke walkthrough in-process
    Demo {
        #[arg(long, default_value = "demo-user")]
        user_id: String,
    },
}

impl Command {
    /// Refresh and revocation act on sessions issued by an earlier invocation, which a
    /// per-process memory store never holds.
    pub fn ensure_backend(&self, backend: &str) -> anyhow::Result<()> {
        let needs_shared = matches!(
            self,
            Command::Refresh { .. } | Command::Revoke { .. } | Command::RevokeAll { .. }
        );
        if needs_shared && backend == "memory" {
            anyhow::bail!(
                "this command needs a shared store; set store.backend = \"redis\" \
                 (the memory backend only lives for one invocation)"
            );
        }
        Ok(())
    }
}
