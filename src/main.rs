use serde_json::json;
use session_warden::app::App;
use session_warden::application_port::*;
use session_warden::domain_model::UserId;
use session_warden::logger::*;
use session_warden::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    cli.command.ensure_backend(&project_settings.store.backend)?;

    let app = App::try_new(&project_settings).await?;
    let result = run(&app, cli.command).await;
    app.shutdown().await;

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(app: &App, command: Command) -> anyhow::Result<serde_json::Value> {
    let sessions = &app.session_service;
    let output = match command {
        Command::Issue {
            user_id,
            role,
            permissions,
            token_version,
        } => {
            let mut input = IssueTokenPairInput::new(user_id).with_token_version(token_version);
            if let Some(role) = role {
                input = input.with_role(role);
            }
            if !permissions.is_empty() {
                input = input.with_permissions(permissions);
            }
            json!(sessions.issue_token_pair(input).await?)
        }
        Command::Refresh { renewal_token } => json!(sessions.refresh(&renewal_token).await?),
        Command::Revoke { renewal_token } => {
            sessions.revoke_session(&renewal_token).await?;
            json!({ "revoked": true })
        }
        Command::RevokeAll { user_id } => {
            sessions.revoke_all_sessions(&UserId(user_id)).await?;
            json!({ "revoked": true })
        }
        Command::Verify { access_token } => json!(sessions.verify_access_token(&access_token).await?),
        Command::HashPassword { password } => {
            json!({ "hash": app.credential_hasher.hash_password(&password).await? })
        }
        Command::Demo { user_id } => demo(app, UserId(user_id)).await?,
    };
    Ok(output)
}

/// Walks the lifecycle end to end against the configured backend.
async fn demo(app: &App, user_id: UserId) -> anyhow::Result<serde_json::Value> {
    let sessions = &app.session_service;

    let limit = app.rate_limiter.consume(user_id.as_str()).await?;
    if !limit.allowed {
        return Err(anyhow::anyhow!("rate limited, retry after {:?}", limit.retry_after));
    }

    let first = sessions
        .issue_token_pair(
            IssueTokenPairInput::new(user_id.clone())
                .with_role("member")
                .with_permissions(["read"]),
        )
        .await?;
    let claims = sessions.verify_access_token(&first.access_token.0).await?;
    let guard = AccessGuard::Permission("read".to_string()).check(Some(&claims));

    let rotated = sessions.refresh(&first.renewal_token.0).await?;
    let replay = sessions.refresh(&first.renewal_token.0).await;

    sessions.revoke_session(&rotated.renewal_token.0).await?;
    let after_logout = sessions.refresh(&rotated.renewal_token.0).await;

    Ok(json!({
        "user_id": user_id,
        "access_claims": claims,
        "read_permission": guard.is_ok(),
        "first_refresh": "ok",
        "replayed_refresh": replay.err().map(|e| e.to_string()),
        "refresh_after_logout": after_logout.err().map(|e| e.to_string()),
    }))
}
