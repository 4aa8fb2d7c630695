use session_warden::logger::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    let config = LogConfig {
        filter: "session_warden=debug".to_string(),
    };
    logger.reload_from_config(&config)?;
    trace!("application trace log");
    debug!(user_id = "u1", jti = "demo", "application debug log");
    info!("application info log");

    let bad = LogConfig {
        filter: "=[".to_string(),
    };
    warn!(rejected = logger.reload_from_config(&bad).is_err(), "invalid filter");

    Ok(())
}
