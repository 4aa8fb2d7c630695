use session_warden::settings::*;

fn main() -> anyhow::Result<()> {
    // Load settings from the default location
    let project_settings = parse_settings(None)?;
    println!("Loaded settings: {:?}", project_settings);

    // Attempt to load from an invalid path (expected to fail)
    let is_err = parse_settings(Some("")).is_err();
    println!("Error on invalid path: {:?}", is_err);

    // Environment overrides win over the file, e.g.
    // $ SESSION_WARDEN__LOG__FILTER=debug cargo run --bin settings_demo
    println!("Override prefix: {}__<SECTION>__<KEY>", ENV_PREFIX);

    Ok(())
}
