use anyhow::Result;
use invoicer_core::config::InvoicerConfig;
use std::path::Path;

/// Load and validate configuration, returning a short report.
pub fn run(config_path: &Path) -> Result<String> {
    let config = InvoicerConfig::load_from(config_path)?;
    config.validate()?;

    Ok(format!(
        "Configuration OK\n  listen:           {}\n  login path:       {}\n  protected prefix: {}\n  landing route:    {}\n  users:            {}",
        config.server.bind_address(),
        config.auth.login_path,
        config.auth.protected_prefix,
        config.auth.landing_route,
        config.users.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn valid_file_reports_ok() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auth]\nprotected_prefix = \"/app\"\nlanding_route = \"/app\"").unwrap();

        let report = run(file.path()).unwrap();
        assert!(report.starts_with("Configuration OK"));
        assert!(report.contains("/app"));
    }

    #[test]
    fn invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auth]\nlanding_route = \"/elsewhere\"").unwrap();

        let err = run(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("[auth]"));
    }
}
