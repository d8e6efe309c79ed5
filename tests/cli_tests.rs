#[cfg(test)]
mod tests {
    use clap::Parser;
    use midistate::cli::{validate_device, Args};
    use midistate::config::Settings;
    use std::path::PathBuf;

    #[test]
    fn test_args_with_device_binding() {
        let args = Args::parse_from(["test", "--bind-to-device", "Mock Device 1"]);
        assert_eq!(args.bind_to_device, Some("Mock Device 1".to_string()));
        assert!(!args.device_list);
        assert!(!args.json);
    }

    #[test]
    fn test_args_without_device_binding() {
        let args = Args::parse_from(["test"]);
        assert_eq!(args.bind_to_device, None);
        assert!(!args.device_list);
        assert!(!args.verbose);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_args_all_flags() {
        let args = Args::parse_from([
            "test",
            "--device-list",
            "--config",
            "midistate.toml",
            "--json",
            "--verbose",
        ]);
        assert!(args.device_list);
        assert!(args.json);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("midistate.toml")));
    }

    #[test]
    fn test_args_override_settings() {
        let mut settings = Settings {
            device: Some("From File".to_string()),
            ..Settings::default()
        };
        Args::parse_from(["test"]).apply_to(&mut settings);
        assert_eq!(settings.device.as_deref(), Some("From File"));
        assert!(!settings.print_json);

        Args::parse_from(["test", "--bind-to-device", "Keys", "--json"]).apply_to(&mut settings);
        assert_eq!(settings.device.as_deref(), Some("Keys"));
        assert!(settings.print_json);
    }

    #[test]
    fn test_validate_device() {
        let devices = vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()];
        assert!(validate_device("Device 2", &devices).is_ok());

        let error = validate_device("Nonexistent Device", &devices).unwrap_err();
        assert!(error.contains("'Nonexistent Device' not found"));
        assert!(error.contains("  - Mock Device 1\n"));
    }
}
