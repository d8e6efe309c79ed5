use log::LevelFilter;
use midistate::config::Settings;
use std::fs;
use std::path::PathBuf;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("midistate-{}-{}.toml", name, std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.client_name, "midistate");
    assert_eq!(settings.level_filter().unwrap(), LevelFilter::Info);
    assert_eq!(settings.device, None);
    assert!(!settings.print_json);
}

#[test]
fn test_load_from_file() {
    let path = write_config(
        "file",
        "client_name = \"stage-left\"\nlog_level = \"debug\"\ndevice = \"Keys\"\nprint_json = true\n",
    );

    let settings = Settings::load(Some(path.as_path())).unwrap();
    assert_eq!(settings.client_name, "stage-left");
    assert_eq!(settings.level_filter().unwrap(), LevelFilter::Debug);
    assert_eq!(settings.device.as_deref(), Some("Keys"));
    assert!(settings.print_json);

    fs::remove_file(path).unwrap();
}

#[test]
fn test_missing_file_uses_defaults() {
    let path = std::env::temp_dir().join("midistate-does-not-exist.toml");
    let settings = Settings::load(Some(path.as_path())).unwrap();
    assert_eq!(settings.client_name, "midistate");
    assert_eq!(settings.log_level, "info");
}

#[test]
fn test_invalid_log_level_rejected() {
    let path = write_config("level", "log_level = \"loud\"\n");
    assert!(Settings::load(Some(path.as_path())).is_err());
    fs::remove_file(path).unwrap();

    let settings = Settings {
        client_name: " ".to_string(),
        ..Settings::default()
    };
    assert!(settings.validate().is_err());
}
