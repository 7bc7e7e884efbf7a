mod support;

use cancerna::config::{self, DEFAULT_BACKEND_URL};
use support::cancerna_env::CancernaEnvGuard;

#[test]
fn ensure_config_file_writes_defaults_once() {
    let temp = tempfile::tempdir().unwrap();
    let _env = CancernaEnvGuard::set_config_home(temp.path());

    let path = config::ensure_config_file().unwrap();
    assert!(path.starts_with(temp.path()));
    assert!(path.is_file());
    let settings = config::load_or_default().unwrap();
    assert_eq!(settings.backend.base_url, DEFAULT_BACKEND_URL);

    std::fs::write(&path, "[backend]\nbase_url = \"http://10.0.0.5:9000\"\n").unwrap();
    config::ensure_config_file().unwrap();
    let settings = config::load_or_default().unwrap();
    assert_eq!(settings.backend.base_url, "http://10.0.0.5:9000");
}

#[test]
fn environment_overrides_backend_url() {
    let temp = tempfile::tempdir().unwrap();
    let _env = CancernaEnvGuard::set_config_home(temp.path())
        .with_backend_url("https://inference.example.org/api");
    let settings = config::load_or_default().unwrap();
    assert_eq!(
        settings.endpoint().unwrap().predict_url().unwrap().as_str(),
        "https://inference.example.org/api/predict/"
    );
}

#[test]
fn invalid_backend_url_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let _env = CancernaEnvGuard::set_config_home(temp.path()).with_backend_url("file:///etc");
    assert!(config::load_or_default().is_err());
}
