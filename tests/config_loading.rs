use std::io::Write;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use infrasight::config::InfraSightConfig;
use infrasight::{Color, CostRange};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "INFRASIGHT_CONFIG",
        "INFRASIGHT_MAX_UPLOADS",
        "INFRASIGHT_STAGE_DELAY_SCALE",
        "INFRASIGHT_STROKE_WIDTH",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_json_config_with_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r##"{
        "max_uploads": 8,
        "stage_delay_scale": 0.5,
        "overlay": {
            "stroke_width": 4,
            "label_padding": 6,
            "text_color": "#000000"
        },
        "costs": {
            "high": { "materials": [300, 500], "labor": [200, 300] }
        }
    }"##;
    file.write_all(json.as_bytes()).expect("write config");

    std::env::set_var("INFRASIGHT_CONFIG", file.path());
    std::env::set_var("INFRASIGHT_MAX_UPLOADS", "3");

    let cfg = InfraSightConfig::load().expect("load config");

    assert_eq!(cfg.max_uploads, 3);
    assert_eq!(cfg.stage_delay_scale, 0.5);
    assert_eq!(cfg.overlay.stroke_width, 4);
    assert_eq!(cfg.overlay.label_padding, 6);
    assert_eq!(cfg.overlay.font_scale, 2);
    assert_eq!(cfg.overlay.text_color, Color::rgb(0, 0, 0));
    assert_eq!(cfg.costs.high.total(), CostRange::new(500, 800));
    assert_eq!(cfg.costs.low.total(), CostRange::new(75, 100));

    clear_env();
}

#[test]
fn loads_toml_config_by_extension() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    let toml = r##"
        max_uploads = 10

        [overlay]
        font_scale = 3

        [costs.medium]
        materials = [50, 80]
        labor = [50, 70]
    "##;
    file.write_all(toml.as_bytes()).expect("write config");

    std::env::set_var("INFRASIGHT_STROKE_WIDTH", "5");
    let cfg = InfraSightConfig::load_from(file.path()).expect("load config");

    assert_eq!(cfg.max_uploads, 10);
    assert_eq!(cfg.overlay.font_scale, 3);
    assert_eq!(cfg.overlay.stroke_width, 5);
    assert_eq!(cfg.costs.medium.total(), CostRange::new(100, 150));

    clear_env();
}

#[test]
fn defaults_without_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = InfraSightConfig::load().expect("load config");
    assert_eq!(cfg.max_uploads, 5);
    assert_eq!(cfg.stage_delay_scale, 0.0);
    assert_eq!(cfg.overlay.stroke_width, 3);
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("INFRASIGHT_STAGE_DELAY_SCALE", "-1");
    assert!(InfraSightConfig::load().is_err());
    clear_env();

    std::env::set_var("INFRASIGHT_MAX_UPLOADS", "many");
    let err = InfraSightConfig::load().unwrap_err();
    assert!(err.to_string().contains("INFRASIGHT_MAX_UPLOADS"));
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(br#"{"costs": {"low": {"materials": [90, 10], "labor": [1, 2]}}}"#)
        .expect("write config");
    std::env::set_var("INFRASIGHT_CONFIG", file.path());
    let err = InfraSightConfig::load().unwrap_err();
    assert_eq!(
        err.downcast_ref::<infrasight::ValidationError>().unwrap().code,
        "INVALID_COST_RANGE"
    );
    clear_env();
}
