//! sysfs parameter store against a fake module parameter directory

use leetmouse::driver::{open_store, ParamStore, SysFsStore};
use leetmouse::error::ParamError;
use leetmouse::models::{DriverParams, Param, ALL_PARAMS};

fn fake_module(params: &DriverParams) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for &param in ALL_PARAMS {
        // the module reports values with a trailing newline
        std::fs::write(dir.path().join(param.name()), format!("{}\n", params.get(param))).unwrap();
    }
    dir
}

#[test]
fn test_load_all_reads_every_parameter() {
    let params = DriverParams {
        sensitivity: 0.85,
        post_scale_x: 0.4,
        post_scale_y: 0.4,
        ..DriverParams::default()
    };
    let dir = fake_module(&params);
    let store = SysFsStore::new(dir.path());
    assert!(store.is_loaded());
    assert_eq!(store.load_all().unwrap(), params);
}

#[test]
fn test_apply_all_writes_files() {
    let dir = fake_module(&DriverParams::default());
    let mut store = SysFsStore::new(dir.path());

    let params = DriverParams {
        acceleration: 0.26,
        pre_scale_x: 0.05,
        pre_scale_y: 0.06,
        ..DriverParams::default()
    };
    store.apply_all(&params).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("pre_scale_y")).unwrap();
    assert_eq!(raw, "0.06");
    assert_eq!(store.load_all().unwrap(), params);
}

#[test]
fn test_invalid_value_in_module() {
    let dir = fake_module(&DriverParams::default());
    std::fs::write(dir.path().join("sensitivity"), "fast\n").unwrap();
    let store = SysFsStore::new(dir.path());
    match store.get(Param::Sensitivity) {
        Err(ParamError::InvalidValue { name, value }) => {
            assert_eq!(name, "sensitivity");
            assert_eq!(value, "fast");
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_out_of_range_write_is_refused() {
    let dir = fake_module(&DriverParams::default());
    let mut store = SysFsStore::new(dir.path());
    assert!(matches!(
        store.set(Param::PostScaleX, 0.0),
        Err(ParamError::OutOfRange { .. })
    ));
    let raw = std::fs::read_to_string(dir.path().join("post_scale_x")).unwrap();
    assert_eq!(raw.trim(), "1");
}

#[test]
fn test_unwritable_param_leaves_driver_untouched() {
    let dir = fake_module(&DriverParams::default());
    let blocked = dir.path().join("scrolls_per_tick");
    std::fs::remove_file(&blocked).unwrap();
    std::fs::create_dir(&blocked).unwrap();
    let mut store = SysFsStore::new(dir.path());

    let params = DriverParams {
        sensitivity: 2.0,
        acceleration: 0.26,
        ..DriverParams::default()
    };
    assert!(store.apply_all(&params).is_err());

    let raw = std::fs::read_to_string(dir.path().join("sensitivity")).unwrap();
    assert_eq!(raw.trim(), "1");
    let raw = std::fs::read_to_string(dir.path().join("acceleration")).unwrap();
    assert_eq!(raw.trim(), "0");
}

#[test]
fn test_open_store_reads_complete_module() {
    let params = DriverParams {
        sensitivity: 0.85,
        ..DriverParams::default()
    };
    let dir = fake_module(&params);
    let mut startup = open_store(dir.path());
    assert!(startup.live);
    assert!(startup.error.is_none());
    assert_eq!(startup.params, params);

    startup.store.set(Param::Acceleration, 0.26).unwrap();
    let raw = std::fs::read_to_string(dir.path().join("acceleration")).unwrap();
    assert_eq!(raw, "0.26");
}

#[test]
fn test_partial_module_opens_offline() {
    // a module that only exposes sensitivity
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sensitivity"), "0.85\n").unwrap();

    let mut startup = open_store(dir.path());
    assert!(!startup.live);
    assert!(startup.error.is_some());
    assert_eq!(startup.params, DriverParams::default());

    let edited = DriverParams {
        acceleration: 0.26,
        ..startup.params.clone()
    };
    startup.store.apply_all(&edited).unwrap();
    let raw = std::fs::read_to_string(dir.path().join("sensitivity")).unwrap();
    assert_eq!(raw, "0.85\n");
    assert!(!dir.path().join("acceleration").exists());
}

#[test]
fn test_missing_module_opens_offline() {
    let startup = open_store("/nonexistent/leetmouse/parameters");
    assert!(!startup.live);
    assert!(matches!(startup.error, Some(ParamError::ModuleNotLoaded(_))));
}
