use std::path::{Path, PathBuf};

use serde_json::Value;

#[cfg(feature = "regenerate-refs")]
const REGENERATE_REFS: bool = true;

#[cfg(not(feature = "regenerate-refs"))]
const REGENERATE_REFS: bool = false;

fn regenerate_refs() -> bool {
    REGENERATE_REFS || std::env::var("VGPLOT_TEST_REGENERATE_REFS").is_ok()
}

fn ref_file_path(ref_name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir)
        .join("refs")
        .join(format!("{}.json", ref_name))
}

fn actual_file_path(ref_name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir)
        .join("actual")
        .join(format!("{}.json", ref_name))
}

fn diff_file_path(ref_name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir)
        .join("actual")
        .join(format!("{}.json.diff", ref_name))
}

fn pretty(spec: &Value) -> String {
    let mut s = serde_json::to_string_pretty(spec).unwrap();
    s.push('\n');
    s
}

fn remove_if_exists(file: &Path) {
    if std::fs::exists(file).unwrap() {
        std::fs::remove_file(file).unwrap();
    }
}

/// Compare a Vega-Lite spec with the reference file `refs/<ref_name>.json`.
///
/// Specs are compared as parsed JSON, so key order and formatting do not matter.
/// On mismatch, the actual spec and a unified diff are written to `actual/`.
pub fn check_spec_eq_ref(spec: &Value, ref_name: &str) -> Result<(), String> {
    let ref_file = ref_file_path(ref_name);
    let actual_file = actual_file_path(ref_name);
    let diff_file = diff_file_path(ref_name);

    if regenerate_refs() {
        std::fs::create_dir_all(ref_file.parent().unwrap()).unwrap();
        std::fs::write(&ref_file, pretty(spec)).unwrap();
        remove_if_exists(&actual_file);
        remove_if_exists(&diff_file);
        return Ok(());
    }

    if !std::fs::exists(&ref_file).unwrap() {
        std::fs::create_dir_all(actual_file.parent().unwrap()).unwrap();
        std::fs::write(&actual_file, pretty(spec)).unwrap();
        return Err(format!(
            "No such ref: \"{}\"\n  Actual spec written to {}",
            ref_name,
            actual_file.display()
        ));
    }

    let ref_text = std::fs::read_to_string(&ref_file).unwrap();
    let ref_spec: Value = serde_json::from_str(&ref_text).unwrap();

    if &ref_spec != spec {
        let actual_text = pretty(spec);
        let ref_text = pretty(&ref_spec);
        let diff = similar::TextDiff::from_lines(ref_text.as_str(), actual_text.as_str());
        std::fs::create_dir_all(actual_file.parent().unwrap()).unwrap();
        std::fs::write(&actual_file, &actual_text).unwrap();
        std::fs::write(&diff_file, diff.unified_diff().to_string()).unwrap();
        Err(format!(
            "Spec assertion failed\n  Actual spec: {:?}\n     Ref spec: {:?}\n         Diff: {:?}",
            actual_file, ref_file, diff_file
        ))
    } else {
        remove_if_exists(&actual_file);
        remove_if_exists(&diff_file);
        Ok(())
    }
}
