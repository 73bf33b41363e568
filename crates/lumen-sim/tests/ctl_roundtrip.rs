#![cfg(unix)]

//! End-to-end exercise of the `lumenctl` driver against a scripted stand-in
//! for the real runtime: subcommand argument construction, artifact bundle
//! resolution, and failure propagation.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use lumen_sim::{CtlSimulator, GradientRequest, SimError, Simulator};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A stand-in `lumenctl` that records its argv and writes the artifact
/// bundles the real runtime would.
fn fake_ctl(script_dir: &Path, scan_dir: &Path) -> PathBuf {
    let body = format!(
        r#"#!/bin/sh
set -e
scan="{scan}"
printf '%s\n' "$@" > "$scan/argv.txt"
case "$1" in
run)
    out="$scan/lumen_run_001"
    mkdir -p "$out"
    cp "$2" "$out/ir.json"
    cat > "$out/results.json" <<'EOF'
{{
    "run_seed": 7,
    "node_results": [
        {{ "node_id": "mzi_0", "out_amplitude": [1.0, 0.0] }},
        {{ "node_id": "det_0", "out_amplitude": [3.0, 4.0] }}
    ]
}}
EOF
    echo '{{}}' > "$out/metadata.json"
    ;;
gradient)
    out="$scan/lumen_grad_001"
    mkdir -p "$out"
    cat > "$out/gradients.json" <<'EOF'
{{
    "gradients": {{ "mzi_0:phase": 0.5 }},
    "provenance": {{ "strategy": "finite_difference" }}
}}
EOF
    ;;
esac
"#,
        scan = scan_dir.display()
    );
    write_script(script_dir, "fake_lumenctl", &body)
}

fn recorded_argv(scan_dir: &Path) -> Vec<String> {
    fs::read_to_string(scan_dir.join("argv.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn run_resolves_the_bundle_it_produced() {
    let script_dir = tempfile::tempdir().unwrap();
    let scan_dir = tempfile::tempdir().unwrap();
    let ctl = fake_ctl(script_dir.path(), scan_dir.path());

    let ir_path = script_dir.path().join("template.json");
    fs::write(&ir_path, r#"{ "nodes": [] }"#).unwrap();

    let sim = CtlSimulator::new(&ctl).with_scan_dir(scan_dir.path());
    let bundle = sim.run(&ir_path, Some(7)).unwrap();

    assert_eq!(
        recorded_argv(scan_dir.path()),
        vec![
            "run".to_string(),
            ir_path.display().to_string(),
            "--seed".to_string(),
            "7".to_string(),
        ]
    );
    assert!(bundle.results.is_some());
    assert!(bundle.ir.is_some());
    // trace.json was never written; absence is represented, not raised.
    assert!(bundle.trace.is_none());
    assert_eq!(bundle.missing(), vec!["trace.json"]);
}

#[test]
fn gradient_passes_the_full_argument_contract() {
    let script_dir = tempfile::tempdir().unwrap();
    let scan_dir = tempfile::tempdir().unwrap();
    let ctl = fake_ctl(script_dir.path(), scan_dir.path());

    let ir_path = script_dir.path().join("template.json");
    fs::write(&ir_path, r#"{ "nodes": [] }"#).unwrap();

    let sim = CtlSimulator::new(&ctl).with_scan_dir(scan_dir.path());
    let params = vec!["mzi_0:phase".to_string(), "mzi_1:phase".to_string()];
    let report = sim
        .estimate_gradient(&ir_path, &params, &GradientRequest::finite_difference(Some(7)))
        .unwrap();

    assert_eq!(
        recorded_argv(scan_dir.path()),
        vec![
            "gradient".to_string(),
            ir_path.display().to_string(),
            "mzi_0:phase,mzi_1:phase".to_string(),
            "--strategy".to_string(),
            "finite_difference".to_string(),
            "--samples".to_string(),
            "1".to_string(),
            "--seed".to_string(),
            "7".to_string(),
        ]
    );
    assert_eq!(report.gradient("mzi_0:phase"), 0.5);
    assert_eq!(report.gradient("mzi_1:phase"), 0.0);
    assert_eq!(report.provenance["strategy"], "finite_difference");
}

#[test]
fn simulator_failure_is_fatal_without_artifact_inspection() {
    let script_dir = tempfile::tempdir().unwrap();
    let scan_dir = tempfile::tempdir().unwrap();
    let ctl = write_script(script_dir.path(), "failing_lumenctl", "#!/bin/sh\nexit 3\n");

    let sim = CtlSimulator::new(&ctl).with_scan_dir(scan_dir.path());
    let err = sim.run(Path::new("ir.json"), None).unwrap_err();
    match err {
        SimError::CommandFailed { code, .. } => assert_eq!(code, Some(3)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_gradient_document_is_fatal() {
    let script_dir = tempfile::tempdir().unwrap();
    let scan_dir = tempfile::tempdir().unwrap();
    // Produces the bundle directory but never the document inside it.
    let body = format!(
        "#!/bin/sh\nmkdir -p \"{}/lumen_grad_empty\"\n",
        scan_dir.path().display()
    );
    let ctl = write_script(script_dir.path(), "empty_lumenctl", &body);

    let sim = CtlSimulator::new(&ctl).with_scan_dir(scan_dir.path());
    let err = sim
        .estimate_gradient(
            Path::new("ir.json"),
            &["mzi_0:phase".to_string()],
            &GradientRequest::finite_difference(None),
        )
        .unwrap_err();
    assert!(matches!(err, SimError::MissingDocument { name, .. } if name == "gradients.json"));
}
