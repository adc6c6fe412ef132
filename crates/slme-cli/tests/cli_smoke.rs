use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_slme(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slme"))
        .args(args)
        .env_remove("SLME_SOLAR_SPECTRUM")
        .env_remove("RUST_LOG")
        .output()
        .expect("slme binary should run")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

/// Flat 1 W m^-2 nm^-1 sun from 300 to 2500 nm.
fn write_flat_sun(path: &Path) {
    let mut table = String::from("flat test spectrum\nwavelength_nm irradiance\n");
    for wavelength in (300..=2500).step_by(5) {
        table.push_str(&format!("{wavelength}.0 1.0\n"));
    }
    write_file(path, &table);
}

fn step_absorber_document(gap: f64) -> String {
    let energies: Vec<f64> = (0..=500).map(|index| index as f64 * 0.01).collect();
    let absorption: Vec<f64> = energies
        .iter()
        .map(|energy| if *energy >= gap { 1.0e7 } else { 0.0 })
        .collect();
    serde_json::json!({
        "fundamentalGap": gap,
        "directGap": gap,
        "energies": energies,
        "absorption": absorption,
    })
    .to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn sq_command_prints_human_report() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sun = temp.path().join("sun.dat");
    write_flat_sun(&sun);

    let output = run_slme(&["sq", "--gap", "1.3", "--spectrum", sun.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Efficiency:"), "stdout: {text}");
    assert!(text.contains("Maximum power:"), "stdout: {text}");
    assert!(!text.contains("WARNING"), "stdout: {text}");
}

#[test]
fn sq_command_emits_json_and_curve() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sun = temp.path().join("sun.dat");
    let curve = temp.path().join("out/curve.dat");
    write_flat_sun(&sun);

    let output = run_slme(&[
        "sq",
        "--gap",
        "1.3",
        "--temperature",
        "300",
        "--spectrum",
        sun.to_str().unwrap(),
        "--curve",
        curve.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: Value = serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    let efficiency = report["efficiency"].as_f64().expect("efficiency");
    assert!(efficiency > 0.0 && efficiency < 0.6, "efficiency={efficiency}");
    assert_eq!(report["temperature"].as_f64(), Some(300.0));
    assert_eq!(report["radiativeFraction"].as_f64(), Some(1.0));
    assert!(report["warnings"].as_array().expect("warnings").is_empty());

    let table = fs::read_to_string(&curve).expect("curve file should be written");
    let rows: Vec<&str> = table.lines().filter(|line| !line.starts_with('#')).collect();
    assert_eq!(rows.len(), 200);
    assert_eq!(rows[0].split_whitespace().count(), 3);
}

#[test]
fn gap_beyond_the_spectrum_reports_a_warning() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sun = temp.path().join("sun.dat");
    write_flat_sun(&sun);

    let output = run_slme(&["sq", "--gap", "5.0", "--spectrum", sun.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("WARNING: band gap 5 eV"));
}

#[test]
fn slme_command_reads_absorption_document() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sun = temp.path().join("sun.dat");
    let input = temp.path().join("material.json");
    write_flat_sun(&sun);
    write_file(&input, &step_absorber_document(1.3));

    let slme = run_slme(&[
        "slme",
        "--input",
        input.to_str().unwrap(),
        "--spectrum",
        sun.to_str().unwrap(),
        "--json",
    ]);
    assert!(slme.status.success(), "stderr: {}", stderr(&slme));
    let slme: Value = serde_json::from_str(&stdout(&slme)).expect("slme JSON");

    let sq = run_slme(&[
        "sq",
        "--gap",
        "1.3",
        "--spectrum",
        sun.to_str().unwrap(),
        "--json",
    ]);
    assert!(sq.status.success(), "stderr: {}", stderr(&sq));
    let sq: Value = serde_json::from_str(&stdout(&sq)).expect("sq JSON");

    let slme_efficiency = slme["efficiency"].as_f64().expect("slme efficiency");
    let sq_efficiency = sq["efficiency"].as_f64().expect("sq efficiency");
    assert!(
        (slme_efficiency - sq_efficiency).abs() < 0.01,
        "slme={slme_efficiency} sq={sq_efficiency}"
    );
}

#[test]
fn absorption_command_writes_table() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("dielectric.json");
    let table = temp.path().join("alpha.dat");
    write_file(
        &input,
        r#"{
            "energies": [1.0, 2.0, 3.0],
            "real": [[3, 3, 3, 0, 0, 0], [3, 3, 3, 0, 0, 0], [3, 3, 3, 0, 0, 0]],
            "imag": [[0, 0, 0, 0, 0, 0], [2, 2, 2, 0, 0, 0], [4, 4, 4, 0, 0, 0]]
        }"#,
    );

    let output = run_slme(&[
        "absorption",
        "--input",
        input.to_str().unwrap(),
        "--output",
        table.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = fs::read_to_string(&table).expect("table should be written");
    let rows: Vec<Vec<f64>> = written
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| {
            line.split_whitespace()
                .map(|value| value.parse().expect("numeric column"))
                .collect()
        })
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][1], 0.0);
    assert!(rows[2][1] > rows[1][1]);
}

#[test]
fn unknown_dielectric_layout_exits_with_format_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("dielectric.json");
    write_file(&input, r#"{ "frequencies": [1.0, 2.0] }"#);

    let output = run_slme(&["absorption", "--input", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let diagnostics = stderr(&output);
    assert!(
        diagnostics.contains("ERROR: [INPUT.DIELECTRIC_FORMAT]"),
        "stderr: {diagnostics}"
    );
    assert!(diagnostics.contains("FATAL EXIT CODE: 2"), "stderr: {diagnostics}");
}

#[test]
fn missing_solar_spectrum_exits_with_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("absent.dat");

    let output = run_slme(&["sq", "--gap", "1.3", "--spectrum", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    let diagnostics = stderr(&output);
    assert!(diagnostics.contains("ERROR: [IO.SOLAR_READ]"), "stderr: {diagnostics}");
    assert!(diagnostics.contains("SLME_SOLAR_SPECTRUM"), "stderr: {diagnostics}");
}

#[test]
fn invalid_arguments_exit_with_usage_error() {
    let output = run_slme(&["sq", "--gap", "not-a-number"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ERROR: [INPUT.CLI_USAGE]"));
}

#[test]
fn spectrum_command_summarizes_reference() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sun = temp.path().join("sun.dat");
    let config = temp.path().join("config.json");
    write_flat_sun(&sun);
    write_file(
        &config,
        &serde_json::json!({ "solarSpectrumPath": sun }).to_string(),
    );

    let output = run_slme(&["spectrum", "--config", config.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let summary: Value = serde_json::from_str(&stdout(&output)).expect("summary JSON");
    assert_eq!(summary["samples"].as_u64(), Some(441));
    let power_in = summary["powerIn"].as_f64().expect("power");
    assert!((power_in - 2200.0).abs() < 1.0e-6, "power_in={power_in}");
    let shortest = summary["wavelengthMinNm"].as_f64().expect("min wavelength");
    let longest = summary["wavelengthMaxNm"].as_f64().expect("max wavelength");
    assert!((shortest - 300.0).abs() < 1.0e-9, "shortest={shortest}");
    assert!((longest - 2500.0).abs() < 1.0e-9, "longest={longest}");
}
