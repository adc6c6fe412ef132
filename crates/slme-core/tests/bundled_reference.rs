use slme_core::modules::efficiency::{
    BandGapPair, EfficiencyCalculator, SlmeInput, SqInput, shockley_queisser_limit,
    shockley_queisser_limit_bundled, slme, slme_bundled,
};
use slme_core::modules::spectrum::{
    SOLAR_SPECTRUM_ENV, SolarReference, SolarReferenceHandle, load_solar_reference,
};
use slme_core::{DielectricTensor, RadiationSpectrum};
use std::fs;
use tempfile::TempDir;

/// Flat 0.5 W m^-2 nm^-1 sun from 300 to 2500 nm in the two-header table layout.
fn write_flat_sun(path: &std::path::Path) {
    let mut table = String::from("flat test spectrum\nwavelength_nm irradiance\n");
    for wavelength in (300..=2500).step_by(2) {
        table.push_str(&format!("{wavelength}.0 0.5\n"));
    }
    fs::write(path, table).expect("sun table should be written");
}

fn step_absorber(gap: f64) -> (Vec<f64>, Vec<f64>) {
    let energies: Vec<f64> = (1..=500).map(|index| 0.01 * index as f64).collect();
    let absorption = energies
        .iter()
        .map(|energy| if *energy >= gap { 1.0e7 } else { 0.0 })
        .collect();
    (energies, absorption)
}

fn step_dielectric(gap: f64) -> DielectricTensor {
    let energies: Vec<f64> = (1..=500).map(|index| 0.01 * index as f64).collect();
    let (real, imag): (Vec<Vec<f64>>, Vec<Vec<f64>>) = energies
        .iter()
        .map(|energy| {
            let loss = if *energy >= gap { 4.0 } else { 0.0 };
            (
                vec![12.0, 12.0, 12.0, 0.0, 0.0, 0.0],
                vec![loss, loss, loss, 0.0, 0.0, 0.0],
            )
        })
        .unzip();
    DielectricTensor::from_components(energies, &real, &imag).expect("dielectric")
}

// The process-wide reference is cached on first use, so every lookup through
// it lives in this one test with the environment set up front.
#[test]
fn process_wide_reference_follows_the_environment_variable() {
    let temp = TempDir::new().expect("tempdir should be created");
    let path = temp.path().join("am1.5g.dat");
    write_flat_sun(&path);
    // SAFETY: this binary runs a single test, so no other thread reads the environment.
    unsafe { std::env::set_var(SOLAR_SPECTRUM_ENV, &path) };

    let explicit = SolarReference::load(&path).expect("explicit reference");
    let shared = load_solar_reference(None).expect("shared reference");
    assert!(matches!(shared, SolarReferenceHandle::Shared(_)));
    assert_eq!(shared.len(), explicit.len());
    assert_eq!(shared.power_in(), explicit.power_in());

    let spectrum = RadiationSpectrum::am15g().expect("process-wide spectrum");
    assert_eq!(
        spectrum,
        RadiationSpectrum::from_solar_reference(&explicit).expect("explicit spectrum")
    );

    let sq_input = SqInput::new(1.3, 300.0);
    assert_eq!(
        shockley_queisser_limit_bundled(&sq_input).expect("bundled sq"),
        shockley_queisser_limit(&explicit, &sq_input).expect("explicit sq")
    );

    let (energies, absorption) = step_absorber(1.3);
    let mut slme_input =
        SlmeInput::new(energies, absorption, BandGapPair::direct(1.3).expect("gaps"));
    slme_input.temperature = 300.0;
    let bundled = slme_bundled(&slme_input).expect("bundled slme");
    assert_eq!(bundled, slme(&explicit, &slme_input).expect("explicit slme"));
    assert!(bundled.efficiency > 0.0);

    let calculator = EfficiencyCalculator::new(
        step_dielectric(1.3),
        BandGapPair::direct(1.3).expect("gaps"),
    );
    assert_eq!(
        calculator.sq(300.0).expect("bundled calculator sq"),
        calculator.sq_with(&explicit, 300.0).expect("explicit calculator sq")
    );
    assert_eq!(
        calculator.slme(300.0, 1.0e-6).expect("bundled calculator slme"),
        calculator
            .slme_with(&explicit, 300.0, 1.0e-6)
            .expect("explicit calculator slme")
    );
}
