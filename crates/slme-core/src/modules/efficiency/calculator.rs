use super::band_gaps::BandGapPair;
use super::diode::VoltageClimb;
use super::engine::{
    EfficiencyReport, SlmeInput, SqInput, shockley_queisser_limit, shockley_queisser_limit_bundled,
    slme, slme_bundled,
};
use crate::common::EfficiencyConfig;
use crate::domain::SlmeResult;
use crate::modules::dielectric::DielectricTensor;
use crate::modules::spectrum::SolarReference;

/// Efficiency metrics for one material: its dielectric response and gaps.
#[derive(Debug, Clone)]
pub struct EfficiencyCalculator {
    dielectric: DielectricTensor,
    band_gaps: BandGapPair,
    config: EfficiencyConfig,
}

impl EfficiencyCalculator {
    pub fn new(dielectric: DielectricTensor, band_gaps: BandGapPair) -> Self {
        Self {
            dielectric,
            band_gaps,
            config: EfficiencyConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EfficiencyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dielectric(&self) -> &DielectricTensor {
        &self.dielectric
    }

    pub fn band_gaps(&self) -> BandGapPair {
        self.band_gaps
    }

    /// Shockley-Queisser limit of the fundamental gap.
    pub fn sq(&self, temperature: f64) -> SlmeResult<EfficiencyReport> {
        shockley_queisser_limit_bundled(&self.sq_input(temperature))
    }

    pub fn sq_with(
        &self,
        reference: &SolarReference,
        temperature: f64,
    ) -> SlmeResult<EfficiencyReport> {
        shockley_queisser_limit(reference, &self.sq_input(temperature))
    }

    pub fn slme(&self, temperature: f64, thickness: f64) -> SlmeResult<EfficiencyReport> {
        slme_bundled(&self.slme_input(temperature, thickness)?)
    }

    pub fn slme_with(
        &self,
        reference: &SolarReference,
        temperature: f64,
        thickness: f64,
    ) -> SlmeResult<EfficiencyReport> {
        slme(reference, &self.slme_input(temperature, thickness)?)
    }

    fn sq_input(&self, temperature: f64) -> SqInput {
        SqInput::new(self.band_gaps.fundamental, temperature)
            .with_climb(VoltageClimb::from_config(&self.config))
    }

    fn slme_input(&self, temperature: f64, thickness: f64) -> SlmeResult<SlmeInput> {
        let absorption = self.dielectric.absorption_coefficient()?;
        let mut input = SlmeInput::from_config(
            self.dielectric.energies().to_vec(),
            absorption,
            self.band_gaps,
            &self.config,
        );
        input.temperature = temperature;
        input.thickness = thickness;
        input.absorbance_in_inverse_cm = false;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::EfficiencyCalculator;
    use crate::modules::dielectric::DielectricTensor;
    use crate::modules::efficiency::{BandGapPair, SqInput, shockley_queisser_limit};
    use crate::modules::spectrum::SolarReference;

    fn flat_sun() -> SolarReference {
        let wavelength_nm: Vec<f64> = (300..=2500).map(f64::from).collect();
        let irradiance = vec![1000.0 / 2200.0; wavelength_nm.len()];
        SolarReference::from_columns(wavelength_nm, irradiance).expect("flat sun")
    }

    /// Isotropic medium with `eps = 12 + 4i` above `gap` and lossless below.
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

    #[test]
    fn sq_uses_the_fundamental_gap() {
        let sun = flat_sun();
        let calculator = EfficiencyCalculator::new(
            step_dielectric(1.4),
            BandGapPair::new(1.2, 1.4).expect("gaps"),
        );
        let report = calculator.sq_with(&sun, 300.0).expect("sq");
        let expected = shockley_queisser_limit(&sun, &SqInput::new(1.2, 300.0)).expect("direct sq");
        assert_eq!(report, expected);
    }

    #[test]
    fn thick_film_slme_approaches_sq_for_a_direct_gap() {
        let sun = flat_sun();
        let gaps = BandGapPair::direct(1.4).expect("gaps");
        let calculator = EfficiencyCalculator::new(step_dielectric(1.4), gaps);
        let slme = calculator.slme_with(&sun, 300.0, 1.0e-3).expect("slme");
        let sq = calculator.sq_with(&sun, 300.0).expect("sq");
        assert!(
            (slme.efficiency - sq.efficiency).abs() <= 5.0e-3,
            "slme={} sq={}",
            slme.efficiency,
            sq.efficiency
        );
    }
}
