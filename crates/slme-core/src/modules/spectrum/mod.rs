mod model;
mod solar;

pub use model::{
    RadiationSpectrum, SpectralVariable, SpectrumUnits, blackbody_photon_flux_per_ev,
    blackbody_photon_flux_per_m,
};
pub use solar::{
    DEFAULT_SOLAR_SPECTRUM_PATH, SOLAR_SPECTRUM_ENV, SOLAR_SPECTRUM_HEADER_LINES,
    SolarReference, SolarReferenceHandle, load_solar_reference, photon_flux_per_nm,
    resolve_solar_spectrum_path,
};
