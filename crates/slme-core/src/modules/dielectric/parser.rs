use super::model::{DielectricData, DielectricTensor};
use crate::domain::{SlmeError, SlmeResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub fn load_dielectric_data(path: &Path) -> SlmeResult<DielectricData> {
    let source = fs::read_to_string(path).map_err(|source| {
        SlmeError::parse_failure(
            "IO.DIELECTRIC_READ",
            format!("failed to read dielectric data '{}': {}", path.display(), source),
        )
    })?;
    parse_dielectric_data(&source, &path.display().to_string())
}

pub fn load_dielectric_tensor(path: &Path) -> SlmeResult<DielectricTensor> {
    DielectricTensor::from_data(load_dielectric_data(path)?)
}

/// Malformed JSON is a parse failure; well-formed JSON in neither layout is a
/// format error.
pub fn parse_dielectric_data(source: &str, label: &str) -> SlmeResult<DielectricData> {
    let value: serde_json::Value = serde_json::from_str(source).map_err(|source| {
        SlmeError::parse_failure(
            "IO.DIELECTRIC_PARSE",
            format!("dielectric data '{label}' is not valid JSON: {source}"),
        )
    })?;
    DielectricData::deserialize(value).map_err(|_| {
        SlmeError::format(
            "INPUT.DIELECTRIC_FORMAT",
            format!(
                "dielectric data '{label}' must carry 'energies' with either 'real'/'imag' component rows or 'tensors'"
            ),
        )
    })
}
