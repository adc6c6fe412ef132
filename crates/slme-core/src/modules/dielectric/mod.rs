//! Complex dielectric tensors and the absorption coefficient derived from them.

mod model;
mod parser;

pub use model::{
    ComplexPair, DielectricData, DielectricTensor, absorption_coefficient,
    absorption_from_dielectric,
};
pub use parser::{load_dielectric_data, load_dielectric_tensor, parse_dielectric_data};
