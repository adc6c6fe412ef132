pub mod dielectric;
pub mod efficiency;
pub mod spectrum;
