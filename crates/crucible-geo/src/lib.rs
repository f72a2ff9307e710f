//! Earth math for the CRUCIBLE simulation: WGS84 geodesy, reference frames,
//! the US Standard Atmosphere, and two-body orbital mechanics.

pub mod atmosphere;
pub mod frames;
pub mod geodesy;
pub mod orbit;
