//! Physical constants in natural units (GeV) plus unit conversions.

/// Fermi coupling constant in GeV^-2.
pub const FERMI_CONSTANT: f64 = 1.1663787e-5;
/// Electron mass in GeV.
pub const ELECTRON_MASS: f64 = 0.51099895e-3;
/// Muon mass in GeV.
pub const MUON_MASS: f64 = 0.1056583755;
/// Tau mass in GeV.
pub const TAU_MASS: f64 = 1.77686;
/// Proton mass in GeV.
pub const PROTON_MASS: f64 = 0.938272088;
/// Neutron mass in GeV.
pub const NEUTRON_MASS: f64 = 0.939565420;
/// Mass of an isoscalar nucleon, the proton/neutron average, in GeV.
pub const ISOSCALAR_MASS: f64 = 0.5 * (PROTON_MASS + NEUTRON_MASS);
/// Conversion factor from GeV^-2 to cm^2.
pub const INV_GEV_SQ_TO_CM_SQ: f64 = 0.389379372e-27;
/// Avogadro's number in mol^-1.
pub const AVOGADRO: f64 = 6.02214076e23;
/// Effective weak coupling `C_LR = sin^2(theta_W)` used by neutrino-electron scattering.
pub const WEAK_MIXING_CLR: f64 = 0.2334;
