//! DC power conversion (PVWatts model).

/// Estimated instantaneous DC power (kW) from POA irradiance and cell
/// temperature:
///
/// `P = capacity_kw * (poa/1000) * (1 + gamma_pdc * (T_cell - 25))`
///
/// The multiplicative irradiance term already forces 0 at night; the final
/// clamp only guards against a pathological positive-gamma / hot-cell
/// combination producing a small negative value.
pub fn pvwatts_dc(poa_global: f64, cell_temp_c: f64, capacity_kw: f64, gamma_pdc: f64) -> f64 {
    let p = capacity_kw * (poa_global / 1000.0) * (1.0 + gamma_pdc * (cell_temp_c - 25.0));
    // Not `f64::max`: that would quietly turn an undefined (NaN) sample into 0.
    if p < 0.0 { 0.0 } else { p }
}
