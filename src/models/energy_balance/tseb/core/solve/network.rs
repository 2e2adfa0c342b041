//! Series resistance network between soil, canopy and the atmosphere
//! (Norman et al., 1995).
//!
//! Soil and canopy exchange heat with the canopy-air space through `R_S` and
//! `R_x`, and the canopy-air space exchanges with the atmosphere through `R_A`.

use crate::support::micromet::air::equilibrium_evaporation_fraction;

/// Resistances of the series network (s/m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Network {
    pub(super) r_a: f64,
    pub(super) r_x: f64,
    pub(super) r_s: f64,
}

impl Network {
    /// Temperature (K) of the canopy-air space, the conductance-weighted mean
    /// of air, soil and canopy temperature.
    pub(super) fn canopy_air_temperature(&self, t_a: f64, t_s: f64, t_c: f64) -> f64 {
        (t_a / self.r_a + t_s / self.r_s + t_c / self.r_x)
            / (1.0 / self.r_a + 1.0 / self.r_s + 1.0 / self.r_x)
    }

    /// Canopy temperature (K) consistent with radiometric temperature `t_r`,
    /// canopy sensible heat `h_c` and the network.
    ///
    /// Linearises the fourth-power mixing of canopy and soil radiance and adds
    /// one Newton correction.
    pub(super) fn canopy_temperature(
        &self,
        t_r: f64,
        t_a: f64,
        f_theta: f64,
        h_c: f64,
        rho_cp: f64,
    ) -> f64 {
        let Self { r_a, r_x, r_s } = *self;
        let canopy_drop = h_c * r_x / rho_cp;

        let t_c_lin = (t_a / r_a
            + t_r / (r_s * (1.0 - f_theta))
            + canopy_drop * (1.0 / r_a + 1.0 / r_s + 1.0 / r_x))
            / (1.0 / r_a + 1.0 / r_s + f_theta / (r_s * (1.0 - f_theta)));

        let t_d = t_c_lin * (1.0 + r_s / r_a)
            - canopy_drop * (1.0 + r_s / r_x + r_s / r_a)
            - t_a * r_s / r_a;

        let delta = (t_r.powi(4) - f_theta * t_c_lin.powi(4) - (1.0 - f_theta) * t_d.powi(4))
            / (4.0 * (1.0 - f_theta) * t_d.powi(3) * (1.0 + r_s / r_a)
                + 4.0 * f_theta * t_c_lin.powi(3));

        t_c_lin + delta
    }

    /// Total sensible heat (W/m²) driven by the morning-to-midday rise of
    /// radiometric temperature `delta_t_r` and of air temperature `delta_t_a`.
    pub(super) fn time_difference_sensible_heat(
        &self,
        delta_t_r: f64,
        delta_t_a: f64,
        f_theta: f64,
        h_c: f64,
        rho_cp: f64,
    ) -> f64 {
        let Self { r_a, r_x, r_s } = *self;
        let soil_path = (1.0 - f_theta) * (r_a + r_s);
        rho_cp * (delta_t_r - delta_t_a) / soil_path + h_c * (1.0 - f_theta * r_x / soil_path)
    }
}

/// Canopy sensible heat (W/m²) left after Priestley-Taylor transpiration at
/// coefficient `alpha` from the green fraction `f_g` of the canopy.
pub(super) fn priestley_taylor_canopy_heat(
    rn_c: f64,
    f_g: f64,
    alpha: f64,
    t_a: f64,
    p: f64,
    c_p: f64,
) -> f64 {
    rn_c * (1.0 - alpha * f_g * equilibrium_evaporation_fraction(t_a, p, c_p))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::micromet::air::heat_capacity;

    const NETWORK: Network = Network {
        r_a: 30.0,
        r_x: 10.0,
        r_s: 200.0,
    };

    #[test]
    fn isothermal_canopy_air() {
        assert_relative_eq!(NETWORK.canopy_air_temperature(300.0, 300.0, 300.0), 300.0);
        let t_ac = NETWORK.canopy_air_temperature(300.0, 310.0, 302.0);
        assert!(t_ac > 300.0 && t_ac < 310.0);
    }

    #[test]
    fn canopy_temperature_without_canopy_heat_on_uniform_scene() {
        // No sensible heat from the canopy and a scene at air temperature:
        // the canopy sits at air temperature too.
        let t_c = NETWORK.canopy_temperature(300.0, 300.0, 0.6, 0.0, 1200.0);
        assert_relative_eq!(t_c, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn warmer_canopy_when_it_loses_more_heat() {
        let cool = NETWORK.canopy_temperature(305.0, 300.0, 0.6, 20.0, 1200.0);
        let warm = NETWORK.canopy_temperature(305.0, 300.0, 0.6, 80.0, 1200.0);
        assert!(warm > cool);
    }

    #[test]
    fn no_temperature_rise_leaves_canopy_term() {
        let h = NETWORK.time_difference_sensible_heat(5.0, 5.0, 0.5, 40.0, 1200.0);
        let expected = 40.0 * (1.0 - 0.5 * 10.0 / (0.5 * 230.0));
        assert_relative_eq!(h, expected);
    }

    #[test]
    fn full_transpiration_leaves_less_canopy_heat() {
        let c_p = heat_capacity(1013.0, 15.0);
        let potential = priestley_taylor_canopy_heat(300.0, 1.0, 1.26, 300.0, 1013.0, c_p);
        let none = priestley_taylor_canopy_heat(300.0, 1.0, 0.0, 300.0, 1013.0, c_p);
        assert_relative_eq!(none, 300.0);
        assert!(potential < none);
    }
}
