use crate::support::micromet::resistance::ResistanceForm;

use super::{Canopy, Input, Meteorology, Shortwave, SoilHeatFlux, Surface, Temperatures};

pub(crate) fn resistance() -> ResistanceForm {
    ResistanceForm::default()
}

/// A warm, sunlit bare field for the single-source model.
pub(crate) fn bare_soil() -> Input {
    Input {
        temperatures: Temperatures::SingleSource {
            t_surface: vec![305.0],
        },
        meteorology: meteorology(),
        shortwave: Shortwave {
            canopy: vec![0.0],
            soil: vec![400.0],
        },
        canopy: Canopy {
            lai: vec![0.0],
            f_c: vec![0.0],
            ..canopy()
        },
        surface: Surface {
            emis_s: vec![0.96],
            z0_soil: vec![0.01],
            z_0m: vec![0.01],
            d_0: vec![0.05],
            z_u: vec![2.0],
            z_t: vec![2.0],
        },
        soil_heat_flux: SoilHeatFlux::Ratio(vec![0.35]),
    }
}

/// A dense, fully green crop viewed at nadir, slightly warmer than the air.
pub(crate) fn vegetated() -> Input {
    Input {
        temperatures: Temperatures::PriestleyTaylor {
            t_radiometric: vec![301.0],
            vza: vec![0.0],
        },
        meteorology: meteorology(),
        shortwave: Shortwave {
            canopy: vec![320.0],
            soil: vec![80.0],
        },
        canopy: canopy(),
        surface: Surface {
            emis_s: vec![0.95],
            z0_soil: vec![0.01],
            z_0m: vec![0.125],
            d_0: vec![0.65],
            z_u: vec![5.0],
            z_t: vec![5.0],
        },
        soil_heat_flux: SoilHeatFlux::Ratio(vec![0.35]),
    }
}

/// Repeats every element of `input` `n` times over.
pub(crate) fn repeat(input: &Input, n: usize) -> Input {
    let rep = |values: &[f64]| -> Vec<f64> {
        values
            .iter()
            .copied()
            .cycle()
            .take(values.len() * n)
            .collect()
    };

    Input {
        temperatures: match &input.temperatures {
            Temperatures::SingleSource { t_surface } => Temperatures::SingleSource {
                t_surface: rep(t_surface),
            },
            Temperatures::PriestleyTaylor { t_radiometric, vza } => Temperatures::PriestleyTaylor {
                t_radiometric: rep(t_radiometric),
                vza: rep(vza),
            },
            Temperatures::DualTimeDifference {
                t_radiometric_0,
                t_radiometric_1,
                t_air_0,
                vza,
            } => Temperatures::DualTimeDifference {
                t_radiometric_0: rep(t_radiometric_0),
                t_radiometric_1: rep(t_radiometric_1),
                t_air_0: rep(t_air_0),
                vza: rep(vza),
            },
            Temperatures::Components { t_canopy, t_soil } => Temperatures::Components {
                t_canopy: rep(t_canopy),
                t_soil: rep(t_soil),
            },
        },
        meteorology: Meteorology {
            t_air: rep(&input.meteorology.t_air),
            u: rep(&input.meteorology.u),
            ea: rep(&input.meteorology.ea),
            p: rep(&input.meteorology.p),
            l_dn: rep(&input.meteorology.l_dn),
        },
        shortwave: Shortwave {
            canopy: rep(&input.shortwave.canopy),
            soil: rep(&input.shortwave.soil),
        },
        canopy: Canopy {
            lai: rep(&input.canopy.lai),
            h_c: rep(&input.canopy.h_c),
            f_c: rep(&input.canopy.f_c),
            w_c: rep(&input.canopy.w_c),
            f_g: rep(&input.canopy.f_g),
            x_lad: rep(&input.canopy.x_lad),
            omega0: rep(&input.canopy.omega0),
            leaf_width: rep(&input.canopy.leaf_width),
            emis_c: rep(&input.canopy.emis_c),
            alpha_pt: rep(&input.canopy.alpha_pt),
        },
        surface: Surface {
            emis_s: rep(&input.surface.emis_s),
            z0_soil: rep(&input.surface.z0_soil),
            z_0m: rep(&input.surface.z_0m),
            d_0: rep(&input.surface.d_0),
            z_u: rep(&input.surface.z_u),
            z_t: rep(&input.surface.z_t),
        },
        soil_heat_flux: match &input.soil_heat_flux {
            SoilHeatFlux::Constant(g) => SoilHeatFlux::Constant(rep(g)),
            SoilHeatFlux::Ratio(fractions) => SoilHeatFlux::Ratio(rep(fractions)),
            SoilHeatFlux::TimePhase { time, shape } => SoilHeatFlux::TimePhase {
                time: rep(time),
                shape: *shape,
            },
        },
    }
}

fn meteorology() -> Meteorology {
    Meteorology {
        t_air: vec![300.0],
        u: vec![2.0],
        ea: vec![15.0],
        p: vec![1013.0],
        l_dn: vec![350.0],
    }
}

fn canopy() -> Canopy {
    Canopy {
        lai: vec![3.0],
        h_c: vec![1.0],
        f_c: vec![1.0],
        w_c: vec![1.0],
        f_g: vec![1.0],
        x_lad: vec![1.0],
        omega0: vec![1.0],
        leaf_width: vec![0.1],
        emis_c: vec![0.98],
        alpha_pt: vec![1.26],
    }
}
