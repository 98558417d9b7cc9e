//! Synthetic simulator output
//!
//! Propagates a point mass around a central body (central gravity only, fixed
//! step RK4) and writes the result in the simulator's file formats, so the
//! plotting pipeline can run without the simulator.

use crate::config::PlotConfig;
use crate::data::MetadataField;
use crate::error::{PlotError, Result};
use std::io::Write;

/// Earth gravitational parameter [km^3 s^-2]
pub const EARTH_GRAVITATIONAL_PARAMETER: f64 = 398_600.441_8;

/// Cell width used by the simulator's metadata writer
const METADATA_CELL_WIDTH: usize = 25;

/// Position [km] and velocity [km/s]
pub type State = [f64; 6];

/// Initial conditions and integration window of a sample run
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOrbit {
    pub gravitational_parameter: f64,
    pub initial_state: State,
    pub start_time: f64,
    pub end_time: f64,
    pub step: f64,
}

impl SampleOrbit {
    /// Circular orbit of the given radius, inclined about the x axis, over one period
    pub fn circular(radius_km: f64, inclination_deg: f64) -> Self {
        let mu = EARTH_GRAVITATIONAL_PARAMETER;
        let speed = (mu / radius_km).sqrt();
        let inclination = inclination_deg.to_radians();
        let period = 2.0 * std::f64::consts::PI * (radius_km.powi(3) / mu).sqrt();

        Self {
            gravitational_parameter: mu,
            initial_state: [
                radius_km,
                0.0,
                0.0,
                0.0,
                speed * inclination.cos(),
                speed * inclination.sin(),
            ],
            start_time: 0.0,
            end_time: period,
            step: 10.0,
        }
    }

    /// Integrate from start to end time; the last step is shortened to land on the end time
    pub fn propagate(&self) -> Result<Vec<(f64, State)>> {
        if !(self.step > 0.0) || self.end_time < self.start_time {
            return Err(PlotError::InvalidConfig(format!(
                "invalid integration window [{}, {}] with step {}",
                self.start_time, self.end_time, self.step
            )));
        }

        let mut t = self.start_time;
        let mut state = self.initial_state;
        let mut history = vec![(t, state)];

        while t < self.end_time {
            let h = self.step.min(self.end_time - t);
            state = rk4_step(self.gravitational_parameter, &state, h);
            t += h;
            history.push((t, state));
        }

        Ok(history)
    }

    /// Write the metadata file in the simulator's padded `name, value, unit` layout
    pub fn write_metadata<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let [x, y, z, vx, vy, vz] = self.initial_state;
        let values = [
            (MetadataField::GravitationalParameter, self.gravitational_parameter, "km^3 s^-2"),
            (MetadataField::InitialX, x, "km"),
            (MetadataField::InitialY, y, "km"),
            (MetadataField::InitialZ, z, "km"),
            (MetadataField::InitialVx, vx, "km s^-1"),
            (MetadataField::InitialVy, vy, "km s^-1"),
            (MetadataField::InitialVz, vz, "km s^-1"),
            (MetadataField::StartTime, self.start_time, "s"),
            (MetadataField::EndTime, self.end_time, "s"),
            (MetadataField::InitialStep, self.step, "s"),
        ];

        for (field, value, unit) in values {
            writeln!(
                out,
                "{:<w$},{:<w$},{:<w$}",
                field.key(),
                value,
                unit,
                w = METADATA_CELL_WIDTH
            )?;
        }
        Ok(())
    }
}

/// Central gravity acceleration at position `r`
pub fn central_gravity(mu: f64, r: [f64; 3]) -> [f64; 3] {
    let norm = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
    let k = -mu / (norm * norm * norm);
    [k * r[0], k * r[1], k * r[2]]
}

fn derivative(mu: f64, s: &State) -> State {
    let a = central_gravity(mu, [s[0], s[1], s[2]]);
    [s[3], s[4], s[5], a[0], a[1], a[2]]
}

fn rk4_step(mu: f64, s: &State, h: f64) -> State {
    let add = |base: &State, k: &State, f: f64| -> State {
        let mut out = *base;
        for i in 0..6 {
            out[i] += k[i] * f;
        }
        out
    };

    let k1 = derivative(mu, s);
    let k2 = derivative(mu, &add(s, &k1, h / 2.0));
    let k3 = derivative(mu, &add(s, &k2, h / 2.0));
    let k4 = derivative(mu, &add(s, &k3, h));

    let mut next = *s;
    for i in 0..6 {
        next[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// Write a state history with the simulator's `t,x,y,z,vx,vy,vz` header
pub fn write_state_history<W: Write>(out: W, history: &[(f64, State)]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["t", "x", "y", "z", "vx", "vy", "vz"])?;
    for (t, s) in history {
        let mut record = Vec::with_capacity(7);
        record.push(t.to_string());
        record.extend(s.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .map_err(|e| PlotError::io("<state history>", e))?;
    Ok(())
}

/// Config text pointing at sample files, with comments like a hand-written config
pub fn config_text(config: &PlotConfig) -> String {
    format!(
        "// Generated by sample_orbit\n{{\n    // Simulator output\n    \"metadata\"       : {},\n    \"state_history\"  : {},\n\n    // Figure output\n    \"figure\"         : {},\n    \"figure_dpi\"     : {},\n    \"show_3D_figure\" : {}\n}}\n",
        json_string(&config.metadata.display().to_string()),
        json_string(&config.state_history.display().to_string()),
        json_string(&config.figure.display().to_string()),
        config.figure_dpi,
        config.show_3d_figure
    )
}

fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
