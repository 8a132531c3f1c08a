use crate::archive::SignalSource;
use crate::constants::{FIT_CHANNELS, ONLINE_PROFILE_FIRST_SHOT};
use crate::error::{FitError, InputError, Result};
use crate::knots::KnotSet;

/// Archive signal names for one fitted quantity.
///
/// Knot channels are numbered from 1: `{knot_x_prefix}1`, `{knot_x_prefix}2`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelNames {
    pub count: String,
    pub knot_x_prefix: String,
    pub knot_y_prefix: String,
    pub channels: usize,
    pub online_profile: String,
}

impl Default for ChannelNames {
    /// Rotation fit: `ftssn` knot count, `ftsspsin{i}` flux, `ftssmhat{i}` rotation.
    fn default() -> Self {
        ChannelNames {
            count: "ftssn".into(),
            knot_x_prefix: "ftsspsin".into(),
            knot_y_prefix: "ftssmhat".into(),
            channels: FIT_CHANNELS,
            online_profile: "ftxpr".into(),
        }
    }
}

impl ChannelNames {
    pub fn knot_x(&self, i: usize) -> String {
        format!("{}{}", self.knot_x_prefix, i)
    }

    pub fn knot_y(&self, i: usize) -> String {
        format!("{}{}", self.knot_y_prefix, i)
    }
}

/// The knots the control system fitted at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeslice {
    pub index: usize,
    pub time: f64,
    pub knots: KnotSet,
}

/// Picks the sample to fit at for a requested time `t`.
///
/// Only samples with a nonzero knot count are candidates. The nearest such
/// sample time is found first, then the index of the sample nearest that
/// time is returned.
pub fn nearest_populated_index(times: &[f64], counts: &[f64], t: f64) -> Result<usize> {
    if times.len() != counts.len() {
        return Err(InputError::LengthMismatch {
            x: times.len(),
            y: counts.len(),
        }
        .into());
    }
    let populated = times
        .iter()
        .zip(counts)
        .filter(|(_, c)| **c != 0.0)
        .map(|(&time, _)| time);
    let target = argmin_by_distance(populated, t).ok_or(FitError::NoPopulatedTimeslice)?;
    argmin_index(times, target).ok_or(FitError::NoPopulatedTimeslice)
}

/// Reads the knots fitted nearest time `t` (in the archive's time units).
pub fn knots_at<S: SignalSource + ?Sized>(
    source: &S,
    names: &ChannelNames,
    t: f64,
) -> Result<Timeslice> {
    let counts = source.signal(&names.count)?;
    let index = nearest_populated_index(&counts.times, &counts.data, t)?;
    let n = (counts.data[index].max(0.0) as usize).min(names.channels);

    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 1..=n {
        x.push(sample(source, &names.knot_x(i), index)?);
        y.push(sample(source, &names.knot_y(i), index)?);
    }

    Ok(Timeslice {
        index,
        time: counts.times[index],
        knots: KnotSet::new(x, y)?,
    })
}

/// The profile the control system produced nearest time `t`, if archived.
///
/// The online signal is stored flat, `points` values per row; rows beyond
/// the stored timestamps are ignored. Shots before
/// [`ONLINE_PROFILE_FIRST_SHOT`] never carry it.
pub fn online_profile_at<S: SignalSource + ?Sized>(
    source: &S,
    name: &str,
    t: f64,
    points: usize,
) -> Result<Option<Vec<f64>>> {
    if source.shot() <= ONLINE_PROFILE_FIRST_SHOT || points == 0 {
        return Ok(None);
    }
    let signal = match source.signal(name) {
        Ok(signal) => signal,
        Err(FitError::UnknownSignal(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    let rows = (signal.data.len() / points).min(signal.times.len());
    let Some(row) = argmin_index(&signal.times[..rows], t) else {
        return Ok(None);
    };
    Ok(Some(signal.data[row * points..(row + 1) * points].to_vec()))
}

fn sample<S: SignalSource + ?Sized>(source: &S, name: &str, index: usize) -> Result<f64> {
    let signal = source.signal(name)?;
    signal.data.get(index).copied().ok_or_else(|| {
        FitError::DataError(format!(
            "{name} has {} samples, needed index {index}",
            signal.data.len()
        ))
    })
}

fn argmin_by_distance(values: impl Iterator<Item = f64>, t: f64) -> Option<f64> {
    values.fold(None, |best: Option<f64>, v| match best {
        Some(b) if (b - t).abs() <= (v - t).abs() => Some(b),
        _ => Some(v),
    })
}

fn argmin_index(values: &[f64], t: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| {
            let d = (v - t).abs();
            match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            }
        })
        .map(|(i, _)| i)
}
