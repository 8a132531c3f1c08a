//! Fit runner: ties together the archive, the timeslice lookup and the core.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use pcsfit::{
    EvaluationGrid, FitResult, KnotSet, ProfileComparison, SignalSource, Snapshot, fit_knots,
    fit_profile, knots_at, online_profile_at,
};

use crate::config::{JobConfig, SourceConfig};
use crate::parsers::parse_columns;

pub struct FitOutput {
    pub grid: EvaluationGrid,
    pub fit: FitResult,
    pub online: Option<Vec<f64>>,
    pub comparison: Option<ProfileComparison>,
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Snapshot::from_compressed(&bytes)?)
}

pub fn run_fit(job: &JobConfig) -> Result<FitOutput> {
    let options = job.fit.options();

    let (fit, online) = match &job.source {
        SourceConfig::Archive { archive, time } => {
            let snap = read_snapshot(archive)?;
            log::info!("Shot {} from {}", snap.shot(), archive.display());

            let names = job.channels.names();
            let slice = knots_at(&snap, &names, *time)?;
            log::info!(
                "Using timeslice {} at {:.0} ms ({} knots)",
                slice.index,
                slice.time,
                slice.knots.len()
            );

            let fit = match options.reduce {
                Some(_) => {
                    let (x, y) = slice.knots.into_parts();
                    fit_profile(&x, &y, &options)?
                }
                None => fit_knots(slice.knots, &options)?,
            };
            let online =
                online_profile_at(&snap, &names.online_profile, slice.time, options.grid.len())?;
            if online.is_none() {
                log::warn!("No online profile archived for this shot; writing offline fit only");
            }
            (fit, online)
        }
        SourceConfig::Curve { curve } => {
            let content = std::fs::read_to_string(curve)
                .with_context(|| format!("failed to read {}", curve.display()))?;
            let (x, y) = parse_columns(&content)?;
            log::info!("Raw curve {} ({} samples)", curve.display(), x.len());
            (fit_profile(&x, &y, &options)?, None)
        }
    };
    log::debug!("Knots: {:?}", fit.knots.x());

    let comparison = online
        .as_deref()
        .map(|on| ProfileComparison::between(&fit.profile, on))
        .transpose()?;

    Ok(FitOutput {
        grid: options.grid,
        fit,
        online,
        comparison,
    })
}

pub fn write_profile_csv(output: &FitOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_profile(output, &mut f)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

pub fn write_profile<W: Write>(output: &FitOutput, w: &mut W) -> Result<()> {
    match &output.online {
        Some(_) => writeln!(w, "psin,offline,online")?,
        None => writeln!(w, "psin,offline")?,
    }
    for (i, (g, v)) in output.grid.points().iter().zip(&output.fit.profile).enumerate() {
        match &output.online {
            Some(on) => writeln!(w, "{g},{v},{}", on[i])?,
            None => writeln!(w, "{g},{v}")?,
        }
    }
    Ok(())
}

pub fn write_knots<W: Write>(knots: &KnotSet, w: &mut W) -> Result<()> {
    writeln!(w, "psin,value")?;
    for (x, y) in knots.points() {
        writeln!(w, "{x},{y}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_curve_job_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let curve = dir.path().join("rotation.dat");
        std::fs::write(&curve, "# psin mhat\n0.0 0.0\n0.01 0.1\n0.6 1.0\n0.8 2.0\n").unwrap();

        let job = parse_config(&format!(
            "[source]\ncurve = {:?}\n[output]\ncsv = {:?}\n",
            curve.display().to_string(),
            dir.path().join("out/profile.csv").display().to_string()
        ))
        .unwrap();

        let output = run_fit(&job).unwrap();
        assert_eq!(output.fit.profile.len(), 121);
        assert_eq!(output.fit.profile[0], 0.0);
        assert!(output.comparison.is_none());

        write_profile_csv(&output, &job.output.csv).unwrap();
        let written = std::fs::read_to_string(&job.output.csv).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("psin,offline"));
        assert_eq!(lines.next(), Some("0,0"));
        assert_eq!(written.lines().count(), 122);
    }

    #[test]
    fn test_write_knots() {
        let knots = KnotSet::new(vec![0.0, 0.5], vec![1.0, 2.5]).unwrap();
        let mut buf = Vec::new();
        write_knots(&knots, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "psin,value\n0,1\n0.5,2.5\n");
    }
}
