//! Wilson plot coordinates

use crate::ResolutionBin;
use serde::Serialize;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

/// Resolution standing for a whole shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Representative {
    /// The shell limit
    #[default]
    High,
    Low,
    /// sqrt(low x high)
    #[strum(serialize = "mean")]
    GeometricMean,
}
impl Representative {
    /// Returns the shell resolution [Å]
    pub fn resolution(&self, bin: &ResolutionBin) -> f64 {
        match self {
            Representative::High => bin.high(),
            Representative::Low => bin.low(),
            Representative::GeometricMean => (bin.low() * bin.high()).sqrt(),
        }
    }
}

/// A point of the Wilson plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WilsonPoint {
    /// shell resolution [Å]
    #[serde(rename = "d (A)")]
    pub resolution: f64,
    /// 1/d^2 [Å^-2]
    #[serde(rename = "1/d^2 (A^-2)")]
    pub x: f64,
    /// ln(<I>)
    #[serde(rename = "ln<I>")]
    pub y: f64,
}
impl WilsonPoint {
    /// Transforms a shell, if both its resolution and its mean intensity are positive
    pub fn from_bin(bin: &ResolutionBin, representative: Representative) -> Option<Self> {
        let d = representative.resolution(bin);
        let intensity = bin.mean_intensity();
        if !(d > 0f64 && d.is_finite() && intensity > 0f64 && intensity.is_finite()) {
            return None;
        }
        Some(Self {
            resolution: d,
            x: (d * d).recip(),
            y: intensity.ln(),
        })
    }
}

/// Wilson plot points of the resolution shells, in shell order
///
/// Shells with a non-positive resolution or mean intensity are left out.
pub fn points(bins: &[ResolutionBin], representative: Representative) -> Vec<WilsonPoint> {
    bins.iter()
        .filter_map(|bin| {
            let point = WilsonPoint::from_bin(bin, representative);
            if point.is_none() {
                log::debug!(
                    "skipping shell {:.2}-{:.2}Å with <I>={}",
                    bin.low(),
                    bin.high(),
                    bin.mean_intensity()
                );
            }
            point
        })
        .collect()
}

/// Writes the Wilson plot points to a CSV file
pub fn to_csv<P: AsRef<Path>>(points: &[WilsonPoint], path: P) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    for point in points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn bins() -> Vec<ResolutionBin> {
        vec![
            ResolutionBin::new(20.0, 10.0, 500.0),
            ResolutionBin::new(10.0, 5.0, 50.0),
            ResolutionBin::new(5.0, 3.0, -1.0),
        ]
    }

    #[test]
    fn non_positive_intensity() {
        let points = points(&bins(), Representative::High);
        assert_eq!(points.len(), 2);
        assert!((points[0].x - 0.01).abs() < 1e-12);
        assert!((points[1].x - 0.04).abs() < 1e-12);
        assert!((points[0].y - 6.215).abs() < 1e-3);
        assert!((points[1].y - 3.912).abs() < 1e-3);
    }

    #[test]
    fn zero_resolution() {
        let bins = vec![
            ResolutionBin::new(0.0, 0.0, 100.0),
            ResolutionBin::new(4.0, 2.0, 100.0),
        ];
        let points = points(&bins, Representative::High);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].resolution, 2.0);
        assert!((points[0].x - 0.25).abs() < 1e-12);
    }

    #[test]
    fn low_and_mean_resolution() {
        let bin = ResolutionBin::new(8.0, 2.0, 1.0);
        let low = WilsonPoint::from_bin(&bin, Representative::Low).unwrap();
        assert!((low.x - 1. / 64.).abs() < 1e-12);
        assert_eq!(low.y, 0.0);
        let mean = WilsonPoint::from_bin(&bin, Representative::GeometricMean).unwrap();
        assert!((mean.resolution - 4.0).abs() < 1e-12);
    }

    #[test]
    fn representative_names() {
        let names: Vec<_> = Representative::iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["high", "low", "mean"]);
        assert_eq!(
            "mean".parse::<Representative>().unwrap(),
            Representative::GeometricMean
        );
        assert!("median".parse::<Representative>().is_err());
    }

    #[test]
    fn csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wilson.csv");
        to_csv(&points(&bins(), Representative::High), &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "d (A),1/d^2 (A^-2),ln<I>");
        assert!(lines[1].starts_with("10.0,0.01,"));
    }
}
