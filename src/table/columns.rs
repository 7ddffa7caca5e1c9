use super::ResolutionBin;

/// Meaning of a resolution table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Low,
    High,
    MeanIntensity,
    Completeness,
    IOverSigma,
}
impl Role {
    /// Matches a header token against the column names used across program versions
    fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        let name = name
            .strip_suffix("(a)")
            .or_else(|| name.strip_suffix("(å)"))
            .unwrap_or(&name);
        match name {
            "dmax" | "d_max" | "res_low" | "lowres" | "low" => Some(Role::Low),
            "dmin" | "d_min" | "res_high" | "highres" | "high" | "resol" => Some(Role::High),
            "<i>" | "mean_i" | "meani" | "mn(i)" => Some(Role::MeanIntensity),
            "compl" | "%compl" | "completeness" | "cmpl" => Some(Role::Completeness),
            "<i/sigma>" | "<i/sigi>" | "i/sigi" | "i/sigma" | "mn(i/sd)" => Some(Role::IOverSigma),
            _ => None,
        }
    }
}

/// Splits a table line into fields, dropping the loggraph `$` delimiters
pub(super) fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace()
        .map(|field| field.trim_end_matches('$'))
        .filter(|field| !field.is_empty())
        .collect()
}

/// Header fields, without the units written as separate tokens
fn header_fields(line: &str) -> Vec<&str> {
    fields(line)
        .into_iter()
        .filter(|field| !matches!(field.to_lowercase().as_str(), "(a)" | "(å)"))
        .collect()
}

/// Column layout read from a table header line
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Columns {
    count: usize,
    low: usize,
    high: usize,
    mean_intensity: usize,
    completeness: Option<usize>,
    i_over_sigma: Option<usize>,
}
impl Columns {
    /// Returns the layout if the line names the low & high bounds and the mean intensity
    ///
    /// When a role appears more than once, the leftmost column is kept.
    pub fn from_header(line: &str) -> Option<Self> {
        let names = header_fields(line);
        let position = |role: Role| {
            names
                .iter()
                .position(|&name| Role::from_name(name) == Some(role))
        };
        Some(Self {
            count: names.len(),
            low: position(Role::Low)?,
            high: position(Role::High)?,
            mean_intensity: position(Role::MeanIntensity)?,
            completeness: position(Role::Completeness),
            i_over_sigma: position(Role::IOverSigma),
        })
    }
    /// Number of fields expected in every row
    pub fn count(&self) -> usize {
        self.count
    }
    /// Converts the fields of a data row into a [ResolutionBin]
    ///
    /// The error is a description of the offending field.
    pub fn bin(&self, fields: &[&str]) -> Result<ResolutionBin, String> {
        if fields.len() != self.count {
            return Err(format!(
                "expected {} fields, found {}",
                self.count,
                fields.len()
            ));
        }
        let number = |index: usize, name: &str| {
            fields[index]
                .parse::<f64>()
                .map_err(|_| format!("{} field {:?} is not a number", name, fields[index]))
        };
        // auxiliary columns may hold placeholders such as "-" or "*"
        let optional = |index: Option<usize>| index.and_then(|i| fields[i].parse::<f64>().ok());
        let mut bin = ResolutionBin::new(
            number(self.low, "low resolution")?,
            number(self.high, "high resolution")?,
            number(self.mean_intensity, "mean intensity")?,
        );
        if let Some(value) = optional(self.completeness) {
            bin = bin.with_completeness(value);
        }
        if let Some(value) = optional(self.i_over_sigma) {
            bin = bin.with_i_over_sigma(value);
        }
        Ok(bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loggraph_header() {
        let columns =
            Columns::from_header(" N 1/resol^2  Dmax(A)  Dmin(A)  Nref  <I>  <I/sigma>  Compl $$")
                .unwrap();
        assert_eq!(columns.count(), 8);
        assert_eq!((columns.low, columns.high, columns.mean_intensity), (2, 3, 5));
        assert_eq!(columns.i_over_sigma, Some(6));
        assert_eq!(columns.completeness, Some(7));
    }

    #[test]
    fn unit_tokens_in_header() {
        let columns = Columns::from_header("  Dmax (A)  Dmin (Å)  <I>").unwrap();
        assert_eq!(columns.count(), 3);
        let bin = columns.bin(&["20.0", "10.0", "500.0"]).unwrap();
        assert_eq!(bin.high(), 10.0);
    }

    #[test]
    fn glued_delimiter() {
        assert_eq!(fields("  1  20.0  10.0  98.7$$"), vec!["1", "20.0", "10.0", "98.7"]);
        assert_eq!(fields(" $$ "), Vec::<&str>::new());
    }

    #[test]
    fn header_without_intensity() {
        assert!(Columns::from_header("  N  Dmax  Dmin  Nref").is_none());
    }

    #[test]
    fn prose_is_not_a_header() {
        assert!(Columns::from_header("$GRAPHS: Mn(I) v resolution:N:2,6:").is_none());
    }

    #[test]
    fn placeholder_in_auxiliary_column() {
        let columns = Columns::from_header("Low High Mean_I Cmpl").unwrap();
        let bin = columns.bin(&["20.0", "10.0", "500.0", "-"]).unwrap();
        assert_eq!(bin.completeness(), None);
        assert_eq!(bin.mean_intensity(), 500.0);
    }

    #[test]
    fn wrong_field_count() {
        let columns = Columns::from_header("Low High Mean_I").unwrap();
        let err = columns.bin(&["20.0", "10.0"]).unwrap_err();
        assert_eq!(err, "expected 3 fields, found 2");
    }
}
