use crate::data::model::SpectrumMetadata;

/// Turns the peak table into a human-readable report.
pub trait ReportFormatter {
    fn format(&self, metadata: &SpectrumMetadata, positions: &[f64]) -> String;

    /// Whether a report is produced at all for this spectrum.
    fn is_reportable(&self, metadata: &SpectrumMetadata) -> bool;
}

/// Journal-style chemical-shift listing, e.g.
/// `13C NMR (101 MHz, CDCl3) δ 77.16, 29.84.`
#[derive(Debug, Clone)]
pub struct ChemicalShiftReport {
    pub reportable_isotope: String,
    pub precision: usize,
}

impl Default for ChemicalShiftReport {
    fn default() -> Self {
        Self {
            reportable_isotope: "13C".to_string(),
            precision: 2,
        }
    }
}

impl ChemicalShiftReport {
    fn header(&self, metadata: &SpectrumMetadata) -> String {
        let mut details = Vec::new();
        if let Some(freq) = metadata.frequency_mhz {
            details.push(format!("{freq:.0} MHz"));
        }
        if let Some(solvent) = metadata.solvent.as_deref().filter(|s| !s.is_empty()) {
            details.push(solvent.to_string());
        }
        if details.is_empty() {
            format!("{} NMR", metadata.isotope_label)
        } else {
            format!("{} NMR ({})", metadata.isotope_label, details.join(", "))
        }
    }
}

impl ReportFormatter for ChemicalShiftReport {
    fn format(&self, metadata: &SpectrumMetadata, positions: &[f64]) -> String {
        if !self.is_reportable(metadata) {
            return String::new();
        }
        let shifts = positions
            .iter()
            .map(|x| format!("{x:.prec$}", prec = self.precision))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} δ {shifts}.", self.header(metadata))
    }

    fn is_reportable(&self, metadata: &SpectrumMetadata) -> bool {
        metadata.isotope_label == self.reportable_isotope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbon() -> SpectrumMetadata {
        SpectrumMetadata {
            isotope_label: "13C".to_string(),
            frequency_mhz: Some(100.6),
            solvent: Some("CDCl3".to_string()),
        }
    }

    #[test]
    fn formats_carbon_report() {
        let report = ChemicalShiftReport::default().format(&carbon(), &[77.164, 29.8449]);
        assert_eq!(report, "13C NMR (101 MHz, CDCl3) δ 77.16, 29.84.");
    }

    #[test]
    fn other_isotopes_produce_nothing() {
        let meta = SpectrumMetadata {
            isotope_label: "1H".to_string(),
            ..carbon()
        };
        let formatter = ChemicalShiftReport::default();
        assert!(!formatter.is_reportable(&meta));
        assert_eq!(formatter.format(&meta, &[7.26]), "");
    }

    #[test]
    fn header_without_acquisition_details() {
        let meta = SpectrumMetadata {
            isotope_label: "13C".to_string(),
            ..Default::default()
        };
        let report = ChemicalShiftReport::default().format(&meta, &[]);
        assert_eq!(report, "13C NMR δ .");
    }

    #[test]
    fn precision_is_configurable() {
        let formatter = ChemicalShiftReport {
            precision: 1,
            ..Default::default()
        };
        assert_eq!(
            formatter.format(&carbon(), &[128.33]),
            "13C NMR (101 MHz, CDCl3) δ 128.3."
        );
    }
}
