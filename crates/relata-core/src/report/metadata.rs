use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ORDINAL, MAX_REPORT_YEAR, MIN_ORDINAL, MIN_REPORT_YEAR};
use crate::errors::{RelataError, RelataResult};
use crate::text::fold;

/// Degree program. Determines which academic term codes are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProgramTrack {
    #[serde(rename = "Engenharia de Computação")]
    ComputerEngineering,
    #[serde(rename = "Engenharia Elétrica")]
    ElectricalEngineering,
}

impl ProgramTrack {
    pub const ALL: [ProgramTrack; 2] = [
        ProgramTrack::ComputerEngineering,
        ProgramTrack::ElectricalEngineering,
    ];

    /// Label as stored and displayed.
    pub fn label(self) -> &'static str {
        match self {
            Self::ComputerEngineering => "Engenharia de Computação",
            Self::ElectricalEngineering => "Engenharia Elétrica",
        }
    }

    /// Parse a stored label or a loose mention ("computação", "eletrica").
    pub fn parse(s: &str) -> Option<Self> {
        let folded = fold(s);
        if folded.contains("computacao") || folded.contains("computer") {
            Some(Self::ComputerEngineering)
        } else if folded.contains("eletrica") || folded.contains("electrical") {
            Some(Self::ElectricalEngineering)
        } else {
            None
        }
    }

    /// Term codes this track's calendar uses.
    pub fn valid_terms(self) -> &'static [TermCode] {
        match self {
            Self::ComputerEngineering => &[TermCode::Q1, TermCode::Q2, TermCode::Q3],
            Self::ElectricalEngineering => &[TermCode::S1, TermCode::S2],
        }
    }
}

impl fmt::Display for ProgramTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Academic term code: quarterly (1Q-3Q) or semestral (1S-2S).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermCode {
    #[serde(rename = "1Q")]
    Q1,
    #[serde(rename = "2Q")]
    Q2,
    #[serde(rename = "3Q")]
    Q3,
    #[serde(rename = "1S")]
    S1,
    #[serde(rename = "2S")]
    S2,
}

impl TermCode {
    pub fn code(self) -> &'static str {
        match self {
            Self::Q1 => "1Q",
            Self::Q2 => "2Q",
            Self::Q3 => "3Q",
            Self::S1 => "1S",
            Self::S2 => "2S",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1Q" => Some(Self::Q1),
            "2Q" => Some(Self::Q2),
            "3Q" => Some(Self::Q3),
            "1S" => Some(Self::S1),
            "2S" => Some(Self::S2),
            _ => None,
        }
    }

    pub fn is_quarterly(self) -> bool {
        matches!(self, Self::Q1 | Self::Q2 | Self::Q3)
    }

    /// The only track whose calendar uses this code.
    pub fn track(self) -> ProgramTrack {
        if self.is_quarterly() {
            ProgramTrack::ComputerEngineering
        } else {
            ProgramTrack::ElectricalEngineering
        }
    }
}

impl fmt::Display for TermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Year of the degree the intern was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AcademicYear {
    #[serde(rename = "2°")]
    Second,
    #[serde(rename = "3°")]
    Third,
    #[serde(rename = "4°")]
    Fourth,
    #[serde(rename = "5°")]
    Fifth,
}

impl AcademicYear {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Fourth),
            5 => Some(Self::Fifth),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Second => "2°",
            Self::Third => "3°",
            Self::Fourth => "4°",
            Self::Fifth => "5°",
        }
    }

    /// Accepts "3°", "3º", "3", or "3roAno".
    pub fn parse(s: &str) -> Option<Self> {
        let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u8>().ok().and_then(Self::from_number)
    }
}

/// Metadata derived from a report's origin folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub year: i32,
    pub term: TermCode,
    pub academic_year: AcademicYear,
    pub ordinal: u8,
    pub track: ProgramTrack,
}

impl ReportMetadata {
    /// Build and validate.
    pub fn new(
        year: i32,
        term: TermCode,
        academic_year: AcademicYear,
        ordinal: u8,
        track: ProgramTrack,
    ) -> RelataResult<Self> {
        let metadata = Self {
            year,
            term,
            academic_year,
            ordinal,
            track,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Parse `{year}-{term}-{N}roAno-{ordinal}`, e.g. `2025-2Q-3roAno-1`.
    /// The track follows from the term code.
    pub fn from_folder_name(folder: &str) -> RelataResult<Self> {
        let invalid = |reason: &str| RelataError::InvalidMetadata {
            reason: format!("folder {folder:?}: {reason}"),
        };
        let parts: Vec<&str> = folder.trim().split('-').collect();
        let [year, term, academic, ordinal] = parts.as_slice() else {
            return Err(invalid("expected year-term-NroAno-ordinal"));
        };
        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let term = TermCode::parse(term).ok_or_else(|| invalid("unknown term code"))?;
        if !academic.ends_with("roAno") {
            return Err(invalid("academic year must look like 3roAno"));
        }
        let academic_year =
            AcademicYear::parse(academic).ok_or_else(|| invalid("academic year out of range"))?;
        let ordinal: u8 = ordinal
            .parse()
            .map_err(|_| invalid("ordinal is not a number"))?;
        Self::new(year, term, academic_year, ordinal, term.track())
    }

    /// Year bounds, ordinal bounds, and the track/term pairing.
    pub fn validate(&self) -> RelataResult<()> {
        if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&self.year) {
            return Err(RelataError::InvalidMetadata {
                reason: format!(
                    "year {} outside {MIN_REPORT_YEAR}..={MAX_REPORT_YEAR}",
                    self.year
                ),
            });
        }
        if !(MIN_ORDINAL..=MAX_ORDINAL).contains(&self.ordinal) {
            return Err(RelataError::InvalidMetadata {
                reason: format!(
                    "ordinal {} outside {MIN_ORDINAL}..={MAX_ORDINAL}",
                    self.ordinal
                ),
            });
        }
        if !self.track.valid_terms().contains(&self.term) {
            return Err(RelataError::InvalidMetadata {
                reason: format!("term {} is not valid for {}", self.term, self.track),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quarterly_folder_as_computer_engineering() {
        let m = ReportMetadata::from_folder_name("2025-2Q-3roAno-1").unwrap();
        assert_eq!(m.year, 2025);
        assert_eq!(m.term, TermCode::Q2);
        assert_eq!(m.academic_year, AcademicYear::Third);
        assert_eq!(m.ordinal, 1);
        assert_eq!(m.track, ProgramTrack::ComputerEngineering);
    }

    #[test]
    fn parses_semestral_folder_as_electrical_engineering() {
        let m = ReportMetadata::from_folder_name("2023-1S-4roAno-2").unwrap();
        assert_eq!(m.track, ProgramTrack::ElectricalEngineering);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ReportMetadata::from_folder_name("2019-2Q-3roAno-1").is_err());
        assert!(ReportMetadata::from_folder_name("2025-2Q-3roAno-6").is_err());
        assert!(ReportMetadata::from_folder_name("2025-2Q-1roAno-1").is_err());
        assert!(ReportMetadata::from_folder_name("2025-4Q-3roAno-1").is_err());
        assert!(ReportMetadata::from_folder_name("relatorios").is_err());
    }

    #[test]
    fn rejects_track_term_mismatch() {
        let err = ReportMetadata::new(
            2024,
            TermCode::Q1,
            AcademicYear::Third,
            1,
            ProgramTrack::ElectricalEngineering,
        )
        .unwrap_err();
        assert!(matches!(err, RelataError::InvalidMetadata { .. }));
    }

    #[test]
    fn track_parse_is_accent_insensitive() {
        assert_eq!(
            ProgramTrack::parse("engenharia eletrica"),
            Some(ProgramTrack::ElectricalEngineering)
        );
        assert_eq!(
            ProgramTrack::parse("Engenharia de Computação"),
            Some(ProgramTrack::ComputerEngineering)
        );
        assert_eq!(ProgramTrack::parse("Medicina"), None);
    }
}
