//! Supported medical vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A standardized medical coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeSystem {
    /// Healthcare Common Procedure Coding System.
    Hcpcs,
    /// ICD-10 Clinical Modification (US).
    #[serde(rename = "icd10cm")]
    Icd10Cm,
    /// ICD-10 as published by the WHO.
    #[serde(rename = "icd10who")]
    Icd10Who,
    /// Logical Observation Identifiers Names and Codes.
    Loinc,
    /// National Provider Identifier registry.
    Npi,
    /// RxNorm normalized drug names.
    #[serde(rename = "rxnorm")]
    RxNorm,
    /// SNOMED Clinical Terms.
    #[serde(rename = "snomed")]
    SnomedCt,
}

impl CodeSystem {
    /// All supported vocabularies in display order.
    pub const fn all() -> &'static [CodeSystem] {
        &[
            Self::Hcpcs,
            Self::Icd10Cm,
            Self::Icd10Who,
            Self::Loinc,
            Self::Npi,
            Self::RxNorm,
            Self::SnomedCt,
        ]
    }

    /// Stable identifier used in configuration files.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Hcpcs => "hcpcs",
            Self::Icd10Cm => "icd10cm",
            Self::Icd10Who => "icd10who",
            Self::Loinc => "loinc",
            Self::Npi => "npi",
            Self::RxNorm => "rxnorm",
            Self::SnomedCt => "snomed",
        }
    }

    /// Human-readable vocabulary name.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hcpcs => "HCPCS",
            Self::Icd10Cm => "ICD-10-CM",
            Self::Icd10Who => "ICD-10-WHO",
            Self::Loinc => "LOINC",
            Self::Npi => "NPI",
            Self::RxNorm => "RxNorm",
            Self::SnomedCt => "SNOMED CT",
        }
    }

    /// Whether codes are upper-cased before validation.
    ///
    /// HCPCS and ICD-10 codes are letter-prefixed and conventionally written
    /// in upper case; the remaining vocabularies are numeric.
    pub const fn uppercase_by_default(&self) -> bool {
        matches!(self, Self::Hcpcs | Self::Icd10Cm | Self::Icd10Who)
    }
}

impl fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CodeSystem {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        Self::all()
            .iter()
            .copied()
            .find(|system| {
                let label: String = system
                    .label()
                    .chars()
                    .filter(|ch| ch.is_ascii_alphanumeric())
                    .map(|ch| ch.to_ascii_lowercase())
                    .collect();
                system.key() == wanted || label == wanted
            })
            .ok_or_else(|| format!("unknown code system '{value}'"))
    }
}
