//! Deductee and deductor identifiers used on TDS returns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaxCalcError;
use crate::TaxCalcResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderType {
    Individual,
    Huf,
    Company,
    Firm,
    Government,
    LocalAuthority,
    ArtificialJuridicalPerson,
    AssociationOfPersons,
    BodyOfIndividuals,
    Trust,
}

impl HolderType {
    /// From the fourth character of a PAN.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'P' => Some(HolderType::Individual),
            'H' => Some(HolderType::Huf),
            'C' => Some(HolderType::Company),
            'F' => Some(HolderType::Firm),
            'G' => Some(HolderType::Government),
            'L' => Some(HolderType::LocalAuthority),
            'J' => Some(HolderType::ArtificialJuridicalPerson),
            'A' => Some(HolderType::AssociationOfPersons),
            'B' => Some(HolderType::BodyOfIndividuals),
            'T' => Some(HolderType::Trust),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HolderType::Individual => "Individual",
            HolderType::Huf => "HUF",
            HolderType::Company => "Company",
            HolderType::Firm => "Firm",
            HolderType::Government => "Government",
            HolderType::LocalAuthority => "Local Authority",
            HolderType::ArtificialJuridicalPerson => "Artificial Juridical Person",
            HolderType::AssociationOfPersons => "Association of Persons",
            HolderType::BodyOfIndividuals => "Body of Individuals",
            HolderType::Trust => "Trust",
        }
    }

    pub fn category(self) -> DeducteeCategory {
        match self {
            HolderType::Individual | HolderType::Huf => DeducteeCategory::IndividualOrHuf,
            _ => DeducteeCategory::CompanyFirmOrOther,
        }
    }
}

/// Rate bucket used by TDS sections that distinguish the deductee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeducteeCategory {
    IndividualOrHuf,
    /// Company, firm, co-operative society, local authority and others
    CompanyFirmOrOther,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanDetails {
    pub pan: String,
    pub holder_type: HolderType,
    pub holder_label: String,
    pub category: DeducteeCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tan(String);

impl Tan {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks `value` against a pattern of `A` (letter) and `9` (digit).
fn matches_pattern(value: &str, pattern: &str) -> bool {
    value.len() == pattern.len()
        && value.chars().zip(pattern.chars()).all(|(c, p)| match p {
            'A' => c.is_ascii_uppercase(),
            '9' => c.is_ascii_digit(),
            _ => false,
        })
}

/// Parse a PAN (AAAAA9999A), case-insensitive.
pub fn parse_pan(raw: &str) -> TaxCalcResult<PanDetails> {
    let pan = raw.trim().to_ascii_uppercase();
    if !matches_pattern(&pan, "AAAAA9999A") {
        return Err(TaxCalcError::invalid("pan", "Expected format AAAAA9999A"));
    }

    let code = pan.chars().nth(3).unwrap_or_default();
    let holder_type = HolderType::from_code(code).ok_or_else(|| {
        TaxCalcError::invalid("pan", format!("Unknown holder type code '{code}'"))
    })?;

    Ok(PanDetails {
        pan,
        holder_type,
        holder_label: holder_type.label().to_string(),
        category: holder_type.category(),
    })
}

/// Parse a TAN (AAAA99999A), case-insensitive.
pub fn parse_tan(raw: &str) -> TaxCalcResult<Tan> {
    let tan = raw.trim().to_ascii_uppercase();
    if !matches_pattern(&tan, "AAAA99999A") {
        return Err(TaxCalcError::invalid("tan", "Expected format AAAA99999A"));
    }
    Ok(Tan(tan))
}

impl FromStr for PanDetails {
    type Err = TaxCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pan(s)
    }
}

impl FromStr for Tan {
    type Err = TaxCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tan(s)
    }
}
