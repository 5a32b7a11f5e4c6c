use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zodiac_roast_errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Last (month, day) of each sign, in calendar order starting from January 1st.
/// Dates after December 21st wrap back to Capricorn.
const SIGN_ENDS: [((u32, u32), ZodiacSign); 12] = [
    ((1, 19), ZodiacSign::Capricorn),
    ((2, 18), ZodiacSign::Aquarius),
    ((3, 20), ZodiacSign::Pisces),
    ((4, 19), ZodiacSign::Aries),
    ((5, 20), ZodiacSign::Taurus),
    ((6, 20), ZodiacSign::Gemini),
    ((7, 22), ZodiacSign::Cancer),
    ((8, 22), ZodiacSign::Leo),
    ((9, 22), ZodiacSign::Virgo),
    ((10, 22), ZodiacSign::Libra),
    ((11, 21), ZodiacSign::Scorpio),
    ((12, 21), ZodiacSign::Sagittarius),
];

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Resolves the sign for a calendar date. The year is ignored.
    pub fn from_date(date: NaiveDate) -> Self {
        let key = (date.month(), date.day());
        SIGN_ENDS
            .iter()
            .find(|(end, _)| key <= *end)
            .map(|(_, sign)| *sign)
            .unwrap_or(ZodiacSign::Capricorn)
    }

    /// Parses an ISO `YYYY-MM-DD` birthdate and resolves its sign.
    pub fn from_iso_date(input: &str) -> Result<Self, AppError> {
        parse_birthdate(input).map(Self::from_date)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

pub fn parse_birthdate(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid birthdate: {input:?}")))
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZodiacSign {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sign| sign.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown zodiac sign: {s}")))
    }
}
