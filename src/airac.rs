use std::fmt::Display;
use std::str::FromStr;

use chrono::{Datelike as _, Days, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

pub const CYCLE_LENGTH_DAYS: i64 = 28;
pub const CYCLES_PER_YEAR: i64 = 13;

// AIRAC 2602, all other cycles are counted from here
const REFERENCE_YEAR: i32 = 2026;
const REFERENCE_CYCLE: i64 = 2;

fn reference_effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 19).expect("valid reference date")
}

// cycles between the reference cycle and `cycle` of `year`
fn offset_of(year: i32, cycle: u8) -> i64 {
    (i64::from(year) - i64::from(REFERENCE_YEAR)) * CYCLES_PER_YEAR + i64::from(cycle)
        - REFERENCE_CYCLE
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AiracError {
    #[error("invalid AIRAC cycle {0:?}: expected YYCC")]
    Format(String),
    #[error("invalid AIRAC cycle {0:?}: cycle must be between 01 and 13")]
    Cycle(String),
    #[error("AIRAC cycle {0:?} is out of the supported date range")]
    OutOfRange(String),
}

/// A 28 day aeronautical data publication cycle, identified as `YYCC`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AiracCycle {
    pub year: i32,
    /// 1..=13
    pub cycle: u8,
    pub effective: NaiveDate,
}

impl AiracCycle {
    /// The cycle in effect on `date`.
    ///
    /// Counts whole cycles from the reference cycle and wraps at 13 cycles per
    /// year, which drifts against the real calendar in years with 14 cycles.
    ///
    /// `None` if the cycle would start before the earliest representable date.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let offset = (date - reference_effective_date())
            .num_days()
            .div_euclid(CYCLE_LENGTH_DAYS);
        Self::from_offset(offset)
    }

    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
            .expect("today lies within the representable date range")
    }

    fn from_offset(offset: i64) -> Option<Self> {
        let index = REFERENCE_CYCLE - 1 + offset;
        let year = REFERENCE_YEAR + i32::try_from(index.div_euclid(CYCLES_PER_YEAR)).ok()?;
        let cycle = u8::try_from(index.rem_euclid(CYCLES_PER_YEAR) + 1).ok()?;
        let days = offset.checked_mul(CYCLE_LENGTH_DAYS)?;
        let effective = if days >= 0 {
            reference_effective_date().checked_add_days(Days::new(days.unsigned_abs()))?
        } else {
            reference_effective_date().checked_sub_days(Days::new(days.unsigned_abs()))?
        };

        Some(Self {
            year,
            cycle,
            effective,
        })
    }

    #[must_use]
    pub fn ident(&self) -> String {
        format!("{:02}{:02}", self.year.rem_euclid(100), self.cycle)
    }

    /// `None` if the following cycle would start after the latest representable
    /// date.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        Self::from_offset(self.offset() + 1)
    }

    fn offset(&self) -> i64 {
        offset_of(self.year, self.cycle)
    }

    /// Download location of the NASR 28 day subscription for this cycle.
    #[must_use]
    pub fn subscription_url(&self) -> String {
        format!(
            "https://nfdc.faa.gov/webContent/28DaySub/28DaySubscription_Effective_{}.zip",
            self.effective.format("%Y-%m-%d")
        )
    }
}

impl Display for AiracCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ident())
    }
}

impl FromStr for AiracCycle {
    type Err = AiracError;

    /// Two digit years are taken to be in the reference century.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AiracError::Format(s.to_string()));
        }
        let (yy, cc) = s.split_at(2);
        let yy: i32 = yy.parse().map_err(|_| AiracError::Format(s.to_string()))?;
        let cycle: u8 = cc.parse().map_err(|_| AiracError::Format(s.to_string()))?;
        if !(1..=13).contains(&cycle) {
            return Err(AiracError::Cycle(s.to_string()));
        }
        let year = reference_effective_date().year() / 100 * 100 + yy;

        Self::from_offset(offset_of(year, cycle)).ok_or_else(|| AiracError::OutOfRange(s.to_string()))
    }
}
