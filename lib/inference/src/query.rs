//! Crime hotspot query
//!
//! The inputs of the prediction form, and the raw record they turn into.
//! Date parts are split into the year/month/day columns the model was
//! trained on; the area stays a category for the aligner to expand.

use chrono::{Datelike, NaiveDate};
use hotspot_core::{Error, RawRecord};
use hotspot_schema::{CategoricalExpansions, OneHotRule};
use serde::{Deserialize, Serialize};

/// Raw record field names produced by [`CrimeQuery::to_record`]
pub mod fields {
    pub const TIME_OCC: &str = "TIME OCC";
    pub const LAT: &str = "LAT";
    pub const LON: &str = "LON";
    pub const RPT_YEAR: &str = "Rpt_Year";
    pub const OCC_YEAR: &str = "Occ_Year";
    pub const OCC_MONTH: &str = "Occ_Month";
    pub const OCC_DAY: &str = "Occ_Day";
    pub const AREA_NAME: &str = "area_name";
    /// Crime code; the form has no input for it, so its family stays zero
    pub const CRIME_CODE: &str = "crm_cd";
}

/// Column prefix of the area one-hot family
pub const AREA_PREFIX: &str = "AREA NAME_";

/// Column prefix of the crime code one-hot family
pub const CRIME_CODE_PREFIX: &str = "Crm Cd_";

/// Largest valid `TIME OCC` value (24h clock, HHMM)
pub const MAX_TIME_OCC: u32 = 2359;

/// Expansion rules for the LA crime model, discovered from the schema by prefix
pub fn crime_expansions() -> CategoricalExpansions {
    CategoricalExpansions::new()
        .with_rule(fields::AREA_NAME, OneHotRule::deferred(AREA_PREFIX))
        .with_rule(fields::CRIME_CODE, OneHotRule::deferred(CRIME_CODE_PREFIX))
}

/// A single hotspot prediction request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrimeQuery {
    /// Date reported
    pub date_rptd: NaiveDate,
    /// Date occurred
    pub date_occ: NaiveDate,
    /// Time occurred, HHMM
    pub time_occ: u32,
    pub area_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl CrimeQuery {
    pub fn validate(&self) -> Result<(), Error> {
        if self.time_occ > MAX_TIME_OCC {
            return Err(Error::InvalidQuery(format!(
                "time_occ {} outside 0..={}",
                self.time_occ, MAX_TIME_OCC
            )));
        }
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(Error::InvalidQuery("lat/lon must be finite".to_string()));
        }
        if self.area_name.trim().is_empty() {
            return Err(Error::InvalidQuery("area_name is empty".to_string()));
        }
        Ok(())
    }

    /// Raw record with the model's feature fields
    pub fn to_record(&self) -> RawRecord {
        RawRecord::new()
            .with(fields::TIME_OCC, self.time_occ)
            .with(fields::LAT, self.lat)
            .with(fields::LON, self.lon)
            .with(fields::RPT_YEAR, self.date_rptd.year())
            .with(fields::OCC_YEAR, self.date_occ.year())
            .with(fields::OCC_MONTH, self.date_occ.month())
            .with(fields::OCC_DAY, self.date_occ.day())
            .with(fields::AREA_NAME, self.area_name.as_str())
    }
}
