use serde::{Deserialize, Serialize};

use super::enums::Gender;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;
pub const DEFAULT_AGE: u8 = 25;

/// Patient details entered on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub city: String,
}

impl PatientInfo {
    pub fn age_in_range(&self) -> bool {
        (MIN_AGE..=MAX_AGE).contains(&self.age)
    }
}
