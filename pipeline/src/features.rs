//! Encoding of the six raw form fields into a model feature row.
//!
//! The column order and the category codes below are the ones the stored
//! scaler and model were fit against. Any other order or code is still a
//! valid numeric row for them, so a change here yields wrong estimates
//! without any error.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{PipelineErr, Result};

pub const AGE_RANGE: RangeInclusive<i64> = 0..=100;
pub const BMI_RANGE: RangeInclusive<f64> = 10.0..=60.0;
pub const CHILDREN_RANGE: RangeInclusive<i64> = 0..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Smoker {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

/// A categorical field with a fixed set of string labels and integer codes.
pub trait Category: Sized + Copy + 'static {
    /// The form field this category is read from.
    const FIELD: &'static str;

    /// Every value in the order the form offers them.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn code(self) -> u8;
}

impl Category for Sex {
    const FIELD: &'static str = "sex";
    const ALL: &'static [Self] = &[Sex::Male, Sex::Female];

    fn label(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    fn code(self) -> u8 {
        match self {
            Sex::Male => 1,
            Sex::Female => 0,
        }
    }
}

impl Category for Smoker {
    const FIELD: &'static str = "smoker";
    const ALL: &'static [Self] = &[Smoker::Yes, Smoker::No];

    fn label(self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }

    fn code(self) -> u8 {
        match self {
            Smoker::Yes => 1,
            Smoker::No => 0,
        }
    }
}

impl Category for Region {
    const FIELD: &'static str = "region";
    const ALL: &'static [Self] = &[
        Region::Northeast,
        Region::Northwest,
        Region::Southeast,
        Region::Southwest,
    ];

    fn label(self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Northwest => "northwest",
            Region::Southeast => "southeast",
            Region::Southwest => "southwest",
        }
    }

    fn code(self) -> u8 {
        match self {
            Region::Southeast => 0,
            Region::Southwest => 1,
            Region::Northwest => 2,
            Region::Northeast => 3,
        }
    }
}

fn parse_category<C: Category>(s: &str) -> Result<C> {
    C::ALL
        .iter()
        .copied()
        .find(|c| c.label() == s)
        .ok_or_else(|| PipelineErr::InvalidCategory {
            field: C::FIELD,
            value: s.to_string(),
        })
}

macro_rules! category_str_impls {
    ($($ty:ty),*) => {$(
        impl FromStr for $ty {
            type Err = PipelineErr;

            fn from_str(s: &str) -> Result<Self> {
                parse_category(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

category_str_impls!(Sex, Smoker, Region);

/// The fixed-order numeric row consumed by the model:
/// `age, sex, bmi, children, smoker, region`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow([f64; 6]);

impl FeatureRow {
    pub const WIDTH: usize = 6;

    pub const AGE: usize = 0;
    pub const SEX: usize = 1;
    pub const BMI: usize = 2;
    pub const CHILDREN: usize = 3;
    pub const SMOKER: usize = 4;
    pub const REGION: usize = 5;

    /// Columns passed through the scaler, in the order it was fit on.
    pub const NUMERIC: [usize; 3] = [Self::AGE, Self::BMI, Self::CHILDREN];

    pub const COLUMNS: [&'static str; Self::WIDTH] =
        ["age", "sex", "bmi", "children", "smoker", "region"];

    pub fn new(values: [f64; Self::WIDTH]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; Self::WIDTH] {
        &self.0
    }

    /// Returns the numeric columns, in scaler order.
    pub fn numeric(&self) -> [f64; 3] {
        Self::NUMERIC.map(|i| self.0[i])
    }

    /// Overwrites the numeric columns, leaving the categorical codes untouched.
    pub fn set_numeric(&mut self, values: [f64; 3]) {
        for (i, v) in Self::NUMERIC.into_iter().zip(values) {
            self.0[i] = v;
        }
    }
}

/// The six raw form fields, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub age: i64,
    pub sex: String,
    pub bmi: f64,
    pub children: i64,
    pub smoker: String,
    pub region: String,
}

impl Applicant {
    /// Encodes this applicant into a feature row.
    ///
    /// # Returns
    /// The encoded row or the first invalid field.
    pub fn encode(&self) -> Result<FeatureRow> {
        encode(
            self.age,
            &self.sex,
            self.bmi,
            self.children,
            &self.smoker,
            &self.region,
        )
    }
}

/// Maps the six raw fields onto a feature row.
///
/// # Arguments
/// * `age` - Whole years, within `AGE_RANGE`.
/// * `sex` - `"male"` or `"female"`.
/// * `bmi` - Body mass index, within `BMI_RANGE`.
/// * `children` - Number of dependents, within `CHILDREN_RANGE`.
/// * `smoker` - `"yes"` or `"no"`.
/// * `region` - One of the four US regions.
///
/// # Returns
/// The raw (unscaled) feature row or an error naming the first invalid field.
pub fn encode(
    age: i64,
    sex: &str,
    bmi: f64,
    children: i64,
    smoker: &str,
    region: &str,
) -> Result<FeatureRow> {
    if !AGE_RANGE.contains(&age) {
        return Err(out_of_range("age", age, "0..=100"));
    }
    let sex: Sex = sex.parse()?;
    if !BMI_RANGE.contains(&bmi) {
        return Err(out_of_range("bmi", bmi, "10.0..=60.0"));
    }
    if !CHILDREN_RANGE.contains(&children) {
        return Err(out_of_range("children", children, "0..=10"));
    }
    let smoker: Smoker = smoker.parse()?;
    let region: Region = region.parse()?;

    Ok(FeatureRow([
        age as f64,
        sex.code().into(),
        bmi,
        children as f64,
        smoker.code().into(),
        region.code().into(),
    ]))
}

fn out_of_range(field: &'static str, value: impl fmt::Display, range: &'static str) -> PipelineErr {
    PipelineErr::OutOfRange {
        field,
        value: value.to_string(),
        range,
    }
}
