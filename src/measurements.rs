//! Validated body measurements and the clothing items they are sized for.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SizeError};

pub const WEIGHT_RANGE: (f64, f64) = (30.0, 150.0);
pub const HEIGHT_RANGE: (f64, f64) = (100.0, 220.0);
pub const AGE_RANGE: (u32, u32) = (10, 100);

/// One raw input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Feature {
    Weight,
    Age,
    Height,
}

impl Feature {
    /// Column order of scaler artifacts that do not record one.
    pub const LEGACY_ORDER: [Feature; 3] = [Feature::Weight, Feature::Age, Feature::Height];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Weight => "weight",
            Feature::Age => "age",
            Feature::Height => "height",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Feature {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "weight" => Ok(Feature::Weight),
            "age" => Ok(Feature::Age),
            "height" => Ok(Feature::Height),
            other => Err(format!("unknown feature {other:?}")),
        }
    }
}

impl From<Feature> for String {
    fn from(feature: Feature) -> Self {
        feature.name().to_string()
    }
}

/// Body measurements within the supported bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    weight: f64,
    height: f64,
    age: u32,
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SizeError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Measurements {
    /// Weight in kg, height in cm, age in years.
    pub fn new(weight: f64, height: f64, age: u32) -> Result<Self> {
        let weight = check_range("weight", weight, WEIGHT_RANGE)?;
        let height = check_range("height", height, HEIGHT_RANGE)?;
        check_range(
            "age",
            f64::from(age),
            (f64::from(AGE_RANGE.0), f64::from(AGE_RANGE.1)),
        )?;
        Ok(Self {
            weight,
            height,
            age,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Weight => self.weight,
            Feature::Age => f64::from(self.age),
            Feature::Height => self.height,
        }
    }

    /// Raw feature vector laid out in `order`.
    pub fn to_features(&self, order: &[Feature]) -> Array1<f64> {
        order.iter().map(|&f| self.get(f)).collect()
    }
}

/// Garment the recommendation is phrased for. It does not change the
/// prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClothingItem {
    #[default]
    TShirt,
    Sweater,
    Jacket,
    Dress,
}

impl ClothingItem {
    pub const ALL: [ClothingItem; 4] = [
        ClothingItem::TShirt,
        ClothingItem::Sweater,
        ClothingItem::Jacket,
        ClothingItem::Dress,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClothingItem::TShirt => "T-Shirt",
            ClothingItem::Sweater => "Sweater",
            ClothingItem::Jacket => "Jacket",
            ClothingItem::Dress => "Dress",
        }
    }
}

impl fmt::Display for ClothingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClothingItem {
    type Err = SizeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        ClothingItem::ALL
            .into_iter()
            .find(|item| {
                let label: String = item
                    .label()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .collect();
                label == norm
            })
            .ok_or_else(|| SizeError::UnknownItem(s.to_string()))
    }
}
