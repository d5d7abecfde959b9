//! Range inference for input fields
//!
//! Resolution order, first match wins:
//! 1. explicit `range_min`/`range_max`
//! 2. domain keyword contained in the field name (`altitude`, `email`, ...)
//! 3. unit string (`ft`, `celsius`, `%`, ...)
//! 4. type default (integers keyed further by name: `id`, `year`, ...)
//! 5. `0..100`
//!
//! For string fields the pair is a *length* range, not a value range.

use crate::model::{FieldType, InputField};
use serde::Serialize;

/// Where an inferred range came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeSource {
    Explicit,
    DomainKeyword(&'static str),
    Unit,
    TypeDefault,
    Fallback,
}

/// An inclusive `[min, max]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InferredRange {
    pub min: f64,
    pub max: f64,
    pub source: RangeSource,
}

impl InferredRange {
    fn new(min: f64, max: f64, source: RangeSource) -> Self {
        Self { min, max, source }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

enum DomainDefault {
    Span(f64, f64),
    /// Maximum string length
    Length(f64),
}

/// Scanned in order; `username` therefore resolves through `name`
const DOMAIN_DEFAULTS: &[(&str, DomainDefault)] = &[
    ("age", DomainDefault::Span(0.0, 120.0)),
    ("temperature", DomainDefault::Span(-273.0, 5000.0)),
    ("altitude", DomainDefault::Span(0.0, 100000.0)),
    ("speed", DomainDefault::Span(0.0, 500.0)),
    ("pressure", DomainDefault::Span(0.0, 10000.0)),
    ("distance", DomainDefault::Span(0.0, 1000000.0)),
    ("weight", DomainDefault::Span(0.0, 100000.0)),
    ("height", DomainDefault::Span(0.0, 300.0)),
    ("percentage", DomainDefault::Span(0.0, 100.0)),
    ("count", DomainDefault::Span(0.0, 1000000.0)),
    ("index", DomainDefault::Span(0.0, 10000.0)),
    ("time", DomainDefault::Span(0.0, 86400.0)),
    ("duration", DomainDefault::Span(0.0, 3600.0)),
    ("latitude", DomainDefault::Span(-90.0, 90.0)),
    ("longitude", DomainDefault::Span(-180.0, 180.0)),
    ("name", DomainDefault::Length(100.0)),
    ("email", DomainDefault::Length(255.0)),
    ("password", DomainDefault::Length(128.0)),
    ("username", DomainDefault::Length(50.0)),
    ("address", DomainDefault::Length(500.0)),
    ("description", DomainDefault::Length(1000.0)),
    ("message", DomainDefault::Length(5000.0)),
    ("url", DomainDefault::Length(2048.0)),
    ("phone", DomainDefault::Length(20.0)),
    ("code", DomainDefault::Length(50.0)),
];

/// Integer defaults keyed by name substring
const INTEGER_DEFAULTS: &[(&[&str], f64, f64)] = &[
    (&["id"], 1.0, 1000000.0),
    (&["year"], 1900.0, 2100.0),
    (&["month"], 1.0, 12.0),
    (&["day"], 1.0, 31.0),
    (&["hour"], 0.0, 23.0),
    (&["minute", "second"], 0.0, 59.0),
];

/// Infer a usable range for a field. Never fails.
pub fn infer_range(field: &InputField) -> InferredRange {
    if let Some((min, max)) = field.explicit_range() {
        return InferredRange::new(min, max, RangeSource::Explicit);
    }

    let name = field.name.to_lowercase();

    for (keyword, default) in DOMAIN_DEFAULTS {
        if name.contains(keyword) {
            let source = RangeSource::DomainKeyword(keyword);
            return match default {
                DomainDefault::Span(min, max) => InferredRange::new(*min, *max, source),
                DomainDefault::Length(max) => InferredRange::new(0.0, *max, source),
            };
        }
    }

    if let Some(unit) = &field.unit {
        if let Some((min, max)) = unit_range(&unit.to_lowercase(), &name) {
            return InferredRange::new(min, max, RangeSource::Unit);
        }
    }

    match field.data_type {
        FieldType::Integer => {
            let (min, max) = INTEGER_DEFAULTS
                .iter()
                .find(|(keys, _, _)| keys.iter().any(|k| name.contains(k)))
                .map(|(_, min, max)| (*min, *max))
                .unwrap_or((0.0, 1000.0));
            InferredRange::new(min, max, RangeSource::TypeDefault)
        }
        FieldType::Float => InferredRange::new(0.0, 1000.0, RangeSource::TypeDefault),
        FieldType::String => InferredRange::new(0.0, 255.0, RangeSource::TypeDefault),
        FieldType::Boolean | FieldType::Enumeration => {
            InferredRange::new(0.0, 100.0, RangeSource::Fallback)
        }
    }
}

fn unit_range(unit: &str, name: &str) -> Option<(f64, f64)> {
    if unit.contains("feet") || unit.contains("ft") {
        if name.contains("alt") {
            Some((0.0, 100000.0))
        } else {
            Some((0.0, 10000.0))
        }
    } else if unit.contains("meter") || unit == "m" {
        Some((0.0, 10000.0))
    } else if unit.contains("celsius") || unit.contains("°c") {
        Some((-273.0, 5000.0))
    } else if unit.contains("fahrenheit") || unit.contains("°f") {
        Some((-459.0, 9000.0))
    } else if unit.contains("mph") || unit.contains("km/h") {
        Some((0.0, 500.0))
    } else if unit.contains("kg") || unit.contains("lb") {
        Some((0.0, 10000.0))
    } else if unit.contains('%') || unit.contains("percent") {
        Some((0.0, 100.0))
    } else {
        None
    }
}
