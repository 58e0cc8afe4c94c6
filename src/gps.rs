use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpsError {
    #[error("GPS component {index} has a zero denominator")]
    ZeroDenominator { index: usize },
    #[error("GPS coordinate needs 3 components, got {0}")]
    MissingComponent(usize),
}

/// A single degrees, minutes or seconds component stored as numerator/denominator.
pub trait DmsComponent {
    fn numerator(&self) -> f64;
    fn denominator(&self) -> f64;
}

impl DmsComponent for exif::Rational {
    fn numerator(&self) -> f64 {
        self.num as f64
    }

    fn denominator(&self) -> f64 {
        self.denom as f64
    }
}

impl DmsComponent for (u32, u32) {
    fn numerator(&self) -> f64 {
        self.0 as f64
    }

    fn denominator(&self) -> f64 {
        self.1 as f64
    }
}

impl DmsComponent for (i32, i32) {
    fn numerator(&self) -> f64 {
        self.0 as f64
    }

    fn denominator(&self) -> f64 {
        self.1 as f64
    }
}

/// Converts a degrees/minutes/seconds triple into signed decimal degrees.
///
/// Southern and western references yield a negative value. Input ranges are not
/// checked.
pub fn decimal_from_dms<C: DmsComponent>(dms: &[C], reference: char) -> Result<f64, GpsError> {
    if dms.len() < 3 {
        return Err(GpsError::MissingComponent(dms.len()));
    }

    let mut parts = [0.0; 3];
    for (index, component) in dms.iter().take(3).enumerate() {
        if component.denominator() == 0.0 {
            return Err(GpsError::ZeroDenominator { index });
        }
        parts[index] = component.numerator() / component.denominator();
    }

    let decimal = parts[0] + parts[1] / 60.0 + parts[2] / 3600.0;

    if matches!(reference.to_ascii_uppercase(), 'S' | 'W') {
        Ok(-decimal)
    } else {
        Ok(decimal)
    }
}

/// First character of an ASCII reference value such as `N` or `W`.
pub fn reference_char(value: &exif::Value) -> Option<char> {
    match value {
        exif::Value::Ascii(parts) => parts
            .iter()
            .flat_map(|part| part.iter())
            .map(|&b| b as char)
            .find(|c| !c.is_whitespace()),
        _ => None,
    }
}
