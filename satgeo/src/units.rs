//! A lightweight uom-ish library for the quantities crossing the API

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f64,
}

impl std::fmt::Debug for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.as_degrees())
    }
}

impl Angle {
    pub fn from_radians(radians: f64) -> Angle {
        Angle { radians }
    }

    pub fn from_degrees(deg: f64) -> Angle {
        Angle {
            radians: deg.to_radians(),
        }
    }

    pub fn as_radians(&self) -> f64 {
        self.radians
    }

    pub fn as_degrees(&self) -> f64 {
        self.radians.to_degrees()
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Length {
    meters: f64,
}

impl std::fmt::Debug for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} m", self.meters)
    }
}

impl Length {
    pub fn from_meters(meters: f64) -> Length {
        Length { meters }
    }

    pub fn from_kilometers(km: f64) -> Length {
        Length {
            meters: km * 1000.0,
        }
    }

    pub fn as_meters(&self) -> f64 {
        self.meters
    }

    pub fn as_kilometers(&self) -> f64 {
        self.meters / 1000.0
    }
}
