//! Dhaka locations for provider-backed test fixtures.
//!
//! Coordinates are approximate landmark positions taken from OpenStreetMap.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Warehouse-style depot near Tejgaon industrial area.
pub const DEPOT: Location = Location::new("Tejgaon", 23.7639, 90.3995);

pub const DELIVERIES: &[Location] = &[
    Location::new("Shahbag", 23.7380, 90.3958),
    Location::new("Gulshan 1", 23.7806, 90.4163),
    Location::new("Motijheel", 23.7330, 90.4172),
    Location::new("Dhanmondi 27", 23.7561, 90.3743),
    Location::new("Mirpur 10", 23.8069, 90.3687),
    Location::new("Banani", 23.7937, 90.4066),
    Location::new("Farmgate", 23.7577, 90.3897),
    Location::new("Uttara Sector 7", 23.8759, 90.3795),
];

pub fn delivery_coords(count: usize) -> Vec<(f64, f64)> {
    DELIVERIES.iter().take(count).map(Location::coords).collect()
}
