// Location: trait-based abstraction over where position fixes come from.

pub mod fixed;
pub mod traits;

/// Google Maps link for a position, used in alert messages.
pub fn maps_link(latitude: f64, longitude: f64) -> String {
    format!("https://maps.google.com/?q={latitude},{longitude}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_link() {
        assert_eq!(
            maps_link(28.6139, -77.209),
            "https://maps.google.com/?q=28.6139,-77.209"
        );
    }
}
