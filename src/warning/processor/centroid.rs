use crate::error::RecordError;
use crate::warning::types::{Coordinate, Polygon, Ring};

/// Computes one representative point per ring as the arithmetic mean of its coordinates
#[derive(Debug, Default)]
pub struct CentroidComputer {}

impl CentroidComputer {
    pub fn new() -> Self {
        Self {}
    }

    /// Centroids for every ring of the polygon, in ring order
    pub fn centroids(&self, polygon: &Polygon) -> Result<Vec<Coordinate>, RecordError> {
        polygon
            .rings
            .iter()
            .enumerate()
            .map(|(index, ring)| self.ring_centroid(index, ring))
            .collect()
    }

    fn ring_centroid(&self, index: usize, ring: &Ring) -> Result<Coordinate, RecordError> {
        if ring.is_empty() {
            return Err(RecordError::DivisionByZero { ring: index });
        }

        let (lon_sum, lat_sum) = ring
            .coordinates
            .iter()
            .fold((0.0, 0.0), |(lon, lat), c| (lon + c.lon, lat + c.lat));
        let count = ring.len() as f64;

        Ok(Coordinate::new(lon_sum / count, lat_sum / count))
    }
}
