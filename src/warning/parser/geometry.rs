use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RecordError;
use crate::warning::types::{Coordinate, Polygon, Ring, Strictness};

// An open paren, digits/periods/minus signs/spaces, a close paren
static COORDINATE_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([\.\-\d ]+\)").expect("coordinate group pattern is valid")
});

/// Parser for the parenthesized coordinate-list notation used in the `POLYGON` column
///
/// Every `( ... )` group made only of numbers and spaces becomes one ring. Anything
/// between groups, such as `POLYGON` or `MULTIPOLYGON` and the outer parentheses,
/// is ignored.
#[derive(Debug, Clone, Default)]
pub struct GeometryParser {
    /// How to treat a group with an odd number of tokens
    strictness: Strictness,
}

impl GeometryParser {
    /// Create a new geometry parser
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    /// Parse a raw geometry string into rings of coordinates
    pub fn parse(&self, raw: &str) -> Result<Polygon, RecordError> {
        let mut rings = Vec::new();

        for group in COORDINATE_GROUP_RE.find_iter(raw) {
            let text = group.as_str();
            let ring = self.parse_group(&text[1..text.len() - 1])?;
            rings.push(ring);
        }

        trace!("Parsed {} rings from geometry of {} bytes", rings.len(), raw.len());
        Ok(Polygon::new(rings))
    }

    /// Parse the inside of one group, `lon0 lat0 lon1 lat1 ...`
    fn parse_group(&self, body: &str) -> Result<Ring, RecordError> {
        let tokens: Vec<&str> = body.split(' ').collect();

        if tokens.len() % 2 != 0 {
            match self.strictness {
                Strictness::Strict => {
                    return Err(RecordError::OddCoordinateCount { count: tokens.len() });
                }
                Strictness::Lenient => {
                    trace!("Dropping unpaired trailing token {:?}", tokens[tokens.len() - 1]);
                }
            }
        }

        let coordinates = tokens
            .chunks_exact(2)
            .map(|pair| -> Result<Coordinate, RecordError> {
                Ok(Coordinate::new(parse_number(pair[0])?, parse_number(pair[1])?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Ring::new(coordinates))
    }
}

fn parse_number(token: &str) -> Result<f64, RecordError> {
    token.parse::<f64>().map_err(|_| RecordError::GeometryParse {
        token: token.to_string(),
    })
}
