//! # Point Input
//!
//! Reads point clouds from text and removes exact duplicates.
//!
//! ## Format
//!
//! One point per line as three numbers separated by whitespace or commas.
//! Blank lines and `#` comments are ignored, and a leading `v` tag is
//! accepted so Wavefront OBJ vertex lines can be read back.
//!
//! ```text
//! # unit square, lifted
//! 0 0 0
//! 1, 0, 0
//! v 0 1 0.5
//! ```

use std::collections::HashSet;
use std::io::BufRead;

use glam::DVec3;

use crate::error::{HullError, HullResult};

/// Reads every point from `reader`.
///
/// # Errors
///
/// [`HullError::Parse`] with the 1-based line number for malformed lines,
/// [`HullError::Io`] when reading fails.
///
/// # Example
///
/// ```rust
/// use dnc_hull::points::read_points;
///
/// let text = "# corners\n0 0 0\n1,0,0\nv 0 1 0\n";
/// let points = read_points(text.as_bytes())?;
/// assert_eq!(points.len(), 3);
/// # Ok::<(), dnc_hull::HullError>(())
/// ```
pub fn read_points<R: BufRead>(reader: R) -> HullResult<Vec<DVec3>> {
    let mut points = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        if let Some(point) = parse_line(&line?, index + 1)? {
            points.push(point);
        }
    }
    Ok(points)
}

/// Parses points from an in-memory string.
pub fn parse_points(text: &str) -> HullResult<Vec<DVec3>> {
    read_points(text.as_bytes())
}

fn parse_line(line: &str, number: usize) -> HullResult<Option<DVec3>> {
    let content = match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    };
    let mut fields = content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .peekable();

    if fields.peek().is_none() {
        return Ok(None);
    }
    if fields.peek() == Some(&"v") {
        fields.next();
    }

    let mut coords = [0.0; 3];
    let mut count = 0;
    for field in fields {
        if count == 3 {
            return Err(HullError::parse(number, "expected 3 coordinates, found more"));
        }
        coords[count] = field
            .parse::<f64>()
            .map_err(|e| HullError::parse(number, format!("invalid coordinate '{field}': {e}")))?;
        count += 1;
    }
    if count != 3 {
        return Err(HullError::parse(
            number,
            format!("expected 3 coordinates, found {count}"),
        ));
    }
    Ok(Some(DVec3::from_array(coords)))
}

/// Removes exact duplicates, keeping the first occurrence of each point.
///
/// `0.0` and `-0.0` count as the same coordinate.
///
/// # Example
///
/// ```rust
/// use dnc_hull::points::dedup_points;
/// use glam::DVec3;
///
/// let unique = dedup_points(&[DVec3::X, DVec3::Y, DVec3::X]);
/// assert_eq!(unique, vec![DVec3::X, DVec3::Y]);
/// ```
pub fn dedup_points(points: &[DVec3]) -> Vec<DVec3> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .copied()
        .filter(|p| {
            let key = (*p + DVec3::ZERO).to_array().map(f64::to_bits);
            seen.insert(key)
        })
        .collect()
}
