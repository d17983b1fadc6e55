use crate::error::RentalError;
use crate::models::{Availability, MovieRecord};

/// Field separator in `database.txt`. Fields are not escaped, so a `;` inside
/// a name or genre shifts the columns on the next load.
const SEPARATOR: char = ';';

/// Render a rating so it parses back to the same `f64` (`1.0`, `0.75`, `inf`).
pub fn format_rating(rating: f64) -> String {
    format!("{rating:?}")
}

/// Serialize one record as `name;rating;genre;availability;` without the line
/// terminator.
pub fn format_record(record: &MovieRecord) -> String {
    format!(
        "{name}{sep}{rating}{sep}{genre}{sep}{availability}{sep}",
        name = record.name,
        rating = format_rating(record.rating),
        genre = record.genre,
        availability = record.availability,
        sep = SEPARATOR,
    )
}

/// Parse one line of `database.txt`. `line_number` is 1-based and only used
/// for error messages.
pub fn parse_line(line_number: usize, line: &str) -> Result<MovieRecord, RentalError> {
    let malformed = |reason: String| RentalError::MalformedLine {
        line: line_number,
        reason,
    };

    let body = line.strip_suffix(SEPARATOR).unwrap_or(line);
    let fields: Vec<&str> = body.split(SEPARATOR).collect();
    let [name, rating, genre, availability] = fields.as_slice() else {
        return Err(malformed(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };

    let rating = rating
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(format!("invalid rating `{rating}`")))?;
    let availability = availability
        .parse::<Availability>()
        .map_err(|_| malformed(format!("unknown availability `{availability}`")))?;

    Ok(MovieRecord {
        name: name.to_string(),
        rating,
        genre: genre.to_string(),
        availability,
    })
}
