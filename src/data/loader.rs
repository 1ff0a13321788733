use crate::data::Rating;
use crate::error::{RecmetricsError, Result};
use std::path::Path;

/// Load a ratings dataset from a file.
///
/// Two formats are supported, chosen by extension:
/// - `.json`: a JSON array of `{"user_id", "item_id", "rating"}` records.
/// - Anything else: MovieLens-style delimited text, one rating per line,
///   `user item rating [timestamp]` separated by tabs, `::` or whitespace.
///   A trailing timestamp column is ignored; blank lines are skipped.
pub fn load_ratings(path: &Path) -> Result<Vec<Rating>> {
    let content = std::fs::read_to_string(path).map_err(RecmetricsError::Io)?;

    let ratings = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&content)
            .map_err(|e| RecmetricsError::Parse(format!("{}: invalid JSON: {}", path.display(), e)))?
    } else {
        parse_delimited(&content, path)?
    };

    log::info!("Loaded {} ratings from {}", ratings.len(), path.display());
    Ok(ratings)
}

fn parse_delimited(content: &str, path: &Path) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = if line.contains("::") {
            line.split("::").collect()
        } else {
            line.split_whitespace().collect()
        };

        if fields.len() < 3 {
            return Err(RecmetricsError::Parse(format!(
                "{}:{}: expected at least 3 fields (user, item, rating), got {}",
                path.display(),
                line_no + 1,
                fields.len()
            )));
        }

        let rating: f64 = fields[2].trim().parse().map_err(|_| {
            RecmetricsError::Parse(format!(
                "{}:{}: invalid rating value '{}'",
                path.display(),
                line_no + 1,
                fields[2]
            ))
        })?;

        ratings.push(Rating::new(fields[0].trim(), fields[1].trim(), rating));
    }

    Ok(ratings)
}
