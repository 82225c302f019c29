//! Remote port dataset access.
//!
//! The external dataset is a PostgREST-style HTTP collaborator exposing a
//! `ports` table. Only reads are performed here. Transport and decoding
//! failures are reported as [`DirectoryError`] and downgraded to "no match"
//! by the resolver.

use serde::Deserialize;
use std::fmt;

/// One row of the remote `ports` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PortRecord {
    pub port_name: String,
    #[serde(default)]
    pub un_locode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub alternative_names: Option<Vec<String>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug)]
pub enum DirectoryError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid dataset response: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Read access to the remote port dataset.
pub trait PortDirectory: Send + Sync {
    /// Case-sensitive trimmed equality on `port_name`, active records only.
    fn exact(&self, name: &str) -> Result<Option<PortRecord>, DirectoryError>;

    /// Substring match on `port_name` or `un_locode`, active records with
    /// both coordinates present, ordered by name, capped at 5.
    fn fuzzy_candidates(&self, query: &str) -> Result<Vec<PortRecord>, DirectoryError>;
}

impl<T: PortDirectory + ?Sized> PortDirectory for std::sync::Arc<T> {
    fn exact(&self, name: &str) -> Result<Option<PortRecord>, DirectoryError> {
        (**self).exact(name)
    }

    fn fuzzy_candidates(&self, query: &str) -> Result<Vec<PortRecord>, DirectoryError> {
        (**self).fuzzy_candidates(query)
    }
}

/// Candidate preference among a fuzzy result page.
///
/// First candidate with a bidirectional substring match on name or
/// UN/LOCODE wins; else the first candidate with a matching alternative
/// name; else the first candidate of the page.
pub fn select_candidate<'a>(query: &str, records: &'a [PortRecord]) -> Option<&'a PortRecord> {
    let q = query.trim().to_lowercase();

    for rec in records {
        let name = rec.port_name.to_lowercase();
        if contains_either(&q, &name) {
            return Some(rec);
        }
        if let Some(locode) = rec.un_locode.as_deref() {
            if !locode.is_empty() && contains_either(&q, &locode.to_lowercase()) {
                return Some(rec);
            }
        }
    }

    for rec in records {
        if let Some(alts) = &rec.alternative_names {
            if alts.iter().any(|alt| contains_either(&q, &alt.to_lowercase())) {
                return Some(rec);
            }
        }
    }

    records.first()
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

// ─── HTTP-backed implementation ─────────────────────────────────

const SELECT_COLUMNS: &str = "port_name,un_locode,country,latitude,longitude,alternative_names,is_active";

/// `ureq`-backed client for a PostgREST-style ports endpoint.
pub struct RestPortDirectory {
    base_url: String,
    api_key: String,
}

impl RestPortDirectory {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from `PORTS_API_URL` / `PORTS_API_KEY`. Returns None
    /// when either is unset — the resolver then skips the remote tier.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("PORTS_API_URL").ok()?;
        let api_key = std::env::var("PORTS_API_KEY").ok()?;
        Some(Self::new(base_url, api_key))
    }

    fn fetch(&self, filters: &str) -> Result<Vec<PortRecord>, DirectoryError> {
        let url = format!(
            "{}/ports?select={}&{}",
            self.base_url.trim_end_matches('/'),
            SELECT_COLUMNS,
            filters,
        );

        let response = ureq::get(&url)
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("User-Agent", "MarinerRoutes/0.3 (route-service)")
            .call()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        response
            .into_json()
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))
    }
}

impl PortDirectory for RestPortDirectory {
    fn exact(&self, name: &str) -> Result<Option<PortRecord>, DirectoryError> {
        let filters = format!(
            "port_name=eq.{}&is_active=eq.true&latitude=not.is.null&longitude=not.is.null&limit=1",
            encode(name.trim()),
        );
        Ok(self.fetch(&filters)?.into_iter().next())
    }

    fn fuzzy_candidates(&self, query: &str) -> Result<Vec<PortRecord>, DirectoryError> {
        let q = encode(query.trim());
        let filters = format!(
            "or=(port_name.ilike.*{q}*,un_locode.ilike.*{q}*)\
             &is_active=eq.true&latitude=not.is.null&longitude=not.is.null\
             &order=port_name&limit=5",
        );
        self.fetch(&filters)
    }
}

/// Percent-encode a filter value so embedded commas and parens cannot break
/// the PostgREST `or=(...)` syntax.
fn encode(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{:02X}", b))
                    .collect()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, locode: Option<&str>, alts: &[&str]) -> PortRecord {
        PortRecord {
            port_name: name.to_string(),
            un_locode: locode.map(|s| s.to_string()),
            country: None,
            latitude: Some(1.0),
            longitude: Some(2.0),
            alternative_names: if alts.is_empty() {
                None
            } else {
                Some(alts.iter().map(|s| s.to_string()).collect())
            },
            is_active: true,
        }
    }

    #[test]
    fn name_substring_wins_over_position() {
        let records = vec![
            record("Aalborg", None, &[]),
            record("Port of Rotterdam", None, &[]),
        ];
        let chosen = select_candidate("rotterdam", &records).unwrap();
        assert_eq!(chosen.port_name, "Port of Rotterdam");
    }

    #[test]
    fn locode_substring_matches() {
        let records = vec![
            record("Aalborg", Some("DKAAL"), &[]),
            record("Tallinn", Some("EETLL"), &[]),
        ];
        let chosen = select_candidate("EETLL", &records).unwrap();
        assert_eq!(chosen.port_name, "Tallinn");
    }

    #[test]
    fn name_match_preferred_over_earlier_alt_match() {
        let records = vec![
            record("Aalborg", None, &["Genoa Annex"]),
            record("Genoa", None, &[]),
        ];
        let chosen = select_candidate("Genoa", &records).unwrap();
        assert_eq!(chosen.port_name, "Genoa");
    }

    #[test]
    fn alternative_name_match() {
        let records = vec![
            record("Aalborg", None, &[]),
            record("Mumbai", None, &["Bombay"]),
        ];
        let chosen = select_candidate("bombay", &records).unwrap();
        assert_eq!(chosen.port_name, "Mumbai");
    }

    #[test]
    fn falls_back_to_first_of_page() {
        let records = vec![record("Aalborg", None, &[]), record("Aarhus", None, &[])];
        let chosen = select_candidate("xyz", &records).unwrap();
        assert_eq!(chosen.port_name, "Aalborg");
    }

    #[test]
    fn empty_page_selects_nothing() {
        assert!(select_candidate("anything", &[]).is_none());
    }

    #[test]
    fn record_decodes_from_rest_row() {
        let json = r#"{
            "port_name": "Rotterdam",
            "un_locode": "NLRTM",
            "country": "Netherlands",
            "latitude": 51.9244,
            "longitude": 4.4777,
            "alternative_names": ["Port of Rotterdam"],
            "is_active": true
        }"#;
        let rec: PortRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.un_locode.as_deref(), Some("NLRTM"));
        assert_eq!(rec.latitude, Some(51.9244));
    }

    #[test]
    fn record_tolerates_missing_optional_columns() {
        let rec: PortRecord = serde_json::from_str(r#"{"port_name": "Santos"}"#).unwrap();
        assert!(rec.is_active);
        assert!(rec.latitude.is_none());
        assert!(rec.alternative_names.is_none());
    }

    #[test]
    fn encode_escapes_filter_syntax() {
        assert_eq!(encode("Le Havre"), "Le%20Havre");
        assert_eq!(encode("a,b"), "a%2Cb");
        assert_eq!(encode("(x)"), "%28x%29");
    }
}
