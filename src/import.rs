//! Offline CSV-to-SQL preparation for the remote port dataset.
//!
//! Reads a CSV of {port_name, un_locode, latitude, longitude}, cleans a
//! trailing "Port" suffix, derives the country from the UN/LOCODE prefix,
//! and writes CREATE TABLE plus bulk INSERT statements. One-shot data prep,
//! not part of the running service.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::ports::countries::country_code_to_name;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// One input row. Coordinates stay as text so blank cells survive parsing.
#[derive(Debug, Deserialize)]
struct CsvPort {
    port_name: String,
    #[serde(default)]
    un_locode: String,
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
}

pub struct ImportSummary {
    pub written: usize,
    pub skipped: usize,
}

const CREATE_TABLE_SQL: &str = "\
-- Create ports table
CREATE TABLE IF NOT EXISTS public.ports (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT timezone('utc'::text, now()) NOT NULL,
    updated_at TIMESTAMP WITH TIME ZONE DEFAULT timezone('utc'::text, now()) NOT NULL,
    port_name TEXT NOT NULL,
    un_locode TEXT,
    country TEXT NOT NULL,
    latitude DECIMAL(10, 7) NOT NULL,
    longitude DECIMAL(10, 7) NOT NULL,
    is_active BOOLEAN DEFAULT true,
    alternative_names TEXT[]
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_ports_name ON public.ports(port_name);
CREATE INDEX IF NOT EXISTS idx_ports_code ON public.ports(un_locode);
CREATE INDEX IF NOT EXISTS idx_ports_country ON public.ports(country);
CREATE INDEX IF NOT EXISTS idx_ports_location ON public.ports(latitude, longitude);
";

/// Convert a ports CSV into a SQL import script.
pub fn convert(input: &Path, output: &Path) -> Result<ImportSummary, ImportError> {
    let mut reader = csv::Reader::from_path(input)?;

    let mut statements = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize() {
        let row: CsvPort = row?;

        let (lat, lng) = match (
            row.latitude.trim().parse::<f64>(),
            row.longitude.trim().parse::<f64>(),
        ) {
            (Ok(lat), Ok(lng)) => (lat, lng),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let raw_name = row.port_name.trim();
        let clean_name = clean_port_name(raw_name);
        let locode = row.un_locode.trim();

        let country = locode
            .get(..2)
            .map(country_code_to_name)
            .unwrap_or("Unknown");

        // Keep the raw spelling as an alternative name when cleaning changed it.
        let alt_names_sql = if raw_name != clean_name {
            format!("ARRAY['{}']", escape(raw_name))
        } else {
            "ARRAY[]::TEXT[]".to_string()
        };

        let locode_sql = if locode.is_empty() {
            "NULL".to_string()
        } else {
            format!("'{}'", escape(locode))
        };

        statements.push(format!(
            "INSERT INTO public.ports (port_name, un_locode, country, latitude, longitude, alternative_names) VALUES\n\
             ('{}', {}, '{}', {}, {}, {});",
            escape(&clean_name),
            locode_sql,
            escape(country),
            lat,
            lng,
            alt_names_sql,
        ));
    }

    let mut script = String::from(CREATE_TABLE_SQL);
    script.push_str("\n-- Insert ports data\n");
    script.push_str(&statements.join("\n"));
    script.push('\n');
    fs::write(output, script)?;

    Ok(ImportSummary {
        written: statements.len(),
        skipped,
    })
}

/// Strip a trailing "Port" word (case-insensitive, whitespace-separated).
fn clean_port_name(name: &str) -> String {
    let trimmed = name.trim();
    let n = trimmed.len();
    if n > 4 && trimmed.is_char_boundary(n - 4) && trimmed[n - 4..].eq_ignore_ascii_case("port") {
        let head = trimmed[..n - 4].trim_end();
        if !head.is_empty() && head.len() < n - 4 {
            return head.to_string();
        }
    }
    trimmed.to_string()
}

fn escape(s: &str) -> String {
    s.replace('\'', "''")
}
