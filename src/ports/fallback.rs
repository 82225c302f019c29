//! Built-in fallback port table and UN/LOCODE alias table.
//!
//! The table is a static slice sorted lexicographically by name; substring
//! scans therefore resolve ties to the lexicographically-first key rather
//! than depending on container iteration order.

/// (name, latitude, longitude), sorted by name.
pub const FALLBACK_PORTS: &[(&str, f64, f64)] = &[
    ("Alexandria", 31.2001, 29.9187),
    ("Amsterdam", 52.3676, 4.9041),
    ("Amsterdam, Netherlands", 52.3676, 4.9041),
    ("Antwerp", 51.2194, 4.4025),
    ("Auckland", -36.8485, 174.7633),
    ("Barcelona", 41.3851, 2.1734),
    ("Bilbao", 43.2627, -2.9253),
    ("Buenos Aires", -34.6118, -58.3960),
    ("Cape Town", -33.9249, 18.4241),
    ("Cleveland", 41.4993, -81.6944),
    ("Cleveland, United States", 41.4993, -81.6944),
    ("Cleveland, United States (USA)", 41.4993, -81.6944),
    ("Dubai", 25.2048, 55.2708),
    ("Genoa", 44.4056, 8.9463),
    ("Hamburg", 53.5511, 9.9937),
    ("Hong Kong", 22.3193, 114.1694),
    ("Houston", 29.7604, -95.3698),
    ("Istanbul", 41.0082, 28.9784),
    ("Lagos", 6.4281, 3.4219),
    ("Le Havre", 49.4944, 0.1079),
    ("London", 51.5074, -0.1278),
    ("Los Angeles", 33.7174, -118.2517),
    ("Marseille", 43.2965, 5.3698),
    ("Melbourne", -37.8136, 144.9631),
    ("Miami", 25.7617, -80.1918),
    ("Mumbai", 19.0760, 72.8777),
    ("Naples", 40.8518, 14.2681),
    ("New York", 40.6892, -74.0445),
    ("Panama City", 8.9824, -79.5199),
    ("Paranagua, Brazil", -25.5163, -48.5082),
    ("Paranaguá", -25.5163, -48.5082),
    ("Piraeus", 37.9472, 23.6348),
    ("Portsmouth", 50.8198, -1.0880),
    ("Portsmouth, United Kingdom (UK)", 50.8198, -1.0880),
    ("Rotterdam", 51.9244, 4.4777),
    ("Santos", -23.9608, -46.3331),
    ("Shanghai", 31.2304, 121.4737),
    ("Singapore", 1.2966, 103.7764),
    ("Southampton", 50.9097, -1.4044),
    ("Suez", 29.9668, 32.5498),
    ("Sydney", -33.8688, 151.2093),
    ("Tallinn", 59.4370, 24.7536),
    ("Tallinn, Estonia", 59.4370, 24.7536),
    ("Tokyo", 35.6762, 139.6503),
    ("Vancouver", 49.2827, -123.1207),
    ("Zeebrugge", 51.3333, 3.2167),
    ("Zeebrugge, Belgium", 51.3333, 3.2167),
];

/// UN/LOCODE → canonical destination name.
const UNLOCODE_ALIASES: &[(&str, &str)] = &[
    ("AEDXB", "Dubai, UAE"),
    ("ARBUE", "Buenos Aires, Argentina"),
    ("AUMEL", "Melbourne, Australia"),
    ("AUSYD", "Sydney, Australia"),
    ("BEANR", "Antwerp, Belgium"),
    ("BEZEE", "Zeebrugge, Belgium"),
    ("BRPNG", "Paranaguá, Brazil"),
    ("BRSSZ", "Santos, Brazil"),
    ("CAVAN", "Vancouver, Canada"),
    ("CNSHA", "Shanghai, China"),
    ("DKHAM", "Hamburg, Germany"),
    ("EETLL", "Tallinn, Estonia"),
    ("EGALY", "Alexandria, Egypt"),
    ("EGSKI", "Suez, Egypt"),
    ("ESBAR", "Barcelona, Spain"),
    ("ESBIL", "Bilbao, Spain"),
    ("FRLEH", "Le Havre, France"),
    ("FRMAR", "Marseille, France"),
    ("GBLON", "London, United Kingdom"),
    ("GBPME", "Portsmouth, United Kingdom"),
    ("GBSOU", "Southampton, United Kingdom"),
    ("GRPIR", "Piraeus, Greece"),
    ("HKHKG", "Hong Kong"),
    ("INBOM", "Mumbai, India"),
    ("ITGOA", "Genoa, Italy"),
    ("ITNAP", "Naples, Italy"),
    ("JPTYO", "Tokyo, Japan"),
    ("NGLOS", "Lagos, Nigeria"),
    ("NLAMS", "Amsterdam, Netherlands"),
    ("NLRTM", "Rotterdam, Netherlands"),
    ("NZAKL", "Auckland, New Zealand"),
    ("PAPTY", "Panama City, Panama"),
    ("SGSIN", "Singapore"),
    ("TRIST", "Istanbul, Turkey"),
    ("USCLE", "Cleveland, United States"),
    ("USHOU", "Houston, United States"),
    ("USLAX", "Los Angeles, United States"),
    ("USMIA", "Miami, United States"),
    ("USNYC", "New York, United States"),
    ("ZACPT", "Cape Town, South Africa"),
];

/// Translate a UN/LOCODE to its canonical destination name, if known.
/// The input is uppercased before the exact key match.
pub fn unlocode_to_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_uppercase();
    UNLOCODE_ALIASES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Look up a destination name in the fallback table.
///
/// Exact match first, then a case-insensitive bidirectional substring scan
/// in table (lexicographic) order — first matching key wins.
pub fn lookup(name: &str) -> Option<(&'static str, f64, f64)> {
    let name = name.trim();
    // An empty needle would substring-match every key.
    if name.is_empty() {
        return None;
    }
    if let Some(&(key, lat, lng)) = FALLBACK_PORTS.iter().find(|(key, _, _)| *key == name) {
        return Some((key, lat, lng));
    }

    let needle = name.to_lowercase();
    for &(key, lat, lng) in FALLBACK_PORTS {
        let key_lower = key.to_lowercase();
        if key_lower.contains(&needle) || needle.contains(&key_lower) {
            return Some((key, lat, lng));
        }
    }
    None
}

/// The first 10 names of the table, used to populate error responses.
pub fn available_sample() -> Vec<&'static str> {
    FALLBACK_PORTS.iter().take(10).map(|&(name, _, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn table_is_sorted_by_name() {
        assert!(FALLBACK_PORTS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn exact_match() {
        let (name, lat, lng) = lookup("Rotterdam").unwrap();
        assert_eq!(name, "Rotterdam");
        assert_relative_eq!(lat, 51.9244);
        assert_relative_eq!(lng, 4.4777);
    }

    #[test]
    fn empty_and_blank_queries_match_nothing() {
        assert!(lookup("").is_none());
        assert!(lookup("   ").is_none());
    }

    #[test]
    fn substring_query_in_key() {
        // "Zeebrug" is contained in "Zeebrugge"
        let (name, _, _) = lookup("Zeebrug").unwrap();
        assert_eq!(name, "Zeebrugge");
    }

    #[test]
    fn substring_key_in_query() {
        // The translated UN/LOCODE name contains the key "Portsmouth"
        let (_, lat, lng) = lookup("Portsmouth, United Kingdom").unwrap();
        assert_relative_eq!(lat, 50.8198);
        assert_relative_eq!(lng, -1.0880);
    }

    #[test]
    fn substring_scan_is_case_insensitive() {
        assert!(lookup("rotterdam").is_some());
        assert!(lookup("SINGAPORE").is_some());
    }

    #[test]
    fn missing_name_is_none() {
        assert!(lookup("Nowhereville").is_none());
    }

    #[test]
    fn unlocode_translation() {
        assert_eq!(unlocode_to_name("GBPME"), Some("Portsmouth, United Kingdom"));
        assert_eq!(unlocode_to_name("gbpme"), Some("Portsmouth, United Kingdom"));
        assert_eq!(unlocode_to_name("ZZZZZ"), None);
    }

    #[test]
    fn sample_is_first_ten_names() {
        let sample = available_sample();
        assert_eq!(sample.len(), 10);
        assert_eq!(sample[0], "Alexandria");
        assert_eq!(sample[9], "Cleveland");
    }
}
