//! Port resolver — orchestrates the lookup chain.
//!
//! Query flow: UN/LOCODE translation → remote dataset (exact, then fuzzy)
//! → built-in fallback table → remote retry with the original code → not
//! found. Remote failures degrade to the next tier, never to the caller.

use chrono::Utc;

use super::directory::{select_candidate, DirectoryError, PortDirectory, PortRecord, RestPortDirectory};
use super::fallback;
use super::types::{PortSource, ResolveError, ResolvedPort};

/// The port resolver with its lookup pipeline.
pub struct PortResolver {
    directory: Option<Box<dyn PortDirectory>>,
}

impl PortResolver {
    /// Build a resolver with the remote tier taken from the environment.
    pub fn new() -> Self {
        let directory = RestPortDirectory::from_env();
        if directory.is_none() {
            log("remote port dataset not configured; using fallback table only");
        }
        Self {
            directory: directory.map(|d| Box::new(d) as Box<dyn PortDirectory>),
        }
    }

    /// A resolver without a remote tier.
    pub fn offline() -> Self {
        Self { directory: None }
    }

    /// A resolver with a specific directory (for testing).
    pub fn with_directory(directory: Box<dyn PortDirectory>) -> Self {
        Self {
            directory: Some(directory),
        }
    }

    /// Resolve a free-text destination name or UN/LOCODE to coordinates.
    ///
    /// A missing match yields [`ResolveError::NotFound`], never a panic.
    pub fn resolve(&self, query: &str) -> Result<ResolvedPort, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        let upper = query.to_uppercase();
        match fallback::unlocode_to_name(&upper) {
            Some(name) => {
                log(&format!("UN/LOCODE {} mapped to: {}", upper, name));
                self.lookup_chain(name, Some(&upper))
            }
            None => self.lookup_chain(query, None),
        }
    }

    /// Sample of known port names, used to populate error responses.
    pub fn available_sample(&self) -> Vec<&'static str> {
        fallback::available_sample()
    }

    fn lookup_chain(
        &self,
        name: &str,
        original_code: Option<&str>,
    ) -> Result<ResolvedPort, ResolveError> {
        // Remote tier
        if let Some(mut port) = self.remote_lookup(name) {
            port.unlocode = original_code.map(|c| c.to_string());
            return Ok(port);
        }

        // Fallback table
        log(&format!("searching fallback table for: {}", name));
        if let Some((key, lat, lng)) = fallback::lookup(name) {
            log(&format!("fallback table matched: {}", key));
            return Ok(ResolvedPort {
                name: key.to_string(),
                lat,
                lng,
                source: PortSource::Fallback,
                unlocode: original_code.map(|c| c.to_string()),
            });
        }

        // Last resort: the raw code may exist in the remote dataset even
        // though the translated name matched nothing.
        if let Some(code) = original_code {
            log(&format!("retrying remote lookup with original code: {}", code));
            if let Some(mut port) = self.remote_lookup(code) {
                port.unlocode = Some(code.to_string());
                return Ok(port);
            }
        }

        log(&format!("no coordinates found for: {}", name));
        Err(ResolveError::NotFound(name.to_string()))
    }

    fn remote_lookup(&self, name: &str) -> Option<ResolvedPort> {
        let directory = self.directory.as_ref()?;
        log(&format!("searching remote dataset for: {}", name));
        match remote_query(directory.as_ref(), name) {
            Ok(Some(port)) => {
                log(&format!("remote dataset matched: {}", port.name));
                Some(port)
            }
            Ok(None) => {
                log(&format!("no remote match for: {}", name));
                None
            }
            Err(e) => {
                // Upstream trouble is a non-match, not an error.
                log(&format!("remote dataset unavailable ({}); continuing", e));
                None
            }
        }
    }
}

impl Default for PortResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn remote_query(
    directory: &dyn PortDirectory,
    name: &str,
) -> Result<Option<ResolvedPort>, DirectoryError> {
    if let Some(rec) = directory.exact(name)? {
        if let Some(port) = record_to_port(&rec) {
            return Ok(Some(port));
        }
    }

    let candidates = directory.fuzzy_candidates(name)?;
    Ok(select_candidate(name, &candidates).and_then(record_to_port))
}

fn record_to_port(rec: &PortRecord) -> Option<ResolvedPort> {
    let (lat, lng) = (rec.latitude?, rec.longitude?);
    Some(ResolvedPort {
        name: rec.port_name.clone(),
        lat,
        lng,
        source: PortSource::Remote,
        unlocode: None,
    })
}

fn log(msg: &str) {
    eprintln!("[{}] port resolver: {}", Utc::now().format("%H:%M:%S"), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    /// Records every query; answers from fixed exact/fuzzy tables.
    struct RecordingDirectory {
        queries: Mutex<Vec<String>>,
        fuzzy_queries: Mutex<Vec<String>>,
        exact_rows: Vec<PortRecord>,
        fuzzy_rows: Vec<PortRecord>,
        fail: bool,
    }

    impl RecordingDirectory {
        fn empty() -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                fuzzy_queries: Mutex::new(Vec::new()),
                exact_rows: Vec::new(),
                fuzzy_rows: Vec::new(),
                fail: false,
            }
        }

        fn with_exact(rows: Vec<PortRecord>) -> Self {
            Self {
                exact_rows: rows,
                ..Self::empty()
            }
        }

        fn with_fuzzy(mut self, rows: Vec<PortRecord>) -> Self {
            self.fuzzy_rows = rows;
            self
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::empty()
            }
        }

        fn seen(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }

        fn fuzzy_seen(&self) -> Vec<String> {
            self.fuzzy_queries.lock().unwrap().clone()
        }
    }

    impl PortDirectory for RecordingDirectory {
        fn exact(&self, name: &str) -> Result<Option<PortRecord>, DirectoryError> {
            self.queries.lock().unwrap().push(name.to_string());
            if self.fail {
                return Err(DirectoryError::Network("connection refused".into()));
            }
            Ok(self
                .exact_rows
                .iter()
                .find(|r| r.port_name == name.trim())
                .cloned())
        }

        fn fuzzy_candidates(&self, query: &str) -> Result<Vec<PortRecord>, DirectoryError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.fuzzy_queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(DirectoryError::Network("connection refused".into()));
            }
            Ok(self.fuzzy_rows.clone())
        }
    }

    fn row(name: &str, lat: f64, lng: f64) -> PortRecord {
        PortRecord {
            port_name: name.to_string(),
            un_locode: None,
            country: None,
            latitude: Some(lat),
            longitude: Some(lng),
            alternative_names: None,
            is_active: true,
        }
    }

    #[test]
    fn unlocode_translates_then_hits_fallback() {
        let resolver = PortResolver::offline();
        let port = resolver.resolve("GBPME").unwrap();
        assert_relative_eq!(port.lat, 50.8198);
        assert_relative_eq!(port.lng, -1.0880);
        assert_eq!(port.source, PortSource::Fallback);
        assert_eq!(port.unlocode.as_deref(), Some("GBPME"));
    }

    #[test]
    fn lowercase_unlocode_translates_too() {
        let resolver = PortResolver::offline();
        let port = resolver.resolve("eetll").unwrap();
        assert_relative_eq!(port.lat, 59.4370);
        assert_relative_eq!(port.lng, 24.7536);
    }

    #[test]
    fn fallback_exact_when_remote_unreachable() {
        let resolver = PortResolver::with_directory(Box::new(RecordingDirectory::failing()));
        let port = resolver.resolve("Rotterdam").unwrap();
        assert_relative_eq!(port.lat, 51.9244);
        assert_relative_eq!(port.lng, 4.4777);
        assert_eq!(port.source, PortSource::Fallback);
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let resolver = PortResolver::offline();
        match resolver.resolve("Nowhereville") {
            Err(ResolveError::NotFound(q)) => assert_eq!(q, "Nowhereville"),
            other => panic!("expected NotFound, got {:?}", other.map(|p| p.name)),
        }
    }

    #[test]
    fn empty_query_is_rejected() {
        let resolver = PortResolver::offline();
        assert!(matches!(resolver.resolve("  "), Err(ResolveError::EmptyQuery)));
    }

    #[test]
    fn translated_name_is_queried_before_raw_code() {
        let dir = Arc::new(RecordingDirectory::empty());
        let resolver = PortResolver::with_directory(Box::new(dir.clone()));

        // EETLL translates to "Tallinn, Estonia", which the fallback table
        // satisfies — so the remote tier must only ever see the translation.
        resolver.resolve("EETLL").unwrap();
        let seen = dir.seen();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|q| q == "Tallinn, Estonia"));
    }

    #[test]
    fn retry_uses_original_code_after_both_tiers_miss() {
        let dir = Arc::new(RecordingDirectory::empty());
        let resolver = PortResolver::with_directory(Box::new(dir.clone()));

        // A fabricated translation whose name matches nothing anywhere.
        let result = resolver.lookup_chain("Atlantis Deepwater Terminal", Some("XXATL"));
        assert!(matches!(result, Err(ResolveError::NotFound(_))));

        let seen = dir.seen();
        assert_eq!(seen.first().map(String::as_str), Some("Atlantis Deepwater Terminal"));
        assert_eq!(seen.last().map(String::as_str), Some("XXATL"));
    }

    #[test]
    fn remote_exact_hit_wins_over_fallback() {
        // The remote dataset's Rotterdam row differs from the fallback
        // table's; the remote tier must win.
        let dir = RecordingDirectory::with_exact(vec![row("Rotterdam", 51.95, 4.14)]);
        let resolver = PortResolver::with_directory(Box::new(dir));
        let port = resolver.resolve("Rotterdam").unwrap();
        assert_eq!(port.source, PortSource::Remote);
        assert_relative_eq!(port.lat, 51.95);
    }

    #[test]
    fn remote_exact_hit_skips_the_fuzzy_query() {
        // An exact row and a differing fuzzy candidate for the same query:
        // the exact row's coordinates win and the fuzzy tier is never asked.
        let dir = Arc::new(
            RecordingDirectory::with_exact(vec![row("Rotterdam", 51.95, 4.14)])
                .with_fuzzy(vec![row("Port of Rotterdam", 51.88, 4.29)]),
        );
        let resolver = PortResolver::with_directory(Box::new(dir.clone()));

        let port = resolver.resolve("Rotterdam").unwrap();
        assert_eq!(port.name, "Rotterdam");
        assert_relative_eq!(port.lat, 51.95);
        assert_relative_eq!(port.lng, 4.14);
        assert!(dir.fuzzy_seen().is_empty());
    }

    #[test]
    fn remote_fuzzy_answers_only_after_exact_misses() {
        let dir = Arc::new(
            RecordingDirectory::empty().with_fuzzy(vec![row("Port of Gdansk", 54.4009, 18.6702)]),
        );
        let resolver = PortResolver::with_directory(Box::new(dir.clone()));

        let port = resolver.resolve("Gdansk").unwrap();
        assert_eq!(port.source, PortSource::Remote);
        assert_eq!(port.name, "Port of Gdansk");
        assert_eq!(dir.fuzzy_seen(), vec!["Gdansk".to_string()]);
    }
}
