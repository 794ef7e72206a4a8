use crate::domain::EventRecord;

/// True when `fresh` must be rendered: nothing is shown yet, or its
/// timestamp or region differs from the shown one. Other fields are ignored.
pub fn is_new_event(last: Option<&EventRecord>, fresh: &EventRecord) -> bool {
    match last {
        None => true,
        Some(last) => last.identity() != fresh.identity(),
    }
}

/// Mutable state of one monitoring session.
///
/// Owned by a single task; holds the last rendered event and the
/// in-flight guard for fetches.
#[derive(Debug, Default)]
pub struct Session {
    last_shown: Option<EventRecord>,
    loading: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the in-flight slot. Returns false if a fetch is already running.
    pub fn try_begin_fetch(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Release the in-flight slot. Returns false if no fetch was running.
    pub fn finish_fetch(&mut self) -> bool {
        std::mem::replace(&mut self.loading, false)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_shown(&self) -> Option<&EventRecord> {
        self.last_shown.as_ref()
    }

    /// Offer a freshly fetched record. If it is a new event it replaces the
    /// held one and is returned; otherwise `None`.
    pub fn accept(&mut self, fresh: EventRecord) -> Option<&EventRecord> {
        if !is_new_event(self.last_shown.as_ref(), &fresh) {
            return None;
        }
        self.last_shown = Some(fresh);
        self.last_shown.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date_time: &str, region: &str) -> EventRecord {
        EventRecord {
            date_time: date_time.to_string(),
            region: region.to_string(),
            magnitude: "5.0".to_string(),
            depth: "10 km".to_string(),
            date: "01 Jan 2024".to_string(),
            time: "00:00:00 WIB".to_string(),
            latitude: "6.2 LS".to_string(),
            longitude: "106.8 BT".to_string(),
            potential: "Tidak berpotensi tsunami".to_string(),
            felt: None,
            shakemap: None,
        }
    }

    #[test]
    fn test_nothing_held_is_new() {
        assert!(is_new_event(None, &record("t1", "Jakarta")));
    }

    #[test]
    fn test_same_identity_is_not_new() {
        let a = record("t1", "Jakarta");
        let mut b = record("t1", "Jakarta");
        b.felt = Some("II Bogor".to_string());
        b.magnitude = "5.1".to_string();
        assert!(!is_new_event(Some(&a), &b));
    }

    #[test]
    fn test_different_timestamp_is_new() {
        let a = record("t1", "Jakarta");
        let b = record("t2", "Jakarta");
        assert!(is_new_event(Some(&a), &b));
    }

    #[test]
    fn test_different_region_is_new() {
        let a = record("t1", "Jakarta");
        let b = record("t1", "Bandung");
        assert!(is_new_event(Some(&a), &b));
    }

    #[test]
    fn test_in_flight_guard() {
        let mut session = Session::new();
        assert!(!session.is_loading());
        assert!(session.try_begin_fetch());
        assert!(!session.try_begin_fetch());
        assert!(session.is_loading());

        assert!(session.finish_fetch());
        assert!(!session.finish_fetch());
        assert!(session.try_begin_fetch());
    }

    #[test]
    fn test_accept_replaces_only_on_change() {
        let mut session = Session::new();
        assert!(session.last_shown().is_none());

        assert!(session.accept(record("t1", "Jakarta")).is_some());

        let mut same = record("t1", "Jakarta");
        same.potential = "changed".to_string();
        assert!(session.accept(same).is_none());
        let kept = session.last_shown().map(|r| r.potential.as_str());
        assert_eq!(kept, Some("Tidak berpotensi tsunami"));

        let shown = session.accept(record("t2", "Jakarta")).cloned();
        assert_eq!(shown.map(|r| r.date_time), Some("t2".to_string()));
        assert_eq!(session.last_shown().map(|r| r.date_time.as_str()), Some("t2"));
    }
}
