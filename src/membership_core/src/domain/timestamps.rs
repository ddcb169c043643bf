use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and modification times stamped by a store on save.
///
/// Both are `None` until the entity is first persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Timestamps {
    pub fn at(created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            created: Some(created),
            last_modified: Some(last_modified),
        }
    }

    /// Stamps a save at `now`: sets `created` on the first save, refreshes
    /// `last_modified` on every save.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created.is_none() {
            self.created = Some(now);
        }
        self.last_modified = Some(now);
    }

    /// Stamps a save over an already stored copy. `created` always comes
    /// from `stored`, whatever the caller sent.
    pub fn resave(&mut self, stored: &Timestamps, now: DateTime<Utc>) {
        self.created = stored.created;
        self.touch(now);
    }

    pub fn is_persisted(&self) -> bool {
        self.created.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_first_touch_sets_both() {
        let now = Utc::now();
        let mut stamps = Timestamps::default();
        stamps.touch(now);
        assert_eq!(stamps, Timestamps::at(now, now));
        assert!(stamps.is_persisted());
    }

    #[test]
    fn test_later_touch_keeps_created() {
        let first = Utc::now();
        let later = first + Duration::seconds(5);
        let mut stamps = Timestamps::default();
        stamps.touch(first);
        stamps.touch(later);
        assert_eq!(stamps.created, Some(first));
        assert_eq!(stamps.last_modified, Some(later));
    }

    #[test]
    fn test_resave_keeps_the_stored_created() {
        let first = Utc::now();
        let later = first + Duration::seconds(5);
        let stored = Timestamps::at(first, first);
        let mut incoming = Timestamps::at(later, later);

        incoming.resave(&stored, later);
        assert_eq!(incoming, Timestamps::at(first, later));
    }
}
