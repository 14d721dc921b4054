//! Participant ledger: the votes cast on an event.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use uuid::Uuid;

use crate::error::{JuhannusError, JuhannusResult};
use crate::event::{Event, Participant};
use crate::schedule::Schedule;
use crate::store::ParticipantStore;

pub const MAX_NAME_CHARS: usize = 32;
pub const MAX_VOTE: i64 = 100;

/// Word characters, whitespace, and the punctuation people use in handles.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"^[\w\s/^\-.,\\|()\[\]{}&!"#€%=?@£$∞§≈±+:;<>´`¨*]+$"##)
        .unwrap_or_else(|e| unreachable!("name pattern is valid: {e}"))
});

/// Who is asking. Staff may vote after the deadline and edit existing votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Public,
    Staff,
}

impl Actor {
    pub fn from_privileged(privileged: bool) -> Self {
        if privileged { Actor::Staff } else { Actor::Public }
    }

    pub fn is_privileged(self) -> bool {
        self == Actor::Staff
    }

    fn require_privileged(self) -> JuhannusResult<()> {
        if self.is_privileged() {
            Ok(())
        } else {
            Err(JuhannusError::Unauthorized)
        }
    }
}

/// Result of a vote submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Accepted(Participant),
    /// Arrived after the voting deadline from the public. Dropped without
    /// telling the voter.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Vote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder {
            key: SortKey::Name,
            ascending: true,
        }
    }
}

impl SortOrder {
    /// Read the order from `?vote=<dir>` / `?name=<dir>` query values.
    ///
    /// A non-empty `vote` value selects vote order, anything else name
    /// order. The chosen key's value `desc` (any case) flips the direction.
    pub fn from_query(vote: Option<&str>, name: Option<&str>) -> Self {
        let (key, direction) = match vote {
            Some(v) if !v.is_empty() => (SortKey::Vote, Some(v)),
            _ => (SortKey::Name, name),
        };

        SortOrder {
            key,
            ascending: !direction.is_some_and(|d| d.eq_ignore_ascii_case("desc")),
        }
    }
}

/// Trim and check a participant name.
pub fn validate_name(name: &str) -> JuhannusResult<String> {
    let name = name.trim();

    if name.chars().count() > MAX_NAME_CHARS || !NAME_PATTERN.is_match(name) {
        return Err(JuhannusError::InvalidName(name.to_string()));
    }

    Ok(name.to_string())
}

pub fn validate_vote(vote: i64) -> JuhannusResult<u8> {
    if !(0..=MAX_VOTE).contains(&vote) {
        return Err(JuhannusError::InvalidVote(vote));
    }
    u8::try_from(vote).map_err(|_| JuhannusError::InvalidVote(vote))
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub struct Ledger<'a, S: ParticipantStore + ?Sized> {
    store: &'a S,
    schedule: Schedule,
}

impl<'a, S: ParticipantStore + ?Sized> Ledger<'a, S> {
    pub fn new(store: &'a S, schedule: Schedule) -> Self {
        Ledger { store, schedule }
    }

    /// Record a vote on `event`.
    ///
    /// Validation and the duplicate check run first for everyone. Public
    /// submissions after the voting deadline then come back as
    /// [`Submission::Discarded`] without being stored.
    pub fn submit<T: TimeZone>(
        &self,
        event: &Event,
        name: &str,
        vote: i64,
        now: &DateTime<T>,
        actor: Actor,
    ) -> JuhannusResult<Submission> {
        let name = validate_name(name)?;
        let vote = validate_vote(vote)?;

        self.ensure_name_free(event.year, &name, None)?;

        if !actor.is_privileged() && !event.is_voting_open(&self.schedule, now, None) {
            tracing::info!(year = event.year, %name, "discarded vote after deadline");
            return Ok(Submission::Discarded);
        }

        let participant = Participant::new(event.year, name, vote, now);
        self.store.create_participant(&participant)?;
        tracing::info!(year = event.year, id = %participant.id, "vote recorded");

        Ok(Submission::Accepted(participant))
    }

    /// Change the name and vote of an existing participant. Staff only.
    pub fn modify(&self, id: Uuid, name: &str, vote: i64, actor: Actor) -> JuhannusResult<Participant> {
        actor.require_privileged()?;

        let mut participant = self.get(id)?;
        let name = validate_name(name)?;
        let vote = validate_vote(vote)?;

        self.ensure_name_free(participant.event, &name, Some(id))?;

        participant.name = name;
        participant.vote = vote;
        self.store.update_participant(&participant)?;
        tracing::info!(%id, "participant modified");

        Ok(participant)
    }

    /// Remove a participant. Staff only.
    pub fn delete(&self, id: Uuid, actor: Actor) -> JuhannusResult<()> {
        actor.require_privileged()?;

        self.get(id)?;
        self.store.delete_participant(id)?;
        tracing::info!(%id, "participant deleted");
        Ok(())
    }

    /// Hide or show a participant. Staff only.
    ///
    /// Showing fails with `DuplicateName` if another visible participant has
    /// taken the name in the meantime.
    pub fn set_visible(&self, id: Uuid, visible: bool, actor: Actor) -> JuhannusResult<Participant> {
        actor.require_privileged()?;

        let mut participant = self.get(id)?;
        if visible {
            self.ensure_name_free(participant.event, &participant.name, Some(id))?;
        }
        participant.visible = visible;
        self.store.update_participant(&participant)?;
        tracing::info!(%id, visible, "participant visibility changed");

        Ok(participant)
    }

    /// Visible participants of the event for `year`, in `order`.
    pub fn list_visible(&self, year: i32, order: SortOrder) -> JuhannusResult<Vec<Participant>> {
        let mut participants: Vec<_> = self
            .store
            .participants(year)?
            .into_iter()
            .filter(|p| p.visible)
            .collect();

        match order.key {
            SortKey::Name => participants.sort_by_cached_key(|p| p.name.to_lowercase()),
            SortKey::Vote => participants.sort_by_key(|p| p.vote),
        }

        if !order.ascending {
            participants.reverse();
        }

        Ok(participants)
    }

    fn get(&self, id: Uuid) -> JuhannusResult<Participant> {
        self.store
            .participant(id)?
            .ok_or(JuhannusError::ParticipantNotFound(id))
    }

    /// Reject `name` if another visible participant of the event has it.
    fn ensure_name_free(&self, year: i32, name: &str, except: Option<Uuid>) -> JuhannusResult<()> {
        let taken = self
            .store
            .participants(year)?
            .iter()
            .filter(|p| p.visible && Some(p.id) != except)
            .any(|p| same_name(&p.name, name));

        if taken {
            return Err(JuhannusError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EventStore, MemoryStore};
    use chrono::Duration;
    use chrono_tz::Europe::Helsinki;
    use chrono_tz::Tz;

    struct Fixture {
        store: MemoryStore,
        event: Event,
        schedule: Schedule,
    }

    impl Fixture {
        fn new() -> Self {
            let store = MemoryStore::new();
            let event = Event::new(2018, Uuid::new_v4(), Uuid::new_v4());
            store.insert_event_if_absent(&event).unwrap();
            Fixture {
                store,
                event,
                schedule: Schedule::new(Helsinki),
            }
        }

        fn ledger(&self) -> Ledger<'_, MemoryStore> {
            Ledger::new(&self.store, self.schedule)
        }

        fn deadline(&self) -> DateTime<Tz> {
            self.schedule.voting_deadline(2018)
        }

        fn early(&self) -> DateTime<Tz> {
            Helsinki.with_ymd_and_hms(2018, 5, 1, 12, 0, 0).unwrap()
        }

        fn count(&self) -> usize {
            self.store.participants(2018).unwrap().len()
        }

        fn add(&self, name: &str, vote: i64) -> Participant {
            match self.ledger().submit(&self.event, name, vote, &self.early(), Actor::Public) {
                Ok(Submission::Accepted(p)) => p,
                other => panic!("expected accepted vote, got {other:?}"),
            }
        }
    }

    #[test]
    fn submit_before_deadline_is_stored() {
        let fx = Fixture::new();
        let just_in_time = fx.deadline() - Duration::seconds(1);

        let result = fx
            .ledger()
            .submit(&fx.event, "abc", 6, &just_in_time, Actor::Public)
            .unwrap();

        assert!(matches!(result, Submission::Accepted(ref p) if p.name == "abc" && p.vote == 6));
        assert_eq!(fx.count(), 1);
    }

    #[test]
    fn submit_at_deadline_is_stored() {
        let fx = Fixture::new();
        let result = fx
            .ledger()
            .submit(&fx.event, "abc", 6, &fx.deadline(), Actor::Public)
            .unwrap();

        assert!(matches!(result, Submission::Accepted(_)));
    }

    #[test]
    fn public_submit_after_deadline_is_discarded() {
        let fx = Fixture::new();
        let late = fx.deadline() + Duration::seconds(1);

        let result = fx
            .ledger()
            .submit(&fx.event, "abc", 6, &late, Actor::Public)
            .unwrap();

        assert_eq!(result, Submission::Discarded);
        assert_eq!(fx.count(), 0);
    }

    #[test]
    fn staff_submit_after_deadline_is_stored() {
        let fx = Fixture::new();
        let late = fx.deadline() + Duration::days(30);

        let result = fx
            .ledger()
            .submit(&fx.event, "abc", 6, &late, Actor::Staff)
            .unwrap();

        assert!(matches!(result, Submission::Accepted(_)));
        assert_eq!(fx.count(), 1);
    }

    #[test]
    fn invalid_name_rejected() {
        let fx = Fixture::new();
        let ledger = fx.ledger();
        let too_long = "a".repeat(33);

        for name in ["abc°", "", "   ", too_long.as_str()] {
            let err = ledger
                .submit(&fx.event, name, 6, &fx.early(), Actor::Public)
                .unwrap_err();
            assert!(matches!(err, JuhannusError::InvalidName(_)), "{name:?}: {err}");
            assert!(err.is_validation());
        }
        assert_eq!(fx.count(), 0);
    }

    #[test]
    fn allowed_names() {
        let longest = "a".repeat(32);
        for name in [
            "Asset 463 / Groovy ^ Pier",
            "Äijä_Öhman",
            "[x] {y} (z) <w>",
            "a|b\\c & d!?#€%=@£$∞§≈±+:;´`¨*\"",
            longest.as_str(),
        ] {
            assert!(validate_name(name).is_ok(), "{name:?} should be allowed");
        }
    }

    #[test]
    fn name_is_trimmed() {
        let fx = Fixture::new();
        let p = fx.add("  abc  ", 6);
        assert_eq!(p.name, "abc");
    }

    #[test]
    fn invalid_vote_rejected() {
        let fx = Fixture::new();
        let ledger = fx.ledger();

        for vote in [101, -1, 666] {
            let err = ledger
                .submit(&fx.event, "abc", vote, &fx.early(), Actor::Public)
                .unwrap_err();
            assert!(matches!(err, JuhannusError::InvalidVote(v) if v == vote));
        }
        assert!(validate_vote(0).is_ok());
        assert!(validate_vote(100).is_ok());
    }

    #[test]
    fn duplicate_name_rejected_case_insensitively() {
        let fx = Fixture::new();
        fx.add("Abc", 6);

        let err = fx
            .ledger()
            .submit(&fx.event, "aBC", 7, &fx.early(), Actor::Staff)
            .unwrap_err();

        assert!(matches!(err, JuhannusError::DuplicateName(_)));
        assert_eq!(fx.count(), 1);
    }

    #[test]
    fn duplicate_check_ignores_hidden_and_other_events() {
        let fx = Fixture::new();
        let hidden = fx.add("abc", 6);
        fx.ledger().set_visible(hidden.id, false, Actor::Staff).unwrap();

        let other = Event::new(2019, Uuid::new_v4(), Uuid::new_v4());
        fx.store.insert_event_if_absent(&other).unwrap();
        fx.ledger()
            .submit(&other, "ABC", 1, &fx.early(), Actor::Public)
            .unwrap();

        assert!(matches!(
            fx.ledger().submit(&fx.event, "ABC", 1, &fx.early(), Actor::Public),
            Ok(Submission::Accepted(_))
        ));
    }

    #[test]
    fn unhide_rejected_when_name_retaken() {
        let fx = Fixture::new();
        let hidden = fx.add("abc", 6);
        fx.ledger().set_visible(hidden.id, false, Actor::Staff).unwrap();
        fx.add("ABC", 7);

        let err = fx.ledger().set_visible(hidden.id, true, Actor::Staff).unwrap_err();

        assert!(matches!(err, JuhannusError::DuplicateName(_)));
        let names: Vec<_> = fx
            .ledger()
            .list_visible(2018, SortOrder::default())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["ABC"]);
    }

    #[test]
    fn unhide_own_name_allowed() {
        let fx = Fixture::new();
        let p = fx.add("abc", 6);
        fx.ledger().set_visible(p.id, false, Actor::Staff).unwrap();

        let shown = fx.ledger().set_visible(p.id, true, Actor::Staff).unwrap();
        assert!(shown.visible);
    }

    #[test]
    fn late_duplicate_still_rejected() {
        let fx = Fixture::new();
        fx.add("abc", 6);
        let late = fx.deadline() + Duration::seconds(1);

        let err = fx
            .ledger()
            .submit(&fx.event, "abc", 6, &late, Actor::Public)
            .unwrap_err();
        assert!(matches!(err, JuhannusError::DuplicateName(_)));
    }

    #[test]
    fn staff_modify_keeps_own_name() {
        let fx = Fixture::new();
        let p = fx.add("abc", 6);

        let modified = fx.ledger().modify(p.id, "ABC", 42, Actor::Staff).unwrap();

        assert_eq!(modified.name, "ABC");
        assert_eq!(modified.vote, 42);
        assert_eq!(fx.store.participant(p.id).unwrap(), Some(modified));
    }

    #[test]
    fn modify_cannot_take_anothers_name() {
        let fx = Fixture::new();
        fx.add("abc", 6);
        let p = fx.add("def", 7);

        let err = fx.ledger().modify(p.id, "Abc", 7, Actor::Staff).unwrap_err();
        assert!(matches!(err, JuhannusError::DuplicateName(_)));
    }

    #[test]
    fn modify_revalidates() {
        let fx = Fixture::new();
        let p = fx.add("abc", 6);

        assert!(matches!(
            fx.ledger().modify(p.id, "abc°", 6, Actor::Staff),
            Err(JuhannusError::InvalidName(_))
        ));
        assert!(matches!(
            fx.ledger().modify(p.id, "abc", 101, Actor::Staff),
            Err(JuhannusError::InvalidVote(101))
        ));
    }

    #[test]
    fn public_cannot_modify_or_delete() {
        let fx = Fixture::new();
        let p = fx.add("abc", 6);
        let ledger = fx.ledger();

        assert!(matches!(
            ledger.modify(p.id, "abcd", 6, Actor::Public),
            Err(JuhannusError::Unauthorized)
        ));
        assert!(matches!(ledger.delete(p.id, Actor::Public), Err(JuhannusError::Unauthorized)));
        assert!(matches!(
            ledger.set_visible(p.id, false, Actor::Public),
            Err(JuhannusError::Unauthorized)
        ));
        assert_eq!(fx.store.participant(p.id).unwrap(), Some(p));
    }

    #[test]
    fn staff_delete() {
        let fx = Fixture::new();
        let p = fx.add("abc", 6);

        fx.ledger().delete(p.id, Actor::Staff).unwrap();

        assert_eq!(fx.count(), 0);
        assert!(matches!(
            fx.ledger().delete(p.id, Actor::Staff),
            Err(JuhannusError::ParticipantNotFound(_))
        ));
    }

    #[test]
    fn list_visible_sorting() {
        let fx = Fixture::new();
        fx.add("bob", 10);
        fx.add("Alice", 6);
        fx.add("carol", 100);
        let hidden = fx.add("dave", 50);
        fx.ledger().set_visible(hidden.id, false, Actor::Staff).unwrap();

        let names = |order| -> Vec<String> {
            fx.ledger()
                .list_visible(2018, order)
                .unwrap()
                .into_iter()
                .map(|p| p.name)
                .collect()
        };

        assert_eq!(
            names(SortOrder { key: SortKey::Name, ascending: true }),
            ["Alice", "bob", "carol"]
        );
        assert_eq!(
            names(SortOrder { key: SortKey::Name, ascending: false }),
            ["carol", "bob", "Alice"]
        );
        assert_eq!(
            names(SortOrder { key: SortKey::Vote, ascending: true }),
            ["Alice", "bob", "carol"]
        );
        assert_eq!(
            names(SortOrder { key: SortKey::Vote, ascending: false }),
            ["carol", "bob", "Alice"]
        );
    }

    #[test]
    fn sort_order_from_query() {
        assert_eq!(SortOrder::from_query(None, None), SortOrder::default());
        assert_eq!(
            SortOrder::from_query(Some("asc"), None),
            SortOrder { key: SortKey::Vote, ascending: true }
        );
        assert_eq!(
            SortOrder::from_query(Some("DESC"), Some("asc")),
            SortOrder { key: SortKey::Vote, ascending: false }
        );
        assert_eq!(
            SortOrder::from_query(Some(""), Some("desc")),
            SortOrder { key: SortKey::Name, ascending: false }
        );
    }

    #[test]
    fn actor_from_flag() {
        assert_eq!(Actor::from_privileged(true), Actor::Staff);
        assert_eq!(Actor::from_privileged(false), Actor::Public);
    }
}
