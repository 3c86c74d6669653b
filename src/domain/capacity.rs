//! Capacity and response aggregation.
//!
//! Pure, side-effect-free derivations over a snapshot of an [`Event`] and
//! its current responses: per-option grouping, confirmed counts, full /
//! unlimited capacity state, and the FIFO confirmed/waitlist split.
//!
//! Every function here is total. Responses whose label matches no current
//! option (the option was renamed or removed) contribute to no bucket and
//! no count — drift is tolerated, never an error. Callers recompute from a
//! fresh snapshot after every change notification; nothing here is
//! maintained incrementally.

use std::collections::HashSet;

use serde::Serialize;

use super::event::Event;
use super::option::ResponseOption;
use super::response::EventResponse;

/// Derived capacity facts for an event, for badges and progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityState {
    /// Number of responses whose label counts toward capacity.
    pub confirmed_count: usize,
    /// The event's declared capacity (`0` = unlimited).
    pub capacity: u32,
    /// `true` when `capacity == 0`.
    pub is_unlimited: bool,
    /// `true` when limited and `confirmed_count >= capacity`.
    pub is_full: bool,
    /// Fill percentage clamped to 0..=100; always `100` when unlimited.
    pub percentage: u8,
}

/// The FIFO admission split of capacity-counting responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSplit {
    /// Responses within capacity, ordered by creation time.
    pub confirmed: Vec<EventResponse>,
    /// Responses beyond capacity, ordered by creation time.
    pub waitlist: Vec<EventResponse>,
}

/// One response option with its matching responses, for roster display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionGroup {
    /// The option as declared on the event.
    pub option: ResponseOption,
    /// Responses whose label equals the option's label, in input order.
    pub respondents: Vec<EventResponse>,
}

/// Returns the set of option labels that count toward capacity.
///
/// An event with no options yields the empty set.
#[must_use]
pub fn counting_labels(event: &Event) -> HashSet<&str> {
    event
        .response_options
        .iter()
        .filter(|opt| opt.counts_to_capacity)
        .map(|opt| opt.label.as_str())
        .collect()
}

/// Counts responses whose label is capacity-counting.
///
/// Responses referencing a label with no matching current option are
/// excluded.
#[must_use]
pub fn confirmed_count(event: &Event, responses: &[EventResponse]) -> usize {
    let labels = counting_labels(event);
    responses
        .iter()
        .filter(|r| labels.contains(r.response.as_str()))
        .count()
}

/// Derives the full/unlimited capacity state of an event.
///
/// `capacity == 0` means unlimited: never full, percentage pinned at 100.
/// The unlimited case short-circuits before any division.
#[must_use]
pub fn capacity_state(event: &Event, responses: &[EventResponse]) -> CapacityState {
    let confirmed = confirmed_count(event, responses);
    let capacity = event.capacity;

    if capacity == 0 {
        return CapacityState {
            confirmed_count: confirmed,
            capacity,
            is_unlimited: true,
            is_full: false,
            percentage: 100,
        };
    }

    #[allow(clippy::cast_possible_truncation)]
    let percentage = ((confirmed as u64).saturating_mul(100) / u64::from(capacity)).min(100) as u8;

    CapacityState {
        confirmed_count: confirmed,
        capacity,
        is_unlimited: false,
        is_full: confirmed >= capacity as usize,
        percentage,
    }
}

/// Splits capacity-counting responses into confirmed and waitlist.
///
/// First-come-first-served: responses are stable-sorted ascending by
/// creation timestamp (ties keep input order), then the first `capacity`
/// entries are confirmed and the remainder waitlisted. Unlimited events
/// confirm everyone. The split is rebuilt from scratch on every call, so
/// deleting an earlier confirmed response promotes the next waitlisted
/// one on recomputation.
#[must_use]
pub fn split_confirmed_waitlist(event: &Event, responses: &[EventResponse]) -> RosterSplit {
    let labels = counting_labels(event);
    let mut sorted: Vec<EventResponse> = responses
        .iter()
        .filter(|r| labels.contains(r.response.as_str()))
        .cloned()
        .collect();
    sorted.sort_by_key(|r| r.created_at);

    if event.capacity == 0 {
        return RosterSplit {
            confirmed: sorted,
            waitlist: Vec::new(),
        };
    }

    let cut = (event.capacity as usize).min(sorted.len());
    let waitlist = sorted.split_off(cut);
    RosterSplit {
        confirmed: sorted,
        waitlist,
    }
}

/// Groups responses under each option in the event's declared order.
///
/// Every option gets a group, including empty ones — hiding zero-respondent
/// options is a presentation choice left to callers. Responses matching no
/// option appear in no group.
#[must_use]
pub fn group_by_option(event: &Event, responses: &[EventResponse]) -> Vec<OptionGroup> {
    event
        .response_options
        .iter()
        .map(|opt| OptionGroup {
            option: opt.clone(),
            respondents: responses
                .iter()
                .filter(|r| r.response == opt.label)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventId;
    use crate::domain::option::OptionColor;
    use crate::domain::response::Responder;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn make_event(capacity: u32, options: Vec<ResponseOption>) -> Event {
        Event {
            id: EventId::new(),
            team_id: Uuid::new_v4(),
            title: "Friendly match".to_string(),
            date: Utc::now() + Duration::days(7),
            location: "Pitch A".to_string(),
            capacity,
            description: None,
            response_options: options,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn going_option() -> ResponseOption {
        ResponseOption::new(1, "Going", true, OptionColor::Green)
    }

    fn maybe_option() -> ResponseOption {
        ResponseOption::new(2, "Maybe", false, OptionColor::Yellow)
    }

    fn make_response(event: &Event, label: &str, offset_secs: i64) -> EventResponse {
        let user_id = Uuid::new_v4();
        EventResponse {
            id: Uuid::new_v4(),
            event_id: event.id,
            responder: Responder::Member { user_id },
            response: label.to_string(),
            added_by: user_id,
            created_at: Utc::now() + Duration::seconds(offset_secs),
            updated_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn counting_labels_empty_options() {
        let event = make_event(5, vec![]);
        assert!(counting_labels(&event).is_empty());
    }

    #[test]
    fn counting_labels_filters_flag() {
        let event = make_event(5, vec![going_option(), maybe_option()]);
        let labels = counting_labels(&event);
        assert!(labels.contains("Going"));
        assert!(!labels.contains("Maybe"));
    }

    #[test]
    fn orphan_label_excluded_everywhere() {
        let event = make_event(2, vec![going_option()]);
        let orphan = make_response(&event, "Old label", 0);
        let going = make_response(&event, "Going", 1);
        let responses = vec![orphan.clone(), going];

        assert_eq!(confirmed_count(&event, &responses), 1);

        let split = split_confirmed_waitlist(&event, &responses);
        assert!(!split.confirmed.contains(&orphan));
        assert!(!split.waitlist.contains(&orphan));

        let groups = group_by_option(&event, &responses);
        assert!(groups.iter().all(|g| !g.respondents.contains(&orphan)));
    }

    #[test]
    fn unlimited_is_never_full() {
        let event = make_event(0, vec![going_option()]);
        let responses: Vec<_> = (0..50).map(|i| make_response(&event, "Going", i)).collect();

        let state = capacity_state(&event, &responses);
        assert!(state.is_unlimited);
        assert!(!state.is_full);
        assert_eq!(state.percentage, 100);
        assert_eq!(state.confirmed_count, 50);
    }

    #[test]
    fn full_iff_confirmed_reaches_capacity() {
        let event = make_event(3, vec![going_option()]);
        let mut responses = vec![
            make_response(&event, "Going", 0),
            make_response(&event, "Going", 1),
        ];
        assert!(!capacity_state(&event, &responses).is_full);

        responses.push(make_response(&event, "Going", 2));
        let state = capacity_state(&event, &responses);
        assert!(state.is_full);
        assert_eq!(state.percentage, 100);
    }

    #[test]
    fn percentage_clamped_when_over_capacity() {
        let event = make_event(2, vec![going_option()]);
        let responses: Vec<_> = (0..5).map(|i| make_response(&event, "Going", i)).collect();
        let state = capacity_state(&event, &responses);
        assert!(state.is_full);
        assert_eq!(state.percentage, 100);
    }

    #[test]
    fn percentage_partial_fill() {
        let event = make_event(4, vec![going_option()]);
        let responses = vec![make_response(&event, "Going", 0)];
        assert_eq!(capacity_state(&event, &responses).percentage, 25);
    }

    #[test]
    fn split_buckets_cover_confirmed_count() {
        let event = make_event(2, vec![going_option(), maybe_option()]);
        let responses: Vec<_> = (0..5).map(|i| make_response(&event, "Going", i)).collect();

        let split = split_confirmed_waitlist(&event, &responses);
        assert_eq!(
            split.confirmed.len() + split.waitlist.len(),
            confirmed_count(&event, &responses)
        );
    }

    #[test]
    fn split_is_fifo_by_creation_time() {
        let event = make_event(2, vec![going_option()]);
        let a = make_response(&event, "Going", 10);
        let b = make_response(&event, "Going", 20);
        let c = make_response(&event, "Going", 30);
        // Deliberately shuffled input order.
        let responses = vec![c.clone(), a.clone(), b.clone()];

        let split = split_confirmed_waitlist(&event, &responses);
        assert_eq!(split.confirmed, vec![a, b]);
        assert_eq!(split.waitlist, vec![c]);
    }

    #[test]
    fn split_is_idempotent() {
        let event = make_event(2, vec![going_option()]);
        let responses: Vec<_> = (0..4).map(|i| make_response(&event, "Going", i)).collect();

        let first = split_confirmed_waitlist(&event, &responses);
        let second = split_confirmed_waitlist(&event, &responses);
        assert_eq!(first, second);
    }

    #[test]
    fn deleting_confirmed_promotes_waitlisted() {
        let event = make_event(2, vec![going_option()]);
        let a = make_response(&event, "Going", 10);
        let b = make_response(&event, "Going", 20);
        let c = make_response(&event, "Going", 30);
        let responses = vec![a.clone(), b.clone(), c.clone()];

        let before = split_confirmed_waitlist(&event, &responses);
        assert_eq!(before.confirmed, vec![a.clone(), b.clone()]);
        assert_eq!(before.waitlist, vec![c.clone()]);

        // Remove the earliest confirmed response and recompute.
        let remaining = vec![b.clone(), c.clone()];
        let after = split_confirmed_waitlist(&event, &remaining);
        assert_eq!(after.confirmed, vec![b, c]);
        assert!(after.waitlist.is_empty());
    }

    #[test]
    fn unlimited_confirms_everyone() {
        let event = make_event(0, vec![going_option()]);
        let a = make_response(&event, "Going", 1);
        let b = make_response(&event, "Going", 2);
        let c = make_response(&event, "Going", 3);
        let responses = vec![a.clone(), b.clone(), c.clone()];

        let split = split_confirmed_waitlist(&event, &responses);
        assert_eq!(split.confirmed, vec![a, b, c]);
        assert!(split.waitlist.is_empty());
    }

    #[test]
    fn non_counting_label_excluded_from_count_but_grouped() {
        let event = make_event(5, vec![going_option(), maybe_option()]);
        let going = make_response(&event, "Going", 0);
        let maybe = make_response(&event, "Maybe", 1);
        let responses = vec![going.clone(), maybe.clone()];

        assert_eq!(confirmed_count(&event, &responses), 1);

        let groups = group_by_option(&event, &responses);
        assert_eq!(groups.len(), 2);
        let Some(going_group) = groups.iter().find(|g| g.option.label == "Going") else {
            panic!("missing Going group");
        };
        let Some(maybe_group) = groups.iter().find(|g| g.option.label == "Maybe") else {
            panic!("missing Maybe group");
        };
        assert_eq!(going_group.respondents, vec![going]);
        assert_eq!(maybe_group.respondents, vec![maybe]);
    }

    #[test]
    fn group_order_follows_declaration_order() {
        let event = make_event(5, vec![maybe_option(), going_option()]);
        let groups = group_by_option(&event, &[]);
        let labels: Vec<&str> = groups.iter().map(|g| g.option.label.as_str()).collect();
        assert_eq!(labels, vec!["Maybe", "Going"]);
    }

    #[test]
    fn empty_responses_degrade_to_zero() {
        let event = make_event(3, vec![going_option()]);
        assert_eq!(confirmed_count(&event, &[]), 0);
        let state = capacity_state(&event, &[]);
        assert_eq!(state.percentage, 0);
        assert!(!state.is_full);
        let split = split_confirmed_waitlist(&event, &[]);
        assert!(split.confirmed.is_empty());
        assert!(split.waitlist.is_empty());
    }
}
