// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message-sequence resolver.
//!
//! Pure functions over a [`Lead`] snapshot: which message is due next,
//! whether a reply has terminated the sequence, and whether the cool-down
//! since the last state change has elapsed. No I/O happens here; callers
//! re-resolve from the stored snapshot on every request because
//! eligibility is wall-clock dependent.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Lead, SLOT_COUNT};

/// Minimum days between the last recorded state change and the next send.
pub const COOLDOWN_DAYS: i64 = 2;

/// The cool-down interval as a chrono duration.
pub fn cooldown() -> Duration {
    Duration::days(COOLDOWN_DAYS)
}

/// Outcome of resolving a lead's sequence position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// A composed, unsent message is due at `slot`.
    Send { slot: usize, body: String },
    /// A reply was recorded at or before `slot`; the sequence is
    /// terminated permanently.
    Replied { slot: usize },
    /// Every slot is either sent or has no composed body left to send.
    Exhausted,
}

impl NextStep {
    /// Human-facing label for this step.
    ///
    /// Slot 1 is "Follow-up 1" through slot 6 as "Follow-up 6".
    pub fn label(&self) -> String {
        match self {
            NextStep::Send { slot: 0, .. } => "Initial Outreach".to_string(),
            NextStep::Send { slot, .. } => format!("Follow-up {slot}"),
            NextStep::Replied { .. } => "Replied".to_string(),
            NextStep::Exhausted => "All Messages Sent".to_string(),
        }
    }

    /// The slot this step refers to (0 for an exhausted sequence).
    pub fn slot(&self) -> usize {
        match self {
            NextStep::Send { slot, .. } | NextStep::Replied { slot } => *slot,
            NextStep::Exhausted => 0,
        }
    }

    /// The message body to send, when one is due.
    pub fn body(&self) -> Option<&str> {
        match self {
            NextStep::Send { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Determine the single message a human should act on next.
///
/// Scans slots in strict order. Slot 0 surfaces its body when unsent and
/// composed; a recorded reply on slot 0 terminates immediately. Slots
/// 1..=6 check replied *before* unsent-and-composed, so the first reply
/// found during the scan wins even if a later slot was replied out of
/// order. A slot that is sent-and-awaiting-reply, or that has no composed
/// body, is skipped rather than blocking the scan.
pub fn resolve_current(lead: &Lead) -> NextStep {
    let outreach = &lead.slots[0];
    if !outreach.sent
        && let Some(body) = &outreach.body
    {
        return NextStep::Send {
            slot: 0,
            body: body.clone(),
        };
    }
    if outreach.replied {
        return NextStep::Replied { slot: 0 };
    }

    for slot in 1..SLOT_COUNT {
        let msg = &lead.slots[slot];
        if msg.replied {
            return NextStep::Replied { slot };
        }
        if !msg.sent
            && let Some(body) = &msg.body
        {
            return NextStep::Send {
                slot,
                body: body.clone(),
            };
        }
    }

    NextStep::Exhausted
}

/// Whether the cool-down has elapsed as of `now`.
///
/// A lead that has never been touched (`updated_at` absent) is eligible
/// immediately. Note that `updated_at` is refreshed by replies as well as
/// sends, so a reply resets this clock.
pub fn is_eligible_at(lead: &Lead, now: DateTime<Utc>) -> bool {
    match lead.updated_at {
        None => true,
        Some(touched) => now - touched >= cooldown(),
    }
}

/// [`is_eligible_at`] evaluated against the current wall clock.
pub fn is_eligible_now(lead: &Lead) -> bool {
    is_eligible_at(lead, Utc::now())
}

/// The timestamp at which the lead next becomes eligible.
///
/// `updated_at + cooldown` exactly, or `now` when the lead was never
/// touched. Monotonic non-decreasing as `updated_at` advances.
pub fn next_eligible_at(lead: &Lead, now: DateTime<Utc>) -> DateTime<Utc> {
    match lead.updated_at {
        None => now,
        Some(touched) => touched + cooldown(),
    }
}

/// Whole hours until the lead becomes eligible, rounded up, floored at 0.
pub fn hours_until_eligible(lead: &Lead, now: DateTime<Utc>) -> i64 {
    let secs = (next_eligible_at(lead, now) - now).num_seconds();
    if secs <= 0 { 0 } else { (secs as u64).div_ceil(3600) as i64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageSlot;
    use chrono::TimeZone;

    fn lead_with_slots(slots: [MessageSlot; SLOT_COUNT]) -> Lead {
        Lead {
            id: 1,
            slots,
            ..Default::default()
        }
    }

    fn slot(body: Option<&str>, sent: bool, replied: bool) -> MessageSlot {
        MessageSlot {
            body: body.map(str::to_string),
            sent,
            replied,
        }
    }

    fn empty() -> MessageSlot {
        MessageSlot::default()
    }

    #[test]
    fn scenario_a_fresh_lead_surfaces_outreach() {
        let lead = lead_with_slots([
            slot(Some("Hi"), false, false),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        let step = resolve_current(&lead);
        assert_eq!(
            step,
            NextStep::Send {
                slot: 0,
                body: "Hi".into()
            }
        );
        assert_eq!(step.label(), "Initial Outreach");
        assert_eq!(step.slot(), 0);
        assert!(is_eligible_now(&lead));
    }

    #[test]
    fn scenario_b_sent_outreach_without_follow_up_is_exhausted() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut lead = lead_with_slots([
            slot(Some("Hi"), true, false),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        lead.updated_at = Some(t);

        let step = resolve_current(&lead);
        assert_eq!(step, NextStep::Exhausted);
        assert_eq!(step.label(), "All Messages Sent");
        assert_eq!(step.body(), None);

        assert!(!is_eligible_at(&lead, t + Duration::hours(1)));
        assert!(is_eligible_at(
            &lead,
            t + Duration::days(2) + Duration::minutes(1)
        ));
    }

    #[test]
    fn scenario_c_replied_outreach_terminates_despite_composed_follow_up() {
        let lead = lead_with_slots([
            slot(Some("Hi"), true, true),
            slot(Some("Follow up"), false, false),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        let step = resolve_current(&lead);
        assert_eq!(step, NextStep::Replied { slot: 0 });
        assert_eq!(step.label(), "Replied");
    }

    #[test]
    fn scenario_d_sent_outreach_advances_to_follow_up_one() {
        let now = Utc::now();
        let mut lead = lead_with_slots([
            slot(Some("Hi"), true, false),
            slot(Some("Follow up"), false, false),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        lead.updated_at = Some(now - Duration::days(3));

        let step = resolve_current(&lead);
        assert_eq!(
            step,
            NextStep::Send {
                slot: 1,
                body: "Follow up".into()
            }
        );
        assert_eq!(step.label(), "Follow-up 1");
        assert!(is_eligible_at(&lead, now));
    }

    #[test]
    fn follow_up_labels_are_numbered_by_slot() {
        for n in 1..SLOT_COUNT {
            let mut slots = [
                slot(Some("Hi"), true, false),
                empty(),
                empty(),
                empty(),
                empty(),
                empty(),
                empty(),
            ];
            slots[n] = slot(Some("body"), false, false);
            let step = resolve_current(&lead_with_slots(slots));
            assert_eq!(step.label(), format!("Follow-up {n}"));
            assert_eq!(step.slot(), n);
        }
    }

    #[test]
    fn sent_awaiting_reply_does_not_block_later_slots() {
        let lead = lead_with_slots([
            slot(Some("Hi"), true, false),
            slot(Some("F1"), true, false),
            slot(None, false, false),
            slot(Some("F3"), false, false),
            empty(),
            empty(),
            empty(),
        ]);
        // Slot 1 awaits a reply, slot 2 was never composed; both are skipped.
        assert_eq!(
            resolve_current(&lead),
            NextStep::Send {
                slot: 3,
                body: "F3".into()
            }
        );
    }

    #[test]
    fn first_replied_slot_wins_over_later_pending_message() {
        let lead = lead_with_slots([
            slot(Some("Hi"), true, false),
            slot(Some("F1"), true, true),
            slot(Some("F2"), false, false),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        assert_eq!(resolve_current(&lead), NextStep::Replied { slot: 1 });
    }

    #[test]
    fn out_of_order_reply_is_reported_at_first_match() {
        // Slot 3 replied while slot 1 still awaits: the scan reaches slot 3
        // first among replied slots and reports it there.
        let lead = lead_with_slots([
            slot(Some("Hi"), true, false),
            slot(Some("F1"), true, false),
            slot(Some("F2"), true, false),
            slot(Some("F3"), true, true),
            slot(Some("F4"), false, false),
            empty(),
            empty(),
        ]);
        assert_eq!(resolve_current(&lead), NextStep::Replied { slot: 3 });
    }

    #[test]
    fn uncomposed_outreach_falls_through_to_follow_ups() {
        let lead = lead_with_slots([
            empty(),
            slot(Some("F1"), false, false),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        assert_eq!(
            resolve_current(&lead),
            NextStep::Send {
                slot: 1,
                body: "F1".into()
            }
        );
    }

    #[test]
    fn fully_empty_lead_is_exhausted() {
        let lead = lead_with_slots([
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
            empty(),
        ]);
        assert_eq!(resolve_current(&lead), NextStep::Exhausted);
    }

    #[test]
    fn next_eligible_is_exactly_updated_at_plus_cooldown() {
        let t = Utc.with_ymd_and_hms(2026, 5, 10, 8, 30, 0).unwrap();
        let mut lead = lead_with_slots(Default::default());
        lead.updated_at = Some(t);

        let now = Utc.with_ymd_and_hms(2026, 5, 11, 0, 0, 0).unwrap();
        assert_eq!(next_eligible_at(&lead, now), t + Duration::days(2));
        // Independent of the `now` passed in.
        let later = now + Duration::days(30);
        assert_eq!(next_eligible_at(&lead, later), t + Duration::days(2));
    }

    #[test]
    fn untouched_lead_is_eligible_immediately() {
        let lead = lead_with_slots(Default::default());
        let now = Utc::now();
        assert!(is_eligible_at(&lead, now));
        assert_eq!(next_eligible_at(&lead, now), now);
        assert_eq!(hours_until_eligible(&lead, now), 0);
    }

    #[test]
    fn boundary_exactly_two_days_is_eligible() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut lead = lead_with_slots(Default::default());
        lead.updated_at = Some(t);

        assert!(is_eligible_at(&lead, t + Duration::days(2)));
        assert!(!is_eligible_at(
            &lead,
            t + Duration::days(2) - Duration::seconds(1)
        ));
    }

    #[test]
    fn hours_left_rounds_up_and_floors_at_zero() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut lead = lead_with_slots(Default::default());
        lead.updated_at = Some(t);

        // 47.5 hours remaining rounds up to 48.
        let now = t + Duration::minutes(30);
        assert_eq!(hours_until_eligible(&lead, now), 48);

        // One second remaining still counts as an hour.
        let near = t + Duration::days(2) - Duration::seconds(1);
        assert_eq!(hours_until_eligible(&lead, near), 1);

        // Past eligibility never goes negative.
        let past = t + Duration::days(3);
        assert_eq!(hours_until_eligible(&lead, past), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_slot() -> impl Strategy<Value = MessageSlot> {
            (
                proptest::option::of("[a-z]{1,8}"),
                any::<bool>(),
                any::<bool>(),
            )
                .prop_map(|(body, sent, replied)| MessageSlot { body, sent, replied })
        }

        fn arb_lead() -> impl Strategy<Value = Lead> {
            proptest::array::uniform7(arb_slot()).prop_map(|slots| Lead {
                id: 1,
                slots,
                ..Default::default()
            })
        }

        proptest! {
            // A composed, unsent outreach always wins the scan.
            #[test]
            fn composed_unsent_outreach_always_surfaces(mut lead in arb_lead()) {
                lead.slots[0].body = Some("Hi".into());
                lead.slots[0].sent = false;
                prop_assert_eq!(
                    resolve_current(&lead),
                    NextStep::Send { slot: 0, body: "Hi".into() }
                );
            }

            // A Send result always points at an unsent slot with that body,
            // and no earlier follow-up slot is replied.
            #[test]
            fn send_result_is_consistent_with_slot_state(lead in arb_lead()) {
                if let NextStep::Send { slot, body } = resolve_current(&lead) {
                    prop_assert!(!lead.slots[slot].sent);
                    prop_assert_eq!(lead.slots[slot].body.as_deref(), Some(body.as_str()));
                    for earlier in 1..slot {
                        prop_assert!(!lead.slots[earlier].replied);
                    }
                }
            }

            // Eligibility agrees with the next-eligible timestamp.
            #[test]
            fn eligibility_matches_next_eligible_at(offset_secs in 0i64..(5 * 86_400)) {
                let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
                let mut lead = Lead { id: 1, ..Default::default() };
                lead.updated_at = Some(t);
                let now = t + Duration::seconds(offset_secs);
                prop_assert_eq!(
                    is_eligible_at(&lead, now),
                    now >= next_eligible_at(&lead, now)
                );
            }
        }
    }
}
