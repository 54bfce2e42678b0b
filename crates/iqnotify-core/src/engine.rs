//! Mode evaluation engine
//!
//! Evaluation is a pure function of (facts, mode, window, now). Aggregates
//! are computed from the whole snapshot before any pair is decided, so the
//! order of pairs never changes an outcome.

use chrono::{DateTime, Utc};
use iqnotify_api::{
    AggregateFacts, Decision, LookbackWindow, Mode, ModeRequest, PairFact, PresenceFact,
};
use iqnotify_util::format_age;
use tracing::debug;

/// Compute the snapshot-wide facts used by the fallback modes.
/// Unknown facts contribute nothing.
pub fn compute_aggregates(facts: &[PairFact], threshold: DateTime<Utc>) -> AggregateFacts {
    facts
        .iter()
        .map(|pf| &pf.fact)
        .fold(AggregateFacts::default(), |acc, fact| AggregateFacts {
            anyone_present: acc.anyone_present || fact.is_present(),
            anyone_recently_left: acc.anyone_recently_left
                || (fact.is_absent() && fact.changed_since(threshold)),
        })
}

/// Apply a mode's rule to one known fact
pub fn should_notify(
    mode: Mode,
    fact: &PresenceFact,
    aggregates: &AggregateFacts,
    threshold: DateTime<Utc>,
) -> bool {
    let present = fact.is_present();
    let recent = fact.changed_since(threshold);

    match mode {
        Mode::All => true,
        Mode::OnlyPresent => present,
        Mode::OnlyAbsent => !present,
        Mode::JustArrived => present && recent,
        Mode::JustLeft => !present && recent,
        Mode::StayingPresent => present && !recent,
        Mode::StayingAbsent => !present && !recent,
        Mode::OnlyPresentThenAbsentFallback => !aggregates.anyone_present || present,
        Mode::JustLeftThenAbsentFallback => {
            !present && (!aggregates.anyone_recently_left || recent)
        }
    }
}

/// Decide every pair with a known presence state, in input order.
/// Pairs whose fact is unknown produce no decision.
pub fn evaluate(
    facts: &[PairFact],
    mode: Mode,
    window: LookbackWindow,
    now: DateTime<Utc>,
) -> Vec<Decision> {
    decide(facts, window, now, |fact, aggregates, threshold| {
        should_notify(mode, fact, aggregates, threshold)
    })
}

/// Like [`evaluate`], but for a mode as requested by a caller. An
/// unrecognized mode notifies nobody.
pub fn evaluate_request(
    facts: &[PairFact],
    mode: &ModeRequest,
    window: LookbackWindow,
    now: DateTime<Utc>,
) -> Vec<Decision> {
    match mode {
        ModeRequest::Known(mode) => evaluate(facts, *mode, window, now),
        ModeRequest::Unrecognized(_) => decide(facts, window, now, |_, _, _| false),
    }
}

fn decide<F>(facts: &[PairFact], window: LookbackWindow, now: DateTime<Utc>, rule: F) -> Vec<Decision>
where
    F: Fn(&PresenceFact, &AggregateFacts, DateTime<Utc>) -> bool,
{
    let threshold = window.threshold(now);
    let aggregates = compute_aggregates(facts, threshold);

    facts
        .iter()
        .filter_map(|pf| {
            if !pf.fact.state.is_known() {
                debug!(entity = %pf.pair.entity, channel = %pf.pair.channel, "Skipping pair with unknown presence");
                return None;
            }

            let notify = rule(&pf.fact, &aggregates, threshold);
            debug!(
                entity = %pf.pair.entity,
                channel = %pf.pair.channel,
                state = ?pf.fact.state,
                changed_ago = %format_age(now - pf.fact.last_changed),
                recent = pf.fact.changed_since(threshold),
                anyone_present = aggregates.anyone_present,
                anyone_recently_left = aggregates.anyone_recently_left,
                notify,
                "Pair evaluated"
            );

            Some(Decision {
                pair: pf.pair.clone(),
                notify,
            })
        })
        .collect()
}
