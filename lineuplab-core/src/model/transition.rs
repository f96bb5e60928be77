//! Plate-appearance transitions between inning states.

use super::constants::SplitFactors;
use super::state::InningState;
use crate::rates::RateModel;

/// One possible result of a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub probability: f64,
    pub next: InningState,
    pub runs: u8,
}

#[derive(Default)]
struct Branches {
    out: Vec<Transition>,
}

impl Branches {
    fn push(&mut self, probability: f64, runners: [Option<u8>; 3], outs: u8, runs: u8) {
        if probability <= 0.0 {
            return;
        }
        let next = InningState::new(runners, outs);
        let runs = if next.is_over() { 0 } else { runs };
        self.out.push(Transition {
            probability,
            next,
            runs,
        });
    }
}

/// All outcomes of `batter` (sequence slot `slot`) coming up in `state`.
///
/// Probabilities sum to the batter's total rate (1 for valid stats). The
/// three-out state has no successors.
pub fn transitions(
    state: &InningState,
    batter: &RateModel,
    slot: u8,
    splits: &SplitFactors,
) -> Vec<Transition> {
    let mut b = Branches::default();
    if state.is_over() {
        return b.out;
    }
    home_run(&mut b, state, batter.home_run);
    triple(&mut b, state, slot, batter.triple);
    double(&mut b, state, slot, batter, splits);
    single(&mut b, state, slot, batter, splits);
    walk(&mut b, state, slot, batter.walk, splits);
    out(&mut b, state, slot, batter, splits);
    b.out
}

fn home_run(b: &mut Branches, s: &InningState, p: f64) {
    b.push(p, [None; 3], s.outs(), s.runner_count() + 1);
}

fn triple(b: &mut Branches, s: &InningState, slot: u8, p: f64) {
    b.push(p, [None, None, Some(slot)], s.outs(), s.runner_count());
}

fn double(b: &mut Branches, s: &InningState, slot: u8, batter: &RateModel, splits: &SplitFactors) {
    let [r1, r2, r3] = s.runners();
    let scored = u8::from(r2.is_some()) + u8::from(r3.is_some());
    match r1 {
        None => b.push(batter.double, [None, Some(slot), None], s.outs(), scored),
        Some(r) => {
            let split = batter.double_split(splits.plus_for(r));
            b.push(split.plus, [None, Some(slot), None], s.outs(), scored + 1);
            b.push(split.minus, [None, Some(slot), Some(r)], s.outs(), scored);
        }
    }
}

fn single(b: &mut Branches, s: &InningState, slot: u8, batter: &RateModel, splits: &SplitFactors) {
    if s.bases_empty() {
        let steal = splits.plus_for(slot);
        b.push(batter.single * steal, [None, Some(slot), None], s.outs(), 0);
        b.push(batter.single * (1.0 - steal), [Some(slot), None, None], s.outs(), 0);
        return;
    }

    let [r1, r2, r3] = s.runners();
    let from_third = u8::from(r3.is_some());

    // Runner from second: (probability, scored, stays on third).
    let second_outcomes: Vec<(f64, u8, Option<u8>)> = match r2 {
        Some(r) => {
            let plus = splits.plus_for(r);
            vec![(plus, 1, None), (1.0 - plus, 0, Some(r))]
        }
        None => vec![(1.0, 0, None)],
    };

    for (p2, scored2, on_third) in second_outcomes {
        match r1 {
            None => b.push(
                batter.single * p2,
                [Some(slot), None, on_third],
                s.outs(),
                from_third + scored2,
            ),
            Some(r) if on_third.is_none() => {
                let plus = splits.plus_for(r);
                b.push(
                    batter.single * p2 * plus,
                    [Some(slot), None, Some(r)],
                    s.outs(),
                    from_third + scored2,
                );
                b.push(
                    batter.single * p2 * (1.0 - plus),
                    [Some(slot), Some(r), None],
                    s.outs(),
                    from_third + scored2,
                );
            }
            Some(r) => b.push(
                batter.single * p2,
                [Some(slot), Some(r), on_third],
                s.outs(),
                from_third + scored2,
            ),
        }
    }
}

fn walk(b: &mut Branches, s: &InningState, slot: u8, p: f64, splits: &SplitFactors) {
    if s.bases_empty() {
        let steal = splits.plus_for(slot);
        b.push(p * steal, [None, Some(slot), None], s.outs(), 0);
        b.push(p * (1.0 - steal), [Some(slot), None, None], s.outs(), 0);
        return;
    }
    let [r1, r2, r3] = s.runners();
    match (r1, r2) {
        (None, _) => b.push(p, [Some(slot), r2, r3], s.outs(), 0),
        (Some(a), None) => b.push(p, [Some(slot), Some(a), r3], s.outs(), 0),
        (Some(a), Some(c)) => b.push(
            p,
            [Some(slot), Some(a), Some(c)],
            s.outs(),
            u8::from(r3.is_some()),
        ),
    }
}

fn out(b: &mut Branches, s: &InningState, slot: u8, batter: &RateModel, splits: &SplitFactors) {
    let outs = s.outs();
    if outs >= 2 {
        b.push(batter.out, [None; 3], 3, 0);
        return;
    }

    let [r1, r2, r3] = s.runners();
    let from_third = u8::from(r3.is_some());

    if r1.is_some() {
        // Double play: batter and lead-forced runner retired, others move up.
        b.push(batter.double_play, [None, None, r2], outs + 2, from_third);
        // Fielder's choice: runner from first retired, batter safe.
        b.push(batter.fielders_choice, [Some(slot), r2, r3], outs + 1, 0);
        b.push(batter.advance_runner, [None, r1, r2], outs + 1, from_third);
        b.push(batter.pop_up, [r1, r2, r3], outs + 1, 0);
        return;
    }

    match r3.or(r2) {
        Some(lead) => {
            let plus = splits.plus_for(lead);
            b.push(batter.out * plus, [None, None, r2], outs + 1, from_third);
            b.push(batter.out * (1.0 - plus), [None, r2, r3], outs + 1, 0);
        }
        None => b.push(batter.out, [None; 3], outs + 1, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(f: impl FnOnce(&mut RateModel)) -> RateModel {
        let mut r = RateModel {
            out: 0.0,
            single: 0.0,
            double: 0.0,
            triple: 0.0,
            home_run: 0.0,
            walk: 0.0,
            double_play: 0.0,
            fielders_choice: 0.0,
            advance_runner: 0.0,
            pop_up: 0.0,
        };
        f(&mut r);
        r
    }

    fn total(ts: &[Transition]) -> f64 {
        ts.iter().map(|t| t.probability).sum()
    }

    fn splits() -> SplitFactors {
        SplitFactors::default()
    }

    #[test]
    fn home_run_clears_bases() {
        let batter = only(|r| r.home_run = 1.0);
        let s = InningState::new([Some(0), Some(1), Some(2)], 1);
        let ts = transitions(&s, &batter, 3, &splits());
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].runs, 4);
        assert_eq!(ts[0].next, InningState::new([None; 3], 1));
    }

    #[test]
    fn double_scores_runner_from_first_on_plus() {
        let batter = only(|r| r.double = 1.0);
        let s = InningState::new([Some(1), None, None], 0);
        let ts = transitions(&s, &batter, 2, &splits());
        assert_eq!(ts.len(), 2);
        let scored = ts.iter().find(|t| t.runs == 1).unwrap();
        assert!((scored.probability - 0.25).abs() < 1e-12);
        assert_eq!(scored.next, InningState::new([None, Some(2), None], 0));
        let held = ts.iter().find(|t| t.runs == 0).unwrap();
        assert_eq!(held.next, InningState::new([None, Some(2), Some(1)], 0));
    }

    #[test]
    fn single_with_runners_on_first_and_second() {
        let batter = only(|r| r.single = 1.0);
        let s = InningState::new([Some(1), Some(0), None], 0);
        let ts = transitions(&s, &batter, 2, &splits());
        // r2 scores (0.25): r1 then to third (0.25) or second.
        // r2 holds at third (0.75): r1 to second.
        assert_eq!(ts.len(), 3);
        assert!((total(&ts) - 1.0).abs() < 1e-12);
        let corners = ts
            .iter()
            .find(|t| t.next == InningState::new([Some(2), None, Some(1)], 0))
            .unwrap();
        assert!((corners.probability - 0.0625).abs() < 1e-12);
        assert_eq!(corners.runs, 1);
        let loaded = ts
            .iter()
            .find(|t| t.next == InningState::new([Some(2), Some(1), Some(0)], 0))
            .unwrap();
        assert!((loaded.probability - 0.75).abs() < 1e-12);
        assert_eq!(loaded.runs, 0);
    }

    #[test]
    fn single_scores_runner_from_third() {
        let batter = only(|r| r.single = 1.0);
        let s = InningState::new([None, None, Some(0)], 1);
        let ts = transitions(&s, &batter, 1, &splits());
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].runs, 1);
        assert_eq!(ts[0].next, InningState::new([Some(1), None, None], 1));
    }

    #[test]
    fn leadoff_walk_can_take_second() {
        let batter = only(|r| r.walk = 1.0);
        let ts = transitions(&InningState::START, &batter, 0, &splits());
        assert_eq!(ts.len(), 2);
        let on_second = ts
            .iter()
            .find(|t| t.next == InningState::new([None, Some(0), None], 0))
            .unwrap();
        assert!((on_second.probability - 0.25).abs() < 1e-12);
    }

    #[test]
    fn walk_with_bases_loaded_forces_run() {
        let batter = only(|r| r.walk = 1.0);
        let s = InningState::new([Some(2), Some(1), Some(0)], 2);
        let ts = transitions(&s, &batter, 3, &splits());
        assert_eq!(ts[0].runs, 1);
        assert_eq!(ts[0].next, InningState::new([Some(3), Some(2), Some(1)], 2));
    }

    #[test]
    fn walk_does_not_force_unforced_runner() {
        let batter = only(|r| r.walk = 1.0);
        let s = InningState::new([None, None, Some(0)], 0);
        let ts = transitions(&s, &batter, 1, &splits());
        assert_eq!(ts[0].next, InningState::new([Some(1), None, Some(0)], 0));
        assert_eq!(ts[0].runs, 0);
    }

    #[test]
    fn out_with_two_outs_ends_inning() {
        let batter = only(|r| {
            r.out = 1.0;
            r.double_play = 1.0;
        });
        let s = InningState::new([Some(0), None, Some(1)], 2);
        let ts = transitions(&s, &batter, 2, &splits());
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].next, InningState::OVER);
        assert_eq!(ts[0].runs, 0);
    }

    #[test]
    fn out_with_runner_on_first_splits_four_ways() {
        let batter = only(|r| {
            r.out = 1.0;
            r.double_play = 0.25;
            r.fielders_choice = 0.25;
            r.advance_runner = 0.25;
            r.pop_up = 0.25;
        });
        let s = InningState::new([Some(0), None, Some(1)], 0);
        let ts = transitions(&s, &batter, 2, &splits());
        assert_eq!(ts.len(), 4);
        assert!((total(&ts) - 1.0).abs() < 1e-12);
        // Double play with nobody out: runner from third scores.
        let dp = ts.iter().find(|t| t.next.outs() == 2).unwrap();
        assert_eq!(dp.runs, 1);
        assert!(dp.next.bases_empty());
        let fc = &ts[1];
        assert_eq!(fc.next, InningState::new([Some(2), None, Some(1)], 1));
    }

    #[test]
    fn double_play_with_one_out_ends_inning_without_runs() {
        let batter = only(|r| {
            r.out = 1.0;
            r.double_play = 1.0;
        });
        let s = InningState::new([Some(0), None, Some(1)], 1);
        let ts = transitions(&s, &batter, 2, &splits());
        assert_eq!(ts[0].next, InningState::OVER);
        assert_eq!(ts[0].runs, 0);
    }

    #[test]
    fn tag_up_uses_lead_runner_factor() {
        let batter = only(|r| r.out = 1.0);
        let s = InningState::new([None, Some(0), Some(2)], 0);
        let ts = transitions(&s, &batter, 3, &splits());
        assert_eq!(ts.len(), 2);
        let tag = ts.iter().find(|t| t.runs == 1).unwrap();
        assert!((tag.probability - 0.20).abs() < 1e-12);
        assert_eq!(tag.next, InningState::new([None, None, Some(0)], 1));
    }

    #[test]
    fn terminal_state_has_no_successors() {
        let batter = only(|r| r.home_run = 1.0);
        assert!(transitions(&InningState::OVER, &batter, 0, &splits()).is_empty());
    }
}
