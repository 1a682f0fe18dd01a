//! Unit tests for shuttle-model.

use std::collections::VecDeque;

use shuttle_core::{Distributions, Interarrivals, ShuttleConfig, SimTime, StopId};
use shuttle_kernel::Scheduler;

use crate::{
    DestinationRule, Direction, Shuttle, ShuttleWorld, StopBoard, Stream, build_scheduler,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Deterministic stand-in for the sampling service.  Exponentials return
/// their mean, uniform reals their lower bound, and uniform integers the
/// scripted values in order (then the lower bound).
#[derive(Default)]
struct Scripted {
    ints: VecDeque<i64>,
}

impl Distributions for Scripted {
    fn exponential(&mut self, mean: f64) -> f64 {
        mean
    }

    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        self.ints.pop_front().unwrap_or(lo).clamp(lo, hi)
    }

    fn uniform_real(&mut self, lo: f64, _hi: f64) -> f64 {
        lo
    }

    fn probability(&mut self) -> f64 {
        0.5
    }
}

/// No generators, fixed ten-unit loading.
fn quiet_config(stop_count: u16) -> ShuttleConfig {
    ShuttleConfig {
        stop_count,
        interarrivals: Interarrivals::none(),
        load_time_min: 10.0,
        load_time_max: 10.0,
        ..ShuttleConfig::default()
    }
}

fn quiet_sched(stop_count: u16) -> Scheduler<ShuttleWorld> {
    build_scheduler(quiet_config(stop_count), Box::new(Scripted::default())).unwrap()
}

fn seed_passenger(sched: &mut Scheduler<ShuttleWorld>, origin: u16, dest: u16) {
    let p = sched
        .world_mut()
        .new_passenger(Stream::Seeded, StopId(origin), DestinationRule::Fixed(StopId(dest)))
        .unwrap();
    sched.spawn(p);
}

fn t(x: f64) -> SimTime {
    SimTime::new(x).unwrap()
}

fn board_from(active: &[bool]) -> StopBoard {
    let mut board = StopBoard::new(active.len() as u16);
    for (i, &on) in active.iter().enumerate() {
        if on {
            board[StopId(i as u16)].pending_pickup = 1;
        }
    }
    board
}

/// The counters on the stop board agree with the census of passengers.
fn assert_board_matches_census(world: &ShuttleWorld) {
    let c = &world.census;
    assert_eq!(u64::from(world.board.total_pickup()), c.waiting, "pickups vs waiting");
    assert_eq!(u64::from(world.board.total_dropoff()), c.riding, "drop-offs vs riding");
    for (stop, state) in world.board.iter() {
        assert_eq!(
            u64::from(state.pending_dropoff),
            c.riding_to[stop.index()],
            "drop-offs at {stop}"
        );
    }
    assert_eq!(c.spawned, c.queued + c.waiting + c.riding + c.alighted);
}

// ── StopBoard ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stops {
    use super::*;

    #[test]
    fn starts_zeroed_and_inactive() {
        let board = StopBoard::new(5);
        assert_eq!(board.len(), 5);
        assert_eq!(board.last_stop(), StopId(4));
        assert_eq!(board.active_stops().count(), 0);
        assert_eq!(board.total_pickup(), 0);
        assert_eq!(board.total_dropoff(), 0);
    }

    #[test]
    fn either_counter_makes_a_stop_active() {
        let mut board = StopBoard::new(4);
        board[StopId(1)].pending_pickup = 2;
        board[StopId(3)].pending_dropoff = 1;
        let active: Vec<_> = board.active_stops().collect();
        assert_eq!(active, vec![StopId(1), StopId(3)]);
        assert_eq!(board.total_pickup(), 2);
        assert_eq!(board.total_dropoff(), 1);
    }

    #[test]
    fn off_the_line_is_never_active() {
        let board = StopBoard::new(3);
        assert!(!board.contains(StopId(3)));
        assert!(!board.is_active(StopId(3)));
        assert!(board.get(StopId(3)).is_none());
    }
}

// ── Scan ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scan {
    use super::*;
    use crate::{first_active_ahead, next_stop};
    use proptest::prelude::*;
    use shuttle_core::BoundaryRule;

    #[test]
    fn nearest_stop_ahead_wins() {
        let board = board_from(&[false, false, false, true, false, true, false]);
        let mut dir = Direction::Up;
        let next = next_stop(&board, StopId(1), &mut dir, BoundaryRule::ForceInward);
        assert_eq!(next, StopId(3));
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn work_behind_is_ignored_while_work_lies_ahead() {
        let board = board_from(&[true, true, false, false, true, false]);
        let mut dir = Direction::Up;
        let next = next_stop(&board, StopId(2), &mut dir, BoundaryRule::ForceInward);
        assert_eq!(next, StopId(4), "stop 1 is closer but behind");
    }

    #[test]
    fn reverses_only_when_nothing_lies_ahead() {
        let board = board_from(&[false, true, false, false, false]);
        let mut dir = Direction::Up;
        let next = next_stop(&board, StopId(3), &mut dir, BoundaryRule::ForceInward);
        assert_eq!(next, StopId(1));
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn stays_put_when_nothing_is_active() {
        let board = StopBoard::new(6);
        for here in 0..6 {
            let mut dir = Direction::Down;
            assert_eq!(next_stop(&board, StopId(here), &mut dir, BoundaryRule::ForceInward), StopId(here));
        }
    }

    #[test]
    fn current_stop_alone_does_not_count() {
        let board = board_from(&[false, false, true, false]);
        let mut dir = Direction::Up;
        assert_eq!(next_stop(&board, StopId(2), &mut dir, BoundaryRule::ForceInward), StopId(2));
    }

    #[test]
    fn terminal_forces_the_heading_up() {
        let board = board_from(&[false, false, true]);
        let mut dir = Direction::Down;
        let next = next_stop(&board, StopId(0), &mut dir, BoundaryRule::ForceInward);
        assert_eq!(next, StopId(2));
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn last_stop_forces_the_heading_down() {
        let board = board_from(&[true, false, false, false]);
        let mut dir = Direction::Up;
        let next = next_stop(&board, StopId(3), &mut dir, BoundaryRule::ForceInward);
        assert_eq!(next, StopId(0));
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn free_rule_finds_the_way_by_reversal() {
        let board = board_from(&[false, true, false]);
        let mut dir = Direction::Down;
        let next = next_stop(&board, StopId(0), &mut dir, BoundaryRule::Free);
        assert_eq!(next, StopId(1));
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn forcing_only_touches_the_ends() {
        let last = StopId(9);
        let rule = BoundaryRule::ForceInward;
        assert_eq!(Direction::Down.forced(StopId(0), last, rule), Direction::Up);
        assert_eq!(Direction::Up.forced(last, last, rule), Direction::Down);
        assert_eq!(Direction::Down.forced(StopId(4), last, rule), Direction::Down);
        assert_eq!(Direction::Down.forced(StopId(0), last, BoundaryRule::Free), Direction::Down);
    }

    #[test]
    fn projection_leaves_the_shuttle_alone() {
        let board = board_from(&[true, false, false, false]);
        let state = crate::ShuttleState::new(StopId(2));
        assert_eq!(state.direction(), Direction::Up);
        assert_eq!(state.projected_next(&board, BoundaryRule::ForceInward), StopId(0));
        assert_eq!(state.direction(), Direction::Up);
    }

    proptest! {
        #[test]
        fn never_reverses_with_work_ahead(
            active in prop::collection::vec(any::<bool>(), 2..24),
            pick in any::<u16>(),
            up in any::<bool>(),
        ) {
            let board = board_from(&active);
            let current = StopId(pick % active.len() as u16);
            let start = if up { Direction::Up } else { Direction::Down };
            let forced = start.forced(current, board.last_stop(), BoundaryRule::ForceInward);

            let mut dir = start;
            let next = next_stop(&board, current, &mut dir, BoundaryRule::ForceInward);

            match first_active_ahead(&board, current, forced) {
                Some(ahead) => {
                    prop_assert_eq!(next, ahead);
                    prop_assert_eq!(dir, forced);
                }
                None if next != current => {
                    prop_assert!(board.is_active(next));
                    prop_assert_eq!(dir, forced.reversed());
                }
                None => {}
            }
        }

        #[test]
        fn stays_only_when_no_other_stop_is_active(
            active in prop::collection::vec(any::<bool>(), 2..24),
            pick in any::<u16>(),
            up in any::<bool>(),
        ) {
            let board = board_from(&active);
            let current = StopId(pick % active.len() as u16);
            let mut dir = if up { Direction::Up } else { Direction::Down };
            let next = next_stop(&board, current, &mut dir, BoundaryRule::ForceInward);

            let elsewhere = board.active_stops().any(|s| s != current);
            prop_assert_eq!(next != current, elsewhere);
        }

        #[test]
        fn chosen_stop_is_nearest_in_its_direction(
            active in prop::collection::vec(any::<bool>(), 2..24),
            pick in any::<u16>(),
        ) {
            let board = board_from(&active);
            let current = StopId(pick % active.len() as u16);
            let mut dir = Direction::Up;
            let next = next_stop(&board, current, &mut dir, BoundaryRule::ForceInward);
            let (lo, hi) = if next.0 < current.0 { (next.0, current.0) } else { (current.0, next.0) };
            for between in (lo + 1)..hi {
                prop_assert!(!board.is_active(StopId(between)));
            }
        }
    }
}

// ── Passenger / shuttle protocol ──────────────────────────────────────────────

#[cfg(test)]
mod protocol {
    use super::*;
    use crate::{DispatchPhase, ModelError, PassengerPhase};

    #[test]
    fn single_passenger_rides_to_its_destination() {
        let mut sched = quiet_sched(4);
        seed_passenger(&mut sched, 0, 2);
        sched.spawn(Shuttle);

        sched.run_until(t(1.0));
        let call = sched.world().handles[StopId(0)].call;
        {
            let w = sched.world();
            assert_eq!(w.board[StopId(0)].pending_pickup, 1);
            assert_eq!(w.census.waiting, 1);
            assert_eq!(w.shuttle.phase(), DispatchPhase::DoorOpen);
        }
        assert!(sched.signal(call).unwrap().is_set(), "call button lit");

        sched.run_until(t(3.0));
        {
            let w = sched.world();
            assert_eq!(w.board[StopId(0)].pending_pickup, 0);
            assert_eq!(w.board[StopId(2)].pending_dropoff, 1);
            assert_eq!(w.census.riding_to[2], 1);
            assert_eq!(w.shuttle.boardings(), 1);
            assert_eq!(w.shuttle.phase(), DispatchPhase::Loading);
        }
        assert!(!sched.signal(call).unwrap().is_set(), "call button out");

        sched.run_until(t(16.0));
        assert_eq!(sched.world().shuttle.phase(), DispatchPhase::Traveling { to: StopId(2) });

        sched.run_until(t(30.0));
        let trips = sched.world_mut().drain_trips();
        assert_eq!(trips.len(), 1);
        let trip = trips[0];
        assert_eq!(trip.destination, StopId(2));
        assert_eq!(trip.boarded, t(2.0));
        let arrival = 15.0 + 5.0 * 2f64.sqrt() + 2.0;
        assert!((trip.alighted.as_f64() - arrival).abs() < 1e-9);
        assert_eq!(sched.world().shuttle.current_stop(), StopId(2));
        assert_board_matches_census(sched.world());
    }

    #[test]
    fn boarding_is_one_passenger_at_a_time() {
        let mut sched = quiet_sched(4);
        for dest in 1..=3 {
            seed_passenger(&mut sched, 0, dest);
        }
        sched.spawn(Shuttle);

        sched.run_until(t(1.0));
        let line = sched.world().handles[StopId(0)].board_queue;
        assert_eq!(sched.queue(line).unwrap().occupancy(), 3);
        assert_eq!(sched.world().board[StopId(0)].pending_pickup, 1, "only the head announces");
        assert_eq!(sched.world().census.queued, 2);
        assert_board_matches_census(sched.world());

        sched.run_until(t(3.0));
        let w = sched.world();
        assert_eq!(w.shuttle.boardings(), 3);
        assert_eq!(w.census.riding, 3);
        for dest in 1..=3 {
            assert_eq!(w.board[StopId(dest)].pending_dropoff, 1);
        }
        assert_eq!(sched.queue(line).unwrap().occupancy(), 0);
        assert_board_matches_census(w);
    }

    #[test]
    fn get_off_releases_only_riders_for_that_stop() {
        let mut sched = quiet_sched(4);
        seed_passenger(&mut sched, 0, 1);
        seed_passenger(&mut sched, 0, 3);
        sched.spawn(Shuttle);

        // Board at 2, doors shut at 15, stop 1 at 20, doors open at 22.
        sched.run_until(t(23.0));
        let trips = sched.world_mut().drain_trips();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].destination, StopId(1));
        let w = sched.world();
        assert_eq!(w.census.riding, 1);
        assert_eq!(w.census.riding_to[3], 1);
        assert_eq!(w.board[StopId(3)].pending_dropoff, 1);
        assert_board_matches_census(w);

        sched.run_until(t(100.0));
        let trips = sched.world_mut().drain_trips();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].destination, StopId(3));
    }

    #[test]
    fn arrival_during_loading_keeps_the_stop_active() {
        let mut sched = quiet_sched(4);
        seed_passenger(&mut sched, 0, 1);
        sched.spawn(Shuttle);

        sched.run_until(t(5.0));
        seed_passenger(&mut sched, 0, 2);

        sched.run_until(t(16.0));
        let w = sched.world();
        assert_eq!(w.board[StopId(0)].pending_pickup, 1, "late arrival not wiped");
        assert_eq!(w.census.waiting, 1);
        assert_eq!(w.shuttle.phase(), DispatchPhase::Traveling { to: StopId(1) });

        sched.run_until(t(200.0));
        assert_eq!(sched.world().census.alighted, 2);
        assert_board_matches_census(sched.world());
    }

    #[test]
    fn idle_shuttle_stays_put() {
        let mut config = quiet_config(6);
        config.start_stop = 3;
        let mut sched = build_scheduler(config, Box::new(Scripted::default())).unwrap();
        sched.spawn(Shuttle);

        for k in 1..=50 {
            sched.run_until(t(f64::from(k) * 20.0));
            let s = &sched.world().shuttle;
            assert_eq!(s.current_stop(), StopId(3));
            assert_eq!(s.phase(), DispatchPhase::Idle);
        }
        assert_eq!(sched.world().shuttle.stops_served(), 0);
        assert_eq!(sched.stats().aborted, 0);
    }

    #[test]
    fn invalid_passengers_are_rejected() {
        let mut sched = quiet_sched(4);
        let w = sched.world_mut();
        assert!(matches!(
            w.new_passenger(Stream::Seeded, StopId(2), DestinationRule::Fixed(StopId(2))),
            Err(ModelError::DestinationIsOrigin(_))
        ));
        assert!(matches!(
            w.new_passenger(Stream::Seeded, StopId(4), DestinationRule::Fixed(StopId(0))),
            Err(ModelError::StopOutOfRange { .. })
        ));
        assert!(matches!(
            w.new_passenger(Stream::Seeded, StopId(0), DestinationRule::Fixed(StopId(9))),
            Err(ModelError::StopOutOfRange { .. })
        ));

        let mut pair = quiet_sched(2);
        assert!(
            pair.world_mut()
                .new_passenger(Stream::Seeded, StopId(1), DestinationRule::UniformNonTerminal)
                .is_err()
        );
    }

    #[test]
    fn passenger_ids_are_sequential() {
        let mut sched = quiet_sched(4);
        let w = sched.world_mut();
        let a = w.new_passenger(Stream::Seeded, StopId(0), DestinationRule::UniformNonTerminal).unwrap();
        let b = w.new_passenger(Stream::Seeded, StopId(1), DestinationRule::Fixed(StopId(0))).unwrap();
        assert_eq!(b.id().0, a.id().0 + 1);
        assert_eq!(a.phase(), PassengerPhase::Joining);
        assert_eq!(a.destination(), None);
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = ShuttleConfig { stop_count: 1, ..quiet_config(4) };
        assert!(matches!(
            build_scheduler(config, Box::new(Scripted::default())),
            Err(ModelError::Core(_))
        ));
    }
}

// ── Generators ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod generators {
    use super::*;
    use crate::Generator;
    use shuttle_core::SimRng;

    fn generated_sched(seed: u64) -> Scheduler<ShuttleWorld> {
        let config = ShuttleConfig { horizon: 4000.0, ..ShuttleConfig::default() };
        let mut sched = build_scheduler(config, Box::new(SimRng::new(seed))).unwrap();
        for stream in Stream::GENERATED {
            let g = Generator::for_stream(stream, sched.world()).unwrap();
            sched.spawn(g);
        }
        sched.spawn(Shuttle);
        sched
    }

    #[test]
    fn counters_match_the_census_at_every_report() {
        let mut sched = generated_sched(11);
        for k in 1..=200 {
            sched.run_until(t(f64::from(k) * 20.0));
            assert_board_matches_census(sched.world());
        }
        assert!(sched.world().census.spawned > 100);
        assert!(sched.world().census.alighted > 0);
        assert_eq!(sched.stats().aborted, 0);
    }

    #[test]
    fn trips_follow_their_stream_rules() {
        let mut sched = generated_sched(3);
        sched.run_until(t(4000.0));
        let trips = sched.world_mut().drain_trips();
        assert!(!trips.is_empty());
        for trip in &trips {
            assert_ne!(trip.origin, trip.destination);
            match trip.stream {
                Stream::Airport => assert_eq!(trip.origin, StopId::TERMINAL),
                Stream::LotDeparture => assert_eq!(trip.destination, StopId::TERMINAL),
                Stream::InterStop => {
                    assert_ne!(trip.origin, StopId::TERMINAL);
                    assert_ne!(trip.destination, StopId::TERMINAL);
                }
                Stream::Seeded => panic!("no seeded passengers in this run"),
            }
            assert!(trip.joined <= trip.boarded && trip.boarded <= trip.alighted);
        }
    }

    #[test]
    fn disabled_stream_has_no_generator() {
        let mut config = quiet_config(4);
        config.interarrivals.airport = Some(10.0);
        let sched = build_scheduler(config, Box::new(Scripted::default())).unwrap();
        assert!(Generator::for_stream(Stream::Airport, sched.world()).is_some());
        assert!(Generator::for_stream(Stream::LotDeparture, sched.world()).is_none());
        assert!(Generator::for_stream(Stream::Seeded, sched.world()).is_none());
    }

    #[test]
    fn scripted_groups_arrive_on_schedule() {
        // Probability 0.5 with the default weights picks groups of two.
        let mut config = quiet_config(4);
        config.interarrivals.airport = Some(10.0);
        config.horizon = 35.0;
        let mut sched = build_scheduler(config, Box::new(Scripted::default())).unwrap();
        let g = Generator::for_stream(Stream::Airport, sched.world()).unwrap();
        sched.spawn(g);

        sched.run_until(t(35.0));
        assert_eq!(sched.world().census.spawned, 6, "groups of two at 10, 20, 30");
        assert_eq!(sched.world().census.waiting, 1);
        assert_eq!(sched.world().census.queued, 5);
    }
}
