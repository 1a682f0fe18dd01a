//! Unit tests for shuttle-kernel.

use shuttle_core::{ProcessId, SimTime};

use crate::{Context, KernelResult, Scheduler, Suspend, from_fn};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Test world: an append-only log of `(time, label)` entries.
type Log = Vec<(f64, &'static str)>;

fn stamp(cx: &mut Context<'_, Log>, what: &'static str) {
    let t = cx.now().as_f64();
    cx.world_mut().push((t, what));
}

fn t(x: f64) -> SimTime {
    SimTime::new(x).unwrap()
}

/// A process that holds `delay` once, logs `label`, and exits.
fn sleeper(
    label: &'static str,
    delay: f64,
) -> impl FnMut(&mut Context<'_, Log>) -> KernelResult<Suspend> {
    let mut started = false;
    move |cx| {
        if !started {
            started = true;
            return cx.hold(delay);
        }
        stamp(cx, label);
        Ok(Suspend::Exit)
    }
}

fn labels(log: &Log) -> Vec<&'static str> {
    log.iter().map(|&(_, l)| l).collect()
}

// ── ResumptionQueue ───────────────────────────────────────────────────────────

#[cfg(test)]
mod resumption_queue {
    use super::*;
    use crate::{ResumptionQueue, Wakeup};

    #[test]
    fn pops_in_time_order() {
        let mut q = ResumptionQueue::new();
        q.push(t(10.0), ProcessId(0), Wakeup::Timer);
        q.push(t(5.0), ProcessId(1), Wakeup::Timer);
        q.push(t(20.0), ProcessId(2), Wakeup::Timer);

        assert_eq!(q.len(), 3);
        assert_eq!(q.next_time(), Some(t(5.0)));
        assert_eq!(q.pop().unwrap().process, ProcessId(1));
        assert_eq!(q.pop().unwrap().process, ProcessId(0));
        assert_eq!(q.pop().unwrap().process, ProcessId(2));
        assert!(q.pop().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn equal_times_leave_in_push_order() {
        let mut q = ResumptionQueue::new();
        for i in [3, 1, 2] {
            q.push(t(7.0), ProcessId(i), Wakeup::Start);
        }
        assert_eq!(q.instant_count(), 1);
        let order: Vec<u32> = std::iter::from_fn(|| q.pop()).map(|r| r.process.0).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn holds_resume_in_time_order() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("late", sleeper("late", 9.0)));
        sched.spawn(from_fn("early", sleeper("early", 2.0)));
        sched.spawn(from_fn("mid", sleeper("mid", 5.0)));
        sched.run();

        assert_eq!(sched.world(), &vec![(2.0, "early"), (5.0, "mid"), (9.0, "late")]);
        assert_eq!(sched.now(), t(9.0));
        let stats = sched.stats();
        assert_eq!(stats.spawned, 3);
        assert_eq!(stats.finished, 3);
        assert_eq!(stats.aborted, 0);
        assert_eq!(sched.live_processes(), 0);
    }

    #[test]
    fn equal_times_resume_fifo() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("a", sleeper("a", 4.0)));
        sched.spawn(from_fn("b", sleeper("b", 4.0)));
        sched.spawn(from_fn("c", sleeper("c", 4.0)));
        sched.run();
        assert_eq!(labels(sched.world()), vec!["a", "b", "c"]);
    }

    #[test]
    fn invalid_duration_aborts_only_that_process() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("bad", |cx: &mut Context<'_, Log>| cx.hold(0.0)));
        sched.spawn(from_fn("negative", |cx: &mut Context<'_, Log>| cx.hold(-1.0)));
        sched.spawn(from_fn("good", sleeper("good", 3.0)));
        sched.run();

        assert_eq!(sched.world(), &vec![(3.0, "good")]);
        assert_eq!(sched.stats().aborted, 2);
        assert_eq!(sched.stats().finished, 1);
    }

    #[test]
    fn run_until_stops_at_horizon() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("soon", sleeper("soon", 5.0)));
        sched.spawn(from_fn("later", sleeper("later", 50.0)));

        sched.run_until(t(20.0));
        assert_eq!(labels(sched.world()), vec!["soon"]);
        assert_eq!(sched.now(), t(20.0));
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.next_time(), Some(t(50.0)));

        sched.run_until(t(100.0));
        assert_eq!(labels(sched.world()), vec!["soon", "later"]);
        assert_eq!(sched.now(), t(100.0));
    }

    #[test]
    fn resumption_exactly_at_horizon_runs() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("edge", sleeper("edge", 20.0)));
        sched.run_until(t(20.0));
        assert_eq!(labels(sched.world()), vec!["edge"]);
    }

    #[test]
    fn spawned_child_runs_at_same_instant_after_pending() {
        let mut sched = Scheduler::new(Log::new());
        let mut phase = 0;
        sched.spawn(from_fn("parent", move |cx: &mut Context<'_, Log>| {
            phase += 1;
            match phase {
                1 => cx.hold(3.0),
                2 => {
                    cx.spawn(from_fn("child", |cx: &mut Context<'_, Log>| {
                        stamp(cx, "child");
                        Ok(Suspend::Exit)
                    }));
                    stamp(cx, "parent");
                    cx.hold(1.0e-20)
                }
                _ => {
                    stamp(cx, "parent again");
                    Ok(Suspend::Exit)
                }
            }
        }));
        sched.run();
        assert_eq!(labels(sched.world()), vec!["parent", "child", "parent again"]);
        assert_eq!(sched.stats().spawned, 2);
    }

    #[test]
    fn step_reports_each_resumption_time() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("s", sleeper("s", 2.5)));
        assert_eq!(sched.step(), Some(t(0.0)));
        assert_eq!(sched.step(), Some(t(2.5)));
        assert_eq!(sched.step(), None);
    }
}

// ── ResourceQueue ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod resource_queue {
    use super::*;
    use crate::KernelError;
    use shuttle_core::QueueId;

    /// Acquire `queue`, log `label`, hold `busy`, release, exit.
    fn user(
        queue: QueueId,
        label: &'static str,
        busy: f64,
    ) -> impl FnMut(&mut Context<'_, Log>) -> KernelResult<Suspend> {
        let mut phase = 0;
        move |cx| {
            phase += 1;
            match phase {
                1 => Ok(Suspend::Acquire(queue)),
                2 => {
                    stamp(cx, label);
                    cx.hold(busy)
                }
                _ => {
                    cx.release(queue)?;
                    Ok(Suspend::Exit)
                }
            }
        }
    }

    #[test]
    fn admits_in_fifo_order_one_at_a_time() {
        let mut sched = Scheduler::new(Log::new());
        let q = sched.add_queue("line");
        sched.spawn(from_fn("a", user(q, "a", 4.0)));
        sched.spawn(from_fn("b", user(q, "b", 4.0)));
        sched.spawn(from_fn("c", user(q, "c", 4.0)));

        sched.run_until(t(0.0));
        assert_eq!(sched.queue(q).unwrap().occupancy(), 3);
        assert_eq!(sched.queue(q).unwrap().queue_len(), 2);

        sched.run();
        assert_eq!(sched.world(), &vec![(0.0, "a"), (4.0, "b"), (8.0, "c")]);
        assert_eq!(sched.queue(q).unwrap().occupancy(), 0);
        assert!(sched.queue(q).unwrap().holder().is_none());
    }

    #[test]
    fn release_by_non_holder_aborts_the_caller() {
        let mut sched = Scheduler::new(Log::new());
        let q = sched.add_queue("line");
        sched.spawn(from_fn("holder", user(q, "holder", 10.0)));
        sched.spawn(from_fn("intruder", move |cx: &mut Context<'_, Log>| {
            let err = cx.release(q).unwrap_err();
            assert!(matches!(err, KernelError::NotHolder { holder: Some(ProcessId(0)), .. }));
            Err(err)
        }));
        sched.run();
        assert_eq!(sched.stats().aborted, 1);
        assert_eq!(labels(sched.world()), vec!["holder"]);
    }

    #[test]
    fn unknown_queue_aborts_the_caller() {
        let mut sched = Scheduler::new(Log::new());
        sched.spawn(from_fn("lost", |_cx: &mut Context<'_, Log>| {
            Ok(Suspend::Acquire(QueueId(99)))
        }));
        sched.run();
        assert_eq!(sched.stats().aborted, 1);
    }
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signals {
    use super::*;
    use shuttle_core::{LevelId, SignalId};

    /// Wait on a single-release signal, log, exit.
    fn queuer(
        signal: SignalId,
        label: &'static str,
    ) -> impl FnMut(&mut Context<'_, Log>) -> KernelResult<Suspend> {
        let mut waited = false;
        move |cx| {
            if !waited {
                waited = true;
                return Ok(Suspend::Queue(signal));
            }
            stamp(cx, label);
            Ok(Suspend::Exit)
        }
    }

    /// Wait on a level signal, log, exit.
    fn waiter(
        level: LevelId,
        label: &'static str,
    ) -> impl FnMut(&mut Context<'_, Log>) -> KernelResult<Suspend> {
        let mut waited = false;
        move |cx| {
            if !waited {
                waited = true;
                return Ok(Suspend::Wait(level));
            }
            stamp(cx, label);
            Ok(Suspend::Exit)
        }
    }

    /// Hold `at`, then run `action` once and exit.
    fn after<F>(at: f64, mut action: F) -> impl FnMut(&mut Context<'_, Log>) -> KernelResult<Suspend>
    where
        F: FnMut(&mut Context<'_, Log>) -> KernelResult<()>,
    {
        let mut fired = false;
        move |cx| {
            if !fired {
                fired = true;
                return cx.hold(at);
            }
            action(cx)?;
            Ok(Suspend::Exit)
        }
    }

    #[test]
    fn single_release_lets_exactly_one_waiter_through() {
        let mut sched = Scheduler::new(Log::new());
        let s = sched.add_signal("invite");
        sched.spawn(from_fn("first", queuer(s, "first")));
        sched.spawn(from_fn("second", queuer(s, "second")));
        sched.spawn(from_fn("setter", after(5.0, move |cx| cx.set(s))));

        sched.run_until(t(6.0));
        assert_eq!(sched.world(), &vec![(5.0, "first")]);
        assert_eq!(sched.signal(s).unwrap().waiting(), 1);
        assert!(!sched.signal(s).unwrap().is_set());
    }

    #[test]
    fn set_with_no_waiter_latches_for_the_next_one() {
        let mut sched = Scheduler::new(Log::new());
        let s = sched.add_signal("boarded");
        sched.spawn(from_fn("setter", move |cx: &mut Context<'_, Log>| {
            cx.set(s)?;
            Ok(Suspend::Exit)
        }));
        sched.run();
        assert!(sched.signal(s).unwrap().is_set());

        sched.spawn(from_fn("late", queuer(s, "late")));
        sched.spawn(from_fn("later", queuer(s, "later")));
        sched.run();
        assert_eq!(labels(sched.world()), vec!["late"]);
        assert!(!sched.signal(s).unwrap().is_set(), "the latch is consumed by one waiter");
    }

    #[test]
    fn clear_drops_a_latched_set() {
        let mut sched = Scheduler::new(Log::new());
        let s = sched.add_signal("call");
        sched.spawn(from_fn("press", move |cx: &mut Context<'_, Log>| {
            cx.set(s)?;
            assert!(cx.is_set(s)?);
            cx.clear(s)?;
            Ok(Suspend::Exit)
        }));
        sched.spawn(from_fn("waiter", queuer(s, "waiter")));
        sched.run();
        assert!(sched.world().is_empty());
        assert_eq!(sched.signal(s).unwrap().waiting(), 1);
    }

    #[test]
    fn level_releases_every_current_waiter() {
        let mut sched = Scheduler::new(Log::new());
        let l = sched.add_level("get off");
        sched.spawn(from_fn("a", waiter(l, "a")));
        sched.spawn(from_fn("b", waiter(l, "b")));
        sched.spawn(from_fn("c", waiter(l, "c")));
        sched.spawn(from_fn("opener", after(3.0, move |cx| {
            let released = cx.broadcast(l)?;
            assert_eq!(released, 3);
            cx.clear_level(l)
        })));
        sched.run();

        assert_eq!(sched.world(), &vec![(3.0, "a"), (3.0, "b"), (3.0, "c")]);
        assert!(!sched.level(l).unwrap().is_set());
    }

    #[test]
    fn level_stays_set_until_cleared() {
        let mut sched = Scheduler::new(Log::new());
        let l = sched.add_level("open");
        sched.spawn(from_fn("opener", move |cx: &mut Context<'_, Log>| {
            cx.broadcast(l)?;
            Ok(Suspend::Exit)
        }));
        sched.run();
        sched.spawn(from_fn("passes", waiter(l, "passes")));
        sched.run();
        assert_eq!(labels(sched.world()), vec!["passes"]);

        sched.spawn(from_fn("closer", move |cx: &mut Context<'_, Log>| {
            cx.clear_level(l)?;
            Ok(Suspend::Exit)
        }));
        sched.spawn(from_fn("blocks", waiter(l, "blocks")));
        sched.run();
        assert_eq!(labels(sched.world()), vec!["passes"]);
        assert_eq!(sched.level(l).unwrap().waiting(), 1);
    }
}
