use crate::discrete_system::component::{Component, HandleInfo, StartInfo};
use crate::discrete_system::effector::{Effector, ScheduledEventAddress};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

pub mod component;
pub mod effector;
pub mod resource;

/// Simulated time in seconds. Delays are non-negative finite reals.
pub type Time = f64;

pub type Address = u32;

pub trait Message: Clone {}
impl<T: Clone> Message for T {}

#[derive(Debug, Clone)]
pub struct Event<M: Message> {
    time: Time,
    seq: u64,
    pub to_address: Address,
    pub from_address: Address,
    pub message: M,
}

impl<M: Message> Event<M> {
    pub fn time(&self) -> Time {
        self.time
    }
}

impl<M: Message> PartialEq for Event<M> {
    fn eq(&self, other: &Event<M>) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<M: Message> Eq for Event<M> {}

impl<M: Message> PartialOrd for Event<M> {
    fn partial_cmp(&self, other: &Event<M>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Message> Ord for Event<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest event. Equal times fall
        // back to the insertion sequence: whoever scheduled first runs first.
        other
            .time
            .partial_cmp(&self.time)
            .expect("event time is never NaN")
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// `Simulation` manages a set of components exchanging timestamped messages.
/// Components never run concurrently: each handler runs to completion before
/// the next pending event is popped, so component state needs no locking.

pub struct Simulation<M: Message, C: Component<M>> {
    current_time: Time,
    components: HashMap<Address, C>,
    events: BinaryHeap<Event<M>>,
    next_address: Address,
    next_seq: u64,
}

impl<M: Message, C: Component<M>> Simulation<M, C> {
    pub fn new() -> Simulation<M, C> {
        Simulation {
            current_time: 0.0,
            components: HashMap::new(),
            events: BinaryHeap::new(),
            next_address: 0,
            next_seq: 0,
        }
    }

    pub fn now(&self) -> Time {
        self.current_time
    }

    pub fn register_component(&mut self, c: C) -> Address {
        let addr = self.next_address;

        self.next_address += 1;
        self.components.insert(addr, c);

        addr
    }

    fn start_component(&mut self, address: Address) {
        let effector = self
            .components
            .get_mut(&address)
            .expect("started component is registered")
            .start(StartInfo {
                self_address: address,
                current_time: self.current_time,
            });

        self.apply_effector(address, effector);
    }

    fn apply_effector(&mut self, from_address: Address, effector: Effector<M, C>) {
        for event in effector.events.into_iter() {
            let to_address = match event.address {
                ScheduledEventAddress::SelfAddress => from_address,
                ScheduledEventAddress::RemoteAddress(remote) => remote,
            };

            let seq = self.next_seq;
            self.next_seq += 1;

            self.events.push(Event {
                from_address,
                to_address,
                message: event.message,
                time: self.current_time + event.in_time,
                seq,
            });
        }

        for component in effector.components.into_iter() {
            let addr = self.register_component(component);

            self.start_component(addr);
        }
    }

    /// Executes every event pending at the next timestamp, including events
    /// scheduled for that same timestamp while the tick is in progress.
    pub fn tick(&mut self) {
        let next_time = match self.peek_time() {
            Some(time) => time,
            None => return,
        };

        self.current_time = next_time;

        while self.peek_time() == Some(self.current_time) {
            let event = self.events.pop().expect("peeked event is present");

            let effector = self
                .components
                .get_mut(&event.to_address)
                .expect("event target is registered")
                .handle(
                    HandleInfo {
                        self_address: event.to_address,
                        sender_address: event.from_address,
                        current_time: self.current_time,
                    },
                    event.message,
                );

            self.apply_effector(event.to_address, effector);
        }
    }

    /// Gives every registered component the chance to schedule its initial
    /// events. Nothing executes until the first `tick`.
    pub fn start(&mut self) {
        let mut addresses: Vec<_> = self.components.keys().cloned().collect();

        // Registration order, not map order, so equal-time tie-breaks are
        // reproducible.
        addresses.sort();

        addresses
            .into_iter()
            .for_each(|address| self.start_component(address));
    }

    /// Runs until no event remains strictly before the horizon, then pins the
    /// clock to the horizon. Events at or past the horizon stay unexecuted:
    /// their processes are abandoned without side effects.
    pub fn run_until(&mut self, horizon: Time) {
        self.start();

        while let Some(next) = self.peek_time() {
            if next >= horizon {
                break;
            }

            self.tick();
        }

        self.current_time = horizon;
    }

    pub fn peek_time(&self) -> Option<Time> {
        self.events.peek().map(|event| event.time)
    }

    pub fn into_components(self) -> impl Iterator<Item = (Address, C)> {
        self.components.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::component::{Component, HandleInfo, StartInfo};
    use super::effector::Effector;
    use super::{Simulation, Time};

    /// Schedules a few fixed events on start and records when each handler
    /// ran, so tests can inspect execution order.
    struct Recorder {
        schedule: Vec<(Time, u32)>,
        seen: Vec<(Time, u32)>,
    }

    impl Recorder {
        fn new(schedule: Vec<(Time, u32)>) -> Recorder {
            Recorder {
                schedule,
                seen: Vec::new(),
            }
        }
    }

    impl Component<u32> for Recorder {
        fn start(&mut self, _info: StartInfo) -> Effector<u32, Self> {
            let mut effector = Effector::new();

            for (delay, tag) in self.schedule.drain(..) {
                effector.schedule_in_to_self(delay, tag);
            }

            effector
        }

        fn handle(&mut self, info: HandleInfo, message: u32) -> Effector<u32, Self> {
            self.seen.push((info.current_time, message));

            Effector::new()
        }
    }

    fn seen(sim: Simulation<u32, Recorder>) -> Vec<(Time, u32)> {
        let mut components: Vec<_> = sim.into_components().collect();
        components.sort_by_key(|(addr, _)| *addr);
        components
            .into_iter()
            .flat_map(|(_, c)| c.seen.into_iter())
            .collect()
    }

    #[test]
    fn events_execute_in_time_order() {
        let mut sim = Simulation::new();
        sim.register_component(Recorder::new(vec![(5.0, 1), (2.0, 2), (9.0, 3)]));

        sim.run_until(100.0);

        assert_eq!(sim.now(), 100.0);
        assert_eq!(seen(sim), vec![(2.0, 2), (5.0, 1), (9.0, 3)]);
    }

    #[test]
    fn equal_times_run_in_scheduling_order() {
        let mut sim = Simulation::new();
        sim.register_component(Recorder::new(vec![(3.0, 1), (3.0, 2), (3.0, 3)]));

        sim.run_until(100.0);

        assert_eq!(seen(sim), vec![(3.0, 1), (3.0, 2), (3.0, 3)]);
    }

    #[test]
    fn clock_stops_at_horizon_and_abandons_later_events() {
        let mut sim = Simulation::new();
        sim.register_component(Recorder::new(vec![(2.0, 1), (7.0, 2), (7.5, 3)]));

        sim.run_until(7.0);

        assert_eq!(sim.now(), 7.0);
        // An event at exactly the horizon does not execute.
        assert_eq!(seen(sim), vec![(2.0, 1)]);
    }

    #[test]
    #[should_panic(expected = "negative")]
    fn negative_delay_fails_fast() {
        let mut sim = Simulation::new();
        sim.register_component(Recorder::new(vec![(-1.0, 1)]));

        sim.start();
    }
}
