use crate::cafeteria;
use crate::cafeteria::customer;
use crate::cafeteria::{CafeteriaComponent, StationId};
use crate::config::SimulationConfig;
use crate::discrete_system::component::{HandleInfo, StartInfo};
use crate::discrete_system::effector::Effector;
use crate::discrete_system::resource::Resource;
use crate::discrete_system::{Address, Time};
use crate::random::Stream;
use crate::stats::QueueHistogram;

const HOT_FOOD_SERVICE: (f64, f64) = (50.0, 120.0);
const HOT_FOOD_BILLING: (f64, f64) = (20.0, 40.0);
const SANDWICH_SERVICE: (f64, f64) = (60.0, 180.0);
const SANDWICH_BILLING: (f64, f64) = (5.0, 15.0);
const DRINKS_SERVICE: (f64, f64) = (5.0, 20.0);
const DRINKS_BILLING: (f64, f64) = (5.0, 10.0);

#[derive(Debug, Clone)]
pub enum Event {
    /// A customer asks to be serviced. `charge` is the bill accumulated so
    /// far; only the cashier reads it.
    Arrive {
        customer: Address,
        id: u64,
        charge: f64,
    },
    /// A drawn service duration has elapsed for the given customer.
    ServeDone {
        lane: usize,
        customer: Address,
        id: u64,
    },
}

impl Into<cafeteria::Event> for Event {
    fn into(self) -> cafeteria::Event {
        cafeteria::Event::StationEvent(self)
    }
}

#[derive(Debug)]
struct Waiter {
    customer: Address,
    id: u64,
    entered: Time,
}

/// Hot-food or specialty-sandwich counter: one single-capacity FIFO resource.
/// More employees narrow the service-time range instead of adding parallel
/// capacity, so throughput rises while contention semantics stay unchanged.
#[derive(Debug)]
pub struct FoodCounter {
    kind: StationId,
    employees: u32,
    service_range: (f64, f64),
    billing_range: (f64, f64),
    service_times: Stream,
    billing: Stream,
    line: Resource<Waiter>,
    queue_lengths: QueueHistogram,
}

impl FoodCounter {
    pub fn hot_food(config: &SimulationConfig) -> FoodCounter {
        FoodCounter::new(
            StationId::HotFood,
            config.hot_food_employees,
            HOT_FOOD_SERVICE,
            HOT_FOOD_BILLING,
            Stream::new(config.seeds.hot_food_service),
            Stream::new(config.seeds.hot_food_billing),
        )
    }

    pub fn sandwich(config: &SimulationConfig) -> FoodCounter {
        FoodCounter::new(
            StationId::Sandwich,
            config.sandwich_employees,
            SANDWICH_SERVICE,
            SANDWICH_BILLING,
            Stream::new(config.seeds.sandwich_service),
            Stream::new(config.seeds.sandwich_billing),
        )
    }

    fn new(
        kind: StationId,
        employees: u32,
        service_range: (f64, f64),
        billing_range: (f64, f64),
        service_times: Stream,
        billing: Stream,
    ) -> FoodCounter {
        FoodCounter {
            kind,
            employees,
            service_range,
            billing_range,
            service_times,
            billing,
            line: Resource::new(1),
            queue_lengths: QueueHistogram::new(),
        }
    }

    pub fn kind(&self) -> StationId {
        self.kind
    }

    pub fn into_queue_lengths(self) -> QueueHistogram {
        self.queue_lengths
    }

    fn begin_service(
        &mut self,
        waiter: Waiter,
        now: Time,
        effector: &mut Effector<cafeteria::Event, cafeteria::Component>,
    ) {
        let delay = now - waiter.entered;

        debug!(
            "customer {} starts {} service at {:.2} after waiting {:.2}",
            waiter.id, self.kind, now, delay
        );

        effector.schedule_immediately(
            waiter.customer,
            customer::Event::ServiceBegun {
                station: self.kind,
                delay,
            }
            .into(),
        );

        let scale = f64::from(self.employees);
        let service_time = self.service_times.uniform(
            waiter.id,
            self.service_range.0 / scale,
            self.service_range.1 / scale,
        );

        effector.schedule_in_to_self(
            service_time,
            Event::ServeDone {
                lane: 0,
                customer: waiter.customer,
                id: waiter.id,
            }
            .into(),
        );
    }
}

impl CafeteriaComponent for FoodCounter {
    fn start(&mut self, _info: StartInfo) -> Effector<cafeteria::Event, cafeteria::Component> {
        Effector::new()
    }

    fn handle(
        &mut self,
        info: HandleInfo,
        message: cafeteria::Event,
    ) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();
        let now = info.current_time;

        let message: Option<Event> = message.into();

        match message {
            Some(Event::Arrive { customer, id, .. }) => {
                debug!("customer {} joins the {} queue at {:.2}", id, self.kind, now);

                // Pre-change length, then the mutation.
                self.queue_lengths.observe(self.line.queue_len(), now);

                let waiter = Waiter {
                    customer,
                    id,
                    entered: now,
                };

                if let Some(admitted) = self.line.acquire(waiter) {
                    self.begin_service(admitted, now, &mut effector);
                }
            }
            Some(Event::ServeDone { customer, id, .. }) => {
                let charge =
                    self.billing
                        .uniform(id, self.billing_range.0, self.billing_range.1);

                debug!(
                    "customer {} leaves {} at {:.2} with {:.2} added to the bill",
                    id, self.kind, now, charge
                );

                effector.schedule_immediately(
                    customer,
                    customer::Event::ServiceEnded {
                        station: self.kind,
                        charge,
                    }
                    .into(),
                );

                self.queue_lengths.observe(self.line.queue_len(), now);

                if let Some(next) = self.line.release() {
                    self.begin_service(next, now, &mut effector);
                }
            }
            _ => {}
        }

        effector
    }
}

/// Self-service drinks: no queue, unlimited concurrency. Customers are only
/// delayed by the drawn service time itself.
#[derive(Debug)]
pub struct DrinksStation {
    service_times: Stream,
    billing: Stream,
}

impl DrinksStation {
    pub fn new(config: &SimulationConfig) -> DrinksStation {
        DrinksStation {
            service_times: Stream::new(config.seeds.drinks_service),
            billing: Stream::new(config.seeds.drinks_billing),
        }
    }
}

impl CafeteriaComponent for DrinksStation {
    fn start(&mut self, _info: StartInfo) -> Effector<cafeteria::Event, cafeteria::Component> {
        Effector::new()
    }

    fn handle(
        &mut self,
        info: HandleInfo,
        message: cafeteria::Event,
    ) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();
        let now = info.current_time;

        let message: Option<Event> = message.into();

        match message {
            Some(Event::Arrive { customer, id, .. }) => {
                debug!("customer {} pours a drink at {:.2}", id, now);

                let service_time =
                    self.service_times
                        .uniform(id, DRINKS_SERVICE.0, DRINKS_SERVICE.1);

                effector.schedule_in_to_self(
                    service_time,
                    Event::ServeDone {
                        lane: 0,
                        customer,
                        id,
                    }
                    .into(),
                );
            }
            Some(Event::ServeDone { customer, id, .. }) => {
                let charge = self.billing.uniform(id, DRINKS_BILLING.0, DRINKS_BILLING.1);

                effector.schedule_immediately(
                    customer,
                    customer::Event::ServiceEnded {
                        station: StationId::Drinks,
                        charge,
                    }
                    .into(),
                );
            }
            _ => {}
        }

        effector
    }
}

#[derive(Debug)]
struct Checkout {
    customer: Address,
    id: u64,
    charge: f64,
    entered: Time,
}

/// Bank of single-capacity cashier lanes. A customer picks the least-loaded
/// lane once, on arrival, and is then committed to it. All lanes share one
/// histogram and one last-change marker, like a single till area.
#[derive(Debug)]
pub struct CashierStation {
    lanes: Vec<Resource<Checkout>>,
    queue_lengths: QueueHistogram,
}

impl CashierStation {
    pub fn new(config: &SimulationConfig) -> CashierStation {
        CashierStation {
            lanes: (0..config.cashier_lanes)
                .map(|_| Resource::new(1))
                .collect(),
            queue_lengths: QueueHistogram::new(),
        }
    }

    pub fn into_queue_lengths(self) -> QueueHistogram {
        self.queue_lengths
    }

    /// Index of the lane with the fewest queued-or-served requests, lowest
    /// index on ties. Evaluated once per arriving customer.
    fn select_lane(&self) -> usize {
        self.lanes
            .iter()
            .enumerate()
            .min_by_key(|(_, lane)| lane.load())
            .map(|(index, _)| index)
            .expect("cashier station has at least one lane")
    }

    fn begin_service(
        &mut self,
        lane: usize,
        checkout: Checkout,
        now: Time,
        effector: &mut Effector<cafeteria::Event, cafeteria::Component>,
    ) {
        let delay = now - checkout.entered;

        debug!(
            "customer {} starts checkout on lane {} at {:.2} after waiting {:.2}",
            checkout.id, lane, now, delay
        );

        effector.schedule_immediately(
            checkout.customer,
            customer::Event::ServiceBegun {
                station: StationId::Cashier,
                delay,
            }
            .into(),
        );

        // The till works through the bill built up at the earlier stations;
        // no independent service draw happens here.
        effector.schedule_in_to_self(
            checkout.charge,
            Event::ServeDone {
                lane,
                customer: checkout.customer,
                id: checkout.id,
            }
            .into(),
        );
    }
}

impl CafeteriaComponent for CashierStation {
    fn start(&mut self, _info: StartInfo) -> Effector<cafeteria::Event, cafeteria::Component> {
        Effector::new()
    }

    fn handle(
        &mut self,
        info: HandleInfo,
        message: cafeteria::Event,
    ) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();
        let now = info.current_time;

        let message: Option<Event> = message.into();

        match message {
            Some(Event::Arrive {
                customer,
                id,
                charge,
            }) => {
                let lane = self.select_lane();

                debug!(
                    "customer {} joins cashier lane {} at {:.2} owing {:.2}",
                    id, lane, now, charge
                );

                self.queue_lengths
                    .observe(self.lanes[lane].queue_len(), now);

                let checkout = Checkout {
                    customer,
                    id,
                    charge,
                    entered: now,
                };

                if let Some(admitted) = self.lanes[lane].acquire(checkout) {
                    self.begin_service(lane, admitted, now, &mut effector);
                }
            }
            Some(Event::ServeDone { lane, customer, id }) => {
                debug!("customer {} is billed on lane {} at {:.2}", id, lane, now);

                effector.schedule_immediately(
                    customer,
                    customer::Event::ServiceEnded {
                        station: StationId::Cashier,
                        charge: 0.0,
                    }
                    .into(),
                );

                self.queue_lengths
                    .observe(self.lanes[lane].queue_len(), now);

                if let Some(next) = self.lanes[lane].release() {
                    self.begin_service(lane, next, now, &mut effector);
                }
            }
            _ => {}
        }

        effector
    }
}

#[cfg(test)]
mod tests {
    use super::{CashierStation, Checkout};
    use crate::config::SimulationConfig;

    fn checkout(id: u64) -> Checkout {
        Checkout {
            customer: 0,
            id,
            charge: 10.0,
            entered: 0.0,
        }
    }

    fn station_with_lanes(lanes: u32) -> CashierStation {
        let mut config = SimulationConfig::default();
        config.cashier_lanes = lanes;

        CashierStation::new(&config)
    }

    #[test]
    fn empty_lanes_pick_the_first() {
        let station = station_with_lanes(3);

        assert_eq!(station.select_lane(), 0);
    }

    #[test]
    fn picks_the_least_loaded_lane() {
        let mut station = station_with_lanes(3);

        // Lane 0 ends up with one in service and one waiting.
        let _ = station.lanes[0].acquire(checkout(1));
        let _ = station.lanes[0].acquire(checkout(2));
        let _ = station.lanes[2].acquire(checkout(3));

        assert_eq!(station.select_lane(), 1);
    }

    #[test]
    fn ties_break_toward_the_lowest_index() {
        let mut station = station_with_lanes(3);

        // Loads [2, 0, 0]: lanes 1 and 2 tie, lane 1 wins.
        let _ = station.lanes[0].acquire(checkout(1));
        let _ = station.lanes[0].acquire(checkout(2));

        assert_eq!(station.select_lane(), 1);
    }

    #[test]
    fn in_service_requests_count_toward_the_load() {
        let mut station = station_with_lanes(2);

        // One in service, nobody waiting: still busier than the empty lane.
        let _ = station.lanes[0].acquire(checkout(1));

        assert_eq!(station.select_lane(), 1);
    }
}
