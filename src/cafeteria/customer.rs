use crate::cafeteria;
use crate::cafeteria::station;
use crate::cafeteria::{CafeteriaComponent, StationDirectory, StationId};
use crate::discrete_system::component::{HandleInfo, StartInfo};
use crate::discrete_system::effector::Effector;
use crate::discrete_system::{Address, Time};
use serde::Serialize;

/// Ordered set of stations a customer visits before leaving. Everyone ends at
/// the cashier; drinks are self-service on every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    HotFood,
    Sandwich,
    DrinksOnly,
}

impl Route {
    pub fn stations(self) -> &'static [StationId] {
        match self {
            Route::HotFood => &[StationId::HotFood, StationId::Drinks, StationId::Cashier],
            Route::Sandwich => &[StationId::Sandwich, StationId::Drinks, StationId::Cashier],
            Route::DrinksOnly => &[StationId::Drinks, StationId::Cashier],
        }
    }
}

/// What remains of a customer once the run is over. Mutated only by the
/// customer's own flow; immutable for the reporting layer.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecord {
    pub id: u64,
    pub route: Route,
    pub group_size: u32,
    pub hot_food_enter_time: f64,
    pub sandwich_enter_time: f64,
    pub cashier_enter_time: f64,
    pub hot_food_delay: f64,
    pub sandwich_delay: f64,
    pub cashier_delay: f64,
    /// Served flags: set once service began, so a customer abandoned in a
    /// queue at the horizon stays excluded from finished statistics.
    pub hot_food_served: bool,
    pub sandwich_served: bool,
    pub cashier_served: bool,
    /// The bill built up at each station, charged in full at the till.
    pub accumulated_charge: f64,
}

impl CustomerRecord {
    fn new(id: u64, route: Route, group_size: u32) -> CustomerRecord {
        CustomerRecord {
            id,
            route,
            group_size,
            hot_food_enter_time: 0.0,
            sandwich_enter_time: 0.0,
            cashier_enter_time: 0.0,
            hot_food_delay: 0.0,
            sandwich_delay: 0.0,
            cashier_delay: 0.0,
            hot_food_served: false,
            sandwich_served: false,
            cashier_served: false,
            accumulated_charge: 0.0,
        }
    }

    /// Total queueing delay along the customer's route.
    pub fn total_delay(&self) -> f64 {
        match self.route {
            Route::HotFood => self.hot_food_delay + self.cashier_delay,
            Route::Sandwich => self.sandwich_delay + self.cashier_delay,
            Route::DrinksOnly => self.cashier_delay,
        }
    }

    /// True once the customer has been billed; abandoned customers stay
    /// incomplete forever.
    pub fn completed(&self) -> bool {
        self.cashier_served
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// The station granted service; `delay` is the time spent in its queue.
    ServiceBegun { station: StationId, delay: Time },
    /// Service is over and `charge` was added to the bill.
    ServiceEnded { station: StationId, charge: f64 },
}

impl Into<cafeteria::Event> for Event {
    fn into(self) -> cafeteria::Event {
        cafeteria::Event::CustomerEvent(self)
    }
}

#[derive(Debug)]
enum State {
    AtStation(usize),
    Done,
}

/// One customer's walk through its route. The customer asks a station for
/// service, waits for `ServiceBegun` and `ServiceEnded`, then moves on; after
/// the cashier it is done and only the record survives.
#[derive(Debug)]
pub struct Customer {
    record: CustomerRecord,
    directory: StationDirectory,
    state: State,
}

impl Customer {
    pub fn new(id: u64, route: Route, group_size: u32, directory: StationDirectory) -> Customer {
        Customer {
            record: CustomerRecord::new(id, route, group_size),
            directory,
            state: State::AtStation(0),
        }
    }

    pub fn into_record(self) -> CustomerRecord {
        self.record
    }

    fn enter_station(
        &mut self,
        index: usize,
        self_address: Address,
        now: Time,
        effector: &mut Effector<cafeteria::Event, cafeteria::Component>,
    ) {
        let station = self.record.route.stations()[index];

        match station {
            StationId::HotFood => self.record.hot_food_enter_time = now,
            StationId::Sandwich => self.record.sandwich_enter_time = now,
            StationId::Cashier => self.record.cashier_enter_time = now,
            StationId::Drinks => {}
        }

        effector.schedule_immediately(
            self.directory.address_of(station),
            station::Event::Arrive {
                customer: self_address,
                id: self.record.id,
                charge: self.record.accumulated_charge,
            }
            .into(),
        );

        self.state = State::AtStation(index);
    }

    fn note_service_begun(&mut self, station: StationId, delay: Time) {
        match station {
            StationId::HotFood => {
                self.record.hot_food_delay = delay;
                self.record.hot_food_served = true;
            }
            StationId::Sandwich => {
                self.record.sandwich_delay = delay;
                self.record.sandwich_served = true;
            }
            StationId::Cashier => {
                self.record.cashier_delay = delay;
                self.record.cashier_served = true;
            }
            StationId::Drinks => {}
        }
    }
}

impl CafeteriaComponent for Customer {
    fn start(&mut self, info: StartInfo) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();

        self.enter_station(0, info.self_address, info.current_time, &mut effector);

        effector
    }

    fn handle(
        &mut self,
        info: HandleInfo,
        message: cafeteria::Event,
    ) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();

        let message: Option<Event> = message.into();

        let index = match self.state {
            State::AtStation(index) => index,
            State::Done => return effector,
        };

        match message {
            Some(Event::ServiceBegun { station, delay }) => {
                self.note_service_begun(station, delay);
            }
            Some(Event::ServiceEnded { charge, .. }) => {
                self.record.accumulated_charge += charge;

                if index + 1 < self.record.route.stations().len() {
                    self.enter_station(
                        index + 1,
                        info.self_address,
                        info.current_time,
                        &mut effector,
                    );
                } else {
                    info!(
                        "customer {} leaves the cafeteria at {:.2}",
                        self.record.id, info.current_time
                    );

                    self.state = State::Done;
                }
            }
            _ => {}
        }

        effector
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomerRecord, Route};
    use crate::cafeteria::StationId;

    #[test]
    fn routes_list_their_stations_in_visit_order() {
        assert_eq!(
            Route::HotFood.stations(),
            &[StationId::HotFood, StationId::Drinks, StationId::Cashier]
        );
        assert_eq!(Route::DrinksOnly.stations().first(), Some(&StationId::Drinks));
        assert_eq!(
            Route::Sandwich.stations().last(),
            Some(&StationId::Cashier)
        );
    }

    #[test]
    fn total_delay_only_counts_stations_on_the_route() {
        let mut record = CustomerRecord::new(1, Route::DrinksOnly, 2);
        record.hot_food_delay = 99.0; // never set in practice, must not count
        record.cashier_delay = 7.0;

        assert_eq!(record.total_delay(), 7.0);

        let mut record = CustomerRecord::new(2, Route::Sandwich, 1);
        record.sandwich_delay = 11.0;
        record.cashier_delay = 4.0;

        assert_eq!(record.total_delay(), 15.0);
    }

    #[test]
    fn fresh_records_are_incomplete() {
        let record = CustomerRecord::new(1, Route::HotFood, 1);

        assert!(!record.completed());
        assert!(!record.hot_food_served);
        assert_eq!(record.accumulated_charge, 0.0);
    }
}
