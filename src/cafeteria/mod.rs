use crate::cafeteria::arrivals::ArrivalProcess;
use crate::cafeteria::customer::{Customer, CustomerRecord};
use crate::cafeteria::station::{CashierStation, DrinksStation, FoodCounter};
use crate::config::SimulationConfig;
use crate::discrete_system::component::{Component as SystemComponent, HandleInfo, StartInfo};
use crate::discrete_system::effector::Effector;
use crate::discrete_system::{Address, Simulation};
use crate::stats::QueueHistogram;
use failure::Error;
use serde::Serialize;
use std::fmt;

pub mod arrivals;
pub mod customer;
pub mod station;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationId {
    HotFood,
    Sandwich,
    Drinks,
    Cashier,
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StationId::HotFood => "hot-food",
            StationId::Sandwich => "sandwich",
            StationId::Drinks => "drinks",
            StationId::Cashier => "cashier",
        };

        write!(f, "{}", name)
    }
}

/// Addresses of the four stations, handed to every customer so it can walk
/// its route.
#[derive(Debug, Clone)]
pub struct StationDirectory {
    pub hot_food: Address,
    pub sandwich: Address,
    pub drinks: Address,
    pub cashier: Address,
}

impl StationDirectory {
    pub fn address_of(&self, station: StationId) -> Address {
        match station {
            StationId::HotFood => self.hot_food,
            StationId::Sandwich => self.sandwich,
            StationId::Drinks => self.drinks,
            StationId::Cashier => self.cashier,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    ArrivalsEvent(arrivals::Event),
    CustomerEvent(customer::Event),
    StationEvent(station::Event),
}

impl Into<Option<arrivals::Event>> for Event {
    fn into(self) -> Option<arrivals::Event> {
        match self {
            Event::ArrivalsEvent(event) => Some(event),
            _ => None,
        }
    }
}

impl Into<Option<customer::Event>> for Event {
    fn into(self) -> Option<customer::Event> {
        match self {
            Event::CustomerEvent(event) => Some(event),
            _ => None,
        }
    }
}

impl Into<Option<station::Event>> for Event {
    fn into(self) -> Option<station::Event> {
        match self {
            Event::StationEvent(event) => Some(event),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Component {
    Arrivals(ArrivalProcess),
    Customer(Customer),
    Counter(FoodCounter),
    Drinks(DrinksStation),
    Cashier(CashierStation),
}

impl Into<Component> for ArrivalProcess {
    fn into(self) -> Component {
        Component::Arrivals(self)
    }
}

impl Into<Component> for Customer {
    fn into(self) -> Component {
        Component::Customer(self)
    }
}

impl Into<Component> for FoodCounter {
    fn into(self) -> Component {
        Component::Counter(self)
    }
}

impl Into<Component> for DrinksStation {
    fn into(self) -> Component {
        Component::Drinks(self)
    }
}

impl Into<Component> for CashierStation {
    fn into(self) -> Component {
        Component::Cashier(self)
    }
}

trait CafeteriaComponent {
    fn start(&mut self, info: StartInfo) -> Effector<Event, Component>;
    fn handle(&mut self, info: HandleInfo, message: Event) -> Effector<Event, Component>;
}

impl SystemComponent<Event> for Component {
    fn start(&mut self, info: StartInfo) -> Effector<Event, Component> {
        match self {
            Component::Arrivals(arrivals) => arrivals.start(info),
            Component::Customer(customer) => customer.start(info),
            Component::Counter(counter) => counter.start(info),
            Component::Drinks(drinks) => drinks.start(info),
            Component::Cashier(cashier) => cashier.start(info),
        }
    }

    fn handle(&mut self, info: HandleInfo, message: Event) -> Effector<Event, Component> {
        match self {
            Component::Arrivals(arrivals) => arrivals.handle(info, message),
            Component::Customer(customer) => customer.handle(info, message),
            Component::Counter(counter) => counter.handle(info, message),
            Component::Drinks(drinks) => drinks.handle(info, message),
            Component::Cashier(cashier) => cashier.handle(info, message),
        }
    }
}

/// The two artifacts a finished run hands to the reporting layer: every
/// customer that entered the system, and the queue-length histograms of the
/// three queued stations.
#[derive(Debug, Serialize)]
pub struct SimulationOutput {
    pub customers: Vec<CustomerRecord>,
    pub hot_food_queue: QueueHistogram,
    pub sandwich_queue: QueueHistogram,
    pub cashier_queue: QueueHistogram,
}

/// Runs one simulation to the configured horizon. A failed validation aborts
/// before anything is scheduled, so no partial artifacts can escape.
pub fn run(config: &SimulationConfig) -> Result<SimulationOutput, Error> {
    config.validate()?;

    let mut system: Simulation<Event, Component> = Simulation::new();

    let hot_food = system.register_component(FoodCounter::hot_food(config).into());
    let sandwich = system.register_component(FoodCounter::sandwich(config).into());
    let drinks = system.register_component(DrinksStation::new(config).into());
    let cashier = system.register_component(CashierStation::new(config).into());

    let directory = StationDirectory {
        hot_food,
        sandwich,
        drinks,
        cashier,
    };

    system.register_component(ArrivalProcess::new(directory, config).into());

    system.run_until(config.horizon);

    let mut customers = Vec::new();
    let mut hot_food_queue = QueueHistogram::new();
    let mut sandwich_queue = QueueHistogram::new();
    let mut cashier_queue = QueueHistogram::new();

    for (_, component) in system.into_components() {
        match component {
            Component::Customer(customer) => customers.push(customer.into_record()),
            Component::Counter(counter) => match counter.kind() {
                StationId::HotFood => hot_food_queue = counter.into_queue_lengths(),
                _ => sandwich_queue = counter.into_queue_lengths(),
            },
            Component::Cashier(cashier) => cashier_queue = cashier.into_queue_lengths(),
            _ => {}
        }
    }

    // The component map iterates in arbitrary order.
    customers.sort_by_key(|record| record.id);

    info!("simulation finished: {} customers arrived", customers.len());

    Ok(SimulationOutput {
        customers,
        hot_food_queue,
        sandwich_queue,
        cashier_queue,
    })
}
