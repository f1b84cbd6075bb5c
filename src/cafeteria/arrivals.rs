use crate::cafeteria;
use crate::cafeteria::customer::{Customer, Route};
use crate::cafeteria::{CafeteriaComponent, StationDirectory};
use crate::config::SimulationConfig;
use crate::discrete_system::component::{HandleInfo, StartInfo};
use crate::discrete_system::effector::Effector;
use crate::discrete_system::Time;
use crate::random::Stream;
use rand::distributions::WeightedIndex;

const GROUP_SIZES: [u32; 4] = [1, 2, 3, 4];
const GROUP_SIZE_WEIGHTS: [f64; 4] = [0.5, 0.3, 0.1, 0.1];

const ROUTES: [Route; 3] = [Route::HotFood, Route::Sandwich, Route::DrinksOnly];
const ROUTE_WEIGHTS: [f64; 3] = [0.8, 0.15, 0.05];

#[derive(Debug, Clone)]
pub enum Event {
    GroupArrived,
}

impl Into<cafeteria::Event> for Event {
    fn into(self) -> cafeteria::Event {
        cafeteria::Event::ArrivalsEvent(self)
    }
}

/// Compound arrival process: groups arrive with exponential gaps, every group
/// member gets its own route and its own customer process. The first group
/// walks in at time zero.
///
/// Group-size and gap draws share one monotonically increasing counter (size
/// first, then the gap); route draws are keyed by customer id. This keying is
/// the reproducibility contract: the same seeds replay the same cafeteria.
#[derive(Debug)]
pub struct ArrivalProcess {
    directory: StationDirectory,
    mean_interval: f64,
    intervals: Stream,
    group_sizes: Stream,
    routes: Stream,
    group_size_weights: WeightedIndex<f64>,
    route_weights: WeightedIndex<f64>,
    draw_counter: u64,
    next_customer_id: u64,
    pending_group_size: u32,
}

impl ArrivalProcess {
    pub fn new(directory: StationDirectory, config: &SimulationConfig) -> ArrivalProcess {
        ArrivalProcess {
            directory,
            mean_interval: config.mean_arrival_interval,
            intervals: Stream::new(config.seeds.arrival_interval),
            group_sizes: Stream::new(config.seeds.group_size),
            routes: Stream::new(config.seeds.route_choice),
            group_size_weights: WeightedIndex::new(&GROUP_SIZE_WEIGHTS)
                .expect("group-size weights are valid"),
            route_weights: WeightedIndex::new(&ROUTE_WEIGHTS).expect("route weights are valid"),
            draw_counter: 0,
            next_customer_id: 1,
            pending_group_size: 0,
        }
    }

    fn next_draw(&mut self) -> u64 {
        let key = self.draw_counter;

        self.draw_counter += 1;

        key
    }

    fn draw_group_size(&mut self) -> u32 {
        let key = self.next_draw();

        GROUP_SIZES[self.group_sizes.pick(key, &self.group_size_weights)]
    }

    fn spawn_group(
        &mut self,
        size: u32,
        now: Time,
        effector: &mut Effector<cafeteria::Event, cafeteria::Component>,
    ) {
        for _ in 0..size {
            let id = self.next_customer_id;
            self.next_customer_id += 1;

            let route = ROUTES[self.routes.pick(id, &self.route_weights)];

            info!(
                "customer {} arrives at {:.2} in a group of {} ({:?} route)",
                id, now, size, route
            );

            effector.instantiate_new_component(
                Customer::new(id, route, size, self.directory.clone()).into(),
            );
        }
    }

    fn schedule_next_group(
        &mut self,
        effector: &mut Effector<cafeteria::Event, cafeteria::Component>,
    ) {
        // The next group's size is drawn before its arrival gap.
        self.pending_group_size = self.draw_group_size();

        let gap_key = self.next_draw();
        let gap = self.intervals.exponential(gap_key, self.mean_interval);

        effector.schedule_in_to_self(gap, Event::GroupArrived.into());
    }
}

impl CafeteriaComponent for ArrivalProcess {
    fn start(&mut self, info: StartInfo) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();

        let initial_size = self.draw_group_size();
        self.spawn_group(initial_size, info.current_time, &mut effector);

        self.schedule_next_group(&mut effector);

        effector
    }

    fn handle(
        &mut self,
        info: HandleInfo,
        message: cafeteria::Event,
    ) -> Effector<cafeteria::Event, cafeteria::Component> {
        let mut effector = Effector::new();

        let message: Option<Event> = message.into();

        match message {
            Some(Event::GroupArrived) => {
                let size = self.pending_group_size;
                self.spawn_group(size, info.current_time, &mut effector);

                self.schedule_next_group(&mut effector);
            }
            _ => {}
        }

        effector
    }
}
