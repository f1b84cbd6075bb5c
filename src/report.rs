//! The five printed summaries derived from a finished run. Everything here is
//! a pure function of the two output artifacts; empty samples come back as
//! `None` and print as "no data" instead of dividing by zero.

use crate::cafeteria::customer::{CustomerRecord, Route};
use crate::cafeteria::SimulationOutput;
use crate::stats::QueueHistogram;
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySummary {
    pub mean: f64,
    pub max: f64,
    pub count: usize,
}

fn summarize(delays: Vec<f64>) -> Option<DelaySummary> {
    if delays.is_empty() {
        return None;
    }

    let total: f64 = delays.iter().sum();
    let max = delays.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(DelaySummary {
        mean: total / delays.len() as f64,
        max,
        count: delays.len(),
    })
}

#[derive(Debug, Clone, Copy)]
pub struct StationDelayReport {
    pub hot_food: Option<DelaySummary>,
    pub sandwich: Option<DelaySummary>,
    pub cashier: Option<DelaySummary>,
}

/// Report 1: queue delay per station, over customers whose service began.
pub fn station_delays(customers: &[CustomerRecord]) -> StationDelayReport {
    StationDelayReport {
        hot_food: summarize(
            customers
                .iter()
                .filter(|c| c.route == Route::HotFood && c.hot_food_served)
                .map(|c| c.hot_food_delay)
                .collect(),
        ),
        sandwich: summarize(
            customers
                .iter()
                .filter(|c| c.route == Route::Sandwich && c.sandwich_served)
                .map(|c| c.sandwich_delay)
                .collect(),
        ),
        cashier: summarize(
            customers
                .iter()
                .filter(|c| c.cashier_served)
                .map(|c| c.cashier_delay)
                .collect(),
        ),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueueSummary {
    pub time_average: Option<f64>,
    pub max_length: Option<usize>,
}

/// Report 2: time-weighted average occupancy and maximum observed length.
pub fn queue_summary(histogram: &QueueHistogram) -> QueueSummary {
    QueueSummary {
        time_average: histogram.time_average(),
        max_length: histogram.max_length(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteDelayReport {
    pub hot_food: Option<DelaySummary>,
    pub sandwich: Option<DelaySummary>,
    pub drinks_only: Option<DelaySummary>,
}

/// Report 3: total route delay per customer type, over customers who cleared
/// every queue on their route.
pub fn route_delays(customers: &[CustomerRecord]) -> RouteDelayReport {
    let totals = |route: Route| {
        summarize(
            customers
                .iter()
                .filter(|c| {
                    c.route == route
                        && c.completed()
                        && match route {
                            Route::HotFood => c.hot_food_served,
                            Route::Sandwich => c.sandwich_served,
                            Route::DrinksOnly => true,
                        }
                })
                .map(|c| c.total_delay())
                .collect(),
        )
    };

    RouteDelayReport {
        hot_food: totals(Route::HotFood),
        sandwich: totals(Route::Sandwich),
        drinks_only: totals(Route::DrinksOnly),
    }
}

/// Report 4: overall mean total delay, weighting each group-size bucket by
/// its arrival probability. Buckets with no finished customers contribute
/// nothing; with no finished customers at all there is no average.
pub fn group_weighted_mean(customers: &[CustomerRecord]) -> Option<f64> {
    const WEIGHTS: [(u32, f64); 4] = [(1, 0.5), (2, 0.3), (3, 0.1), (4, 0.1)];

    let finished: Vec<&CustomerRecord> =
        customers.iter().filter(|c| c.completed()).collect();

    if finished.is_empty() {
        return None;
    }

    let mut weighted = 0.0;

    for (size, weight) in WEIGHTS.iter() {
        let bucket: Vec<f64> = finished
            .iter()
            .filter(|c| c.group_size == *size)
            .map(|c| c.total_delay())
            .collect();

        if !bucket.is_empty() {
            weighted += weight * bucket.iter().sum::<f64>() / bucket.len() as f64;
        }
    }

    Some(weighted)
}

#[derive(Debug, Clone, Copy)]
pub struct SystemSummary {
    /// Mean of the per-station time-weighted averages, over stations that saw
    /// any queueing at all.
    pub average_occupancy: Option<f64>,
    pub total_customers: usize,
}

/// Report 5: the fire-marshall numbers for the whole system.
pub fn system_summary(output: &SimulationOutput) -> SystemSummary {
    let averages: Vec<f64> = [
        &output.hot_food_queue,
        &output.sandwich_queue,
        &output.cashier_queue,
    ]
    .iter()
    .filter_map(|histogram| histogram.time_average())
    .collect();

    let average_occupancy = if averages.is_empty() {
        None
    } else {
        Some(averages.iter().sum::<f64>() / averages.len() as f64)
    };

    SystemSummary {
        average_occupancy,
        total_customers: output.customers.len(),
    }
}

fn print_delay(label: &str, summary: Option<DelaySummary>) {
    match summary {
        Some(summary) => {
            println!("  {}:", label);
            println!("    mean delay: {:.2} s", summary.mean);
            println!("    max delay:  {:.2} s", summary.max);
            println!("    customers:  {}", summary.count);
        }
        None => println!("  {}: no data", label),
    }
}

fn print_queue(label: &str, summary: QueueSummary) {
    match (summary.time_average, summary.max_length) {
        (Some(average), Some(max)) => {
            println!("  {}:", label);
            println!("    time-average queue length: {:.2}", average);
            println!("    max queue length:          {}", max);
        }
        _ => println!("  {}: no data", label),
    }
}

pub fn print_report(output: &SimulationOutput) {
    println!("------------------------------------");
    println!("TOTAL CUSTOMERS: {}", output.customers.len());
    println!("------------------------------------");
    println!();
    println!("{}", "------------------- REPORT -------------------".bold());

    println!();
    println!("{}", "1. Queue delay per station".green().bold());
    let stations = station_delays(&output.customers);
    print_delay("hot food", stations.hot_food);
    print_delay("specialty sandwich", stations.sandwich);
    print_delay("cashiers", stations.cashier);

    println!();
    println!("{}", "2. Queue lengths per station".green().bold());
    print_queue("hot food", queue_summary(&output.hot_food_queue));
    print_queue("specialty sandwich", queue_summary(&output.sandwich_queue));
    print_queue("cashiers", queue_summary(&output.cashier_queue));

    println!();
    println!("{}", "3. Total route delay per customer type".green().bold());
    let routes = route_delays(&output.customers);
    print_delay("hot-food route", routes.hot_food);
    print_delay("sandwich route", routes.sandwich);
    print_delay("drinks-only route", routes.drinks_only);

    println!();
    println!("{}", "4. Group-size-weighted mean delay".green().bold());
    match group_weighted_mean(&output.customers) {
        Some(mean) => println!("  overall mean: {:.2} s", mean),
        None => println!("  no finished customers"),
    }

    println!();
    println!("{}", "5. Whole-system summary".green().bold());
    let system = system_summary(output);
    match system.average_occupancy {
        Some(average) => println!("  average queue occupancy: {:.2}", average),
        None => println!("  average queue occupancy: no data"),
    }
    println!("  customers in the system: {}", system.total_customers);

    println!();
    println!("{}", "----------------------------------------------".bold());
}
