use crate::discrete_system::component::Component;
use crate::discrete_system::{Address, Message, Time};

pub enum ScheduledEventAddress {
    SelfAddress,
    RemoteAddress(Address),
}

pub struct ScheduledEvent<M> {
    pub message: M,
    pub in_time: Time,
    pub address: ScheduledEventAddress,
}

/// Collects the side effects of one handler invocation: messages to schedule
/// and components to spawn. Applied by the simulation once the handler
/// returns.
pub struct Effector<M: Message, C: Component<M>> {
    pub events: Vec<ScheduledEvent<M>>,
    pub components: Vec<C>,
}

impl<M: Message, C: Component<M>> Effector<M, C> {
    pub fn new() -> Effector<M, C> {
        Effector {
            events: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn schedule_in(&mut self, address: Address, in_time: Time, message: M) {
        assert!(
            in_time >= 0.0,
            "scheduled a negative delay ({}); delays must be non-negative",
            in_time
        );

        self.events.push(ScheduledEvent {
            in_time,
            message,
            address: ScheduledEventAddress::RemoteAddress(address),
        })
    }

    pub fn schedule_immediately(&mut self, address: Address, message: M) {
        self.schedule_in(address, 0.0, message)
    }

    pub fn schedule_in_to_self(&mut self, in_time: Time, message: M) {
        assert!(
            in_time >= 0.0,
            "scheduled a negative delay ({}); delays must be non-negative",
            in_time
        );

        self.events.push(ScheduledEvent {
            in_time,
            message,
            address: ScheduledEventAddress::SelfAddress,
        })
    }

    pub fn instantiate_new_component(&mut self, data: C) {
        self.components.push(data);
    }
}
