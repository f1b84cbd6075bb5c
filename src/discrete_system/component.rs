use crate::discrete_system::effector::Effector;
use crate::discrete_system::{Address, Message, Time};

pub struct StartInfo {
    pub self_address: Address,
    pub current_time: Time,
}

pub struct HandleInfo {
    pub self_address: Address,
    pub sender_address: Address,
    pub current_time: Time,
}

/// A cooperative process. `start` runs once when the component joins the
/// simulation; `handle` runs for every message delivered to it. Both return an
/// `Effector` describing what to schedule or spawn next.
pub trait Component<M: Message>: Sized {
    fn start(&mut self, info: StartInfo) -> Effector<M, Self>;
    fn handle(&mut self, info: HandleInfo, message: M) -> Effector<M, Self>;
}
