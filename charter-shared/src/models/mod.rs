pub mod events;
pub mod flight;
pub mod money;
pub mod passenger;
pub mod ticket;
