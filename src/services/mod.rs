pub mod database;
pub mod form_flow;
pub mod time_slots;
pub mod validation;
