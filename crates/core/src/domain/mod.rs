pub mod agent;
pub mod lead;
pub mod notification;
