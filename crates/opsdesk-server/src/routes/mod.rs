pub mod activity;
pub mod bank;
pub mod bookings;
pub mod chats;
pub mod config;
pub mod employees;
pub mod events;
pub mod keys;
pub mod members;
pub mod opportunities;
pub mod partners;
pub mod playbooks;
pub mod rocks;
pub mod schedules;
pub mod state;
pub mod tracker;
