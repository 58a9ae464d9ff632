//! Core of the lane planner: plan model, calendar timeline, lane packing,
//! segment geometry, persistence and the editing session that ties them
//! together. The egui front end in `main.rs` only talks to [`session::Session`].

pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod session;
