//! Jeepney trip planner server.
//!
//! A web application that answers: "I'm standing here and need to get
//! there; which jeepney do I take, and what will it cost?"

pub mod dataset;
pub mod domain;
pub mod geometry;
pub mod network;
pub mod planner;
pub mod web;
