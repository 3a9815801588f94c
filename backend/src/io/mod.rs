//! # IO Module
//!
//! Interface layer between HTTP clients and the domain. Translates requests
//! into service commands and service results into `shared` DTOs.

pub mod rest;
