// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health Tracker: the application core of a personal health-tracking app.
//!
//! This crate provides everything below the UI: typed clients for identity,
//! document and blob storage, food search and text recognition; the derived
//! metrics (logging streak, nutrient totals, weight trend); per-screen
//! controllers; and the session-gated application shell.

pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod shell;
pub mod time_utils;

pub use shell::{App, Backend, CloudBackend, Route, Screen, SessionClients};
