//! # netsecure-tui
//!
//! A live security operations dashboard for the terminal.
//!
//! The dashboard polls a backend for threats, connections, alerts, logs and
//! headline status, keeps the latest snapshot of each in shared state, and
//! renders four sections (Dashboard, Threats, Network, Alerts) with animated
//! counters and braille canvas visualizations.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                            Application                            │
//! │                                                                   │
//! │  ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────────┐   │
//! │  │  source  │──▶│  poller  │──▶│   state   │──▶│     app      │   │
//! │  │(provider)│   │ (tokio)  │   │(snapshots)│   │(frame, input)│   │
//! │  └──────────┘   └──────────┘   └───────────┘   └──────┬───────┘   │
//! │                                                       │           │
//! │          ┌──────────────┬───────────────┬─────────────┤           │
//! │          ▼              ▼               ▼             ▼           │
//! │     ┌─────────┐   ┌──────────┐   ┌───────────┐   ┌────────┐       │
//! │     │ router  │   │ animator │   │ animation │──▶│  viz   │       │
//! │     │(sections)   │(counters)│   │  (loops)  │   │(scenes)│       │
//! │     └─────────┘   └──────────┘   └─────┬─────┘   └────────┘       │
//! │                                        ▼                          │
//! │                                  ┌───────────┐   ┌──────────┐     │
//! │                                  │  surface  │──▶│    ui    │     │
//! │                                  │ (shapes)  │   │(ratatui) │     │
//! │                                  └───────────┘   └──────────┘     │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`DataProvider`] trait, an HTTP provider for the
//!   backend API and a directory provider serving JSON fixtures
//! - **[`poller`]**: one background task per resource; a cycle that is still
//!   in flight makes the next tick skip
//! - **[`state`]**: versioned latest-value slots shared between pollers and UI
//! - **[`router`]**: section navigation and which loops/pollers each needs
//! - **[`animation`]**, **[`viz`]**, **[`surface`]**: frame-driven scenes that
//!   record shapes for the canvases
//! - **[`animator`]**: eased counters for the stat cards
//! - **[`ui`]**: terminal rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the default backend at http://127.0.0.1:5000
//! netsecure
//!
//! # Serve recorded payloads from a directory
//! netsecure --fixtures ./fixtures
//!
//! # Write one snapshot of everything to JSON and exit
//! netsecure --fixtures ./fixtures --export snapshot.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use netsecure_tui::{App, DashboardConfig, DirectoryProvider};
//!
//! # tokio_test::block_on(async {
//! let provider = Arc::new(DirectoryProvider::new("fixtures"));
//! let mut app = App::new(DashboardConfig::default(), provider);
//! app.start();
//! # });
//! ```

pub mod animation;
pub mod animator;
pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logging;
pub mod poller;
pub mod router;
pub mod source;
pub mod state;
pub mod surface;
pub mod ui;
pub mod viz;

// Re-export main types for convenience
pub use app::App;
pub use config::DashboardConfig;
pub use error::FetchError;
pub use router::Section;
pub use source::{
    Alert, Connection, DataProvider, DirectoryProvider, HttpProvider, LogEntry, Resource,
    StatusMetrics, Threat,
};
pub use state::SharedState;
