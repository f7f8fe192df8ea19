//! # Course Catalog
//!
//! Text extraction and relevance search over a university graduate catalog.
//!
//! The catalog PDF is fetched once, split into pages, and mined for course
//! headings (`CS 5100 Foundations of Artificial Intelligence`) and graduate
//! program headings (`Data Science, MS`). Each record is classified by its
//! identifier, expanded with synonym keywords, and cached for the life of the
//! process. Queries are scored by weighted field matches and returned with a
//! short human-readable justification.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌─────────────────────────┐   ┌─────────┐
//! │  Fetch   │──▶│ Extract  │──▶│        Pipeline         │──▶│  Cache  │
//! │ (reqwest)│   │ (pages)  │   │ normalize → entities →  │   │OnceCell │
//! └──────────┘   └──────────┘   │ classify → keywords     │   └────┬────┘
//!                               └─────────────────────────┘        │
//!                                          ┌───────────────────────┤
//!                                          ▼                       ▼
//!                                    ┌──────────┐            ┌──────────┐
//!                                    │   CLI    │            │   HTTP   │
//!                                    │(catalog) │            │  (axum)  │
//!                                    └──────────┘            └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`fetch`] | Catalog download and local document source |
//! | [`extract`] | Page-level text extraction |
//! | [`normalize`] | Ligature and non-breaking space repair |
//! | [`entities`] | Course and program pattern strategies |
//! | [`classify`] | Department and college lookup |
//! | [`keywords`] | Synonym keyword expansion |
//! | [`pipeline`] | Page iteration, dedup and parse reports |
//! | [`cache`] | One-shot record cache and loaders |
//! | [`service`] | Per-kind caches behind one handle |
//! | [`search`] | Weighted relevance scoring and ranking |
//! | [`list`] | `catalog list` output |
//! | [`stats`] | Counts by college and department |
//! | [`server`] | JSON HTTP server |

pub mod cache;
pub mod classify;
pub mod config;
pub mod entities;
pub mod extract;
pub mod fetch;
pub mod keywords;
pub mod list;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod service;
pub mod stats;
