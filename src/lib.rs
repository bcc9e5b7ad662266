//! Port Ledger - NodePort usage tracking for a Kubernetes cluster
//!
//! This crate reconciles the node ports held by running cluster services
//! with ports reserved by operators ahead of deployment, and refuses new
//! reservations that collide with either.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
