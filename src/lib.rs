//! Paymob Accept - payment gateway client and processed-callback reconciliation
//!
//! This crate registers shop orders with the Paymob Accept gateway, issues
//! payment keys for the hosted card form, submits direct card payments and
//! reconciles the gateway's processed callbacks into local order status.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
