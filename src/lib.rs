//! DamGate controller-core library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All hardware access (keypad scan, I2C display framing,
//! ADC/DMA, RTC registers, PWM) lives behind the port traits in
//! [`app::ports`]; this crate holds no driver code.

#![deny(unused_must_use)]

pub mod app;
pub mod auth;
pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod fsm;
pub mod input;
pub mod nav;
pub mod scheduler;
pub mod waterlog;
