#![deny(warnings)]

pub mod analyze;
pub mod classify;
pub mod config;
pub mod emotion;
pub mod lexicon;
pub mod service;
