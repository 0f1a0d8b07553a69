#![doc = include_str!("../README.md")]

pub mod contract;
pub mod delegation;
pub mod eip712;
mod error;
pub mod msg;
pub mod state;


pub use crate::error::ContractError;
