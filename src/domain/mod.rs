//! Domain model: orders, payments, merchants and the rules that govern them.

pub mod ids;
pub mod instrument;
pub mod merchant;
pub mod order;
pub mod payment;
pub mod ports;
pub mod settlement;
