//! Shared components of the account page.
pub mod branding;
pub mod pico;
pub mod wallet_modal;
