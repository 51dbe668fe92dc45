mod client;
pub mod elia;
pub mod entsoe;

pub use self::{elia::Api as Elia, entsoe::Api as Entsoe};
