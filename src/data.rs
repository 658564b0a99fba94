mod send_channels;
mod time_calc;

pub use send_channels::*;
pub use time_calc::TimeCalc;
