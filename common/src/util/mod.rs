pub mod date;
pub mod distance;
pub mod logging;
pub mod speed;
pub mod time;
