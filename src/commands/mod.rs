pub mod chart;
pub mod scan;
pub mod serve;
pub mod status;
pub mod symbols;
pub mod watch;
