pub mod configure;
pub mod open;
pub mod poll;
pub mod run;
