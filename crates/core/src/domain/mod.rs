pub mod facts;
pub mod forecast;
pub mod tax;
