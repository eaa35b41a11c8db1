pub mod clock;
pub mod layout;
pub mod math;
