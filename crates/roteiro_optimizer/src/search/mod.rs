pub mod grasp;
pub mod neighborhood;
pub mod tabu;
pub mod vnd;
