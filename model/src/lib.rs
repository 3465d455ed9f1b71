pub mod catalog;
pub mod design;
pub mod part;
pub mod settings;
pub mod units;
pub mod world;
