pub mod charging_controller;
pub mod rotation_controller;
pub mod usage_controller;
