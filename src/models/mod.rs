//! Modelos del sistema
//!
//! Entidades del núcleo de rotación y sus transiciones puras.

pub mod battery;
pub mod charging_session;
pub mod rotation_plan;
pub mod usage_session;
pub mod vehicle;

pub use battery::{Battery, BatteryEvent, BatteryState, BatteryWrite, NewBattery};
pub use charging_session::{ChargingSession, ChargingSessionClose, NewChargingSession};
pub use rotation_plan::{NewRotationPlan, PlanCancellation, PlanState, RotationPlan};
pub use usage_session::{NewUsageSession, UsageSession, UsageSessionClose};
pub use vehicle::{NewVehicle, Vehicle, VehicleState, VehicleWrite};
