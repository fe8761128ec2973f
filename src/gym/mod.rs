mod mountain_car;

pub use mountain_car::{MountainCar, Pedal, POSITION_BOUNDS, VELOCITY_BOUNDS};
