pub mod contact_route;
pub mod default_route;
pub mod vision_route;
