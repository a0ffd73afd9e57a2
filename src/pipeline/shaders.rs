pub mod flat;
pub mod phong;
