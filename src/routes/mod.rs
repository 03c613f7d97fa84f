pub mod components;
pub mod computations;
pub mod final_grades;
pub mod formulas;
pub mod reports;

pub use components::configure_components_routes;
pub use computations::configure_computations_routes;
pub use final_grades::configure_final_grades_routes;
pub use formulas::configure_formulas_routes;
pub use reports::configure_reports_routes;
