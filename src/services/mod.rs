pub mod components;
pub mod computations;
pub mod final_grades;
pub mod formulas;
pub mod reports;

pub use components::ComponentService;
pub use computations::ComputationService;
pub use final_grades::FinalGradeService;
pub use formulas::FormulaService;
pub use reports::ReportService;
