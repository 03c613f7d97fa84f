//! 预导入模块，方便使用

pub use super::assessment_grades::{
    ActiveModel as AssessmentGradeActiveModel, Entity as AssessmentGrades,
    Model as AssessmentGradeModel,
};
pub use super::class_offerings::{
    ActiveModel as ClassOfferingActiveModel, Entity as ClassOfferings, Model as ClassOfferingModel,
};
pub use super::final_grades::{
    ActiveModel as FinalGradeActiveModel, Entity as FinalGrades, Model as FinalGradeModel,
};
pub use super::grade_computations::{
    ActiveModel as GradeComputationActiveModel, Entity as GradeComputations,
    Model as GradeComputationModel,
};
pub use super::grading_components::{
    ActiveModel as GradingComponentActiveModel, Entity as GradingComponents,
    Model as GradingComponentModel,
};
pub use super::grading_formulas::{
    ActiveModel as GradingFormulaActiveModel, Entity as GradingFormulas,
    Model as GradingFormulaModel,
};
pub use super::offering_members::{
    ActiveModel as OfferingMemberActiveModel, Entity as OfferingMembers,
    Model as OfferingMemberModel,
};
