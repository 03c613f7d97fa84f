pub mod create;
pub mod get;
pub mod list;
pub mod preview;
pub mod validate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::components::entities::{GradingComponent, WeightScheme};
use crate::models::formulas::requests::{
    CreateFormulaRequest, FormulaListQuery, PreviewFormulaRequest, ValidateFormulaRequest,
};
use crate::storage::Storage;

pub struct FormulaService {
    storage: Option<Arc<dyn Storage>>,
}

impl FormulaService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_formula(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
        req: CreateFormulaRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_formula(self, request, class_offering_id, user_id, req).await
    }

    pub async fn get_active_formula(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_active_formula(self, request, class_offering_id).await
    }

    pub async fn list_formulas(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        query: FormulaListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_formulas(self, request, class_offering_id, query).await
    }

    pub async fn validate_formula(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        req: ValidateFormulaRequest,
    ) -> ActixResult<HttpResponse> {
        validate::validate_formula(self, request, class_offering_id, req).await
    }

    pub async fn preview_formula(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        req: PreviewFormulaRequest,
    ) -> ActixResult<HttpResponse> {
        preview::preview_formula(self, request, class_offering_id, req).await
    }
}

/// 权重和校验
///
/// 仅权重制成分参与；目标值与容差来自配置。违规时返回描述，
/// 在公式生效与计算启动两个时点调用。
pub(crate) fn weight_sum_violation(components: &[GradingComponent]) -> Option<String> {
    let weighted: Vec<&GradingComponent> = components
        .iter()
        .filter(|c| c.scheme == WeightScheme::Weighted)
        .collect();
    if weighted.is_empty() {
        return None;
    }

    let grading = &AppConfig::get().grading;
    let sum: f64 = weighted.iter().map(|c| c.weight).sum();
    if (sum - grading.weight_sum_target).abs() > grading.weight_sum_epsilon {
        return Some(format!(
            "权重制成分的权重和为 {sum}，应为 {} (容差 {})",
            grading.weight_sum_target, grading.weight_sum_epsilon
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, weight: f64, scheme: WeightScheme) -> GradingComponent {
        GradingComponent {
            id: 1,
            class_offering_id: 1,
            name: name.to_string(),
            weight,
            max_score: 100.0,
            scheme,
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_weight_sum_ok_at_target() {
        // 默认配置 target=1.0
        let components = vec![
            component("Homework", 0.4, WeightScheme::Weighted),
            component("Exam", 0.6, WeightScheme::Weighted),
        ];
        assert!(weight_sum_violation(&components).is_none());
    }

    #[test]
    fn test_weight_sum_violation_detected() {
        let components = vec![
            component("Homework", 0.4, WeightScheme::Weighted),
            component("Exam", 0.5, WeightScheme::Weighted),
        ];
        assert!(weight_sum_violation(&components).is_some());
    }

    #[test]
    fn test_points_scheme_skips_check() {
        let components = vec![
            component("Homework", 30.0, WeightScheme::Points),
            component("Exam", 70.0, WeightScheme::Points),
        ];
        assert!(weight_sum_violation(&components).is_none());
    }

    #[test]
    fn test_empty_components_skip_check() {
        assert!(weight_sum_violation(&[]).is_none());
    }
}
