pub mod get;
pub mod list;
pub mod lock;
pub mod override_grade;
pub mod publish;
pub mod remove_override;
pub mod unlock;
pub mod unpublish;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::final_grades::requests::{
    FinalGradeListQuery, OverrideGradeRequest, UnlockGradeRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct FinalGradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl FinalGradeService {
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

    pub async fn get_final_grade(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_final_grade(self, request, class_offering_id, student_id).await
    }

    pub async fn list_final_grades(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        query: FinalGradeListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_final_grades(self, request, class_offering_id, query).await
    }

    pub async fn publish_grades(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        publish::publish_grades(self, request, class_offering_id, user_id).await
    }

    pub async fn unpublish_grades(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        unpublish::unpublish_grades(self, request, class_offering_id, user_id).await
    }

    pub async fn lock_grade(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        student_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        lock::lock_grade(self, request, class_offering_id, student_id, user_id).await
    }

    pub async fn unlock_grade(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        student_id: i64,
        user_id: i64,
        req: UnlockGradeRequest,
    ) -> ActixResult<HttpResponse> {
        unlock::unlock_grade(self, request, class_offering_id, student_id, user_id, req).await
    }

    pub async fn override_grade(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        student_id: i64,
        user_id: i64,
        req: OverrideGradeRequest,
    ) -> ActixResult<HttpResponse> {
        override_grade::override_grade(self, request, class_offering_id, student_id, user_id, req)
            .await
    }

    pub async fn remove_override(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        student_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        remove_override::remove_override(self, request, class_offering_id, student_id, user_id)
            .await
    }
}

/// 成绩管理权限检查，失败时返回现成的错误响应
pub(crate) async fn ensure_can_manage(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    class_offering_id: i64,
) -> Option<HttpResponse> {
    match storage.can_manage_grades(user_id, class_offering_id).await {
        Ok(true) => None,
        Ok(false) => Some(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "没有管理该教学班成绩的权限",
        ))),
        Err(e) => Some(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("权限检查失败: {e}"),
            )),
        ),
    }
}
