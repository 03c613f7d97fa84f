pub mod distribution;
pub mod summary;
pub mod transcript;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::reports::responses::TranscriptQuery;
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
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

    pub async fn get_class_summary(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        summary::get_class_summary(self, request, class_offering_id, user_id).await
    }

    pub async fn get_grade_distribution(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        distribution::get_grade_distribution(self, request, class_offering_id, user_id).await
    }

    pub async fn get_student_transcript(
        &self,
        request: &HttpRequest,
        student_id: i64,
        user_id: i64,
        query: TranscriptQuery,
    ) -> ActixResult<HttpResponse> {
        transcript::get_student_transcript(self, request, student_id, user_id, query).await
    }
}
