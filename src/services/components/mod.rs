pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::components::requests::{
    ComponentListQuery, CreateComponentRequest, UpdateComponentRequest,
};
use crate::storage::Storage;

pub struct ComponentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ComponentService {
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

    pub async fn create_component(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
        req: CreateComponentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_component(self, request, class_offering_id, user_id, req).await
    }

    pub async fn list_components(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        query: ComponentListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_components(self, request, class_offering_id, query).await
    }

    pub async fn update_component(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        component_id: i64,
        user_id: i64,
        req: UpdateComponentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_component(self, request, class_offering_id, component_id, user_id, req).await
    }

    pub async fn delete_component(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        component_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_component(self, request, class_offering_id, component_id, user_id).await
    }
}
